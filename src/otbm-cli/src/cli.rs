use clap::{ArgAction, Args, Parser, Subcommand};

use crate::cmd::*;

/// The CLI interface for the otbm application.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The selected command.
    #[clap(subcommand)]
    pub command: OtbmCommand,

    #[clap(flatten)]
    pub verbosity: Verbosity,
}

/// The top-level commands supported by the otbm CLI.
#[derive(Debug, Subcommand)]
pub enum OtbmCommand {
    Info(Info),
    Load(Load),
    Convert(Convert),
}

impl OtbmCommand {
    pub fn handle(self) -> eyre::Result<()> {
        match self {
            Self::Info(info) => info.handle(),
            Self::Load(load) => load.handle(),
            Self::Convert(convert) => convert.handle(),
        }
    }
}

/// Configures the verbosity of the builtin logger.
#[derive(Clone, Copy, Debug, Args)]
pub struct Verbosity {
    /// Configures the log verbosity of the otbm CLI.
    ///
    /// `-v` is Info, `-vv` is Debug, `-vvv` is Trace.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Verbosity {
    /// Configures the global logger based on the settings.
    pub fn setup(self) {
        let level = self.log_level();
        simple_logger::init_with_level(level).unwrap();
    }

    fn log_level(self) -> log::Level {
        match self.verbose {
            0 => log::Level::Error,
            1 => log::Level::Info,
            2 => log::Level::Debug,
            _ => log::Level::Trace,
        }
    }
}
