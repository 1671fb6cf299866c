#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use clap::Parser;

mod catalog;

mod cli;
use cli::Cli;

mod cmd;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.verbosity.setup();

    cli.command.handle()
}
