use std::io;

use thiserror::Error;

/// Errors from packing or unpacking an `.otgz` archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("archive is missing required entry '{0}'")]
    MissingEntry(&'static str),
}
