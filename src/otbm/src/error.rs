use thiserror::Error;

/// Errors from a full orchestrated load or save: the binary tree, any
/// of its sidecars, or (for `.otgz` paths) the archive layer.
#[derive(Debug, Error)]
pub enum OtbmError {
    #[error(transparent)]
    Map(#[from] otbm_map::MapError),

    #[error(transparent)]
    Sidecar(#[from] otbm_sidecar::SidecarError),

    #[error(transparent)]
    Archive(#[from] otbm_archive::ArchiveError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("path '{0}' has no file stem to derive sidecar filenames from")]
    MissingFileStem(String),
}

/// A recoverable condition from either the binary tree or a sidecar,
/// merged into one list so callers don't have to juggle two separate
/// warning vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    Map(otbm_map::MapWarning),
    Sidecar(otbm_sidecar::SidecarWarning),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Map(w) => write!(f, "{w}"),
            Self::Sidecar(w) => write!(f, "{w}"),
        }
    }
}

impl From<otbm_map::MapWarning> for Warning {
    fn from(value: otbm_map::MapWarning) -> Self {
        Self::Map(value)
    }
}

impl From<otbm_sidecar::SidecarWarning> for Warning {
    fn from(value: otbm_sidecar::SidecarWarning) -> Self {
        Self::Sidecar(value)
    }
}
