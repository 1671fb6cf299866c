use std::fmt;

/// The OTBM container format major version, read from the root node.
///
/// Encoded on the wire as a raw `u32` (0..=3); anything beyond `V4` is
/// an unsupported major version the loader must warn-and-prompt on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum OtbmVersion {
    V1 = 0,
    V2 = 1,
    V3 = 2,
    V4 = 3,
}

impl OtbmVersion {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Parses a raw version number, returning `None` for anything past
    /// the versions this codec knows about (the caller is responsible
    /// for the warn-and-prompt-the-user branch spec.md describes).
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::V1),
            1 => Some(Self::V2),
            2 => Some(Self::V3),
            3 => Some(Self::V4),
            _ => None,
        }
    }
}

impl fmt::Display for OtbmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
        };
        write!(f, "V{n}")
    }
}

/// Version information pinned at load time, gating which branches of
/// the codec are taken for the remainder of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapVersion {
    /// The OTBM container major version.
    pub otbm: OtbmVersion,
    /// The item database major version the map was saved against.
    pub items_major: u32,
    /// The item database minor version the map was saved against.
    ///
    /// Exposed as the "client version" through [`crate::MapVersion`]
    /// consumers, per spec.
    pub items_minor: u32,
}

impl MapVersion {
    /// The client version, an alias for [`Self::items_minor`].
    #[inline]
    pub const fn client(&self) -> u32 {
        self.items_minor
    }
}
