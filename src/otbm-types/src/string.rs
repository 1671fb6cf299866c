use std::fmt;

/// A byte-preserving string as MAP strings are defined on the wire:
/// a `u16` length prefix followed by raw bytes, with no terminator
/// and no UTF-8 enforcement.
///
/// Most strings in practice are ASCII map/item text, but the format
/// does not guarantee it, so round-tripping must not lossily convert
/// through [`String`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RawString(pub Vec<u8>);

impl RawString {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lossy UTF-8 view, for logging and sidecar (XML/TOML) export
    /// where the host formats require valid text.
    pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for RawString {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for RawString {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<Vec<u8>> for RawString {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawString({:?})", self.to_string_lossy())
    }
}
