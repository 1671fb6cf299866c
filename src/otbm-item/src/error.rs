use thiserror::Error;

/// Errors raised while decoding or encoding a single item's body.
///
/// Callers that can still make forward progress (e.g. the tile
/// decoder, which can skip one malformed item and continue with its
/// siblings) are expected to downgrade these to a recorded warning;
/// an error propagating out of a container decode is always fatal,
/// since desyncing inside a container's child stream cannot be
/// safely recovered from.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("{0}")]
    Node(#[from] otbm_node::NodeError),

    #[error("unknown attribute tag 0x{tag:02X} with no known fixed-width skip for item {id}")]
    UnknownAttributeTag { id: u16, tag: u8 },

    #[error("container child node has type 0x{0:02X}, expected OTBM_ITEM")]
    ExpectedItemChild(u8),

    #[error("malformed attribute map entry: {0}")]
    MalformedAttributeMap(&'static str),
}
