use std::io;

use thiserror::Error;

/// Errors from the node stream codec.
///
/// Every variant here is a *fatal* framing problem — higher layers
/// (the map tree codec) decide whether a given occurrence should be
/// downgraded to a recorded warning or propagated as a load failure,
/// per spec's error taxonomy.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("none of the accepted magic values matched the file header")]
    BadMagic,

    #[error("unexpected end of node payload")]
    UnexpectedEof,

    #[error("expected NODE_START, found byte 0x{0:02X}")]
    ExpectedNodeStart(u8),

    #[error("unbalanced node: end_node() called without a matching start_node()")]
    UnbalancedNode,

    #[error("node stream closed early: expected NODE_END before end of file")]
    UnterminatedNode,
}
