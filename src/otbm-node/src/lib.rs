//! Byte-stuffed framing of a tree of typed nodes, the wire format
//! every other layer of the MAP codec is built on top of.
//!
//! A whole file is parsed eagerly into a [`RawNode`] tree rather than
//! walked lazily node-by-node, since the format is explicitly a
//! whole-file load (no streaming partial decode, see spec's
//! non-goals) — this collapses the `rootNode`/`child`/`advance`
//! cursor dance into plain tree recursion while preserving the same
//! bounds and ordering guarantees.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod consts;
pub use consts::*;

mod error;
pub use error::*;

mod payload;
pub use payload::*;

mod reader;
pub use reader::*;

mod writer;
pub use writer::*;
