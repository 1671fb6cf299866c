//! Polymorphic item model: decoding/encoding of item bodies, their
//! TLV attribute streams, and recursive container contents.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod item;
pub use item::*;

mod value;
pub use value::*;
