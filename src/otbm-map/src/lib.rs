//! The map tree codec: root header, `MAP_DATA`, tile areas, tiles,
//! towns and waypoints, layered on top of [`otbm_node`] and
//! [`otbm_item`].
//!
//! Sidecar orchestration (houses/spawns/zones) and archive packaging
//! live one layer up, in `otbm-sidecar`/`otbm-archive`/the `otbm`
//! facade crate — this crate only knows about the binary tree.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::*;

pub mod flags;
pub use flags::TileFlags;

mod load;
pub use load::*;

mod root;

mod save;
pub use save::*;

mod tile;

mod towns;

mod types;
pub use types::*;

mod waypoints;

use otbm_node::{node_type, parse_file};
use otbm_types::MapVersion;

/// Reads only the root node's header fields, without decoding the
/// rest of the tree — the operation spec.md's `getVersionInfo`
/// exposes to callers.
///
/// The node codec always parses a whole file eagerly (see
/// [`otbm_node`]'s module docs), so this still walks the full byte
/// buffer; it simply ignores everything but the root payload.
pub fn read_version_info(data: &[u8]) -> Result<MapVersion, MapError> {
    const ACCEPTED_MAGICS: &[[u8; 4]] = &[*b"OTBM", [0, 0, 0, 0]];

    let root = parse_file(data, ACCEPTED_MAGICS)?;
    if root.node_type != node_type::ROOT {
        return Err(MapError::UnexpectedRootType(root.node_type));
    }

    let mut r = root.payload_reader();
    let otbm_raw = r.get_u32()?;
    let _width = r.get_u16()?;
    let _height = r.get_u16()?;
    let items_major = r.get_u32()?;
    let items_minor = r.get_u32()?;

    let otbm = otbm_types::OtbmVersion::from_u32(otbm_raw)
        .ok_or(MapError::UnsupportedOtbmVersion(otbm_raw))?;

    Ok(MapVersion {
        otbm,
        items_major,
        items_minor,
    })
}
