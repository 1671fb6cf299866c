use std::io::Write;

use otbm_node::{attr_tag, node_type, NodeWriter, RawNode};
use otbm_types::{ConfirmCallback, ItemTypeCatalog, MapVersion, OtbmVersion};

use crate::{MapError, MapWarning};

/// Fields read from the ROOT node's own payload.
pub(crate) struct RootHeader {
    pub version: MapVersion,
    pub width: u16,
    pub height: u16,
}

/// Decodes the root header and applies spec.md §4.4's version gating,
/// prompting `confirm` for anything the loaded catalog doesn't cover.
pub(crate) fn decode_root_header(
    root: &RawNode,
    catalog: &dyn ItemTypeCatalog,
    confirm: Option<&ConfirmCallback<'_>>,
    warnings: &mut Vec<MapWarning>,
) -> Result<RootHeader, MapError> {
    if root.node_type != node_type::ROOT {
        return Err(MapError::UnexpectedRootType(root.node_type));
    }

    let mut r = root.payload_reader();
    let otbm_raw = r.get_u32()?;
    let width = r.get_u16()?;
    let height = r.get_u16()?;
    let items_major = r.get_u32()?;
    let items_minor = r.get_u32()?;

    let otbm = match OtbmVersion::from_u32(otbm_raw) {
        Some(v) => v,
        None => {
            let proceed = confirm.is_some_and(|f| {
                f(
                    "Unsupported map version",
                    &format!("otbm version {otbm_raw} is newer than this codec supports"),
                )
            });
            if !proceed {
                return Err(MapError::UnsupportedOtbmVersion(otbm_raw));
            }
            warnings.push(MapWarning::VersionMismatchAfterConfirm {
                field: "otbm",
                value: otbm_raw,
            });
            OtbmVersion::V4
        }
    };

    if items_major > catalog.major_version() {
        let proceed = confirm.is_some_and(|f| {
            f(
                "Unsupported item database version",
                &format!("map was saved with items major version {items_major}"),
            )
        });
        if !proceed {
            return Err(MapError::UnsupportedItemsMajorVersion(items_major));
        }
        warnings.push(MapWarning::VersionMismatchAfterConfirm {
            field: "itemsMajor",
            value: items_major,
        });
    }

    if items_minor > catalog.minor_version() {
        warnings.push(MapWarning::VersionMismatchAfterConfirm {
            field: "itemsMinor",
            value: items_minor,
        });
    }

    Ok(RootHeader {
        version: MapVersion {
            otbm,
            items_major,
            items_minor,
        },
        width,
        height,
    })
}

/// Opens the ROOT node and writes its header fields. The node is left
/// open for the caller to write the MAP_DATA child into, then close.
pub(crate) fn encode_root_header<W: Write>(
    w: &mut NodeWriter<W>,
    version: MapVersion,
    width: u16,
    height: u16,
) -> Result<(), MapError> {
    w.start_node(node_type::ROOT)?;
    w.write_u32(version.otbm.as_u32())?;
    w.write_u16(width)?;
    w.write_u16(height)?;
    w.write_u32(version.items_major)?;
    w.write_u32(version.items_minor)?;
    Ok(())
}

/// Map-data-scope attributes read from MAP_DATA's own payload.
#[derive(Default)]
pub(crate) struct MapDataAttrs {
    pub description: String,
    pub spawnfile: String,
    pub housefile: String,
}

/// Reads the DESCRIPTION/EXT_SPAWN_FILE/EXT_HOUSE_FILE TLVs from
/// MAP_DATA's payload. Per DESIGN.md, tag 0x01 (DESCRIPTION) may
/// legitimately appear twice; the later occurrence wins.
pub(crate) fn decode_map_data_attrs(node: &RawNode) -> Result<MapDataAttrs, MapError> {
    let mut attrs = MapDataAttrs::default();
    let mut r = node.payload_reader();

    while !r.is_empty() {
        let tag = r.get_u8()?;
        match tag {
            attr_tag::DESCRIPTION => {
                attrs.description = String::from_utf8_lossy(&r.get_string()?).into_owned();
            }
            attr_tag::EXT_SPAWN_FILE => {
                attrs.spawnfile = String::from_utf8_lossy(&r.get_string()?).into_owned();
            }
            attr_tag::EXT_HOUSE_FILE => {
                attrs.housefile = String::from_utf8_lossy(&r.get_string()?).into_owned();
            }
            other => return Err(MapError::UnknownMapDataTag(other)),
        }
    }

    Ok(attrs)
}

/// Writes the MAP_DATA TLV attributes. The description is emitted
/// twice under tag 0x01, preserving the byte-compatibility quirk
/// DESIGN.md records rather than silently fixing it.
pub(crate) fn encode_map_data_attrs<W: Write>(
    w: &mut NodeWriter<W>,
    attrs: &MapDataAttrs,
) -> Result<(), MapError> {
    w.write_u8(attr_tag::DESCRIPTION)?;
    w.write_string(attrs.description.as_bytes())?;
    w.write_u8(attr_tag::DESCRIPTION)?;
    w.write_string(attrs.description.as_bytes())?;

    if !attrs.spawnfile.is_empty() {
        w.write_u8(attr_tag::EXT_SPAWN_FILE)?;
        w.write_string(attrs.spawnfile.as_bytes())?;
    }
    if !attrs.housefile.is_empty() {
        w.write_u8(attr_tag::EXT_HOUSE_FILE)?;
        w.write_string(attrs.housefile.as_bytes())?;
    }
    Ok(())
}
