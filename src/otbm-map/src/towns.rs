use std::io::Write;

use otbm_node::{node_type, NodeWriter, RawNode};
use otbm_types::Position;

use crate::{Map, MapError, MapWarning, Town};

/// Decodes a `TOWNS` node's `TOWN` children into `map.towns`.
pub(crate) fn decode_towns(node: &RawNode, map: &mut Map, warnings: &mut Vec<MapWarning>) -> Result<(), MapError> {
    for child in &node.children {
        if child.node_type != node_type::TOWN {
            warnings.push(MapWarning::UnknownNodeType { node_type: child.node_type });
            continue;
        }

        let mut r = child.payload_reader();
        let id = r.get_u32().map_err(|_| MapError::MalformedTown(0))?;
        let name = String::from_utf8_lossy(&r.get_string().map_err(|_| MapError::MalformedTown(id))?).into_owned();
        let x = r.get_u16().map_err(|_| MapError::MalformedTown(id))?;
        let y = r.get_u16().map_err(|_| MapError::MalformedTown(id))?;
        let z = r.get_u8().map_err(|_| MapError::MalformedTown(id))?;

        if map.towns.contains_key(&id) {
            warnings.push(MapWarning::DuplicateTown { id });
            continue;
        }

        map.towns.insert(
            id,
            Town {
                id,
                name,
                temple_pos: Position::new(x, y, z),
            },
        );
    }

    Ok(())
}

/// Encodes `map.towns` as a `TOWNS` node with one `TOWN` child each,
/// only if at least one town exists.
pub(crate) fn encode_towns<W: Write>(w: &mut NodeWriter<W>, map: &Map) -> Result<(), MapError> {
    if map.towns.is_empty() {
        return Ok(());
    }

    w.start_node(node_type::TOWNS)?;
    for town in map.towns.values() {
        w.start_node(node_type::TOWN)?;
        w.write_u32(town.id)?;
        w.write_string(town.name.as_bytes())?;
        w.write_u16(town.temple_pos.x)?;
        w.write_u16(town.temple_pos.y)?;
        w.write_u8(town.temple_pos.z)?;
        w.end_node()?;
    }
    w.end_node()?;
    Ok(())
}
