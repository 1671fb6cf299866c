use std::io::Write;

use otbm_node::{node_type, NodeWriter, RawNode};
use otbm_types::{MapVersion, OtbmVersion, Position};

use crate::{Map, MapError, MapWarning, Waypoint};

/// Decodes a `WAYPOINTS` node's `WAYPOINT` children into
/// `map.waypoints`.
pub(crate) fn decode_waypoints(node: &RawNode, map: &mut Map, warnings: &mut Vec<MapWarning>) -> Result<(), MapError> {
    for child in &node.children {
        if child.node_type != node_type::WAYPOINT {
            warnings.push(MapWarning::UnknownNodeType { node_type: child.node_type });
            continue;
        }

        let mut r = child.payload_reader();
        let name = String::from_utf8_lossy(&r.get_string().map_err(|_| MapError::MalformedWaypoint)?).into_owned();
        let x = r.get_u16().map_err(|_| MapError::MalformedWaypoint)?;
        let y = r.get_u16().map_err(|_| MapError::MalformedWaypoint)?;
        let z = r.get_u8().map_err(|_| MapError::MalformedWaypoint)?;

        map.waypoints.insert(
            name.clone(),
            Waypoint {
                name,
                pos: Position::new(x, y, z),
            },
        );
    }

    Ok(())
}

/// Encodes `map.waypoints` as a `WAYPOINTS` node, but only when the
/// target version is otbm >= V3, per spec.md §4.4.
pub(crate) fn encode_waypoints<W: Write>(w: &mut NodeWriter<W>, map: &Map, version: MapVersion) -> Result<(), MapError> {
    if version.otbm < OtbmVersion::V3 {
        return Ok(());
    }

    w.start_node(node_type::WAYPOINTS)?;
    for waypoint in map.waypoints.values() {
        w.start_node(node_type::WAYPOINT)?;
        w.write_string(waypoint.name.as_bytes())?;
        w.write_u16(waypoint.pos.x)?;
        w.write_u16(waypoint.pos.y)?;
        w.write_u8(waypoint.pos.z)?;
        w.end_node()?;
    }
    w.end_node()?;
    Ok(())
}
