use std::io::Read;

use otbm_node::{node_type, parse_file};
use otbm_types::{ItemTypeCatalog, LoadOptions, MapVersion};

use crate::{
    root::{decode_map_data_attrs, decode_root_header},
    towns::decode_towns,
    waypoints::decode_waypoints,
    Map, MapError, MapWarning,
};

const ACCEPTED_MAGICS: &[[u8; 4]] = &[*b"OTBM", [0, 0, 0, 0]];

/// Loads a complete binary map tree (without sidecars — see the
/// facade crate for the orchestrated `load_map` that also reads
/// houses/spawns/zones).
pub fn load_map_tree<R: Read>(
    mut reader: R,
    catalog: &dyn ItemTypeCatalog,
    options: &LoadOptions<'_>,
) -> Result<(Map, MapVersion, Vec<MapWarning>), MapError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let root = parse_file(&bytes, ACCEPTED_MAGICS)?;

    let mut warnings = Vec::new();
    let header = decode_root_header(&root, catalog, options.confirm_unsupported_version, &mut warnings)?;

    let map_data = root
        .children
        .iter()
        .find(|c| c.node_type == node_type::MAP_DATA)
        .ok_or(MapError::MissingMapData)?;

    let attrs = decode_map_data_attrs(map_data)?;
    let mut map = Map {
        width: header.width,
        height: header.height,
        description: attrs.description,
        spawnfile: attrs.spawnfile,
        housefile: attrs.housefile,
        ..Map::default()
    };

    let total = map_data.children.len().max(1);
    for (index, child) in map_data.children.iter().enumerate() {
        match child.node_type {
            node_type::TILE_AREA => {
                crate::tile::decode_tile_area(child, header.version, catalog, &mut map, &mut warnings)?;
            }
            node_type::TOWNS => decode_towns(child, &mut map, &mut warnings)?,
            node_type::WAYPOINTS => decode_waypoints(child, &mut map, &mut warnings)?,
            other => warnings.push(MapWarning::UnknownNodeType { node_type: other }),
        }

        if let Some(progress) = options.progress {
            let percent = ((index + 1) * 100 / total) as u8;
            progress(percent, "tiles");
        }
    }

    map.rebuild_house_tiles();

    Ok((map, header.version, warnings))
}
