use std::collections::HashMap;
use std::io::Write;

use otbm_node::NodeWriter;
use otbm_types::{ItemTypeCatalog, MapVersion, Position, SaveOptions};

use crate::{
    flags::TileFlags,
    root::{encode_map_data_attrs, encode_root_header, MapDataAttrs},
    tile::{encode_tile, TileAreaWriter},
    towns::encode_towns,
    waypoints::encode_waypoints,
    Map, MapError,
};

const PROGRESS_TILE_INTERVAL: usize = 8192;

/// Encodes a complete binary map tree (without sidecars). Returns the
/// zone id -> positions accumulator built from tiles whose flags mark
/// them as a zone brush, for the facade crate to hand to the zones
/// sidecar writer.
///
/// Traversal groups tiles by `TILE_AREA` (ascending z, then area row,
/// then area column, then the tile's own y/x within that area) so
/// that each area's children are written contiguously, matching the
/// open-once-per-area guarantee spec.md's TILE_AREA invariant assumes.
///
/// Returns the underlying sink back to the caller alongside the zone
/// map, so a `Vec<u8>` memory sink (the archive component's use case)
/// can be read back after writing; a disk sink's caller typically
/// just drops it.
pub fn save_map_tree<W: Write>(
    map: &Map,
    writer: W,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    options: &SaveOptions<'_>,
) -> Result<(W, HashMap<u16, Vec<Position>>), MapError> {
    let magic: [u8; 4] = if options.write_otb_magic_number { *b"OTBM" } else { [0; 4] };

    let mut w = NodeWriter::new(writer);
    w.write_u8(magic[0])?;
    w.write_u8(magic[1])?;
    w.write_u8(magic[2])?;
    w.write_u8(magic[3])?;

    encode_root_header(&mut w, version, map.width, map.height)?;

    let attrs = MapDataAttrs {
        description: map.description.clone(),
        spawnfile: map.spawnfile.clone(),
        housefile: map.housefile.clone(),
    };

    w.start_node(otbm_node::node_type::MAP_DATA)?;
    encode_map_data_attrs(&mut w, &attrs)?;

    let mut zone_map: HashMap<u16, Vec<Position>> = HashMap::new();
    let mut positions: Vec<Position> = map.tiles.keys().copied().filter(|p| !map.tiles[p].is_empty()).collect();
    positions.sort_by_key(|p| {
        let area = p.area_base();
        (p.z, area.1, area.0, p.y, p.x)
    });

    let mut area_writer = TileAreaWriter::new();
    for (count, position) in positions.iter().enumerate() {
        let tile = &map.tiles[position];

        area_writer.ensure_area(&mut w, *position)?;

        if tile.flags.contains(TileFlags::ZONE_BRUSH) {
            for &zone_id in &tile.zone_ids {
                zone_map.entry(zone_id).or_default().push(*position);
            }
        }

        encode_tile(&mut w, tile, version, catalog)?;

        if let Some(progress) = options.progress {
            if (count + 1) % PROGRESS_TILE_INTERVAL == 0 {
                let percent = (((count + 1) * 100) / positions.len().max(1)) as u8;
                progress(percent, "tiles");
            }
        }
    }
    area_writer.close(&mut w)?;

    encode_towns(&mut w, map)?;
    encode_waypoints(&mut w, map, version)?;
    w.end_node()?; // MAP_DATA

    w.end_node()?; // ROOT

    let sink = w.finish()?;

    if let Some(progress) = options.progress {
        progress(100, "tiles");
    }

    Ok((sink, zone_map))
}
