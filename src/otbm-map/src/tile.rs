use std::io::Write;

use otbm_item::{can_write_compact_ground, decode_item, encode_item, Item, ItemError};
use otbm_node::{attr_tag, node_type, NodeWriter, RawNode};
use otbm_types::{ItemTypeCatalog, MapVersion, Position};

use crate::{flags::TileFlags, Map, MapError, MapWarning, Tile};

/// Decodes one `TILE_AREA` node's base position and its TILE/HOUSETILE
/// children, inserting each into `map.tiles`.
pub(crate) fn decode_tile_area(
    node: &RawNode,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    map: &mut Map,
    warnings: &mut Vec<MapWarning>,
) -> Result<(), MapError> {
    let mut r = node.payload_reader();
    let base_x = r.get_u16().map_err(|_| MapError::MalformedTileArea)?;
    let base_y = r.get_u16().map_err(|_| MapError::MalformedTileArea)?;
    let base_z = r.get_u8().map_err(|_| MapError::MalformedTileArea)?;

    for child in &node.children {
        let is_house_tile = match child.node_type {
            node_type::TILE => false,
            node_type::HOUSETILE => true,
            other => {
                warnings.push(MapWarning::UnknownNodeType { node_type: other });
                continue;
            }
        };

        let tile = decode_tile(child, (base_x, base_y, base_z), is_house_tile, version, catalog, warnings)?;

        if map.tiles.contains_key(&tile.position) {
            warnings.push(MapWarning::DuplicateTile { position: tile.position });
            continue;
        }
        map.tiles.insert(tile.position, tile);
    }

    Ok(())
}

fn decode_tile(
    node: &RawNode,
    base: (u16, u16, u8),
    is_house_tile: bool,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    warnings: &mut Vec<MapWarning>,
) -> Result<Tile, MapError> {
    let mut r = node.payload_reader();
    let x_offset = r.get_u8()?;
    let y_offset = r.get_u8()?;
    let position = Position::new(base.0 | x_offset as u16, base.1 | y_offset as u16, base.2);

    let mut tile = Tile::new(position);

    if is_house_tile {
        let house_id = r.get_u32()?;
        if house_id == 0 {
            warnings.push(MapWarning::InvalidHouseId { position });
        } else {
            tile.house_id = Some(house_id);
        }
    }

    while !r.is_empty() {
        let tag = r.get_u8()?;
        match tag {
            attr_tag::TILE_FLAGS => {
                let bits = r.get_u32()?;
                tile.flags = TileFlags::from_bits_truncate(bits);
            }
            attr_tag::ITEM_COMPACT => {
                let id = r.get_u16()?;
                tile.ground = Some(Item::plain(id));
            }
            _ => {
                warnings.push(MapWarning::MalformedTileAttribute { position });
                break;
            }
        }
    }

    for child in &node.children {
        if child.node_type != node_type::ITEM {
            return Err(MapError::ExpectedItemChild(position));
        }
        let item = match decode_item(child, version, catalog) {
            Ok(item) => item,
            Err(ItemError::UnknownAttributeTag { id, tag }) => {
                warnings.push(MapWarning::InvalidItemAttribute { position, item_id: id, tag });
                continue;
            }
            Err(other) => return Err(MapError::from(other)),
        };
        let is_ground_type = catalog.item_type(item.id).is_some_and(|info| info.is_ground);

        if tile.ground.is_none() && is_ground_type && !item.is_complex() {
            tile.ground = Some(item);
        } else {
            tile.items.push(item);
        }
    }

    Ok(tile)
}

/// Tracks the currently open `TILE_AREA` during the save traversal,
/// opening/closing it whenever the 256x256x1 cell changes.
pub(crate) struct TileAreaWriter {
    current_area: Option<(u16, u16, u8)>,
}

impl TileAreaWriter {
    pub fn new() -> Self {
        Self { current_area: None }
    }

    /// Ensures a `TILE_AREA` covering `position` is open, closing the
    /// previous one first if the area changed.
    pub fn ensure_area<W: Write>(&mut self, w: &mut NodeWriter<W>, position: Position) -> Result<(), MapError> {
        let area = position.area_base();
        if self.current_area != Some(area) {
            if self.current_area.is_some() {
                w.end_node()?;
            }
            w.start_node(node_type::TILE_AREA)?;
            w.write_u16(area.0)?;
            w.write_u16(area.1)?;
            w.write_u8(area.2)?;
            self.current_area = Some(area);
        }
        Ok(())
    }

    pub fn close<W: Write>(&mut self, w: &mut NodeWriter<W>) -> Result<(), MapError> {
        if self.current_area.take().is_some() {
            w.end_node()?;
        }
        Ok(())
    }
}

/// Writes one tile (TILE or HOUSETILE), its flags, ground, and items,
/// per spec.md §4.4's save-side traversal rules. Zone accumulation
/// happens in the caller, which reads `tile.flags`/`tile.zone_ids`
/// directly rather than going through this function.
pub(crate) fn encode_tile<W: Write>(
    w: &mut NodeWriter<W>,
    tile: &Tile,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
) -> Result<(), MapError> {
    let offset = tile.position.area_offset();

    let node_kind = if tile.house_id.is_some() { node_type::HOUSETILE } else { node_type::TILE };
    w.start_node(node_kind)?;
    w.write_u8(offset.0)?;
    w.write_u8(offset.1)?;
    if let Some(house_id) = tile.house_id {
        w.write_u32(house_id)?;
    }

    if !tile.flags.is_empty() {
        w.write_u8(attr_tag::TILE_FLAGS)?;
        w.write_u32(tile.flags.bits())?;
    }

    if let Some(ground) = &tile.ground {
        let info = catalog.item_type(ground.id);
        let is_meta = info.is_some_and(|i| i.is_meta_item);
        let duplicates_border = info.is_some_and(|i| {
            i.has_border_equivalent
                && i.ground_equivalent_id.is_some_and(|equiv| tile.item_ids().any(|id| id == equiv))
        });

        let compact = match info {
            Some(i) => can_write_compact_ground(ground, &i, tile.item_ids()),
            None => true,
        };

        if is_meta || duplicates_border {
            // Skipped per spec's save-side traversal rule 2.
        } else if compact {
            w.write_u8(attr_tag::ITEM_COMPACT)?;
            w.write_u16(ground.id)?;
        } else {
            encode_item(ground, version, catalog, w)?;
        }
    }

    for item in &tile.items {
        let is_meta = catalog.item_type(item.id).is_some_and(|i| i.is_meta_item);
        if is_meta {
            continue;
        }
        encode_item(item, version, catalog, w)?;
    }

    w.end_node()?;
    Ok(())
}
