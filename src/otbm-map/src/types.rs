use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use otbm_item::Item;
use otbm_types::{CreatureTypeId, Direction, Position};

use crate::flags::TileFlags;

/// A single map, as populated by [`crate::load::load_map`] and
/// consumed by [`crate::save::save_map`].
///
/// `tiles` is the single source of truth for per-position state;
/// spawn centers and house tile-sets are derived rather than
/// separately stored, so there is exactly one place that can go out
/// of sync.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Map {
    pub width: u16,
    pub height: u16,
    pub description: String,
    pub spawnfile: String,
    pub housefile: String,
    pub tiles: HashMap<Position, Tile>,
    pub houses: IndexMap<u32, House>,
    pub towns: IndexMap<u32, Town>,
    pub waypoints: IndexMap<String, Waypoint>,
}

impl Map {
    /// Positions of tiles carrying spawn data, derived from `tiles`.
    pub fn spawn_centers(&self) -> impl Iterator<Item = &Position> {
        self.tiles
            .iter()
            .filter(|(_, tile)| tile.spawn.is_some())
            .map(|(pos, _)| pos)
    }

    /// Recomputes every house's `tiles` set from the current tile map.
    /// Called once at the end of a load.
    pub fn rebuild_house_tiles(&mut self) {
        for house in self.houses.values_mut() {
            house.tiles.clear();
        }
        let mut by_house: HashMap<u32, Vec<Position>> = HashMap::new();
        for (pos, tile) in &self.tiles {
            if let Some(house_id) = tile.house_id {
                by_house.entry(house_id).or_default().push(*pos);
            }
        }
        for (house_id, mut positions) in by_house {
            if let Some(house) = self.houses.get_mut(&house_id) {
                positions.sort();
                house.tiles = positions;
            }
        }
    }
}

/// One map cell. `house_id.is_some()` classifies the tile as a
/// HOUSETILE on the wire; everything else is shared between TILE and
/// HOUSETILE.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tile {
    pub position: Position,
    pub ground: Option<Item>,
    pub items: Vec<Item>,
    pub flags: TileFlags,
    pub house_id: Option<u32>,
    pub spawn: Option<Spawn>,
    pub creature: Option<Creature>,
    pub zone_ids: BTreeSet<u16>,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Whether this tile has content worth writing on save (empty
    /// tiles are skipped by the save-side traversal).
    pub fn is_empty(&self) -> bool {
        self.ground.is_none()
            && self.items.is_empty()
            && self.flags.is_empty()
            && self.house_id.is_none()
            && self.spawn.is_none()
            && self.creature.is_none()
            && self.zone_ids.is_empty()
    }

    /// All item type ids present on this tile (ground + items), used
    /// to test a candidate ground's border-equivalent against.
    pub fn item_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.ground.iter().chain(self.items.iter()).map(|item| item.id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct House {
    pub id: u32,
    pub name: String,
    pub exit: Option<Position>,
    pub rent: i32,
    pub guildhall: bool,
    pub townid: u32,
    /// Derived from the map's tiles, rebuilt by
    /// [`Map::rebuild_house_tiles`] rather than maintained by hand.
    pub tiles: Vec<Position>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Town {
    pub id: u32,
    pub name: String,
    pub temple_pos: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waypoint {
    pub name: String,
    pub pos: Position,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spawn {
    pub center: Position,
    pub radius: i32,
    pub creatures: Vec<Creature>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    pub name: String,
    pub type_id: Option<CreatureTypeId>,
    pub offset: (i32, i32),
    pub spawntime: i32,
    pub direction: Direction,
    pub is_npc: bool,
}
