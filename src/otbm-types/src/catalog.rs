/// The polymorphic variant an item's `ItemType` entry declares it to
/// belong to. Drives which [`crate::RawString`]-bearing/position-bearing
/// fields an item decodes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCategory {
    Plain,
    Container,
    Teleport,
    Door,
    Depot,
}

/// Everything the codec needs to know about an item id from the
/// external item-type database (out of scope per spec.md §1; modeled
/// here as a trait so the codec compiles and can be tested against an
/// in-memory stub).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemTypeInfo {
    pub category: ItemCategory,
    pub stackable: bool,
    pub is_splash: bool,
    pub is_fluid_container: bool,
    /// If set, items of this type are only saved with legacy charge
    /// tags when the map's minor client version is at least this.
    pub minor_version_gate: Option<u32>,
    /// A "meta" item (e.g. a border/optimization marker) is never
    /// saved as a tile's ground.
    pub is_meta_item: bool,
    /// Whether this item has a border-equivalent ground id, used to
    /// avoid duplicating border decoration already implied by an
    /// adjacent full item.
    pub has_border_equivalent: bool,
    pub ground_equivalent_id: Option<u16>,
    /// Whether this item type belongs on the tile's `ground` slot
    /// rather than its `items` stack. Not part of spec.md §6's catalog
    /// query list verbatim, but required to resolve which decoded
    /// child item a tile's `ground` field refers to; see DESIGN.md.
    pub is_ground: bool,
}

impl ItemTypeInfo {
    #[inline]
    pub fn is_stackable_like(&self) -> bool {
        self.stackable || self.is_splash || self.is_fluid_container
    }
}

/// Queryable external item-type database.
pub trait ItemTypeCatalog {
    fn item_type(&self, id: u16) -> Option<ItemTypeInfo>;

    /// The database's own major version, compared against a loaded
    /// map's `itemsMajorVersion` header field. Default of `u32::MAX`
    /// means "never gate" for catalogs that don't track this.
    fn major_version(&self) -> u32 {
        u32::MAX
    }

    /// The database's own minor (client) version, compared against a
    /// loaded map's `itemsMinorVersion` header field.
    fn minor_version(&self) -> u32 {
        u32::MAX
    }
}

/// Opaque handle into the external creature catalog.
pub type CreatureTypeId = u32;

/// Queryable, mutable external creature catalog: maps names to
/// creature types and may auto-register unknown names.
pub trait CreatureCatalog {
    fn creature_type(&self, name: &str) -> Option<CreatureTypeId>;

    /// Registers a placeholder creature type for an unknown name,
    /// tagged as NPC or monster, and returns its handle.
    fn add_missing(&mut self, name: &str, is_npc: bool) -> CreatureTypeId;
}

/// The eight-way facing of a spawned creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Parses a direction from its wire/XML numeric value, defaulting
    /// to [`Direction::North`] for anything out of the known range, as
    /// spec.md's spawn load rules require.
    pub fn from_wire(value: u8) -> Self {
        match value {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            3 => Self::West,
            4 => Self::NorthEast,
            5 => Self::NorthWest,
            6 => Self::SouthEast,
            7 => Self::SouthWest,
            _ => Self::North,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
            Self::NorthEast => 4,
            Self::NorthWest => 5,
            Self::SouthEast => 6,
            Self::SouthWest => 7,
        }
    }
}
