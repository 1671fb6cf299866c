use std::io;

use thiserror::Error;

/// Fatal conditions from loading or saving a sidecar file.
///
/// Per spec.md §7, a *missing* sidecar file is never fatal (the
/// caller downgrades that case to a [`crate::SidecarWarning`] before
/// it ever reaches this type) — everything here is a genuine parse
/// or I/O failure on a file that does exist.
#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize TOML for zone {zone_id}: {source}")]
    TomlSerialize {
        zone_id: u16,
        #[source]
        source: toml::ser::Error,
    },

    #[error("house element is missing required attribute '{0}'")]
    MissingHouseAttr(&'static str),
}

/// A recoverable condition recorded while loading a sidecar, merged
/// into the same `warnings` list the binary loader populates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidecarWarning {
    MissingFile { kind: &'static str, path: String },
    HouseMissingTownId { house_id: u32 },
    HouseNotReferenced { house_id: u32 },
    DuplicateSpawn { x: u16, y: u16, z: u8 },
    DiscardedSpawn { x: u16, y: u16, z: u8, reason: &'static str },
    DiscardedCreature { name: String, reason: &'static str },
    CreatureTileMissing { x: u16, y: u16, z: u8 },
    CreatureTileOccupied { x: u16, y: u16, z: u8 },
    UnknownCreature { name: String },
    ZonePositionHasNoTile { x: u16, y: u16, z: u8 },
}

impl std::fmt::Display for SidecarWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile { kind, path } => {
                write!(f, "{kind} sidecar '{path}' not found, using default")
            }
            Self::HouseMissingTownId { house_id } => {
                write!(f, "house {house_id} has no townid, removed")
            }
            Self::HouseNotReferenced { house_id } => {
                write!(f, "house {house_id} in houses file has no HOUSETILE referencing it, skipped")
            }
            Self::DuplicateSpawn { x, y, z } => {
                write!(f, "duplicate spawn center at ({x},{y},{z}) skipped")
            }
            Self::DiscardedSpawn { x, y, z, reason } => {
                write!(f, "spawn at ({x},{y},{z}) discarded: {reason}")
            }
            Self::DiscardedCreature { name, reason } => {
                write!(f, "creature '{name}' discarded: {reason}")
            }
            Self::CreatureTileMissing { x, y, z } => {
                write!(f, "no tile at ({x},{y},{z}) for spawn creature, skipped")
            }
            Self::CreatureTileOccupied { x, y, z } => {
                write!(f, "tile at ({x},{y},{z}) already has a creature, skipped")
            }
            Self::UnknownCreature { name } => {
                write!(f, "creature '{name}' is not in the creature catalog, registering placeholder")
            }
            Self::ZonePositionHasNoTile { x, y, z } => {
                write!(f, "zone position ({x},{y},{z}) has no tile, ignored")
            }
        }
    }
}
