use otbm_types::Position;
use thiserror::Error;

/// Fatal conditions that abort a load or save outright.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Node(#[from] otbm_node::NodeError),

    #[error(transparent)]
    Item(#[from] otbm_item::ItemError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required MAP_DATA child under the root node")]
    MissingMapData,

    #[error("root node type 0x{0:02X}, expected ROOT (0x00)")]
    UnexpectedRootType(u8),

    #[error("otbm version {0} is unsupported and the user declined to continue")]
    UnsupportedOtbmVersion(u32),

    #[error("items major version {0} is unsupported and the user declined to continue")]
    UnsupportedItemsMajorVersion(u32),

    #[error("container child at {0:?} is not an OTBM_ITEM node")]
    ExpectedItemChild(Position),

    #[error("child node type 0x{0:02X} under MAP_DATA is not a recognized top-level node")]
    UnexpectedTopLevelNode(u8),

    #[error("unknown MAP_DATA attribute tag 0x{0:02X}")]
    UnknownMapDataTag(u8),

    #[error("TILE_AREA header is truncated or malformed")]
    MalformedTileArea,

    #[error("town {0} is missing a required header field")]
    MalformedTown(u32),

    #[error("waypoint is missing a required header field")]
    MalformedWaypoint,
}

/// A recoverable condition recorded during a load, per spec's warning
/// taxonomy (§7): load continues, the caller is told what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapWarning {
    UnknownNodeType { node_type: u8 },
    DuplicateTile { position: Position },
    DuplicateTown { id: u32 },
    InvalidHouseId { position: Position },
    MalformedTileAttribute { position: Position },
    InvalidItemAttribute { position: Position, item_id: u16, tag: u8 },
    VersionMismatchAfterConfirm { field: &'static str, value: u32 },
    MissingSidecar { kind: &'static str, filename: String },
}

impl std::fmt::Display for MapWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNodeType { node_type } => {
                write!(f, "unknown node type 0x{node_type:02X} skipped")
            }
            Self::DuplicateTile { position } => {
                write!(f, "duplicate tile at {position:?} skipped")
            }
            Self::DuplicateTown { id } => write!(f, "duplicate town id {id} skipped"),
            Self::InvalidHouseId { position } => {
                write!(f, "house tile at {position:?} has house id 0, skipped")
            }
            Self::MalformedTileAttribute { position } => {
                write!(f, "malformed tile attribute at {position:?}")
            }
            Self::InvalidItemAttribute { position, item_id, tag } => {
                write!(f, "item {item_id} at {position:?} has unknown attribute tag 0x{tag:02X}, item skipped")
            }
            Self::VersionMismatchAfterConfirm { field, value } => {
                write!(f, "{field} version {value} exceeds the catalog, continuing by user confirmation")
            }
            Self::MissingSidecar { kind, filename } => {
                write!(f, "{kind} sidecar '{filename}' missing, using default")
            }
        }
    }
}
