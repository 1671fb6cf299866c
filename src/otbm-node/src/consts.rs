//! Framing control bytes and node type identifiers.

/// Opens a node: control byte followed by a 1-byte node type.
pub const NODE_START: u8 = 0xFE;
/// Closes the current node.
pub const NODE_END: u8 = 0xFF;
/// Escapes the following byte so it is not interpreted as framing.
pub const ESCAPE: u8 = 0xFD;

/// Node type bytes, per spec's root layout.
pub mod node_type {
    pub const ROOT: u8 = 0;
    pub const MAP_DATA: u8 = 2;
    /// `OTBM_ITEM`, the node type every item body is framed in.
    pub const ITEM: u8 = 0x03;
    pub const TILE_AREA: u8 = 4;
    pub const TILE: u8 = 5;
    pub const TOWNS: u8 = 12;
    pub const TOWN: u8 = 13;
    pub const HOUSETILE: u8 = 14;
    pub const WAYPOINTS: u8 = 15;
    pub const WAYPOINT: u8 = 16;
}

/// Attribute TLV tag bytes. The same numeric tag is reused across
/// node-type scopes (see spec's attribute table); callers must match
/// on `(current node type, tag)`, never tag alone.
pub mod attr_tag {
    // Map-data scope.
    pub const DESCRIPTION: u8 = 0x01;
    pub const EXT_SPAWN_FILE: u8 = 0x0B;
    pub const EXT_HOUSE_FILE: u8 = 0x0D;

    // Tile / house-tile scope.
    pub const TILE_FLAGS: u8 = 0x08;
    /// Compact inline ground item: `u16` id follows, no node wrapper.
    pub const ITEM_COMPACT: u8 = 0x09;

    // Item scope.
    pub const COUNT: u8 = 0x04;
    pub const ACTION_ID: u8 = 0x05;
    pub const UNIQUE_ID: u8 = 0x06;
    pub const TEXT: u8 = 0x07;
    pub const DESC: u8 = 0x08;
    pub const TELE_DEST: u8 = 0x09;
    pub const HOUSEDOORID: u8 = 0x0A;
    pub const DEPOT_ID: u8 = 0x0E;
    pub const RUNE_CHARGES: u8 = 0x16;
    pub const CHARGES: u8 = 0x17;
    pub const ATTRIBUTE_MAP: u8 = 0x80;
}
