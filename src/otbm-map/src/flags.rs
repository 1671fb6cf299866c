use bitflags::bitflags;

bitflags! {
    /// Tile-scope `TILE_FLAGS` bits.
    ///
    /// Only `ZONE_BRUSH` is load-bearing for this codec (it gates
    /// zone-map accumulation on save, see [`crate::save`]); the
    /// others round-trip opaquely through [`crate::Tile::flags`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TileFlags: u32 {
        const PROTECTION_ZONE = 1 << 0;
        const NO_PVP          = 1 << 2;
        const NO_LOGOUT       = 1 << 3;
        const PVP_ZONE        = 1 << 4;
        const REFRESH         = 1 << 5;
        /// Marks a tile as contributing to a zone brush, i.e. its
        /// `zone_ids` should be accumulated into the zones sidecar.
        const ZONE_BRUSH      = 1 << 15;
    }
}
