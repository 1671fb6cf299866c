//! Houses/spawns/zones sidecar orchestration: loading and saving the
//! companion XML/TOML files that sit next to a map binary, and
//! resolving the inconsistencies spec.md §4.5-§4.7 name (missing
//! files, stale zone files, duplicate entities, orphaned references).

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::*;

pub mod houses;
pub use houses::{load_houses, load_houses_from_reader, save_houses, save_houses_to_bytes};

pub mod spawns;
pub use spawns::{load_spawns, load_spawns_from_reader, save_spawns, save_spawns_to_bytes};

pub mod zones;
pub use zones::{load_zones, save_zones, zones_dir_for};
