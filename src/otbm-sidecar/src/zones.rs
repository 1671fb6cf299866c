use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use otbm_map::Map;
use otbm_types::Position;

use crate::{SidecarError, SidecarWarning};

#[derive(Serialize, Deserialize)]
struct ZoneFile {
    zone: Vec<ZoneEntry>,
}

#[derive(Serialize, Deserialize)]
struct ZoneEntry {
    id: u16,
    positions: Vec<TomlPosition>,
}

#[derive(Serialize, Deserialize)]
struct TomlPosition {
    x: u16,
    y: u16,
    z: u8,
}

impl From<Position> for TomlPosition {
    fn from(p: Position) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

impl From<TomlPosition> for Position {
    fn from(p: TomlPosition) -> Self {
        Position::new(p.x, p.y, p.z)
    }
}

/// The zones directory for a given map file path: `<mapname>-zones/`
/// next to the binary, where `<mapname>` is the file stem with its
/// extension stripped.
pub fn zones_dir_for(map_path: &Path) -> PathBuf {
    let stem = map_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let dir_name = format!("{stem}-zones");
    match map_path.parent() {
        Some(parent) => parent.join(dir_name),
        None => PathBuf::from(dir_name),
    }
}

/// Loads every `*.toml` file in `dir`, unions their zone entries, and
/// sets `tile.zone_ids` on every referenced position that has a tile.
///
/// A missing directory is not an error: an unzoned map simply has no
/// zones directory.
pub fn load_zones(dir: &Path, map: &mut Map, warnings: &mut Vec<SidecarWarning>) -> Result<(), SidecarError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut by_zone: HashMap<u16, Vec<Position>> = HashMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }

        let text = fs::read_to_string(&path)?;
        let parsed: ZoneFile = toml::from_str(&text).map_err(|source| SidecarError::Toml {
            path: path.display().to_string(),
            source,
        })?;

        for zone in parsed.zone {
            let positions = by_zone.entry(zone.id).or_default();
            positions.extend(zone.positions.into_iter().map(Position::from));
        }
    }

    for (zone_id, positions) in by_zone {
        for position in positions {
            match map.tiles.get_mut(&position) {
                Some(tile) => {
                    tile.zone_ids.insert(zone_id);
                }
                None => warnings.push(SidecarWarning::ZonePositionHasNoTile {
                    x: position.x,
                    y: position.y,
                    z: position.z,
                }),
            }
        }
    }

    Ok(())
}

/// Writes one `<zoneId>.toml` file per zone in `zone_map`, then purges
/// any pre-existing `<n>.toml` whose `n` is no longer a current zone
/// id. Files that don't match the `{u16}.toml` name shape are left
/// untouched, per spec.md §8's "Zone dir sync" invariant.
pub fn save_zones(dir: &Path, zone_map: &HashMap<u16, Vec<Position>>) -> Result<(), SidecarError> {
    fs::create_dir_all(dir)?;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if let Some(id) = numeric_toml_stem(&path) {
            if !zone_map.contains_key(&id) {
                fs::remove_file(&path)?;
            }
        }
    }

    for (&zone_id, positions) in zone_map {
        let file = ZoneFile {
            zone: vec![ZoneEntry {
                id: zone_id,
                positions: positions.iter().copied().map(TomlPosition::from).collect(),
            }],
        };

        let text = toml::to_string_pretty(&file).map_err(|source| SidecarError::TomlSerialize { zone_id, source })?;
        fs::write(dir.join(format!("{zone_id}.toml")), text)?;
    }

    Ok(())
}

fn numeric_toml_stem(path: &Path) -> Option<u16> {
    if path.extension().and_then(|e| e.to_str()) != Some("toml") {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use otbm_map::Tile;

    #[test]
    fn round_trips_zone_positions_and_purges_stale_files() {
        let dir = std::env::temp_dir().join(format!("otbm-zones-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("99.toml"), "[[zone]]\nid = 99\npositions = []\n").unwrap();
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let mut zone_map = HashMap::new();
        zone_map.insert(3u16, vec![Position::new(10, 10, 7)]);
        save_zones(&dir, &zone_map).unwrap();

        assert!(!dir.join("99.toml").exists());
        assert!(dir.join("notes.txt").exists());
        assert!(dir.join("3.toml").exists());

        let mut map = Map::default();
        map.tiles.insert(Position::new(10, 10, 7), Tile::new(Position::new(10, 10, 7)));

        let mut warnings = Vec::new();
        load_zones(&dir, &mut map, &mut warnings).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert!(map.tiles[&Position::new(10, 10, 7)].zone_ids.contains(&3));
        assert!(warnings.is_empty());
    }

    #[test]
    fn ignores_zone_positions_with_no_tile() {
        let dir = std::env::temp_dir().join(format!("otbm-zones-test2-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("1.toml"), "[[zone]]\nid = 1\npositions = [{x=5,y=5,z=7}]\n").unwrap();

        let mut map = Map::default();
        let mut warnings = Vec::new();
        load_zones(&dir, &mut map, &mut warnings).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert!(warnings.iter().any(|w| matches!(w, SidecarWarning::ZonePositionHasNoTile { .. })));
    }
}
