use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use otbm_map::{Creature, Map, Spawn};
use otbm_types::{CreatureCatalog, Direction, LoadOptions, Position};

use crate::{houses::attr_str, SidecarError, SidecarWarning};

/// A creature entry parsed from `<monster>`/`<npc>`, before its
/// absolute position has been resolved against the center.
struct PendingCreature {
    name: String,
    spawntime: i32,
    direction: Direction,
    offset: (i32, i32),
    is_npc: bool,
}

/// Loads `<spawns>` and merges recognized spawn centers/creatures
/// into `map.tiles`, per spec.md §4.6's load rules.
pub fn load_spawns(
    path: &Path,
    map: &mut Map,
    catalog: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
    warnings: &mut Vec<SidecarWarning>,
) -> Result<(), SidecarError> {
    load_spawns_from_reader(BufReader::new(File::open(path)?), map, catalog, options, warnings)
}

/// Core of [`load_spawns`], generalized over any reader so the
/// archive component can feed it an in-memory `.otgz` entry instead
/// of a file on disk.
pub fn load_spawns_from_reader<R: Read>(
    source: R,
    map: &mut Map,
    catalog: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
    warnings: &mut Vec<SidecarWarning>,
) -> Result<(), SidecarError> {
    let mut reader = Reader::from_reader(std::io::BufReader::new(source));
    reader.config_mut().trim_text(true);

    let mut seen_centers: HashSet<Position> = HashSet::new();
    let mut buf = Vec::new();

    // State for the spawn currently being parsed.
    let mut center: Option<Position> = None;
    let mut radius = 0i32;
    let mut creatures: Vec<PendingCreature> = Vec::new();
    let mut aborted = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,

            Event::Start(e) if e.name().as_ref() == b"spawn" => {
                let (c, r) = parse_spawn_header(&e)?;
                center = c;
                radius = r;
                creatures.clear();
                aborted = false;

                if center.is_none() {
                    if let Some(pos) = approx_center(&e) {
                        warnings.push(SidecarWarning::DiscardedSpawn {
                            x: pos.0,
                            y: pos.1,
                            z: pos.2,
                            reason: "centerx or centery is zero",
                        });
                    }
                    aborted = true;
                } else if radius < 1 {
                    let pos = center.unwrap();
                    warnings.push(SidecarWarning::DiscardedSpawn {
                        x: pos.x,
                        y: pos.y,
                        z: pos.z,
                        reason: "radius < 1",
                    });
                    aborted = true;
                }
            }

            Event::Empty(e) if matches!(e.name().as_ref(), b"monster" | b"npc") => {
                if aborted {
                    continue;
                }
                match parse_creature(&e)? {
                    Some(c) => creatures.push(c),
                    None => aborted = true,
                }
            }

            Event::End(e) if e.name().as_ref() == b"spawn" => {
                let Some(pos) = center else { continue };

                if aborted {
                    center = None;
                    continue;
                }

                if !seen_centers.insert(pos) {
                    warnings.push(SidecarWarning::DuplicateSpawn { x: pos.x, y: pos.y, z: pos.z });
                    center = None;
                    continue;
                }

                finalize_spawn(map, pos, radius, &creatures, catalog, options, warnings);
                center = None;
            }

            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn approx_center(e: &BytesStart<'_>) -> Option<(u16, u16, u8)> {
    let x: u16 = attr_str(e, "centerx").ok()??.parse().ok()?;
    let y: u16 = attr_str(e, "centery").ok()??.parse().ok()?;
    let z: u8 = attr_str(e, "centerz").ok()??.parse().ok()?;
    Some((x, y, z))
}

fn parse_spawn_header(e: &BytesStart<'_>) -> Result<(Option<Position>, i32), SidecarError> {
    let x: u16 = attr_str(e, "centerx")?.and_then(|v| v.parse().ok()).unwrap_or(0);
    let y: u16 = attr_str(e, "centery")?.and_then(|v| v.parse().ok()).unwrap_or(0);
    let z: u8 = attr_str(e, "centerz")?.and_then(|v| v.parse().ok()).unwrap_or(0);
    let radius: i32 = attr_str(e, "radius")?.and_then(|v| v.parse().ok()).unwrap_or(0);

    let center = if x == 0 || y == 0 { None } else { Some(Position::new(x, y, z)) };
    Ok((center, radius))
}

/// Returns `Ok(None)` when the creature entry is missing a required
/// field and the remainder of the spawn must be discarded.
fn parse_creature(e: &BytesStart<'_>) -> Result<Option<PendingCreature>, SidecarError> {
    let Some(name) = attr_str(e, "name")? else {
        return Ok(None);
    };

    let Some(x) = attr_str(e, "x")?.and_then(|v| v.parse::<i32>().ok()) else {
        return Ok(None);
    };
    let Some(y) = attr_str(e, "y")?.and_then(|v| v.parse::<i32>().ok()) else {
        return Ok(None);
    };

    let spawntime = attr_str(e, "spawntime")?.and_then(|v| v.parse().ok());
    let direction = attr_str(e, "direction")?
        .and_then(|v| v.parse::<u8>().ok())
        .map(Direction::from_wire)
        .unwrap_or_default();

    Ok(Some(PendingCreature {
        name,
        spawntime: spawntime.unwrap_or(-1),
        direction,
        offset: (x, y),
        is_npc: e.name().as_ref() == b"npc",
    }))
}

fn finalize_spawn(
    map: &mut Map,
    center: Position,
    declared_radius: i32,
    pending: &[PendingCreature],
    catalog: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
    warnings: &mut Vec<SidecarWarning>,
) {
    let mut creatures = Vec::with_capacity(pending.len());
    let mut grown_radius = declared_radius;

    for p in pending {
        let Some(position) = center.translated(p.offset.0, p.offset.1) else {
            warnings.push(SidecarWarning::DiscardedCreature {
                name: p.name.clone(),
                reason: "position overflowed the map's coordinate range",
            });
            continue;
        };

        if !map.tiles.contains_key(&position) {
            warnings.push(SidecarWarning::CreatureTileMissing {
                x: position.x,
                y: position.y,
                z: position.z,
            });
            continue;
        }

        if map.tiles[&position].creature.is_some() {
            warnings.push(SidecarWarning::CreatureTileOccupied {
                x: position.x,
                y: position.y,
                z: position.z,
            });
            continue;
        }

        let type_id = match catalog.creature_type(&p.name) {
            Some(id) => Some(id),
            None => {
                warnings.push(SidecarWarning::UnknownCreature { name: p.name.clone() });
                Some(catalog.add_missing(&p.name, p.is_npc))
            }
        };

        let spawntime = if p.spawntime < 0 { options.default_spawntime } else { p.spawntime };

        let creature = Creature {
            name: p.name.clone(),
            type_id,
            offset: p.offset,
            spawntime,
            direction: p.direction,
            is_npc: p.is_npc,
        };

        grown_radius = grown_radius.max(p.offset.0.abs()).max(p.offset.1.abs());

        if let Some(tile) = map.tiles.get_mut(&position) {
            tile.creature = Some(creature.clone());
            if tile.spawn.is_none() && position != center {
                tile.spawn = Some(Spawn { center: position, radius: 5, creatures: Vec::new() });
            }
        }

        creatures.push(creature);
    }

    grown_radius = grown_radius.min(options.max_spawn_radius);

    if let Some(tile) = map.tiles.get_mut(&center) {
        tile.spawn = Some(Spawn {
            center,
            radius: grown_radius,
            creatures,
        });
    }
}

/// Writes `<spawns>`, scanning each spawn center's bounded square and
/// emitting each not-yet-saved creature, deduping creatures that fall
/// within more than one overlapping spawn's square.
pub fn save_spawns(path: &Path, map: &Map) -> Result<(), SidecarError> {
    let bytes = save_spawns_to_bytes(map)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

/// Core of [`save_spawns`], returning the serialized document as
/// bytes instead of writing it to a file — used directly by the
/// archive component when packing an `.otgz`.
pub fn save_spawns_to_bytes(map: &Map) -> Result<Vec<u8>, SidecarError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Start(BytesStart::new("spawns")))?;

    let mut centers: Vec<(Position, &Spawn)> = map
        .tiles
        .iter()
        .filter_map(|(pos, tile)| tile.spawn.as_ref().map(|s| (*pos, s)))
        .collect();
    centers.sort_by_key(|(pos, _)| *pos);

    let mut saved: HashSet<Position> = HashSet::new();

    for (center, spawn) in centers {
        let mut elem = BytesStart::new("spawn");
        elem.push_attribute(("centerx", center.x.to_string().as_str()));
        elem.push_attribute(("centery", center.y.to_string().as_str()));
        elem.push_attribute(("centerz", center.z.to_string().as_str()));
        elem.push_attribute(("radius", spawn.radius.to_string().as_str()));
        writer.write_event(Event::Start(elem))?;

        let radius = spawn.radius.max(0) as i32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let Some(pos) = center.translated(dx, dy) else { continue };
                if saved.contains(&pos) {
                    continue;
                }
                let Some(tile) = map.tiles.get(&pos) else { continue };
                let Some(creature) = &tile.creature else { continue };

                let tag = if creature.is_npc { "npc" } else { "monster" };
                let mut c_elem = BytesStart::new(tag);
                c_elem.push_attribute(("name", creature.name.as_str()));
                c_elem.push_attribute(("spawntime", creature.spawntime.to_string().as_str()));
                c_elem.push_attribute(("direction", creature.direction.to_wire().to_string().as_str()));
                c_elem.push_attribute(("x", creature.offset.0.to_string().as_str()));
                c_elem.push_attribute(("y", creature.offset.1.to_string().as_str()));
                writer.write_event(Event::Empty(c_elem))?;

                saved.insert(pos);
            }
        }

        writer.write_event(Event::End(BytesEnd::new("spawn")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("spawns")))?;

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use otbm_map::Tile;
    use otbm_types::CreatureTypeId;

    struct StubCreatures(u32);
    impl CreatureCatalog for StubCreatures {
        fn creature_type(&self, _name: &str) -> Option<CreatureTypeId> {
            None
        }
        fn add_missing(&mut self, _name: &str, _is_npc: bool) -> CreatureTypeId {
            self.0 += 1;
            self.0
        }
    }

    fn map_with_tiles(positions: &[Position]) -> Map {
        let mut map = Map::default();
        for &p in positions {
            map.tiles.insert(p, Tile::new(p));
        }
        map
    }

    #[test]
    fn overlapping_spawn_saves_creature_once() {
        let mut map = map_with_tiles(&[
            Position::new(100, 100, 7),
            Position::new(104, 100, 7),
            Position::new(102, 100, 7),
        ]);

        let dir = std::env::temp_dir().join(format!("otbm-spawns-test-{}", std::process::id()));
        std::fs::write(
            &dir,
            br#"<spawns>
                <spawn centerx="100" centery="100" centerz="7" radius="5">
                    <monster name="rat" x="2" y="0" />
                </spawn>
                <spawn centerx="104" centery="100" centerz="7" radius="5">
                </spawn>
            </spawns>"#,
        )
        .unwrap();

        let mut catalog = StubCreatures(0);
        let options = LoadOptions::default();
        let mut warnings = Vec::new();
        load_spawns(&dir, &mut map, &mut catalog, &options, &mut warnings).unwrap();
        std::fs::remove_file(&dir).ok();

        let rat_pos = Position::new(102, 100, 7);
        assert_eq!(map.tiles[&rat_pos].creature.as_ref().unwrap().name, "rat");

        let out = std::env::temp_dir().join(format!("otbm-spawns-out-{}", std::process::id()));
        save_spawns(&out, &map).unwrap();
        let xml = std::fs::read_to_string(&out).unwrap();
        std::fs::remove_file(&out).ok();

        assert_eq!(xml.matches("name=\"rat\"").count(), 1);
    }

    #[test]
    fn discards_spawn_with_zero_center() {
        let mut map = Map::default();
        let dir = std::env::temp_dir().join(format!("otbm-spawns-test2-{}", std::process::id()));
        std::fs::write(&dir, br#"<spawns><spawn centerx="0" centery="5" centerz="7" radius="5" /></spawns>"#).unwrap();

        let mut catalog = StubCreatures(0);
        let options = LoadOptions::default();
        let mut warnings = Vec::new();
        load_spawns(&dir, &mut map, &mut catalog, &options, &mut warnings).unwrap();
        std::fs::remove_file(&dir).ok();

        assert!(map.tiles.values().all(|t| t.spawn.is_none()));
        assert!(warnings.iter().any(|w| matches!(w, SidecarWarning::DiscardedSpawn { .. })));
    }
}
