use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use otbm_map::{House, Map};
use otbm_types::Position;

use crate::{SidecarError, SidecarWarning};

/// Collects the set of house ids actually referenced by a `HOUSETILE`
/// in the binary map — houses are created by the binary, the XML only
/// annotates them (spec.md §4.5).
fn referenced_house_ids(map: &Map) -> HashSet<u32> {
    map.tiles.values().filter_map(|tile| tile.house_id).collect()
}

pub(crate) fn attr_str(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, SidecarError> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

pub(crate) fn attr_required(start: &BytesStart<'_>, name: &'static str) -> Result<String, SidecarError> {
    attr_str(start, name)?.ok_or(SidecarError::MissingHouseAttr(name))
}

/// Loads `<houses>` and merges recognized entries into `map.houses`,
/// per spec.md §4.5's load rules. Missing files are the caller's
/// responsibility to downgrade to a warning before calling this.
pub fn load_houses(path: &Path, map: &mut Map, warnings: &mut Vec<SidecarWarning>) -> Result<(), SidecarError> {
    load_houses_from_reader(BufReader::new(File::open(path)?), map, warnings)
}

/// Core of [`load_houses`], generalized over any reader so the
/// archive component can feed it an in-memory `.otgz` entry instead
/// of a file on disk.
pub fn load_houses_from_reader<R: Read>(
    source: R,
    map: &mut Map,
    warnings: &mut Vec<SidecarWarning>,
) -> Result<(), SidecarError> {
    let referenced = referenced_house_ids(map);

    let mut reader = Reader::from_reader(std::io::BufReader::new(source));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"house" => {
                let id: u32 = attr_required(&e, "houseid")?.parse().unwrap_or(0);

                if !referenced.contains(&id) {
                    warnings.push(SidecarWarning::HouseNotReferenced { house_id: id });
                    continue;
                }

                let name = attr_str(&e, "name")?.unwrap_or_default();
                let rent: i32 = attr_str(&e, "rent")?.and_then(|v| v.parse().ok()).unwrap_or(0);
                let guildhall = attr_str(&e, "guildhall")?.as_deref() == Some("1");

                let Some(townid) = attr_str(&e, "townid")?.and_then(|v| v.parse::<u32>().ok()) else {
                    warnings.push(SidecarWarning::HouseMissingTownId { house_id: id });
                    continue;
                };

                let entry_x: u16 = attr_str(&e, "entryx")?.and_then(|v| v.parse().ok()).unwrap_or(0);
                let entry_y: u16 = attr_str(&e, "entryy")?.and_then(|v| v.parse().ok()).unwrap_or(0);
                let entry_z: u8 = attr_str(&e, "entryz")?.and_then(|v| v.parse().ok()).unwrap_or(0);
                let exit = if entry_x == 0 && entry_y == 0 && entry_z == 0 {
                    None
                } else {
                    Some(Position::new(entry_x, entry_y, entry_z))
                };

                map.houses.insert(
                    id,
                    House {
                        id,
                        name,
                        exit,
                        rent,
                        guildhall,
                        townid,
                        tiles: Vec::new(),
                    },
                );
            }
            _ => {}
        }
        buf.clear();
    }

    map.rebuild_house_tiles();
    Ok(())
}

/// Writes `map.houses` as a `<houses>` document, one `<house>` per
/// entry, `size` derived from the house's (already rebuilt) tile set.
pub fn save_houses(path: &Path, map: &Map) -> Result<(), SidecarError> {
    let bytes = save_houses_to_bytes(map)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

/// Core of [`save_houses`], returning the serialized document as
/// bytes instead of writing it to a file — used directly by the
/// archive component when packing an `.otgz`.
pub fn save_houses_to_bytes(map: &Map) -> Result<Vec<u8>, SidecarError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new("houses")))?;
    for house in map.houses.values() {
        let mut elem = BytesStart::new("house");
        elem.push_attribute(("name", house.name.as_str()));
        elem.push_attribute(("houseid", house.id.to_string().as_str()));

        let exit = house.exit.unwrap_or_default();
        elem.push_attribute(("entryx", exit.x.to_string().as_str()));
        elem.push_attribute(("entryy", exit.y.to_string().as_str()));
        elem.push_attribute(("entryz", exit.z.to_string().as_str()));
        elem.push_attribute(("rent", house.rent.to_string().as_str()));
        if house.guildhall {
            elem.push_attribute(("guildhall", "1"));
        }
        elem.push_attribute(("townid", house.townid.to_string().as_str()));
        elem.push_attribute(("size", house.tiles.len().to_string().as_str()));

        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("houses")))?;

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use otbm_map::Tile;

    #[test]
    fn skips_house_not_referenced_by_a_tile() {
        let mut map = Map::default();
        map.tiles.insert(Position::new(1, 1, 7), {
            let mut t = Tile::new(Position::new(1, 1, 7));
            t.house_id = Some(5);
            t
        });

        let dir = std::env::temp_dir().join(format!("otbm-houses-test-{}", std::process::id()));
        std::fs::write(
            &dir,
            br#"<houses><house name="a" houseid="5" entryx="0" entryy="0" entryz="0" rent="0" townid="1" /><house name="b" houseid="99" entryx="0" entryy="0" entryz="0" rent="0" townid="1" /></houses>"#,
        )
        .unwrap();

        let mut warnings = Vec::new();
        load_houses(&dir, &mut map, &mut warnings).unwrap();
        std::fs::remove_file(&dir).ok();

        assert!(map.houses.contains_key(&5));
        assert!(!map.houses.contains_key(&99));
        assert!(warnings.iter().any(|w| matches!(w, SidecarWarning::HouseNotReferenced { house_id: 99 })));
    }

    #[test]
    fn removes_house_missing_townid() {
        let mut map = Map::default();
        map.tiles.insert(Position::new(1, 1, 7), {
            let mut t = Tile::new(Position::new(1, 1, 7));
            t.house_id = Some(5);
            t
        });

        let dir = std::env::temp_dir().join(format!("otbm-houses-test2-{}", std::process::id()));
        std::fs::write(
            &dir,
            br#"<houses><house name="a" houseid="5" entryx="0" entryy="0" entryz="0" rent="0" /></houses>"#,
        )
        .unwrap();

        let mut warnings = Vec::new();
        load_houses(&dir, &mut map, &mut warnings).unwrap();
        std::fs::remove_file(&dir).ok();

        assert!(!map.houses.contains_key(&5));
        assert!(warnings.iter().any(|w| matches!(w, SidecarWarning::HouseMissingTownId { house_id: 5 })));
    }
}
