//! Facade tying the binary map tree codec (`otbm-map`), the houses/
//! spawns/zones sidecars (`otbm-sidecar`), and `.otgz` archive
//! packaging (`otbm-archive`) together behind the two operations
//! spec.md §6 exposes to callers: [`load_map`] and [`save_map`].
//!
//! Everything below this facade is byte-codec plumbing; this module
//! is the one place that knows a map on disk is really three or four
//! cooperating files.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

mod error;
pub use error::*;

pub use otbm_archive as archive;
pub use otbm_item::*;
pub use otbm_map::*;
pub use otbm_node as node;
pub use otbm_sidecar as sidecar;
pub use otbm_types::*;

fn is_otgz(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("otgz"))
}

fn file_stem_string(path: &Path) -> Result<String, OtbmError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| OtbmError::MissingFileStem(path.display().to_string()))
}

fn default_housefile(stem: &str) -> String {
    format!("{stem}-houses.xml")
}

fn default_spawnfile(stem: &str) -> String {
    format!("{stem}-spawn.xml")
}

/// Reads only the root node's header fields, per spec.md §6's
/// `getVersionInfo(path)`.
pub fn get_version_info(path: &Path) -> Result<MapVersion, OtbmError> {
    let data = std::fs::read(path)?;
    Ok(otbm_map::read_version_info(&data)?)
}

/// Loads a complete map: the binary tree plus every sidecar that can
/// be found, dispatching on the `.otgz` extension per spec.md §6.
/// Missing sidecar files are never fatal — a warning is recorded and
/// the map keeps (or is given) a default filename, matching spec.md
/// §6's "never fatally fails on missing sidecar" rule.
pub fn load_map(
    path: &Path,
    catalog: &dyn ItemTypeCatalog,
    creatures: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
) -> Result<(Map, MapVersion, Vec<Warning>), OtbmError> {
    if is_otgz(path) {
        load_map_archive(path, catalog, creatures, options)
    } else {
        load_map_flat(path, catalog, creatures, options)
    }
}

fn load_map_flat(
    path: &Path,
    catalog: &dyn ItemTypeCatalog,
    creatures: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
) -> Result<(Map, MapVersion, Vec<Warning>), OtbmError> {
    let data = std::fs::read(path)?;
    let (mut map, version, map_warnings) = otbm_map::load_map_tree(data.as_slice(), catalog, options)?;
    let mut warnings: Vec<Warning> = map_warnings.into_iter().map(Warning::from).collect();

    let stem = file_stem_string(path)?;
    let mut sidecar_warnings = Vec::new();
    ensure_default_filenames(&mut map, &stem);

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    load_houses_sidecar(&dir.join(&map.housefile), &mut map, &mut sidecar_warnings)?;
    load_spawns_sidecar(&dir.join(&map.spawnfile), &mut map, creatures, options, &mut sidecar_warnings)?;

    let zones_dir = sidecar::zones_dir_for(path);
    sidecar::load_zones(&zones_dir, &mut map, &mut sidecar_warnings)?;

    warnings.extend(sidecar_warnings.into_iter().map(Warning::from));
    Ok((map, version, warnings))
}

fn load_map_archive(
    path: &Path,
    catalog: &dyn ItemTypeCatalog,
    creatures: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
) -> Result<(Map, MapVersion, Vec<Warning>), OtbmError> {
    let data = std::fs::read(path)?;
    let contents = archive::unpack(data.as_slice())?;

    let (mut map, version, map_warnings) = otbm_map::load_map_tree(contents.map.as_slice(), catalog, options)?;
    let mut warnings: Vec<Warning> = map_warnings.into_iter().map(Warning::from).collect();

    let stem = file_stem_string(path)?;
    ensure_default_filenames(&mut map, &stem);

    let mut sidecar_warnings = Vec::new();
    sidecar::load_houses_from_reader(contents.houses_xml.as_slice(), &mut map, &mut sidecar_warnings)?;
    sidecar::load_spawns_from_reader(contents.spawns_xml.as_slice(), &mut map, creatures, options, &mut sidecar_warnings)?;

    // Zones are never packed into an .otgz (spec.md §9), but the
    // directory convention still applies next to the archive file.
    let zones_dir = sidecar::zones_dir_for(path);
    sidecar::load_zones(&zones_dir, &mut map, &mut sidecar_warnings)?;

    warnings.extend(sidecar_warnings.into_iter().map(Warning::from));
    Ok((map, version, warnings))
}

fn ensure_default_filenames(map: &mut Map, stem: &str) {
    if map.housefile.is_empty() {
        map.housefile = default_housefile(stem);
    }
    if map.spawnfile.is_empty() {
        map.spawnfile = default_spawnfile(stem);
    }
}

fn load_houses_sidecar(path: &Path, map: &mut Map, warnings: &mut Vec<sidecar::SidecarWarning>) -> Result<(), OtbmError> {
    if path.is_file() {
        sidecar::load_houses(path, map, warnings)?;
    } else {
        warnings.push(sidecar::SidecarWarning::MissingFile {
            kind: "houses",
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn load_spawns_sidecar(
    path: &Path,
    map: &mut Map,
    creatures: &mut dyn CreatureCatalog,
    options: &LoadOptions<'_>,
    warnings: &mut Vec<sidecar::SidecarWarning>,
) -> Result<(), OtbmError> {
    if path.is_file() {
        sidecar::load_spawns(path, map, creatures, options, warnings)?;
    } else {
        warnings.push(sidecar::SidecarWarning::MissingFile {
            kind: "spawns",
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Saves a complete map: the binary tree plus houses/spawns/zones
/// sidecars, dispatching on the `.otgz` extension per spec.md §6. If
/// `map`'s house/spawn filenames are unset, a default is assigned and
/// left on `map` for the caller to persist, matching the load-side
/// "ensures default filename is set on Map" rule.
pub fn save_map(
    map: &mut Map,
    path: &Path,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    options: &SaveOptions<'_>,
) -> Result<(), OtbmError> {
    let stem = file_stem_string(path)?;
    ensure_default_filenames(map, &stem);

    if is_otgz(path) {
        save_map_archive(map, path, version, catalog, options)
    } else {
        save_map_flat(map, path, version, catalog, options)
    }
}

fn save_map_flat(
    map: &Map,
    path: &Path,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    options: &SaveOptions<'_>,
) -> Result<(), OtbmError> {
    let file = BufWriter::new(File::create(path)?);
    let (mut file, zone_map) = otbm_map::save_map_tree(map, file, version, catalog, options)?;
    file.flush()?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    sidecar::save_houses(&dir.join(&map.housefile), map)?;
    sidecar::save_spawns(&dir.join(&map.spawnfile), map)?;

    let zones_dir = sidecar::zones_dir_for(path);
    sidecar::save_zones(&zones_dir, &zone_map)?;

    Ok(())
}

fn save_map_archive(
    map: &Map,
    path: &Path,
    version: MapVersion,
    catalog: &dyn ItemTypeCatalog,
    options: &SaveOptions<'_>,
) -> Result<(), OtbmError> {
    let (map_bytes, zone_map) = otbm_map::save_map_tree(map, Vec::new(), version, catalog, options)?;
    let houses_xml = sidecar::save_houses_to_bytes(map)?;
    let spawns_xml = sidecar::save_spawns_to_bytes(map)?;

    let file = BufWriter::new(File::create(path)?);
    let mut file = archive::pack(&map_bytes, &houses_xml, &spawns_xml, file)?;
    file.flush()?;

    // As in the flat case: zones are stored beside the map artifact
    // even though they are not packed into the .otgz itself.
    let zones_dir = sidecar::zones_dir_for(path);
    sidecar::save_zones(&zones_dir, &zone_map)?;

    Ok(())
}
