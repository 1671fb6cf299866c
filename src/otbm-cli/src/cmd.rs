use std::path::PathBuf;

use clap::Args;
use eyre::Context;

use otbm::LoadOptions;

use crate::catalog::{AutoCreatureCatalog, NullItemCatalog};

/// Prints the map's version header without decoding the rest of the
/// tree.
#[derive(Debug, Args)]
pub struct Info {
    /// Path to the `.otbm`/`.otgz` map file.
    path: PathBuf,
}

impl Info {
    pub fn handle(self) -> eyre::Result<()> {
        let version = otbm::get_version_info(&self.path)
            .wrap_err_with(|| format!("failed to read version header of {}", self.path.display()))?;

        println!("otbm version:   {}", version.otbm);
        println!("items major:    {}", version.items_major);
        println!("items minor:    {}", version.items_minor);
        println!("client version: {}", version.client());

        Ok(())
    }
}

/// Loads a map and reports every warning the codec and its sidecars
/// accumulated along the way.
#[derive(Debug, Args)]
pub struct Load {
    /// Path to the `.otbm`/`.otgz` map file.
    path: PathBuf,
}

impl Load {
    pub fn handle(self) -> eyre::Result<()> {
        let catalog = NullItemCatalog;
        let mut creatures = AutoCreatureCatalog::default();
        let options = LoadOptions::default();

        let (map, version, warnings) = otbm::load_map(&self.path, &catalog, &mut creatures, &options)
            .wrap_err_with(|| format!("failed to load {}", self.path.display()))?;

        println!(
            "loaded {} ({otbm} / client {client}): {w}x{h} tiles, {tiles} occupied, {houses} houses, {towns} towns, {waypoints} waypoints",
            self.path.display(),
            otbm = version.otbm,
            client = version.client(),
            w = map.width,
            h = map.height,
            tiles = map.tiles.len(),
            houses = map.houses.len(),
            towns = map.towns.len(),
            waypoints = map.waypoints.len(),
        );

        if warnings.is_empty() {
            log::info!("no warnings");
        } else {
            for warning in &warnings {
                log::warn!("{warning}");
            }
        }

        Ok(())
    }
}

/// Round-trips a map through [`otbm::load_map`]/[`otbm::save_map`],
/// letting the file extension on either side drive `.otgz` packaging.
#[derive(Debug, Args)]
pub struct Convert {
    /// Path to the source `.otbm`/`.otgz` map file.
    input: PathBuf,

    /// Path to write the converted map file to.
    output: PathBuf,

    /// Omits the "OTBM" file-envelope magic, writing NUL bytes
    /// instead.
    #[clap(long, env = "SAVE_WITH_OTB_MAGIC_NUMBER", default_value_t = true)]
    write_otb_magic_number: bool,
}

impl Convert {
    pub fn handle(self) -> eyre::Result<()> {
        let catalog = NullItemCatalog;
        let mut creatures = AutoCreatureCatalog::default();
        let load_options = LoadOptions::default();

        let (mut map, version, warnings) = otbm::load_map(&self.input, &catalog, &mut creatures, &load_options)
            .wrap_err_with(|| format!("failed to load {}", self.input.display()))?;
        for warning in &warnings {
            log::warn!("{warning}");
        }

        let save_options = otbm::SaveOptions {
            write_otb_magic_number: self.write_otb_magic_number,
            progress: None,
        };

        otbm::save_map(&mut map, &self.output, version, &catalog, &save_options)
            .wrap_err_with(|| format!("failed to save {}", self.output.display()))?;

        println!("wrote {}", self.output.display());
        Ok(())
    }
}
