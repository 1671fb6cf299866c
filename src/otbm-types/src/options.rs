/// Progress reporter invoked at periodic intervals during load/save.
///
/// `percent` ranges 0..=100; `phase` names the stage in progress
/// (e.g. `"tiles"`, `"houses"`). A no-op implementation is the
/// default, per spec.md §5.
pub type ProgressCallback<'a> = dyn Fn(u8, &str) + 'a;

/// A yes/no prompt for confirming continuation past an unsupported
/// version, per spec.md §4.4's version-gating rules. Returning `false`
/// aborts the load as a fatal error.
pub type ConfirmCallback<'a> = dyn Fn(&str, &str) -> bool + 'a;

/// Options controlling a [`load_map`](../otbm_map/fn.load_map.html) call.
///
/// Bundles the environment-sourced knobs spec.md §6 names
/// (`DEFAULT_SPAWNTIME`, `MAX_SPAWN_RADIUS`) plus the callbacks into
/// the environment. Library crates never read process environment
/// directly; the CLI binary is responsible for populating this from
/// `std::env`/`clap` and passing it down.
pub struct LoadOptions<'a> {
    /// Default `spawntime` (seconds) used when a spawn creature entry
    /// omits it.
    pub default_spawntime: i32,
    /// Upper bound a spawn's auto-grown radius is capped at.
    pub max_spawn_radius: i32,
    pub progress: Option<&'a ProgressCallback<'a>>,
    pub confirm_unsupported_version: Option<&'a ConfirmCallback<'a>>,
}

impl Default for LoadOptions<'_> {
    fn default() -> Self {
        Self {
            default_spawntime: 60,
            max_spawn_radius: 30,
            progress: None,
            confirm_unsupported_version: None,
        }
    }
}

/// Options controlling a [`save_map`](../otbm_map/fn.save_map.html) call.
pub struct SaveOptions<'a> {
    /// Corresponds to `SAVE_WITH_OTB_MAGIC_NUMBER`: when `false`, the
    /// 4-byte file-envelope magic is four NUL bytes instead of "OTBM".
    pub write_otb_magic_number: bool,
    pub progress: Option<&'a ProgressCallback<'a>>,
}

impl Default for SaveOptions<'_> {
    fn default() -> Self {
        Self {
            write_otb_magic_number: true,
            progress: None,
        }
    }
}
