//! Runtime presentation configuration loaded from `assets/contrail.toml`.
//!
//! [`ContrailConfig`] is a Bevy [`Resource`] mirroring the presentation
//! constants at the bottom of [`crate::constants`].  Missing keys fall back to
//! those compile-time defaults, so a minimal TOML can override just the values
//! you care about:
//!
//! ```toml
//! seed = 1234
//! window_width = 800
//! window_height = 800
//! ```
//!
//! Guidance and trail constants are not configurable.
//!
//! The file is read in `main` before the [`App`] exists, because the window
//! size has to be known up front.  Logging isn't up yet at that point, so the
//! outcome is kept in [`ConfigOrigin`] and reported by
//! [`report_config_origin`] once the log plugin is running.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/contrail.toml";

/// Runtime-tunable presentation settings.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContrailConfig {
    // ── Window ────────────────────────────────────────────────────────────────
    pub window_width: u32,
    pub window_height: u32,
    /// Background color, sRGB.
    pub clear_color: [f32; 3],

    // ── Simulation ────────────────────────────────────────────────────────────
    /// Fixed seed for a reproducible run; `None` seeds from OS entropy.
    pub seed: Option<u64>,

    // ── Rendering ─────────────────────────────────────────────────────────────
    /// Craft sprite, relative to the Bevy `assets/` directory.
    pub sprite_path: String,
    /// Draw a small cross at the active target.
    pub show_target_marker: bool,
}

impl Default for ContrailConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            clear_color: CLEAR_COLOR,
            seed: None,
            sprite_path: SPRITE_PATH.to_string(),
            show_target_marker: false,
        }
    }
}

impl ContrailConfig {
    /// Parse a config from TOML text, defaults filling any gaps.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b] = self.clear_color;
        Color::srgb(r, g, b)
    }
}

/// Where the active [`ContrailConfig`] came from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ConfigOrigin {
    File(String),
    /// No file; compiled defaults.
    Missing(String),
    /// The file didn't parse; compiled defaults.
    Invalid { path: String, reason: String },
}

/// Read `path` and overlay it on the defaults.
///
/// Never fails: a missing or malformed file yields the defaults, with the
/// reason recorded in the returned [`ConfigOrigin`].
pub fn load_contrail_config_from(path: impl AsRef<Path>) -> (ContrailConfig, ConfigOrigin) {
    let path = path.as_ref();
    let shown = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(contents) => match ContrailConfig::from_toml_str(&contents) {
            Ok(loaded) => (loaded, ConfigOrigin::File(shown)),
            Err(e) => (
                ContrailConfig::default(),
                ConfigOrigin::Invalid {
                    path: shown,
                    reason: e.to_string(),
                },
            ),
        },
        // File not present: defaults are fine, not an error.
        Err(_) => (ContrailConfig::default(), ConfigOrigin::Missing(shown)),
    }
}

/// Startup system: log how the config was obtained.
pub fn report_config_origin(origin: Res<ConfigOrigin>, config: Res<ContrailConfig>) {
    match origin.as_ref() {
        ConfigOrigin::File(path) => info!("[setup] Loaded config from {path}"),
        ConfigOrigin::Missing(path) => info!("[setup] No {path} found; using compiled defaults"),
        ConfigOrigin::Invalid { path, reason } => {
            warn!("[setup] Failed to parse {path}: {reason}; using defaults")
        }
    }
    match config.seed {
        Some(seed) => info!("[setup] Simulation seed {seed}"),
        None => debug!("[setup] Simulation seeded from entropy"),
    }
}
