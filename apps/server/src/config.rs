// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use citymesh_scene::config::DEFAULT_OVERPASS_URL;
use citymesh_scene::{BoundingBox, OverpassConfig, SceneConfig};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Overpass interpreter endpoint.
    pub overpass_url: String,
    /// Query window as `south,west,north,east`.
    pub bbox: BoundingBox,
    /// Attempts before the fetch gives up with an empty scene.
    pub fetch_max_attempts: u32,
    /// Directory holding the texture layer files.
    pub texture_dir: PathBuf,
    /// Seed for fallback material draws.
    pub scene_seed: Option<u64>,
    /// Scene ticks per second.
    pub tick_hz: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Absent or unparseable values fall back to their defaults.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: var("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            overpass_url: var("OVERPASS_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.into()),
            bbox: var("BBOX")
                .and_then(|v| match v.parse() {
                    Ok(bbox) => Some(bbox),
                    Err(e) => {
                        tracing::warn!(value = %v, error = %e, "Ignoring BBOX");
                        None
                    }
                })
                .unwrap_or_default(),
            fetch_max_attempts: var("FETCH_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            texture_dir: var("TEXTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("textures")),
            scene_seed: var("SCENE_SEED").and_then(|v| v.parse().ok()),
            tick_hz: var("TICK_HZ")
                .and_then(|v| v.parse().ok())
                .filter(|hz| *hz > 0)
                .unwrap_or(60),
        }
    }

    /// Scene pipeline settings derived from this configuration.
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            overpass: OverpassConfig {
                endpoint: self.overpass_url.clone(),
                bbox: self.bbox,
                max_attempts: self.fetch_max_attempts,
                ..Default::default()
            },
            texture_root: self.texture_dir.clone(),
            seed: self.scene_seed,
            ..Default::default()
        }
    }
}
