// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene configuration.
//!
//! Defaults describe the Belgrade district around the Western City Gate.

use crate::error::{Error, Result};
use citymesh_core::GeoPoint;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Public Overpass interpreter
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Projection origin
pub const DEFAULT_ORIGIN: GeoPoint = GeoPoint::new(44.81806, 20.40520);

/// Axis of the landmark tower
pub const LANDMARK_ANCHOR: GeoPoint = GeoPoint::new(44.8202403, 20.4049177);

/// Geographic query window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        let all_finite = [south, west, north, east].iter().all(|v| v.is_finite());
        if !all_finite || south >= north || west >= east {
            return Err(Error::InvalidBoundingBox(format!(
                "{south},{west},{north},{east}"
            )));
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Overpass `(s,w,n,e)` filter
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            south: 44.8135,
            west: 20.3988,
            north: 44.8225,
            east: 20.4115,
        }
    }
}

impl FromStr for BoundingBox {
    type Err = Error;

    /// Parse `south,west,north,east`
    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| Error::InvalidBoundingBox(s.to_string()))?;

        match values.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(Error::InvalidBoundingBox(s.to_string())),
        }
    }
}

/// Geodata fetch settings
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub bbox: BoundingBox,
    /// Server-side query timeout written into the QL header
    pub query_timeout_secs: u64,
    /// Client-side timeout of one HTTP attempt
    pub request_timeout: Duration,
    pub max_attempts: u32,
    /// Multiplied by the attempt number after a 504
    pub gateway_backoff: Duration,
    /// Multiplied by the attempt number after any other failure
    pub failure_backoff: Duration,
}

impl OverpassConfig {
    /// Overpass QL selecting every building and building part in the window
    pub fn query(&self) -> String {
        let bbox = self.bbox.to_overpass();
        format!(
            "[out:json][timeout:{}];(nwr[\"building\"]({bbox});nwr[\"building:part\"]({bbox}););out geom;",
            self.query_timeout_secs
        )
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_URL.to_string(),
            bbox: BoundingBox::default(),
            query_timeout_secs: 60,
            request_timeout: Duration::from_secs(90),
            max_attempts: 10,
            gateway_backoff: Duration::from_millis(1),
            failure_backoff: Duration::from_secs(2),
        }
    }
}

/// Everything needed to build a scene
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub overpass: OverpassConfig,
    /// Projection origin shared by every footprint and the landmark
    pub origin: GeoPoint,
    pub landmark_anchor: GeoPoint,
    /// Directory holding the texture layer files
    pub texture_root: PathBuf,
    /// Seed for fallback material and colour draws; entropy when absent
    pub seed: Option<u64>,
}

impl SceneConfig {
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            overpass: OverpassConfig::default(),
            origin: DEFAULT_ORIGIN,
            landmark_anchor: LANDMARK_ANCHOR,
            texture_root: PathBuf::from("textures"),
            seed: None,
        }
    }
}
