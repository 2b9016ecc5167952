// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute resolution from footprint tags
//!
//! Turns a [`TagMap`] into extrusion heights, a material class and a colour.
//! Every attribute has an ordered list of candidate sources and a fallback;
//! malformed values are skipped with a warning and never fail the caller.
//! Random fallbacks draw from a caller-supplied generator so that a seeded
//! generator gives reproducible scenes.

use crate::material::{ColorSample, ColorSource, MaterialClass};
use crate::tags::TagMap;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

/// Height of one storey in metres
pub const LEVEL_HEIGHT: f64 = 3.0;

/// Height used when no tag yields one
pub const DEFAULT_HEIGHT: f64 = 6.0;

/// Lower bound on extrusion thickness
pub const MIN_EXTRUSION_THICKNESS: f64 = 0.1;

const HEIGHT_KEY: &str = "height";
const LEVELS_KEY: &str = "building:levels";
const MIN_HEIGHT_KEY: &str = "min_height";
const MIN_LEVEL_KEY: &str = "building:min_level";

/// Material tags, highest priority first
const MATERIAL_KEYS: [&str; 4] = [
    "building:material",
    "material",
    "wall:material",
    "building:facade:material",
];

/// Colour tags, highest priority first
const COLOR_KEYS: [&str; 3] = ["building:colour", "building:facade:colour", "colour"];

/// Vertical extent of an extruded footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtrusionSpec {
    /// Elevation of the bottom cap, never negative
    pub base_elevation: f64,
    /// Distance between the caps, at least [`MIN_EXTRUSION_THICKNESS`]
    pub thickness: f64,
}

impl ExtrusionSpec {
    /// Derive the extrusion from a resolved height and base height.
    ///
    /// Inverted or degenerate inputs (`height <= base_height`) still produce
    /// a solid of minimum thickness. A negative base is lifted to ground level
    /// and the top stays at `height`.
    pub fn from_heights(height: f64, base_height: f64) -> Self {
        let base_elevation = base_height.max(0.0);
        Self {
            base_elevation,
            thickness: (height - base_elevation).max(MIN_EXTRUSION_THICKNESS),
        }
    }

    #[inline]
    pub fn top_elevation(&self) -> f64 {
        self.base_elevation + self.thickness
    }
}

/// All attributes derived from one footprint's tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAttributes {
    pub height: f64,
    pub base_height: f64,
    pub extrusion: ExtrusionSpec,
    pub material_class: MaterialClass,
    pub color: ColorSample,
}

/// Resolve every attribute of a footprint.
///
/// The material class is drawn before the colour so that the colour palette
/// can depend on it.
pub fn resolve_attributes<R: Rng + ?Sized>(tags: &TagMap, rng: &mut R) -> ResolvedAttributes {
    let height = resolve_height(tags);
    let base_height = resolve_base_height(tags);
    let material_class = resolve_material_class(tags, rng);
    let color = resolve_color(tags, material_class, rng);

    ResolvedAttributes {
        height,
        base_height,
        extrusion: ExtrusionSpec::from_heights(height, base_height),
        material_class,
        color,
    }
}

/// Building height: explicit height, else levels x 3 m, else 6 m.
///
/// A parsed height is used as-is even when it is zero or negative.
pub fn resolve_height(tags: &TagMap) -> f64 {
    if let Some(height) = numeric_tag(tags, HEIGHT_KEY) {
        return height;
    }
    if let Some(levels) = numeric_tag(tags, LEVELS_KEY).filter(|l| *l != 0.0) {
        return levels * LEVEL_HEIGHT;
    }
    DEFAULT_HEIGHT
}

/// Base height: explicit min height, else min level x 3 m, else 0.
pub fn resolve_base_height(tags: &TagMap) -> f64 {
    if let Some(min_height) = numeric_tag(tags, MIN_HEIGHT_KEY) {
        return min_height;
    }
    if let Some(min_level) = numeric_tag(tags, MIN_LEVEL_KEY).filter(|l| *l != 0.0) {
        return min_level * LEVEL_HEIGHT;
    }
    0.0
}

/// First recognised material tag, else a weighted random building class
pub fn resolve_material_class<R: Rng + ?Sized>(tags: &TagMap, rng: &mut R) -> MaterialClass {
    let tagged = MATERIAL_KEYS.iter().find_map(|key| {
        tags.get(key)
            .and_then(|value| MaterialClass::from_tag_value(&value.to_lowercase()))
    });

    match tagged {
        Some(class) => class,
        None => *weighted_pick(&MaterialClass::BUILDING_WEIGHTS, rng),
    }
}

/// First valid colour tag, else a weighted pick from the class palette
pub fn resolve_color<R: Rng + ?Sized>(
    tags: &TagMap,
    class: MaterialClass,
    rng: &mut R,
) -> ColorSample {
    for key in COLOR_KEYS {
        let Some(raw) = tags.get(key) else {
            continue;
        };
        match validate_color(raw) {
            Some(color) => return color,
            None => tracing::warn!(
                key = key,
                value = raw,
                "Invalid colour tag, falling back to palette"
            ),
        }
    }

    let value = weighted_pick(class.palette(), rng);
    // Palette entries are valid hex codes.
    ColorSample::parse(value, ColorSource::Palette).unwrap_or(ColorSample {
        value: (*value).to_string(),
        rgb: [0xf0, 0xf0, 0xf0],
        source: ColorSource::Palette,
    })
}

/// Accept a `#rrggbb` code (any case, normalised to lowercase) or a
/// whitelisted colour name (exact case). Surrounding whitespace is ignored.
pub fn validate_color(raw: &str) -> Option<ColorSample> {
    ColorSample::parse(raw.trim(), ColorSource::Tag)
}

/// Parse the leading number of a tag value ("12 m" -> 12.0).
fn parse_tag_number(raw: &str) -> Option<f64> {
    match fast_float::parse_partial::<f64, _>(raw.trim_start()) {
        Ok((value, consumed)) if consumed > 0 && value.is_finite() => Some(value),
        _ => None,
    }
}

fn numeric_tag(tags: &TagMap, key: &str) -> Option<f64> {
    let raw = tags.get(key)?;
    let parsed = parse_tag_number(raw);
    if parsed.is_none() {
        tracing::warn!(key = key, value = raw, "Unparseable numeric tag ignored");
    }
    parsed
}

fn weighted_pick<'a, T, R: Rng + ?Sized>(items: &'a [(T, u32)], rng: &mut R) -> &'a T {
    match WeightedIndex::new(items.iter().map(|(_, weight)| *weight)) {
        Ok(dist) => &items[dist.sample(rng)].0,
        Err(_) => &items[0].0,
    }
}
