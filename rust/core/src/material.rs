// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material classes, surface presets and colour palettes

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surface appearance category of a solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialClass {
    Concrete,
    Plaster,
    Brick,
    Glass,
    LandmarkConcrete,
    LandmarkRoof,
    LandmarkWindow,
}

/// Scalar shading parameters fixed per class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialPreset {
    pub roughness: f32,
    pub metalness: f32,
}

impl MaterialClass {
    /// Every class, building classes first
    pub const ALL: [MaterialClass; 7] = [
        MaterialClass::Concrete,
        MaterialClass::Plaster,
        MaterialClass::Brick,
        MaterialClass::Glass,
        MaterialClass::LandmarkConcrete,
        MaterialClass::LandmarkRoof,
        MaterialClass::LandmarkWindow,
    ];

    /// Classes selectable from footprint tags, with their fallback weights
    pub const BUILDING_WEIGHTS: [(MaterialClass, u32); 4] = [
        (MaterialClass::Concrete, 24),
        (MaterialClass::Plaster, 14),
        (MaterialClass::Brick, 4),
        (MaterialClass::Glass, 4),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concrete => "concrete",
            Self::Plaster => "plaster",
            Self::Brick => "brick",
            Self::Glass => "glass",
            Self::LandmarkConcrete => "landmarkConcrete",
            Self::LandmarkRoof => "landmarkRoof",
            Self::LandmarkWindow => "landmarkWindow",
        }
    }

    /// Map a lowercased tag value onto a building class
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "concrete" => Some(Self::Concrete),
            "plaster" => Some(Self::Plaster),
            "brick" => Some(Self::Brick),
            "glass" => Some(Self::Glass),
            _ => None,
        }
    }

    #[inline]
    pub fn is_landmark(&self) -> bool {
        matches!(
            self,
            Self::LandmarkConcrete | Self::LandmarkRoof | Self::LandmarkWindow
        )
    }

    /// Whether the class is shaded with transmission/clear-coat parameters
    #[inline]
    pub fn is_transmissive(&self) -> bool {
        matches!(self, Self::Glass | Self::LandmarkWindow)
    }

    pub fn preset(&self) -> MaterialPreset {
        let (roughness, metalness) = match self {
            Self::Concrete | Self::Plaster => (0.8, 0.0),
            Self::Brick => (0.9, 0.0),
            Self::Glass => (0.1, 0.9),
            Self::LandmarkConcrete => (0.95, 0.0),
            Self::LandmarkRoof => (0.8, 0.0),
            Self::LandmarkWindow => (0.1, 0.9),
        };
        MaterialPreset {
            roughness,
            metalness,
        }
    }

    /// Weighted colour palette used when no valid colour tag exists.
    ///
    /// Landmark classes borrow the concrete palette.
    pub fn palette(&self) -> &'static [(&'static str, u32)] {
        match self {
            Self::Plaster => &[("#f0f0f0", 8), ("#d0d0d0", 6), ("#fff6c2", 1), ("#ffffee", 2)],
            Self::Brick => &[("#862d2d", 4), ("#863b2d", 4), ("#a0522d", 3), ("#cd853f", 2)],
            Self::Glass => &[("#7cb1ff", 1), ("#87ceeb", 3), ("#b0e0e6", 3)],
            _ => &[
                ("#f0f0f0", 24),
                ("#c9c9c9", 14),
                ("#a0a0a0", 6),
                ("#777777", 4),
                ("#f5f5dc", 2),
            ],
        }
    }
}

impl fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| Error::UnknownMaterialClass(s.to_string()))
    }
}

/// Where a resolved colour came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    Tag,
    Palette,
    Fixed,
}

/// A resolved colour: the normalised textual value plus its sRGB triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorSample {
    /// `#rrggbb` in lowercase, or a whitelisted colour name
    pub value: String,
    pub rgb: [u8; 3],
    pub source: ColorSource,
}

impl ColorSample {
    /// Parse a hex code or whitelisted name; `None` for anything else
    pub fn parse(value: &str, source: ColorSource) -> Option<Self> {
        if let Some(rgb) = parse_hex(value) {
            return Some(Self {
                value: value.to_ascii_lowercase(),
                rgb,
                source,
            });
        }
        named_color(value).map(|rgb| Self {
            value: value.to_string(),
            rgb,
            source,
        })
    }

    /// Linear-light RGB in `[0, 1]`, as renderers expect for base colour factors
    pub fn linear_rgb(&self) -> [f32; 3] {
        self.rgb.map(|c| {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// `#rrggbb`, case-insensitive
fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Accepted colour names (case-sensitive) with their CSS sRGB values
const NAMED_COLORS: [(&str, [u8; 3]); 35] = [
    ("white", [0xff, 0xff, 0xff]),
    ("black", [0x00, 0x00, 0x00]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("red", [0xff, 0x00, 0x00]),
    ("green", [0x00, 0x80, 0x00]),
    ("blue", [0x00, 0x00, 0xff]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("navy", [0x00, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("purple", [0x80, 0x00, 0x80]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("brown", [0xa5, 0x2a, 0x2a]),
    ("pink", [0xff, 0xc0, 0xcb]),
    ("beige", [0xf5, 0xf5, 0xdc]),
    ("ivory", [0xff, 0xff, 0xf0]),
    ("gold", [0xff, 0xd7, 0x00]),
    ("tan", [0xd2, 0xb4, 0x8c]),
    ("salmon", [0xfa, 0x80, 0x72]),
    ("khaki", [0xf0, 0xe6, 0x8c]),
    ("coral", [0xff, 0x7f, 0x50]),
    ("plum", [0xdd, 0xa0, 0xdd]),
    ("orchid", [0xda, 0x70, 0xd6]),
    ("turquoise", [0x40, 0xe0, 0xd0]),
    ("violet", [0xee, 0x82, 0xee]),
    ("indigo", [0x4b, 0x00, 0x82]),
    ("azure", [0xf0, 0xff, 0xff]),
];

fn named_color(name: &str) -> Option<[u8; 3]> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rgb)| *rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(MaterialClass::Brick.preset().roughness, 0.9);
        assert_eq!(MaterialClass::Glass.preset().metalness, 0.9);
        assert_eq!(MaterialClass::LandmarkConcrete.preset().roughness, 0.95);
    }

    #[test]
    fn test_from_str_round_trips_names() {
        for class in MaterialClass::ALL {
            assert_eq!(class.as_str().parse::<MaterialClass>().unwrap(), class);
        }
        assert!("marble".parse::<MaterialClass>().is_err());
    }

    #[test]
    fn test_tag_value_mapping_is_building_only() {
        assert_eq!(MaterialClass::from_tag_value("glass"), Some(MaterialClass::Glass));
        assert_eq!(MaterialClass::from_tag_value("landmarkRoof"), None);
        assert_eq!(MaterialClass::from_tag_value("Brick"), None);
    }

    #[test]
    fn test_palettes_are_valid_colours() {
        for class in MaterialClass::ALL {
            for (value, weight) in class.palette() {
                assert!(*weight > 0);
                assert!(ColorSample::parse(value, ColorSource::Palette).is_some());
            }
        }
    }

    #[test]
    fn test_hex_parse() {
        let sample = ColorSample::parse("#ABCDEF", ColorSource::Tag).unwrap();
        assert_eq!(sample.value, "#abcdef");
        assert_eq!(sample.rgb, [0xab, 0xcd, 0xef]);

        assert!(ColorSample::parse("#abc", ColorSource::Tag).is_none());
        assert!(ColorSample::parse("abcdef", ColorSource::Tag).is_none());
        assert!(ColorSample::parse("#abcdeg", ColorSource::Tag).is_none());
    }

    #[test]
    fn test_named_colours_are_case_sensitive() {
        assert_eq!(
            ColorSample::parse("beige", ColorSource::Tag).unwrap().rgb,
            [0xf5, 0xf5, 0xdc]
        );
        assert!(ColorSample::parse("Beige", ColorSource::Tag).is_none());
        assert!(ColorSample::parse("chartreuse", ColorSource::Tag).is_none());
    }

    #[test]
    fn test_linear_rgb() {
        let white = ColorSample::parse("white", ColorSource::Fixed).unwrap();
        assert_eq!(white.linear_rgb(), [1.0, 1.0, 1.0]);
        let black = ColorSample::parse("#000000", ColorSource::Fixed).unwrap();
        assert_eq!(black.linear_rgb(), [0.0, 0.0, 0.0]);
    }
}
