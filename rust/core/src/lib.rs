// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Citymesh Core
//!
//! Data model and attribute resolution for OpenStreetMap building footprints.
//!
//! ## Overview
//!
//! - **Projection**: flat-earth equirectangular mapping of WGS84 coordinates
//!   into a local metric frame around a fixed origin ([`georef`])
//! - **Tags**: strongly typed key/value metadata with explicit absence ([`tags`])
//! - **Attributes**: height, base height, material class and colour derived
//!   from partially trustworthy tags, with seeded random fallbacks ([`attributes`])
//! - **Footprints**: the Overpass `out geom` element model and the buildable
//!   footprint filter ([`footprint`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citymesh_core::{resolve_attributes, GeoPoint, Projector, TagMap};
//! use rand::SeedableRng;
//!
//! let projector = Projector::new(GeoPoint::new(44.81806, 20.40520));
//! let local = projector.project(GeoPoint::new(44.8190, 20.4060));
//!
//! let tags = TagMap::from_pairs([("building", "yes"), ("building:levels", "4")]);
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let attrs = resolve_attributes(&tags, &mut rng);
//! assert_eq!(attrs.height, 12.0);
//! ```

pub mod attributes;
pub mod error;
pub mod footprint;
pub mod georef;
pub mod material;
pub mod tags;

pub use attributes::{
    resolve_attributes, resolve_base_height, resolve_color, resolve_height,
    resolve_material_class, validate_color, ExtrusionSpec, ResolvedAttributes,
    MIN_EXTRUSION_THICKNESS,
};
pub use error::{Error, Result};
pub use footprint::{
    buildable_footprints, parse_elements, Element, Footprint, FootprintId, OverpassResponse,
};
pub use georef::{GeoPoint, LocalPoint, Projector, EARTH_RADIUS};
pub use material::{ColorSample, ColorSource, MaterialClass, MaterialPreset};
pub use tags::TagMap;
