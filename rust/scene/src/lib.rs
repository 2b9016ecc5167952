// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Citymesh Scene
//!
//! Everything between the geodata endpoint and a renderable scene:
//!
//! 1. [`TextureLibrary::load_all`] loads every class's texture layers and
//!    completes once all of them settled
//! 2. [`OverpassClient::fetch_elements`] downloads building ways with bounded
//!    retry, yielding an empty list once the budget is spent
//! 3. [`SceneComposer::compose`] builds a solid per buildable footprint,
//!    resolving materials through one shared [`MaterialResolver`], and adds
//!    the landmark tower
//!
//! ```rust,ignore
//! use citymesh_scene::{
//!     MaterialResolver, OverpassClient, SceneComposer, SceneConfig, TextureLibrary,
//! };
//! use std::sync::Arc;
//!
//! let config = SceneConfig::default();
//! let library = Arc::new(TextureLibrary::load_all(&config.texture_root).await);
//! let elements = OverpassClient::new(config.overpass.clone())?.fetch_elements().await;
//!
//! let mut resolver = MaterialResolver::new(library);
//! let mut rng = config.rng();
//! let scene = SceneComposer::new(&config).compose(elements, &mut resolver, &mut rng);
//! ```

pub mod builder;
pub mod composer;
pub mod config;
pub mod error;
pub mod framing;
pub mod materials;
pub mod overpass;
pub mod picking;
pub mod textures;

pub use builder::{BuiltSolid, FootprintRef, SolidBuilder};
pub use composer::{Scene, SceneComposer, SceneSolid, SolidAnnotation, SolidId};
pub use config::{BoundingBox, OverpassConfig, SceneConfig};
pub use error::{Error, Result};
pub use framing::{Aabb, Camera};
pub use materials::{MaterialResolver, PhysicalParams, ResolvedMaterial, ShadingModel};
pub use overpass::OverpassClient;
pub use picking::{PickInfo, Ray};
pub use textures::{ColorSpace, Sampling, Texture, TextureLayer, TextureLibrary, TextureSet};
