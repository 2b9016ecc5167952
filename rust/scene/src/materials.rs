// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resolution
//!
//! A [`MaterialResolver`] is created once the texture library has finished
//! loading and is then handed to every builder call. Materials are memoized
//! by `(class, colour)` for the lifetime of the resolver, so every solid
//! sharing a pair also shares one `Arc<ResolvedMaterial>`.

use crate::textures::{TextureLibrary, TextureSet};
use citymesh_core::{ColorSample, ColorSource, MaterialClass};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Base colour with roughness/metalness
    Standard,
    /// Standard plus clear-coat and transmission terms
    Physical,
    /// No texture layers
    Flat,
}

/// Extra terms of the physical shading model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalParams {
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub reflectivity: Option<f32>,
    pub transmission: Option<f32>,
    pub env_map_intensity: Option<f32>,
}

/// Fully parameterized surface
#[derive(Debug, Clone)]
pub struct ResolvedMaterial {
    pub class: MaterialClass,
    pub color: ColorSample,
    pub shading: ShadingModel,
    pub roughness: f32,
    pub metalness: f32,
    pub normal_scale: f32,
    pub displacement_scale: f32,
    pub ao_intensity: f32,
    pub physical: Option<PhysicalParams>,
    /// `None` for flat materials
    pub textures: Option<TextureSet>,
}

impl ResolvedMaterial {
    pub fn is_flat(&self) -> bool {
        self.textures.is_none()
    }

    fn flat(class: MaterialClass, color: ColorSample) -> Self {
        let preset = class.preset();
        Self {
            class,
            color,
            shading: ShadingModel::Flat,
            roughness: preset.roughness,
            metalness: preset.metalness,
            normal_scale: 0.0,
            displacement_scale: 0.0,
            ao_intensity: 0.0,
            physical: None,
            textures: None,
        }
    }

    fn textured(class: MaterialClass, color: ColorSample, textures: TextureSet) -> Self {
        let preset = class.preset();
        let (shading, displacement_scale, physical) = match class {
            MaterialClass::Glass => (
                ShadingModel::Physical,
                0.1,
                Some(PhysicalParams {
                    clearcoat: 1.0,
                    clearcoat_roughness: 0.1,
                    reflectivity: None,
                    transmission: None,
                    env_map_intensity: None,
                }),
            ),
            MaterialClass::LandmarkWindow => (
                ShadingModel::Physical,
                0.02,
                Some(PhysicalParams {
                    clearcoat: 0.8,
                    clearcoat_roughness: 0.1,
                    reflectivity: Some(1.0),
                    transmission: Some(0.1),
                    env_map_intensity: Some(1.5),
                }),
            ),
            _ => (ShadingModel::Standard, 0.05, None),
        };

        Self {
            class,
            color,
            shading,
            roughness: preset.roughness,
            metalness: preset.metalness,
            normal_scale: 1.0,
            displacement_scale,
            ao_intensity: 1.0,
            physical,
            textures: Some(textures),
        }
    }
}

/// Fixed tint of a landmark class
pub fn landmark_tint(class: MaterialClass) -> ColorSample {
    let (value, rgb) = match class {
        MaterialClass::LandmarkWindow => ("#dddddd", [0xdd; 3]),
        _ => ("#ffffff", [0xff; 3]),
    };
    ColorSample {
        value: value.to_string(),
        rgb,
        source: ColorSource::Fixed,
    }
}

type MaterialKey = (MaterialClass, String);

/// Memoizing `(class, colour) -> material` resolver
pub struct MaterialResolver {
    library: Arc<TextureLibrary>,
    cache: FxHashMap<MaterialKey, Arc<ResolvedMaterial>>,
}

impl MaterialResolver {
    pub fn new(library: Arc<TextureLibrary>) -> Self {
        Self {
            library,
            cache: FxHashMap::default(),
        }
    }

    pub fn library(&self) -> &TextureLibrary {
        &self.library
    }

    /// Resolve a material, reusing the cached instance for a known pair.
    ///
    /// Classes without a texture set degrade to a flat colour material.
    pub fn resolve(&mut self, class: MaterialClass, color: &ColorSample) -> Arc<ResolvedMaterial> {
        let key = (class, color.value.clone());
        if let Some(material) = self.cache.get(&key) {
            return material.clone();
        }

        let material = match self.library.get(class) {
            Some(set) => ResolvedMaterial::textured(class, color.clone(), set.clone()),
            None => {
                tracing::debug!(class = %class, color = %color, "Resolving flat material");
                ResolvedMaterial::flat(class, color.clone())
            }
        };

        let material = Arc::new(material);
        self.cache.insert(key, material.clone());
        material
    }

    /// Landmark classes use their fixed tint
    pub fn resolve_landmark(&mut self, class: MaterialClass) -> Arc<ResolvedMaterial> {
        self.resolve(class, &landmark_tint(class))
    }

    /// Number of distinct materials built so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
