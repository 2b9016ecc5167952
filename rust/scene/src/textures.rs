// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Texture layer loading
//!
//! Every material class has six layer files under the texture root. Layers
//! load independently: a missing or undecodable file leaves that layer empty
//! without affecting the rest of the class. A class whose layers all failed
//! is not registered at all, and resolves to a flat colour later on.

use crate::error::{Error, Result};
use citymesh_core::MaterialClass;
use futures::future::join_all;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Surface layer of a textured material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextureLayer {
    BaseColor,
    Normal,
    Roughness,
    Height,
    AmbientOcclusion,
    Metalness,
}

impl TextureLayer {
    pub const ALL: [TextureLayer; 6] = [
        TextureLayer::BaseColor,
        TextureLayer::Normal,
        TextureLayer::Roughness,
        TextureLayer::Height,
        TextureLayer::AmbientOcclusion,
        TextureLayer::Metalness,
    ];

    /// File name suffix after the class stem
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::BaseColor => "color",
            Self::Normal => "normal",
            Self::Roughness => "roughness",
            Self::Height => "height",
            Self::AmbientOcclusion => "AO",
            Self::Metalness => "metalness",
        }
    }

    /// Normal vectors are stored linearly; everything else is sRGB encoded
    pub fn color_space(&self) -> ColorSpace {
        match self {
            Self::Normal => ColorSpace::Linear,
            _ => ColorSpace::Srgb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Srgb,
    Linear,
}

/// UV transform applied to every layer of a class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampling {
    pub repeat: [f32; 2],
    pub offset: [f32; 2],
    /// Wrap mode on both axes is repeat
    pub wrap_repeat: bool,
    pub flip_y: bool,
}

impl Sampling {
    pub fn for_class(class: MaterialClass) -> Self {
        let (repeat, offset) = match class {
            MaterialClass::LandmarkRoof => ([4.0, 0.1], [0.0, 0.0]),
            MaterialClass::LandmarkConcrete | MaterialClass::LandmarkWindow => {
                ([1.0, 0.1], [0.0, 0.0])
            }
            _ => ([0.15, 0.15], [0.2, 0.2]),
        };
        Self {
            repeat,
            offset,
            wrap_repeat: true,
            flip_y: false,
        }
    }
}

/// File stem of a class's layer set
pub fn texture_stem(class: MaterialClass) -> &'static str {
    match class {
        MaterialClass::Concrete => "concrete_window",
        MaterialClass::Plaster => "plaster_window",
        MaterialClass::Brick => "brick_window",
        MaterialClass::Glass => "glass_window",
        MaterialClass::LandmarkConcrete => "genex_concrete",
        MaterialClass::LandmarkRoof => "genex_roof",
        MaterialClass::LandmarkWindow => "genex_window",
    }
}

fn texture_extension(class: MaterialClass, layer: TextureLayer) -> &'static str {
    match class {
        MaterialClass::LandmarkConcrete => "png",
        MaterialClass::Glass => match layer {
            TextureLayer::Normal | TextureLayer::Height => "png",
            _ => "jpg",
        },
        _ => "jpg",
    }
}

/// Location of one layer file under `root`
pub fn texture_path(root: &Path, class: MaterialClass, layer: TextureLayer) -> PathBuf {
    root.join(format!(
        "{}_{}.{}",
        texture_stem(class),
        layer.suffix(),
        texture_extension(class, layer)
    ))
}

/// Decoded layer image
#[derive(Debug)]
pub struct Texture {
    pub path: PathBuf,
    pub color_space: ColorSpace,
    pub image: image::RgbaImage,
}

impl Texture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Loaded layers of one class
#[derive(Debug, Clone)]
pub struct TextureSet {
    pub class: MaterialClass,
    pub sampling: Sampling,
    layers: FxHashMap<TextureLayer, Arc<Texture>>,
}

impl TextureSet {
    pub fn layer(&self, layer: TextureLayer) -> Option<&Arc<Texture>> {
        self.layers.get(&layer)
    }

    /// Loaded layers in canonical order
    pub fn layers(&self) -> impl Iterator<Item = (TextureLayer, &Arc<Texture>)> {
        TextureLayer::ALL
            .into_iter()
            .filter_map(|layer| self.layers.get(&layer).map(|t| (layer, t)))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Decoded textures keyed by path, shared between classes that reference
/// the same file.
#[derive(Default)]
struct TextureCache {
    entries: Mutex<FxHashMap<PathBuf, Arc<Texture>>>,
}

impl TextureCache {
    fn get(&self, path: &Path) -> Option<Arc<Texture>> {
        self.entries.lock().ok()?.get(path).cloned()
    }

    fn insert(&self, texture: Arc<Texture>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(texture.path.clone(), texture);
        }
    }

    async fn load(&self, path: PathBuf, color_space: ColorSpace) -> Result<Arc<Texture>> {
        if let Some(texture) = self.get(&path) {
            return Ok(texture);
        }

        let bytes = tokio::fs::read(&path).await.map_err(|source| Error::TextureIo {
            path: path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| Error::TextureDecode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        let texture = Arc::new(Texture {
            path,
            color_space,
            image,
        });
        self.insert(texture.clone());
        Ok(texture)
    }
}

/// Texture sets of every class that loaded at least one layer
#[derive(Debug, Default)]
pub struct TextureLibrary {
    sets: FxHashMap<MaterialClass, TextureSet>,
}

impl TextureLibrary {
    /// Library with no sets; every class resolves flat
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all classes concurrently and return once every load has settled.
    pub async fn load_all(root: &Path) -> Self {
        let cache = TextureCache::default();
        let sets = join_all(
            MaterialClass::ALL
                .into_iter()
                .map(|class| load_class(&cache, root, class)),
        )
        .await;

        let sets: FxHashMap<_, _> = sets
            .into_iter()
            .flatten()
            .map(|set| (set.class, set))
            .collect();

        tracing::info!(
            root = %root.display(),
            classes = sets.len(),
            "Texture library loaded"
        );
        Self { sets }
    }

    pub fn get(&self, class: MaterialClass) -> Option<&TextureSet> {
        self.sets.get(&class)
    }

    pub fn contains(&self, class: MaterialClass) -> bool {
        self.sets.contains_key(&class)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

async fn load_class(cache: &TextureCache, root: &Path, class: MaterialClass) -> Option<TextureSet> {
    let loads = TextureLayer::ALL.into_iter().map(|layer| {
        let path = texture_path(root, class, layer);
        async move { (layer, cache.load(path, layer.color_space()).await) }
    });

    let mut layers = FxHashMap::default();
    for (layer, result) in join_all(loads).await {
        match result {
            Ok(texture) => {
                layers.insert(layer, texture);
            }
            Err(e) => {
                tracing::warn!(class = %class, layer = layer.suffix(), error = %e, "Texture layer unavailable");
            }
        }
    }

    if layers.is_empty() {
        tracing::warn!(class = %class, "No texture layers loaded, class will render flat");
        return None;
    }

    Some(TextureSet {
        class,
        sampling: Sampling::for_class(class),
        layers,
    })
}
