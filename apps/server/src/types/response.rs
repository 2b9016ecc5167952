// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use citymesh_core::{ExtrusionSpec, FootprintId, MaterialClass, TagMap};
use citymesh_scene::{
    Aabb, Camera, PhysicalParams, ResolvedMaterial, Scene, SceneSolid, ShadingModel,
    SolidAnnotation,
};
use serde::Serialize;

/// Scene summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneResponse {
    pub solid_count: usize,
    pub building_count: usize,
    pub landmark_module_count: usize,
    /// Distinct materials in use.
    pub material_count: usize,
    pub bounds: BoundsInfo,
    /// Initial camera framing the whole scene.
    pub camera: Camera,
    /// Current yaw of every rotating solid.
    pub rotating: Vec<RotationInfo>,
    pub ticks: u64,
    /// Ticks per second the server advances the scene at.
    pub tick_hz: u32,
    /// Total number of vertices.
    pub total_vertices: usize,
    /// Total number of triangles.
    pub total_triangles: usize,
}

impl SceneResponse {
    pub fn from_scene(scene: &Scene, aspect: f64, tick_hz: u32) -> Self {
        let mut materials: Vec<*const ResolvedMaterial> = scene
            .solids()
            .iter()
            .map(|solid| std::sync::Arc::as_ptr(&solid.material))
            .collect();
        materials.sort_unstable();
        materials.dedup();

        Self {
            solid_count: scene.len(),
            building_count: scene.building_count(),
            landmark_module_count: scene.len() - scene.building_count(),
            material_count: materials.len(),
            bounds: BoundsInfo::from(scene.bounds()),
            camera: scene.camera(aspect),
            rotating: scene
                .solids()
                .iter()
                .filter(|solid| solid.rotation.rate() != 0.0)
                .map(|solid| RotationInfo {
                    solid_id: solid.id.0,
                    rate: solid.rotation.rate(),
                    angle: solid.angle,
                })
                .collect(),
            ticks: scene.ticks(),
            tick_hz,
            total_vertices: scene.solids().iter().map(|s| s.mesh.vertex_count()).sum(),
            total_triangles: scene.solids().iter().map(|s| s.mesh.triangle_count()).sum(),
        }
    }
}

/// World-space bounds; `null` corners for an empty scene.
#[derive(Debug, Clone, Serialize)]
pub struct BoundsInfo {
    pub min: Option<[f64; 3]>,
    pub max: Option<[f64; 3]>,
}

impl From<Aabb> for BoundsInfo {
    fn from(aabb: Aabb) -> Self {
        if aabb.is_empty() {
            return Self { min: None, max: None };
        }
        Self {
            min: Some([aabb.min.x, aabb.min.y, aabb.min.z]),
            max: Some([aabb.max.x, aabb.max.y, aabb.max.z]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationInfo {
    pub solid_id: u32,
    /// Radians per tick.
    pub rate: f64,
    pub angle: f64,
}

/// Material as seen by a client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInfo {
    pub class: MaterialClass,
    pub color: String,
    pub shading: ShadingModel,
    pub roughness: f32,
    pub metalness: f32,
    pub normal_scale: f32,
    pub displacement_scale: f32,
    pub ao_intensity: f32,
    pub physical: Option<PhysicalParams>,
    /// Loaded texture layer files, in layer order.
    pub textures: Vec<String>,
}

impl From<&ResolvedMaterial> for MaterialInfo {
    fn from(material: &ResolvedMaterial) -> Self {
        Self {
            class: material.class,
            color: material.color.value.clone(),
            shading: material.shading,
            roughness: material.roughness,
            metalness: material.metalness,
            normal_scale: material.normal_scale,
            displacement_scale: material.displacement_scale,
            ao_intensity: material.ao_intensity,
            physical: material.physical,
            textures: material
                .textures
                .iter()
                .flat_map(|set| set.layers())
                .map(|(_, texture)| texture.path.display().to_string())
                .collect(),
        }
    }
}

/// What a solid stands for.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceInfo {
    #[serde(rename_all = "camelCase")]
    Building { footprint_id: FootprintId, tags: TagMap },
    #[serde(rename_all = "camelCase")]
    Landmark { name: &'static str, module: &'static str },
}

impl From<&SolidAnnotation> for SourceInfo {
    fn from(annotation: &SolidAnnotation) -> Self {
        match annotation {
            SolidAnnotation::Footprint(source) => SourceInfo::Building {
                footprint_id: source.footprint_id,
                tags: (*source.tags).clone(),
            },
            SolidAnnotation::Landmark { name, module } => SourceInfo::Landmark {
                name: *name,
                module: module.name,
            },
        }
    }
}

/// Detail of one solid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidResponse {
    pub solid_id: u32,
    pub source: Option<SourceInfo>,
    pub material: MaterialInfo,
    pub extrusion: Option<ExtrusionSpec>,
    pub bounds: BoundsInfo,
    pub angle: f64,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

impl SolidResponse {
    pub fn new(solid: &SceneSolid, annotation: Option<&SolidAnnotation>) -> Self {
        Self {
            solid_id: solid.id.0,
            source: annotation.map(SourceInfo::from),
            material: MaterialInfo::from(solid.material.as_ref()),
            extrusion: solid.extrusion,
            bounds: BoundsInfo::from(solid.bounds),
            angle: solid.angle,
            vertex_count: solid.mesh.vertex_count(),
            triangle_count: solid.mesh.triangle_count(),
        }
    }
}
