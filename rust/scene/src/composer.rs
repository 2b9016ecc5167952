// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene composition
//!
//! A [`Scene`] owns every solid by [`SolidId`]. What a solid represents
//! (a footprint or a landmark module) lives in a separate annotation table
//! that is only consulted for lookups such as picking.

use crate::builder::{BuiltSolid, FootprintRef, SolidBuilder};
use crate::config::SceneConfig;
use crate::framing::{Aabb, Camera};
use crate::materials::{MaterialResolver, ResolvedMaterial};
use crate::picking::{intersect_mesh, PickInfo, Ray};
use citymesh_core::{buildable_footprints, Element, ExtrusionSpec, LocalPoint, Projector};
use citymesh_geometry::{
    assemble_landmark, Landmark, LandmarkModule, Mesh, RotationBehavior, LANDMARK_DESCRIPTION,
};
use nalgebra::{Matrix4, Point3, Vector3};
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a solid within one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolidId(pub u32);

impl fmt::Display for SolidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a solid stands for
#[derive(Debug, Clone)]
pub enum SolidAnnotation {
    Footprint(FootprintRef),
    Landmark {
        name: &'static str,
        module: &'static LandmarkModule,
    },
}

/// A placed solid
#[derive(Debug, Clone)]
pub struct SceneSolid {
    pub id: SolidId,
    /// World-space mesh before rotation
    pub mesh: Mesh,
    pub material: Arc<ResolvedMaterial>,
    pub extrusion: Option<ExtrusionSpec>,
    /// Mesh bounds before rotation
    pub bounds: Aabb,
    pub rotation: RotationBehavior,
    /// Accumulated yaw about `pivot`, radians
    pub angle: f64,
    pub pivot: Point3<f64>,
}

impl SceneSolid {
    /// Transform from stored mesh coordinates to the current world pose
    pub fn world_transform(&self) -> Matrix4<f64> {
        if self.angle == 0.0 {
            return Matrix4::identity();
        }
        Matrix4::new_translation(&self.pivot.coords)
            * Matrix4::from_axis_angle(&Vector3::y_axis(), self.angle)
            * Matrix4::new_translation(&-self.pivot.coords)
    }

    /// Ray parameter of the nearest hit, accounting for the current rotation
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let local = if self.angle == 0.0 {
            *ray
        } else {
            ray.into_rotated_frame(&self.pivot, self.angle)
        };
        if !local.hits_aabb(&self.bounds) {
            return None;
        }
        intersect_mesh(&local, &self.mesh)
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    solids: Vec<SceneSolid>,
    annotations: FxHashMap<SolidId, SolidAnnotation>,
    bounds: Aabb,
    ticks: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, mut solid: SceneSolid, annotation: SolidAnnotation) -> SolidId {
        let id = SolidId(self.solids.len() as u32);
        solid.id = id;
        self.bounds = self.bounds.union(&solid.bounds);
        self.annotations.insert(id, annotation);
        self.solids.push(solid);
        id
    }

    /// Add a building; its footprint reference goes to the annotation table.
    pub fn add_building(&mut self, built: BuiltSolid) -> SolidId {
        let (min, max) = built.bounds;
        let pivot = nalgebra::center(&min.cast(), &max.cast());
        let solid = SceneSolid {
            id: SolidId(0),
            mesh: built.mesh,
            material: built.material,
            extrusion: Some(built.extrusion),
            bounds: Aabb::from_f32(min, max),
            rotation: RotationBehavior::None,
            angle: 0.0,
            pivot,
        };
        self.push(solid, SolidAnnotation::Footprint(built.source))
    }

    /// Add every module of the landmark, one solid each.
    pub fn add_landmark(&mut self, landmark: Landmark, resolver: &mut MaterialResolver) -> Vec<SolidId> {
        landmark
            .parts
            .into_iter()
            .map(|part| {
                let (min, max) = part.mesh.bounds();
                let solid = SceneSolid {
                    id: SolidId(0),
                    material: resolver.resolve_landmark(part.module.material_class),
                    mesh: part.mesh,
                    extrusion: None,
                    bounds: Aabb::from_f32(min, max),
                    rotation: part.module.rotation,
                    angle: 0.0,
                    pivot: part.pivot,
                };
                self.push(
                    solid,
                    SolidAnnotation::Landmark {
                        name: landmark.name,
                        module: part.module,
                    },
                )
            })
            .collect()
    }

    /// Advance every continuously rotating solid by its rate
    pub fn tick(&mut self) {
        for solid in &mut self.solids {
            if let RotationBehavior::Continuous { rate } = solid.rotation {
                solid.angle += rate;
            }
        }
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn solids(&self) -> &[SceneSolid] {
        &self.solids
    }

    pub fn solid(&self, id: SolidId) -> Option<&SceneSolid> {
        self.solids.get(id.0 as usize)
    }

    pub fn annotation(&self, id: SolidId) -> Option<&SolidAnnotation> {
        self.annotations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn building_count(&self) -> usize {
        self.annotations
            .values()
            .filter(|a| matches!(a, SolidAnnotation::Footprint(_)))
            .count()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Initial camera for this scene
    pub fn camera(&self, aspect: f64) -> Camera {
        Camera::frame(&self.bounds, aspect)
    }

    /// Nearest solid hit by `ray`, described through its annotation
    pub fn pick(&self, ray: &Ray) -> Option<PickInfo> {
        let (solid, distance) = self
            .solids
            .iter()
            .filter_map(|solid| solid.intersect(ray).map(|t| (solid, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let info = match self.annotations.get(&solid.id)? {
            SolidAnnotation::Footprint(source) => PickInfo::Building {
                solid_id: solid.id.0,
                footprint_id: source.footprint_id,
                distance,
                tags: (*source.tags).clone(),
            },
            SolidAnnotation::Landmark { name, module } => PickInfo::Landmark {
                solid_id: solid.id.0,
                name: *name,
                module: module.name,
                distance,
                description: LANDMARK_DESCRIPTION,
            },
        };
        Some(info)
    }
}

/// Turns fetched elements into a scene
#[derive(Debug, Clone, Copy)]
pub struct SceneComposer {
    builder: SolidBuilder,
    landmark_anchor: LocalPoint,
}

impl SceneComposer {
    pub fn new(config: &SceneConfig) -> Self {
        let projector = Projector::new(config.origin);
        Self {
            builder: SolidBuilder::new(projector),
            landmark_anchor: projector.project(config.landmark_anchor),
        }
    }

    pub fn builder(&self) -> &SolidBuilder {
        &self.builder
    }

    /// Build every buildable footprint and add the landmark.
    ///
    /// The resolver must be backed by a fully loaded texture library,
    /// otherwise materials come out flat.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        elements: Vec<Element>,
        resolver: &mut MaterialResolver,
        rng: &mut R,
    ) -> Scene {
        let mut scene = Scene::new();
        let footprints = buildable_footprints(elements);
        let candidates = footprints.len();

        for footprint in &footprints {
            if let Some(built) = self.builder.build(footprint, resolver, rng) {
                scene.add_building(built);
            }
        }
        let buildings = scene.len();

        let landmark = assemble_landmark(self.landmark_anchor);
        let modules = scene.add_landmark(landmark, resolver).len();

        tracing::info!(
            candidates,
            buildings,
            landmark_modules = modules,
            materials = resolver.cached(),
            "Scene composed"
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::TextureLibrary;
    use approx::assert_relative_eq;
    use citymesh_core::parse_elements;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PAYLOAD: &str = r#"{
        "elements": [
            {
                "type": "way", "id": 100,
                "tags": {"building": "yes", "height": "9", "building:material": "brick"},
                "geometry": [
                    {"lat": 44.8180, "lon": 20.4050},
                    {"lat": 44.8180, "lon": 20.4052},
                    {"lat": 44.8182, "lon": 20.4052},
                    {"lat": 44.8182, "lon": 20.4050}
                ]
            },
            {
                "type": "way", "id": 101,
                "tags": {"building": "yes"},
                "geometry": [{"lat": 44.8190, "lon": 20.4050}, {"lat": 44.8190, "lon": 20.4051}]
            },
            {
                "type": "node", "id": 102,
                "tags": {"building": "yes"}
            }
        ]
    }"#;

    fn compose() -> Scene {
        let config = SceneConfig::default();
        let mut resolver = MaterialResolver::new(Arc::new(TextureLibrary::empty()));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        SceneComposer::new(&config).compose(parse_elements(PAYLOAD).unwrap(), &mut resolver, &mut rng)
    }

    #[test]
    fn test_compose_counts() {
        let scene = compose();
        assert_eq!(scene.building_count(), 1);
        assert_eq!(scene.len(), 1 + 6);
        assert!(!scene.bounds().is_empty());
        // antenna tip
        assert_relative_eq!(scene.bounds().max.y, 124.5, epsilon = 1e-3);
    }

    #[test]
    fn test_tick_rotates_only_restaurant() {
        let mut scene = compose();
        for _ in 0..500 {
            scene.tick();
        }
        assert_eq!(scene.ticks(), 500);

        let rotating: Vec<_> = scene.solids().iter().filter(|s| s.angle != 0.0).collect();
        assert_eq!(rotating.len(), 1);
        assert_relative_eq!(rotating[0].angle, 1.0, epsilon = 1e-9);
        match scene.annotation(rotating[0].id) {
            Some(SolidAnnotation::Landmark { module, .. }) => assert_eq!(module.name, "restaurant_main"),
            other => panic!("unexpected annotation {other:?}"),
        }
    }

    #[test]
    fn test_pick_building_from_above() {
        let scene = compose();
        let building = scene.solid(SolidId(0)).unwrap();
        let center = nalgebra::center(&building.bounds.min, &building.bounds.max);

        let ray = Ray::new(Point3::new(center.x + 0.37, 500.0, center.z + 0.21), -Vector3::y()).unwrap();
        match scene.pick(&ray) {
            Some(PickInfo::Building { footprint_id, tags, distance, .. }) => {
                assert_eq!(footprint_id, 100);
                assert_eq!(tags.get("building:material"), Some("brick"));
                assert_relative_eq!(distance, 491.0, epsilon = 1e-3);
            }
            other => panic!("expected building, got {other:?}"),
        }
    }

    #[test]
    fn test_pick_landmark_and_miss() {
        let scene = compose();
        let antenna = scene.solids().last().unwrap();
        let ray = Ray::new(
            Point3::new(antenna.pivot.x + 0.1, 1000.0, antenna.pivot.z + 0.05),
            -Vector3::y(),
        )
        .unwrap();
        match scene.pick(&ray) {
            Some(PickInfo::Landmark { module, description, .. }) => {
                assert_eq!(module, "antenna");
                assert!(description.contains("restaurant"));
            }
            other => panic!("expected landmark, got {other:?}"),
        }

        let sky = Ray::new(Point3::new(0.0, 1000.0, 0.0), Vector3::y()).unwrap();
        assert!(scene.pick(&sky).is_none());
    }

    #[test]
    fn test_pick_follows_rotation() {
        let mut scene = compose();
        let restaurant = scene.solids()[2].clone();
        assert!(matches!(restaurant.rotation, RotationBehavior::Continuous { .. }));

        // after a quarter turn the stored mesh is queried through the inverse rotation
        let ticks = (std::f64::consts::FRAC_PI_2 / 0.002).round() as usize;
        for _ in 0..ticks {
            scene.tick();
        }
        let ray = Ray::new(
            Point3::new(restaurant.pivot.x + 100.0, restaurant.pivot.y + 0.1, restaurant.pivot.z + 0.3),
            -Vector3::x(),
        )
        .unwrap();
        let hit = scene.pick(&ray).unwrap();
        assert_relative_eq!(hit.distance(), 100.0 - 6.5, epsilon = 0.1);
    }

    #[test]
    fn test_world_transform_identity_until_rotated() {
        let mut scene = compose();
        assert_eq!(scene.solids()[2].world_transform(), Matrix4::identity());
        scene.tick();
        assert_ne!(scene.solids()[2].world_transform(), Matrix4::identity());
    }
}
