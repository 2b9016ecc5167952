// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Landmark tower
//!
//! The Western City Gate (Genex) tower top is not in the geodata at the
//! detail we want, so it is assembled from a fixed table of frustum modules.
//! Each module is centred on its own elevation; the restaurant ring rotates.

use crate::frustum::create_frustum;
use crate::mesh::Mesh;
use citymesh_core::{LocalPoint, MaterialClass};
use nalgebra::{Point3, Vector3};

/// Display name of the tower
pub const LANDMARK_NAME: &str = "Western City Gate (Genex Tower)";

/// Text surfaced when any landmark module is picked
pub const LANDMARK_DESCRIPTION: &str = "A rotating circular restaurant was designed for the \
35th floor of the Western City Gate, modelled on a similar system in Munich. According to \
architect Mihajlo Mitrović a key part of the mechanism never arrived during construction, so \
the restaurant never turned. Moving or not, it offered a view over Belgrade from 135 metres \
until it closed in 1999 for economic reasons. This scene shows roughly how the rotation would \
have looked.";

/// Rotation speed of the restaurant ring, radians per tick
pub const RESTAURANT_ROTATION_RATE: f64 = 0.002;

/// Per-tick mutation attached to a solid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationBehavior {
    #[default]
    None,
    /// Yaw about the module's vertical axis, advanced by `rate` every tick
    Continuous { rate: f64 },
}

impl RotationBehavior {
    pub fn rate(&self) -> f64 {
        match self {
            RotationBehavior::None => 0.0,
            RotationBehavior::Continuous { rate } => *rate,
        }
    }
}

/// One frustum of the tower
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkModule {
    pub name: &'static str,
    pub material_class: MaterialClass,
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub height: f64,
    /// Elevation of the module's centre
    pub vertical_offset: f64,
    pub radial_segments: usize,
    pub height_segments: usize,
    pub rotation: RotationBehavior,
}

impl LandmarkModule {
    #[inline]
    pub fn rotates(&self) -> bool {
        !matches!(self.rotation, RotationBehavior::None)
    }

    /// Mesh of the module centred on the origin
    pub fn mesh(&self) -> Mesh {
        create_frustum(
            self.top_radius,
            self.bottom_radius,
            self.height,
            self.radial_segments,
            self.height_segments,
        )
    }
}

const fn module(
    name: &'static str,
    material_class: MaterialClass,
    radii: (f64, f64),
    height: f64,
    vertical_offset: f64,
    segments: (usize, usize),
    rotation: RotationBehavior,
) -> LandmarkModule {
    LandmarkModule {
        name,
        material_class,
        top_radius: radii.0,
        bottom_radius: radii.1,
        height,
        vertical_offset,
        radial_segments: segments.0,
        height_segments: segments.1,
        rotation,
    }
}

/// Tower modules, bottom to top
pub static LANDMARK_MODULES: [LandmarkModule; 6] = [
    module(
        "restaurant_base",
        MaterialClass::LandmarkConcrete,
        (4.5, 4.5),
        4.0,
        104.0,
        (32, 8),
        RotationBehavior::None,
    ),
    module(
        "restaurant_main",
        MaterialClass::LandmarkWindow,
        (6.5, 6.5),
        3.0,
        107.5,
        (32, 8),
        RotationBehavior::Continuous {
            rate: RESTAURANT_ROTATION_RATE,
        },
    ),
    module(
        "restaurant_roof_base",
        MaterialClass::LandmarkConcrete,
        (7.0, 7.0),
        1.0,
        109.5,
        (32, 8),
        RotationBehavior::None,
    ),
    module(
        "restaurant_roof",
        MaterialClass::LandmarkRoof,
        (4.5, 6.0),
        2.0,
        111.0,
        (64, 64),
        RotationBehavior::None,
    ),
    module(
        "antenna_base",
        MaterialClass::LandmarkConcrete,
        (4.5, 4.5),
        3.0,
        113.5,
        (16, 8),
        RotationBehavior::None,
    ),
    module(
        "antenna",
        MaterialClass::LandmarkConcrete,
        (0.25, 0.25),
        10.0,
        119.5,
        (8, 8),
        RotationBehavior::None,
    ),
];

/// A placed module
#[derive(Debug, Clone)]
pub struct LandmarkPart {
    pub module: &'static LandmarkModule,
    /// World-space mesh
    pub mesh: Mesh,
    /// Point the module rotates about
    pub pivot: Point3<f64>,
}

/// The assembled tower
#[derive(Debug, Clone)]
pub struct Landmark {
    pub name: &'static str,
    /// Ground-level position of the tower axis
    pub position: Point3<f64>,
    pub parts: Vec<LandmarkPart>,
}

/// Build the tower with its axis on the projected `anchor`.
pub fn assemble_landmark(anchor: LocalPoint) -> Landmark {
    let position = Point3::new(anchor.x, 0.0, -anchor.z);

    let parts = LANDMARK_MODULES
        .iter()
        .map(|module| {
            let pivot = position + Vector3::new(0.0, module.vertical_offset, 0.0);
            let mut mesh = module.mesh();
            mesh.translate(pivot.coords);
            LandmarkPart {
                module,
                mesh,
                pivot,
            }
        })
        .collect();

    Landmark {
        name: LANDMARK_NAME,
        position,
        parts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_rotating_module() {
        let rotating: Vec<_> = LANDMARK_MODULES.iter().filter(|m| m.rotates()).collect();
        assert_eq!(rotating.len(), 1);
        assert_eq!(rotating[0].name, "restaurant_main");
        assert_eq!(rotating[0].rotation.rate(), 0.002);
        assert_eq!(rotating[0].material_class, MaterialClass::LandmarkWindow);
    }

    #[test]
    fn test_modules_are_landmark_classes() {
        assert!(LANDMARK_MODULES.iter().all(|m| m.material_class.is_landmark()));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let a = assemble_landmark(LocalPoint::new(12.0, -30.0));
        let b = assemble_landmark(LocalPoint::new(12.0, -30.0));
        assert_eq!(a.parts.len(), 6);
        for (pa, pb) in a.parts.iter().zip(&b.parts) {
            assert_eq!(pa.mesh.positions, pb.mesh.positions);
            assert_eq!(pa.mesh.indices, pb.mesh.indices);
        }
    }

    #[test]
    fn test_parts_are_placed_on_anchor() {
        let landmark = assemble_landmark(LocalPoint::new(100.0, 50.0));
        assert_relative_eq!(landmark.position.x, 100.0);
        assert_relative_eq!(landmark.position.z, -50.0);

        let base = &landmark.parts[0];
        let (min, max) = base.mesh.bounds();
        assert_relative_eq!(min.y, 102.0, epsilon = 1e-4);
        assert_relative_eq!(max.y, 106.0, epsilon = 1e-4);
        assert_relative_eq!((min.x + max.x) / 2.0, 100.0, epsilon = 1e-3);
        assert_relative_eq!((min.z + max.z) / 2.0, -50.0, epsilon = 1e-3);
        assert_relative_eq!(base.pivot.y, 104.0);
    }

    #[test]
    fn test_antenna_tops_out() {
        let landmark = assemble_landmark(LocalPoint::default());
        let (_, max) = landmark.parts[5].mesh.bounds();
        assert_relative_eq!(max.y, 124.5, epsilon = 1e-4);
    }
}
