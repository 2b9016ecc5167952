// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Citymesh Geometry
//!
//! Mesh generation for building scenes: footprint rings are closed, triangulated
//! with earcutr and extruded into solids; the landmark tower is assembled from
//! frustum modules. Transforms use nalgebra.
//!
//! World frame of every produced mesh: x east, y up, z south.

pub mod error;
pub mod extrusion;
pub mod footprint;
pub mod frustum;
pub mod landmark;
pub mod mesh;
pub mod profile;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extrusion::{apply_transform, extrude_profile};
pub use footprint::{close_ring, extrude_footprint, ClosedRing, FootprintMesh, CLOSURE_TOLERANCE};
pub use frustum::create_frustum;
pub use landmark::{
    assemble_landmark, Landmark, LandmarkModule, LandmarkPart, RotationBehavior,
    LANDMARK_DESCRIPTION, LANDMARK_MODULES, LANDMARK_NAME,
};
pub use mesh::Mesh;
pub use profile::{Profile2D, Triangulation};
