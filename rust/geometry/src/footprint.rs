// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint ring to extruded solid
//!
//! A projected ring is closed into a 2D path in the horizontal plane, extruded
//! along the profile normal, and then rotated so that the extrusion axis is
//! world up. The planar frame has north on +y while the world frame has north
//! on -z, so the rotation is -90 degrees about X: (x, north, depth) lands on
//! (x, depth, -north). Finally the solid is lifted to its base elevation.

use crate::extrusion::extrude_profile;
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use citymesh_core::{ExtrusionSpec, LocalPoint};
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

/// First/last points closer than this (metres) already close the ring
pub const CLOSURE_TOLERANCE: f64 = 0.01;

/// Ring after the closure rule was applied
#[derive(Debug, Clone)]
pub struct ClosedRing {
    /// Path in insertion order, plus the first point again if it was appended
    pub points: Vec<Point2<f64>>,
    pub closing_segment_added: bool,
}

/// Append a closing segment unless the ring's ends already meet.
pub fn close_ring(mut points: Vec<Point2<f64>>) -> ClosedRing {
    let closing_segment_added = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first - last).norm() > CLOSURE_TOLERANCE,
        _ => false,
    };
    if closing_segment_added {
        points.push(points[0]);
    }
    ClosedRing {
        points,
        closing_segment_added,
    }
}

/// Extruded footprint in world coordinates
#[derive(Debug, Clone)]
pub struct FootprintMesh {
    pub mesh: Mesh,
    pub outline: ClosedRing,
    pub extrusion: ExtrusionSpec,
}

impl FootprintMesh {
    /// Horizontal centre of the outline in world coordinates
    pub fn anchor(&self) -> Point3<f64> {
        let n = self.outline.points.len().max(1) as f64;
        let sum = self
            .outline
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + Vector3::new(p.x, 0.0, -p.y));
        Point3::from(sum / n) + Vector3::new(0.0, self.extrusion.base_elevation, 0.0)
    }
}

/// Extrude a projected ring between the elevations of `extrusion`.
///
/// Returns `None` for rings with fewer than three points. Coordinates are not
/// validated: non-finite points flow through into the mesh (caps are dropped
/// when the outline cannot be triangulated).
pub fn extrude_footprint(ring: &[LocalPoint], extrusion: &ExtrusionSpec) -> Option<FootprintMesh> {
    if ring.len() < 3 {
        return None;
    }

    let outline = close_ring(ring.iter().map(|p| Point2::new(p.x, p.z)).collect());
    let profile = Profile2D::new(outline.points.clone()).into_counter_clockwise();

    let transform = Matrix4::new_translation(&Vector3::new(0.0, extrusion.base_elevation, 0.0))
        * Matrix4::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);

    match extrude_profile(&profile, extrusion.thickness, Some(transform)) {
        Ok(mesh) => Some(FootprintMesh {
            mesh,
            outline,
            extrusion: *extrusion,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Footprint extrusion rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<LocalPoint> {
        vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(size, 0.0),
            LocalPoint::new(size, size),
            LocalPoint::new(0.0, size),
        ]
    }

    #[test]
    fn test_close_ring_appends_when_open() {
        let ring = close_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.02, 0.0),
        ]);
        assert!(ring.closing_segment_added);
        assert_eq!(ring.points.len(), 5);
        assert_eq!(ring.points[4], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_close_ring_within_tolerance() {
        let ring = close_ring(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.005, 0.0),
        ]);
        assert!(!ring.closing_segment_added);
        assert_eq!(ring.points.len(), 4);
    }

    #[test]
    fn test_too_few_points() {
        let spec = ExtrusionSpec::from_heights(6.0, 0.0);
        assert!(extrude_footprint(&square(5.0)[..2], &spec).is_none());
        assert!(extrude_footprint(&[], &spec).is_none());
    }

    #[test]
    fn test_extrusion_is_vertical() {
        let spec = ExtrusionSpec::from_heights(9.0, 0.0);
        let solid = extrude_footprint(&square(10.0), &spec).unwrap();
        let (min, max) = solid.mesh.bounds();

        assert_relative_eq!(min.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(max.y, 9.0, epsilon = 1e-5);
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(max.x, 10.0, epsilon = 1e-5);
        // north maps onto -z
        assert_relative_eq!(min.z, -10.0, epsilon = 1e-5);
        assert_relative_eq!(max.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_base_elevation_lifts_solid() {
        let spec = ExtrusionSpec::from_heights(12.0, 4.0);
        let solid = extrude_footprint(&square(10.0), &spec).unwrap();
        let (min, max) = solid.mesh.bounds();
        assert_relative_eq!(min.y, 4.0, epsilon = 1e-5);
        assert_relative_eq!(max.y, 12.0, epsilon = 1e-5);
    }

    #[test]
    fn test_top_cap_faces_up() {
        let spec = ExtrusionSpec::from_heights(3.0, 0.0);
        let solid = extrude_footprint(&square(10.0), &spec).unwrap();
        let mesh = &solid.mesh;
        let top_normals = (0..mesh.vertex_count())
            .filter(|&v| (mesh.positions[v * 3 + 1] - 3.0).abs() < 1e-5)
            .filter(|&v| (mesh.normals[v * 3 + 1] - 1.0).abs() < 1e-5)
            .count();
        assert!(top_normals >= 4);
    }

    #[test]
    fn test_clockwise_ring_builds_same_extent() {
        let spec = ExtrusionSpec::from_heights(5.0, 0.0);
        let mut ring = square(10.0);
        ring.reverse();
        let solid = extrude_footprint(&ring, &spec).unwrap();
        let (min, max) = solid.mesh.bounds();
        assert_relative_eq!(max.y - min.y, 5.0, epsilon = 1e-5);
        assert_eq!(solid.outline.points.len(), 5);
    }

    #[test]
    fn test_non_finite_ring_still_builds() {
        let spec = ExtrusionSpec::from_heights(6.0, 0.0);
        let mut ring = square(10.0);
        ring[2] = LocalPoint::new(f64::NAN, f64::NAN);
        assert!(extrude_footprint(&ring, &spec).is_some());
    }

    #[test]
    fn test_anchor_is_outline_centre() {
        let spec = ExtrusionSpec::from_heights(6.0, 2.0);
        let solid = extrude_footprint(&square(10.0), &spec).unwrap();
        let anchor = solid.anchor();
        // closing point is included, pulling the mean towards the origin
        assert_relative_eq!(anchor.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(anchor.z, -4.0, epsilon = 1e-9);
        assert_relative_eq!(anchor.y, 2.0, epsilon = 1e-9);
    }
}
