// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray casting against scene solids

use crate::framing::{Aabb, Camera};
use citymesh_core::{FootprintId, TagMap};
use citymesh_geometry::Mesh;
use nalgebra::{Point2, Point3, Rotation3, Vector3};
use serde::Serialize;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
}

impl Ray {
    /// `None` when `direction` has no length
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        let direction = direction.try_normalize(EPSILON)?;
        Some(Self { origin, direction })
    }

    /// Ray through a pointer position in normalised device coordinates
    /// (x right, y up, both in `-1..=1`).
    pub fn from_screen(ndc: Point2<f64>, camera: &Camera) -> Self {
        let forward = camera.forward();
        let (right, up) = camera.basis();
        let tan_half = (camera.fov_deg.to_radians() / 2.0).tan();

        let direction =
            forward + right * (ndc.x * tan_half * camera.aspect) + up * (ndc.y * tan_half);
        Self {
            origin: camera.eye(),
            direction: direction.try_normalize(EPSILON).unwrap_or(forward),
        }
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// The same ray seen from a frame rotated by `angle` about the vertical
    /// axis through `pivot`.
    pub fn into_rotated_frame(&self, pivot: &Point3<f64>, angle: f64) -> Self {
        let inverse = Rotation3::from_axis_angle(&Vector3::y_axis(), -angle);
        Self {
            origin: pivot + inverse * (self.origin - pivot),
            direction: inverse * self.direction,
        }
    }

    /// Slab test; true when the ray enters `bounds` ahead of its origin
    pub fn hits_aabb(&self, bounds: &Aabb) -> bool {
        let mut t_min = 0.0f64;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let inv = 1.0 / self.direction[axis];
            let mut t0 = (bounds.min[axis] - self.origin[axis]) * inv;
            let mut t1 = (bounds.max[axis] - self.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // NaN from 0 * inf keeps the current interval
            if t0 > t_min {
                t_min = t0;
            }
            if t1 < t_max {
                t_max = t1;
            }
            if t_max < t_min {
                return false;
            }
        }
        true
    }
}

/// Möller-Trumbore intersection, double-sided. Returns the ray parameter.
pub fn intersect_triangle(ray: &Ray, a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nearest hit distance against any triangle of `mesh`
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh) -> Option<f64> {
    mesh.triangles()
        .filter_map(|[a, b, c]| intersect_triangle(ray, &a.cast(), &b.cast(), &c.cast()))
        .min_by(f64::total_cmp)
}

/// What a pointer landed on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickInfo {
    #[serde(rename_all = "camelCase")]
    Building {
        solid_id: u32,
        footprint_id: FootprintId,
        distance: f64,
        tags: TagMap,
    },
    #[serde(rename_all = "camelCase")]
    Landmark {
        solid_id: u32,
        name: &'static str,
        module: &'static str,
        distance: f64,
        description: &'static str,
    },
}

impl PickInfo {
    pub fn distance(&self) -> f64 {
        match self {
            PickInfo::Building { distance, .. } | PickInfo::Landmark { distance, .. } => *distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use citymesh_geometry::create_frustum;

    fn down(x: f64, z: f64) -> Ray {
        Ray::new(Point3::new(x, 100.0, z), -Vector3::y()).unwrap()
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        let c = Point3::new(0.0, 0.0, 10.0);

        assert_relative_eq!(intersect_triangle(&down(1.0, 1.0), &a, &b, &c).unwrap(), 100.0);
        assert!(intersect_triangle(&down(9.0, 9.0), &a, &b, &c).is_none());

        let up = Ray::new(Point3::new(1.0, -5.0, 1.0), Vector3::y()).unwrap();
        assert_relative_eq!(intersect_triangle(&up, &a, &b, &c).unwrap(), 5.0);

        let away = Ray::new(Point3::new(1.0, 5.0, 1.0), Vector3::y()).unwrap();
        assert!(intersect_triangle(&away, &a, &b, &c).is_none());
    }

    #[test]
    fn test_mesh_nearest_hit() {
        let mut mesh = create_frustum(2.0, 2.0, 4.0, 16, 1);
        mesh.translate(Vector3::new(0.0, 10.0, 0.0));
        // top cap at y = 12
        assert_relative_eq!(intersect_mesh(&down(0.2, 0.9), &mesh).unwrap(), 88.0, epsilon = 1e-5);
        assert!(intersect_mesh(&down(5.0, 0.0), &mesh).is_none());
    }

    #[test]
    fn test_aabb_slab() {
        let bounds = Aabb {
            min: Point3::new(-1.0, 0.0, -1.0),
            max: Point3::new(1.0, 2.0, 1.0),
        };
        assert!(down(0.0, 0.0).hits_aabb(&bounds));
        assert!(!down(3.0, 0.0).hits_aabb(&bounds));
        let behind = Ray::new(Point3::new(0.0, -5.0, 0.0), -Vector3::y()).unwrap();
        assert!(!behind.hits_aabb(&bounds));
    }

    #[test]
    fn test_rotated_frame() {
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::x()).unwrap();
        let local = ray.into_rotated_frame(&Point3::origin(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(local.origin, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(local.direction, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_screen_center_looks_at_target() {
        let camera = Camera {
            position: [0.0, 100.0, 0.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 90.0,
            aspect: 2.0,
            near: 1.0,
            far: 5000.0,
        };
        let center = Ray::from_screen(Point2::new(0.0, 0.0), &camera);
        assert_relative_eq!(center.direction, -Vector3::y(), epsilon = 1e-12);

        // top-right corner at 90 degrees: one unit north and two east per unit down
        let corner = Ray::from_screen(Point2::new(1.0, 1.0), &camera);
        let hit = corner.at(100.0 / -corner.direction.y);
        assert_relative_eq!(hit.x, 200.0, epsilon = 1e-9);
        assert_relative_eq!(hit.z, -100.0, epsilon = 1e-9);
    }
}
