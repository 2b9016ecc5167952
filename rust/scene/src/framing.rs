// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene bounds and initial camera placement

use nalgebra::{Point3, Vector3};
use serde::Serialize;

pub const DEFAULT_FOV_DEG: f64 = 75.0;
pub const DEFAULT_NEAR: f64 = 1.0;
pub const DEFAULT_FAR: f64 = 5000.0;

/// Horizontal extent below which framing does not zoom in further
pub const MIN_FRAMED_EXTENT: f64 = 1000.0;

/// Distance multiplier leaving a margin around the framed extent
const FRAMING_MARGIN: f64 = 1.5;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Inverted box that any point extends
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_f32(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self {
            min: min.cast(),
            max: max.cast(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        if other.is_empty() {
            return *self;
        }
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Centre, or the origin for an empty box
    pub fn center(&self) -> Point3<f64> {
        if self.is_empty() {
            return Point3::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent per axis, zero for an empty box
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb::empty()
    }
}

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Look straight down on `bounds` from high enough to see all of it.
    ///
    /// The framed extent is the larger horizontal side, but never less than
    /// [`MIN_FRAMED_EXTENT`].
    pub fn frame(bounds: &Aabb, aspect: f64) -> Self {
        let center = bounds.center();
        let size = bounds.size();
        let max_dim = size.x.max(size.z).max(MIN_FRAMED_EXTENT);

        let half_fov = DEFAULT_FOV_DEG.to_radians() / 2.0;
        let distance = (max_dim / 2.0) / half_fov.tan() * FRAMING_MARGIN;

        Self {
            position: [center.x, distance, center.z],
            target: [center.x, center.y, center.z],
            fov_deg: DEFAULT_FOV_DEG,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn eye(&self) -> Point3<f64> {
        Point3::from(self.position)
    }

    pub fn look_at(&self) -> Point3<f64> {
        Point3::from(self.target)
    }

    /// Unit view vector
    pub fn forward(&self) -> Vector3<f64> {
        (self.look_at() - self.eye())
            .try_normalize(1e-12)
            .unwrap_or_else(|| -Vector3::y())
    }

    /// Screen-right and screen-up directions in world space.
    ///
    /// Looking straight down, screen right is east and screen up is north.
    pub fn basis(&self) -> (Vector3<f64>, Vector3<f64>) {
        let forward = self.forward();
        let right = forward
            .cross(&Vector3::y())
            .try_normalize(1e-9)
            .unwrap_or_else(Vector3::x);
        let up = right.cross(&forward);
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_scene_uses_minimum_extent() {
        let bounds = Aabb {
            min: Point3::new(-10.0, 0.0, -10.0),
            max: Point3::new(10.0, 30.0, 10.0),
        };
        let camera = Camera::frame(&bounds, 1.5);
        let expected = 500.0 / (37.5f64).to_radians().tan() * 1.5;
        assert_relative_eq!(camera.position[1], expected, epsilon = 1e-9);
        assert_eq!(camera.position[0], 0.0);
        assert_eq!(camera.far, 5000.0);
    }

    #[test]
    fn test_large_scene_frames_longest_side() {
        let bounds = Aabb {
            min: Point3::new(0.0, 0.0, -400.0),
            max: Point3::new(2000.0, 50.0, 400.0),
        };
        let camera = Camera::frame(&bounds, 1.0);
        let expected = 1000.0 / (37.5f64).to_radians().tan() * 1.5;
        assert_relative_eq!(camera.position[1], expected, epsilon = 1e-9);
        assert_relative_eq!(camera.position[0], 1000.0);
        assert_relative_eq!(camera.target[1], 25.0);
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Aabb::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.center(), Point3::origin());
        assert_eq!(bounds.size(), Vector3::zeros());

        let unit = Aabb {
            min: Point3::origin(),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        assert_eq!(bounds.union(&unit), unit);
    }

    #[test]
    fn test_top_down_basis() {
        let camera = Camera::frame(&Aabb::empty(), 1.0);
        let (right, up) = camera.basis();
        assert_relative_eq!(right, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(up, -Vector3::z(), epsilon = 1e-12);
    }
}
