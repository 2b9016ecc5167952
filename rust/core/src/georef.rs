// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic reference and local projection
//!
//! Maps WGS84 latitude/longitude into a planar metric frame centred on a
//! fixed origin using an equirectangular approximation. The approximation is
//! only meant for a district-sized area (a few kilometres); farther points
//! are still projected but accuracy degrades without any error.

use serde::{Deserialize, Serialize};

/// Earth radius used by the projection (WGS84 semi-major axis, metres)
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Raw WGS84 coordinate as delivered by the geodata service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Planar coordinate relative to the projection origin.
///
/// `x` grows eastward and `z` northward, both in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub z: f64,
}

impl LocalPoint {
    #[inline]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another local point
    #[inline]
    pub fn distance(&self, other: &LocalPoint) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

/// Equirectangular projector anchored at a session-wide origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    origin: GeoPoint,
    meters_per_lat: f64,
    meters_per_lon: f64,
}

impl Projector {
    /// Create a projector for the given origin
    pub fn new(origin: GeoPoint) -> Self {
        let meters_per_lat = 2.0 * std::f64::consts::PI * EARTH_RADIUS / 360.0;
        let meters_per_lon = origin.latitude.to_radians().cos() * meters_per_lat;
        Self {
            origin,
            meters_per_lat,
            meters_per_lon,
        }
    }

    #[inline]
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Metres covered by one degree of latitude
    #[inline]
    pub fn meters_per_lat(&self) -> f64 {
        self.meters_per_lat
    }

    /// Metres covered by one degree of longitude at the origin latitude
    #[inline]
    pub fn meters_per_lon(&self) -> f64 {
        self.meters_per_lon
    }

    /// Project a geographic point into the local frame.
    ///
    /// NaN coordinates propagate into the result untouched.
    #[inline]
    pub fn project(&self, point: GeoPoint) -> LocalPoint {
        LocalPoint {
            x: (point.longitude - self.origin.longitude) * self.meters_per_lon,
            z: (point.latitude - self.origin.latitude) * self.meters_per_lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ORIGIN: GeoPoint = GeoPoint::new(44.81806, 20.40520);

    #[test]
    fn test_origin_projects_to_zero() {
        let projector = Projector::new(ORIGIN);
        let local = projector.project(ORIGIN);
        assert_eq!(local, LocalPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_axes_point_east_and_north() {
        let projector = Projector::new(ORIGIN);
        let north_east = projector.project(GeoPoint::new(44.8190, 20.4060));
        assert!(north_east.x > 0.0);
        assert!(north_east.z > 0.0);

        let south_west = projector.project(GeoPoint::new(44.8170, 20.4040));
        assert!(south_west.x < 0.0);
        assert!(south_west.z < 0.0);
    }

    #[test]
    fn test_degree_scales() {
        let projector = Projector::new(ORIGIN);
        // 2 * pi * 6378137 / 360
        assert_relative_eq!(projector.meters_per_lat(), 111_319.490_793, epsilon = 1e-3);
        assert_relative_eq!(
            projector.meters_per_lon(),
            projector.meters_per_lat() * 44.81806_f64.to_radians().cos(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_one_millidegree_north() {
        let projector = Projector::new(ORIGIN);
        let local = projector.project(GeoPoint::new(ORIGIN.latitude + 0.001, ORIGIN.longitude));
        assert_relative_eq!(local.x, 0.0);
        assert_relative_eq!(local.z, 111.319_490_793, epsilon = 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        let projector = Projector::new(ORIGIN);
        let local = projector.project(GeoPoint::new(f64::NAN, 20.4));
        assert!(local.z.is_nan());
        assert!(local.x.is_finite());
    }
}
