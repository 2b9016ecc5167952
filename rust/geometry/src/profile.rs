// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Profile definitions and triangulation

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Closed 2D outline in the horizontal plane (x east, y north)
#[derive(Debug, Clone)]
pub struct Profile2D {
    /// Boundary points; the closing edge back to the first point is implicit
    pub outer: Vec<Point2<f64>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self { outer }
    }

    /// Shoelace signed area; positive for counter-clockwise outlines
    pub fn signed_area(&self) -> f64 {
        let n = self.outer.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: f64 = (0..n)
            .map(|i| {
                let p0 = &self.outer[i];
                let p1 = &self.outer[(i + 1) % n];
                p0.x * p1.y - p1.x * p0.y
            })
            .sum();
        twice_area / 2.0
    }

    /// Reverse the outline if it winds clockwise
    pub fn into_counter_clockwise(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.outer.reverse();
        }
        self
    }

    /// Triangulate the profile using earcutr
    /// Returns triangle indices into the outline
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::InvalidProfile(
                "Profile must have at least 3 vertices".to_string(),
            ));
        }
        if self.outer.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidProfile(
                "Profile has non-finite coordinates".to_string(),
            ));
        }

        let mut vertices = Vec::with_capacity(self.outer.len() * 2);
        for p in &self.outer {
            vertices.push(p.x);
            vertices.push(p.y);
        }

        let indices = earcutr::earcut(&vertices, &[], 2)
            .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

        if indices.is_empty() {
            return Err(Error::TriangulationError(
                "Outline produced no triangles".to_string(),
            ));
        }

        Ok(Triangulation {
            points: self.outer.clone(),
            indices,
        })
    }
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Outline vertices
    pub points: Vec<Point2<f64>>,
    /// Triangle indices
    pub indices: Vec<usize>,
}
