// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capped cylinders and cone frustums around the vertical axis

use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

/// Build a capped frustum centred on the origin, axis along +Y.
///
/// The solid spans `-height / 2..height / 2`. A zero radius omits that cap.
/// Segment counts below the minimum (3 radial, 1 vertical) are raised to it.
pub fn create_frustum(
    top_radius: f64,
    bottom_radius: f64,
    height: f64,
    radial_segments: usize,
    height_segments: usize,
) -> Mesh {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half = height / 2.0;

    let side_vertices = (rows + 1) * (radial + 1);
    let cap_vertices = 2 * (radial * 2);
    let mut mesh = Mesh::with_capacity(side_vertices + cap_vertices, (rows * radial + radial * 2) * 6);

    // Slope of the side in the radial direction
    let slope = (bottom_radius - top_radius) / height;

    for row in 0..=rows {
        let v = row as f64 / rows as f64;
        let radius = v * (bottom_radius - top_radius) + top_radius;
        let y = half - v * height;

        for col in 0..=radial {
            let theta = col as f64 / radial as f64 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vector3::new(sin, slope, cos)
                .try_normalize(1e-12)
                .unwrap_or_else(|| Vector3::new(sin, 0.0, cos));
            mesh.add_vertex(Point3::new(radius * sin, y, radius * cos), normal);
        }
    }

    let stride = (radial + 1) as u32;
    for row in 0..rows as u32 {
        for col in 0..radial as u32 {
            let a = row * stride + col;
            let b = (row + 1) * stride + col;
            let c = (row + 1) * stride + col + 1;
            let d = row * stride + col + 1;
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }

    if top_radius > 0.0 {
        create_cap(&mut mesh, top_radius, half, radial, true);
    }
    if bottom_radius > 0.0 {
        create_cap(&mut mesh, bottom_radius, -half, radial, false);
    }

    mesh
}

fn create_cap(mesh: &mut Mesh, radius: f64, y: f64, radial: usize, top: bool) {
    let normal = if top { Vector3::y() } else { -Vector3::y() };
    let center = mesh.vertex_count() as u32;
    mesh.add_vertex(Point3::new(0.0, y, 0.0), normal);

    let ring_start = center + 1;
    for col in 0..=radial {
        let theta = col as f64 / radial as f64 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.add_vertex(Point3::new(radius * sin, y, radius * cos), normal);
    }

    for col in 0..radial as u32 {
        let (i0, i1) = (ring_start + col, ring_start + col + 1);
        if top {
            mesh.add_triangle(center, i0, i1);
        } else {
            mesh.add_triangle(center, i1, i0);
        }
    }
}
