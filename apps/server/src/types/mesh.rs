// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data types for serialization.

use citymesh_scene::SceneSolid;
use serde::Serialize;

/// Geometry of one solid plus the pose to draw it with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshData {
    pub solid_id: u32,
    /// Vertex positions (x, y, z triplets), world space before `transform`.
    pub positions: Vec<f32>,
    /// Vertex normals (x, y, z triplets).
    pub normals: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
    /// Column-major 4x4 world transform.
    pub transform: [f64; 16],
    /// Linear RGB base colour in 0-1 range.
    pub color: [f32; 3],
}

impl MeshData {
    pub fn from_solid(solid: &SceneSolid) -> Self {
        let mut transform = [0.0; 16];
        transform.copy_from_slice(solid.world_transform().as_slice());
        Self {
            solid_id: solid.id.0,
            positions: solid.mesh.positions.clone(),
            normals: solid.mesh.normals.clone(),
            indices: solid.mesh.indices.clone(),
            transform,
            color: solid.material.color.linear_rgb(),
        }
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
