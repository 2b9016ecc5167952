// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint -> solid

use crate::materials::{MaterialResolver, ResolvedMaterial};
use citymesh_core::{
    resolve_attributes, ExtrusionSpec, Footprint, FootprintId, Projector, ResolvedAttributes, TagMap,
};
use citymesh_geometry::{extrude_footprint, ClosedRing, Mesh, Point3};
use rand::Rng;
use std::sync::Arc;

/// Back-reference from a solid to the footprint it was built from
#[derive(Debug, Clone)]
pub struct FootprintRef {
    pub footprint_id: FootprintId,
    pub tags: Arc<TagMap>,
}

/// An extruded building ready to be placed in a scene
#[derive(Debug, Clone)]
pub struct BuiltSolid {
    pub mesh: Mesh,
    pub material: Arc<ResolvedMaterial>,
    pub attributes: ResolvedAttributes,
    pub extrusion: ExtrusionSpec,
    pub outline: ClosedRing,
    pub bounds: (Point3<f32>, Point3<f32>),
    pub source: FootprintRef,
}

/// Builds solids in the frame of one projector
#[derive(Debug, Clone, Copy)]
pub struct SolidBuilder {
    projector: Projector,
}

impl SolidBuilder {
    pub fn new(projector: Projector) -> Self {
        Self { projector }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Build one footprint.
    ///
    /// Rings with fewer than three distinct points yield `None` before any
    /// attribute is resolved, so they consume nothing from `rng`.
    pub fn build<R: Rng + ?Sized>(
        &self,
        footprint: &Footprint,
        resolver: &mut MaterialResolver,
        rng: &mut R,
    ) -> Option<BuiltSolid> {
        if !footprint.is_buildable() {
            tracing::debug!(id = footprint.id, points = footprint.ring.len(), "Skipping degenerate footprint");
            return None;
        }

        let ring: Vec<_> = footprint
            .ring
            .iter()
            .map(|point| self.projector.project(*point))
            .collect();

        let attributes = resolve_attributes(&footprint.tags, rng);
        let extruded = extrude_footprint(&ring, &attributes.extrusion)?;
        let material = resolver.resolve(attributes.material_class, &attributes.color);

        let bounds = extruded.mesh.bounds();
        Some(BuiltSolid {
            mesh: extruded.mesh,
            material,
            extrusion: extruded.extrusion,
            outline: extruded.outline,
            bounds,
            attributes,
            source: FootprintRef {
                footprint_id: footprint.id,
                tags: footprint.tags.clone(),
            },
        })
    }
}
