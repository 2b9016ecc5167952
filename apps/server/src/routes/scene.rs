// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene inspection and picking endpoints.

use crate::error::ApiError;
use crate::types::{MeshData, PickRequest, SceneResponse, SolidResponse, ViewQuery};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use citymesh_geometry::Point2;
use citymesh_scene::{PickInfo, Ray, SolidId};

/// Viewport aspect assumed when a request does not name one.
const DEFAULT_ASPECT: f64 = 16.0 / 9.0;

fn aspect_or_default(aspect: Option<f64>) -> f64 {
    aspect
        .filter(|a| a.is_finite() && *a > 0.0)
        .unwrap_or(DEFAULT_ASPECT)
}

/// GET /api/v1/scene - Scene summary.
pub async fn get_scene(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<SceneResponse> {
    let scene = state.scene.read().await;
    Json(SceneResponse::from_scene(
        &scene,
        aspect_or_default(query.aspect),
        state.config.tick_hz,
    ))
}

/// GET /api/v1/solids/:id - Detail of one solid.
pub async fn get_solid(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<SolidResponse>, ApiError> {
    let scene = state.scene.read().await;
    let id = SolidId(id);
    let solid = scene
        .solid(id)
        .ok_or_else(|| ApiError::NotFound(format!("solid {id}")))?;
    Ok(Json(SolidResponse::new(solid, scene.annotation(id))))
}

/// GET /api/v1/solids/:id/mesh - Geometry of one solid in its current pose.
pub async fn get_solid_mesh(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<MeshData>, ApiError> {
    let scene = state.scene.read().await;
    let id = SolidId(id);
    let solid = scene
        .solid(id)
        .ok_or_else(|| ApiError::NotFound(format!("solid {id}")))?;
    let mesh = MeshData::from_solid(solid);
    tracing::debug!(
        solid = %id,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Serving mesh"
    );
    Ok(Json(mesh))
}

/// POST /api/v1/pick - Nearest solid under a pointer.
///
/// The ray is cast from the scene's initial camera.
pub async fn pick(
    State(state): State<AppState>,
    Json(request): Json<PickRequest>,
) -> Result<Json<PickInfo>, ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let scene = state.scene.read().await;
    let camera = scene.camera(aspect_or_default(request.aspect));
    let ray = Ray::from_screen(Point2::new(request.x, request.y), &camera);

    match scene.pick(&ray) {
        Some(info) => {
            tracing::debug!(distance = info.distance(), "Pick hit");
            Ok(Json(info))
        }
        None => Err(ApiError::NotFound(format!(
            "nothing under ({}, {})",
            request.x, request.y
        ))),
    }
}
