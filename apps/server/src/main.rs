// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Citymesh Server - extruded OpenStreetMap buildings over HTTP.
//!
//! On startup the server loads texture layers, fetches building ways for
//! the configured bounding box and composes one scene, landmark included.
//! The scene then keeps ticking so rotating modules advance between
//! requests.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/scene` - Counts, bounds, initial camera and rotation state
//! - `GET /api/v1/solids/:id` - Source, material and extrusion of one solid
//! - `GET /api/v1/solids/:id/mesh` - Geometry and current transform of one solid
//! - `POST /api/v1/pick` - Nearest solid under a pointer position

use axum::{
    routing::{get, post},
    Router,
};
use citymesh_scene::Scene;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub scene: Arc<RwLock<Scene>>,
    pub config: Arc<Config>,
}

/// All routes with their middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        .route("/api/v1/scene", get(routes::scene::get_scene))
        .route("/api/v1/solids/:id", get(routes::scene::get_solid))
        .route("/api/v1/solids/:id/mesh", get(routes::scene::get_solid_mesh))
        .route("/api/v1/pick", post(routes::scene::pick))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "info,tower_http=debug,citymesh_server=debug,citymesh_scene=debug".into()
        }))
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        overpass_url = %config.overpass_url,
        bbox = %config.bbox.to_overpass(),
        texture_dir = %config.texture_dir.display(),
        tick_hz = config.tick_hz,
        "Starting Citymesh Server"
    );

    let scene = services::build_scene(&config.scene_config()).await?;
    let scene = Arc::new(RwLock::new(scene));
    let _ticker = services::spawn_ticker(scene.clone(), config.tick_hz);

    let state = AppState {
        scene,
        config: Arc::new(config.clone()),
    };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
