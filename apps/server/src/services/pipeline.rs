// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup pipeline: textures, then geodata, then composition.

use citymesh_scene::{
    MaterialResolver, OverpassClient, Scene, SceneComposer, SceneConfig, TextureLibrary,
};
use std::sync::Arc;
use std::time::Instant;

/// Build the scene once.
///
/// Composition waits for every texture load to settle so no solid picks up
/// a half-populated material. A failed fetch still yields a scene holding
/// only the landmark.
pub async fn build_scene(config: &SceneConfig) -> citymesh_scene::Result<Scene> {
    let start = Instant::now();

    let client = OverpassClient::new(config.overpass.clone())?;
    let (library, elements) = tokio::join!(
        TextureLibrary::load_all(&config.texture_root),
        client.fetch_elements()
    );
    tracing::info!(
        texture_classes = library.len(),
        elements = elements.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Inputs ready"
    );

    let mut resolver = MaterialResolver::new(Arc::new(library));
    let mut rng = config.rng();
    let scene = SceneComposer::new(config).compose(elements, &mut resolver, &mut rng);

    tracing::info!(
        solids = scene.len(),
        buildings = scene.building_count(),
        total_ms = start.elapsed().as_millis() as u64,
        "Scene ready"
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use citymesh_scene::OverpassConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_endpoint_keeps_landmark() {
        let dir = std::env::temp_dir().join("citymesh-server-no-textures");
        let config = SceneConfig {
            overpass: OverpassConfig {
                endpoint: "http://127.0.0.1:9/api/interpreter".into(),
                max_attempts: 1,
                request_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            texture_root: dir,
            seed: Some(3),
            ..Default::default()
        };

        let scene = build_scene(&config).await.unwrap();
        assert_eq!(scene.building_count(), 0);
        assert_eq!(scene.len(), 6);
    }
}
