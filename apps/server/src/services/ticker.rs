// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-rate scene animation.

use citymesh_scene::Scene;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Advance `scene` by one tick `hz` times per second until aborted.
pub fn spawn_ticker(scene: Arc<RwLock<Scene>>, hz: u32) -> JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / f64::from(hz.max(1)));
    tokio::spawn(async move {
        let mut ticks = interval(period);
        // a stalled frame is dropped, not replayed
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            scene.write().await.tick();
        }
    })
}
