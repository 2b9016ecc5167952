// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene construction and animation services.

pub mod pipeline;
pub mod ticker;

pub use pipeline::build_scene;
pub use ticker::spawn_ticker;
