// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding geodata payloads
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed Overpass payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown material class: {0}")]
    UnknownMaterialClass(String),
}
