// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stay inside a component; callers of the public entry points
/// see a degraded value instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geodata request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geodata endpoint returned status {0}")]
    Status(u16),

    #[error("Invalid geodata payload: {0}")]
    Payload(#[from] citymesh_core::Error),

    #[error("Failed to read texture {path}: {source}")]
    TextureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode texture {path}: {source}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}

impl Error {
    /// Upstream gateway timeout, retried on the short backoff
    pub fn is_gateway_timeout(&self) -> bool {
        matches!(self, Error::Status(504))
    }
}
