// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Pointer position to pick at.
#[derive(Debug, Clone, Deserialize)]
pub struct PickRequest {
    /// Normalized device x, -1 (left) to 1 (right).
    pub x: f64,
    /// Normalized device y, -1 (bottom) to 1 (top).
    pub y: f64,
    /// Viewport width over height.
    #[serde(default)]
    pub aspect: Option<f64>,
}

impl PickRequest {
    /// Reject positions outside the viewport.
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |v: f64| v.is_finite() && (-1.0..=1.0).contains(&v);
        if !in_range(self.x) || !in_range(self.y) {
            return Err(format!("pointer ({}, {}) is outside [-1, 1]", self.x, self.y));
        }
        if let Some(aspect) = self.aspect {
            if !aspect.is_finite() || aspect <= 0.0 {
                return Err(format!("aspect must be positive, got {aspect}"));
            }
        }
        Ok(())
    }
}

/// Query for the scene summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub aspect: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let ok = PickRequest { x: 0.5, y: -1.0, aspect: None };
        assert!(ok.validate().is_ok());

        let outside = PickRequest { x: 1.5, y: 0.0, aspect: None };
        assert!(outside.validate().is_err());

        let nan = PickRequest { x: f64::NAN, y: 0.0, aspect: None };
        assert!(nan.validate().is_err());

        let flat = PickRequest { x: 0.0, y: 0.0, aspect: Some(0.0) };
        assert!(flat.validate().is_err());
    }
}
