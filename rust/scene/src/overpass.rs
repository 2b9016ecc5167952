// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overpass API client with bounded retry.

use crate::config::OverpassConfig;
use crate::error::{Error, Result};
use citymesh_core::{parse_elements, Element};
use std::time::Duration;

/// Geodata client.
pub struct OverpassClient {
    config: OverpassConfig,
    http: reqwest::Client,
}

impl OverpassClient {
    /// Create a client; fails only if the TLS backend cannot be initialised.
    pub fn new(config: OverpassConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Fetch every element in the configured window.
    ///
    /// Retries up to `max_attempts` times. A 504 waits `attempt x gateway_backoff`,
    /// any other failure waits `attempt x failure_backoff`. Once the budget is
    /// spent the result is empty: no buildings is a valid outcome.
    pub async fn fetch_elements(&self) -> Vec<Element> {
        let query = self.config.query();
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let error = match self.try_fetch(&query).await {
                Ok(elements) => {
                    tracing::info!(attempt, elements = elements.len(), "Fetched geodata");
                    return elements;
                }
                Err(e) => e,
            };

            if error.is_gateway_timeout() && attempt < max_attempts {
                let delay = self.config.gateway_backoff * attempt;
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "Gateway timeout, retrying");
                sleep(delay).await;
                continue;
            }

            if attempt == max_attempts {
                tracing::warn!(
                    error = %error,
                    attempts = max_attempts,
                    "Geodata fetch exhausted, continuing without buildings"
                );
                return Vec::new();
            }

            let delay = self.config.failure_backoff * attempt;
            tracing::warn!(
                error = %error,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Geodata fetch failed, retrying"
            );
            sleep(delay).await;
        }

        Vec::new()
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<Element>> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .form(&[("data", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(parse_elements(&body)?)
    }
}

async fn sleep(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
