// SPDX-License-Identifier: MIT

//! CO2e estimator client.
//!
//! The estimator is an external lookup keyed by (category, quantity).
//! It is advisory: any failure — unknown category, timeout, bad payload —
//! degrades to a zero estimate with a warning, so a flaky estimator can
//! never block submissions.

use std::time::Duration;

use serde::Deserialize;

use crate::models::Category;

/// Bounded wait for the estimator; past this we take the zero estimate.
const ESTIMATE_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the CO2e estimation service.
#[derive(Clone)]
pub struct EstimatorService {
    http: reqwest::Client,
    /// None in offline/test mode: every estimate degrades to zero.
    base_url: Option<String>,
}

#[derive(Deserialize)]
struct EstimateResponse {
    co2e_kg: f64,
}

impl EstimatorService {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.trim_end_matches('/').to_string()),
        }
    }

    /// Offline client for tests; always returns the zero estimate.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
        }
    }

    /// Estimate kilograms of CO2e for a quantity of activity in a
    /// category. Infallible by contract; degraded results are logged.
    pub async fn estimate(&self, category: Category, quantity: f64) -> f64 {
        if category == Category::Unknown {
            tracing::warn!(quantity, "Unmapped activity category, using zero CO2e estimate");
            return 0.0;
        }

        let Some(base_url) = &self.base_url else {
            return 0.0;
        };

        let url = format!("{}/estimate", base_url);
        let result = self
            .http
            .get(&url)
            .timeout(ESTIMATE_TIMEOUT)
            .query(&[
                ("category", category.estimator_key().to_string()),
                ("quantity", quantity.to_string()),
            ])
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    category = category.estimator_key(),
                    error = %e,
                    "CO2e estimator unreachable, using zero estimate"
                );
                return 0.0;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                category = category.estimator_key(),
                status = %response.status(),
                "CO2e estimator returned an error, using zero estimate"
            );
            return 0.0;
        }

        match response.json::<EstimateResponse>().await {
            Ok(body) if body.co2e_kg.is_finite() => body.co2e_kg.max(0.0),
            Ok(_) => {
                tracing::warn!(
                    category = category.estimator_key(),
                    "CO2e estimator returned a non-finite value, using zero estimate"
                );
                0.0
            }
            Err(e) => {
                tracing::warn!(
                    category = category.estimator_key(),
                    error = %e,
                    "CO2e estimator returned an unparseable body, using zero estimate"
                );
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_estimator_returns_zero() {
        let estimator = EstimatorService::new_mock();
        assert_eq!(estimator.estimate(Category::Transportation, 12.0).await, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_category_short_circuits_to_zero() {
        // Unreachable base URL: proves the Unknown branch never makes a request.
        let estimator = EstimatorService::new("http://0.0.0.0:1");
        assert_eq!(estimator.estimate(Category::Unknown, 5.0).await, 0.0);
    }
}
