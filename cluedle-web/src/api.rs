//! Remote aggregation service client
//!
//! One endpoint matters to this subsystem: `GET /player-stats?hash={id}`,
//! which returns server-computed aggregates for an identifier. Status codes
//! carry meaning (404 no history, 429 rate budget exceeded, 5xx failure)
//! and are mapped to a typed error rather than surfaced raw.
use async_trait::async_trait;
use thiserror::Error;

use cluedle_stats::RecoveredStatistics;

/// Fallback when a 429 arrives without a parseable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected before touching the network.
    #[error("identifier fails format validation")]
    InvalidIdentifier,
    #[error("no recorded history for this identifier")]
    NoHistory,
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },
    #[error("aggregation service error (status {status})")]
    Server { status: u16 },
    #[error("network error: {0}")]
    Network(String),
}

/// Seam between the recovery coordinator and the aggregation service.
#[async_trait(?Send)]
pub trait StatsApi {
    /// Fetch server-computed aggregates for `hash`.
    async fn fetch_recovered(&self, hash: &str) -> Result<RecoveredStatistics, ApiError>;
}

/// Production client over the browser fetch API.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchApi;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl StatsApi for FetchApi {
    async fn fetch_recovered(&self, hash: &str) -> Result<RecoveredStatistics, ApiError> {
        if !cluedle_stats::is_valid_player_id(hash) {
            return Err(ApiError::InvalidIdentifier);
        }
        let url = crate::endpoints::player_stats_url(hash);
        let response = gloo::net::http::Request::get(&url)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        match response.status() {
            200 => response
                .json::<RecoveredStatistics>()
                .await
                .map_err(|err| ApiError::Network(err.to_string())),
            404 => Err(ApiError::NoHistory),
            429 => {
                let retry_after_secs = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(ApiError::RateLimited { retry_after_secs })
            }
            status => Err(ApiError::Server { status }),
        }
    }
}
