//! Helpers for constructing aggregation-service URLs that respect the
//! deployment base path.
/// When `CLUEDLE_API_BASE` is set at compile time (e.g. `/play` when the
/// game is hosted under a subdirectory), generated URLs are prefixed
/// accordingly. Local builds without it fall back to root-anchored paths.
#[must_use]
pub fn api_path(relative: &str) -> String {
    api_path_with_base(relative, option_env!("CLUEDLE_API_BASE").unwrap_or(""))
}

/// URL of the statistics-recovery endpoint for `hash`.
///
/// The hash must already have passed format validation
/// (`^[A-Za-z0-9-]{1,50}$`), which also makes it URL-safe.
#[must_use]
pub fn player_stats_url(hash: &str) -> String {
    format!("{}?hash={hash}", api_path("api/player-stats"))
}

/// URL of the identifier durability endpoint.
#[must_use]
pub fn player_id_url() -> String {
    api_path("api/player-id")
}

fn api_path_with_base(relative: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = relative.trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

#[cfg(test)]
mod tests {
    use super::{api_path, player_id_url, player_stats_url};

    #[test]
    fn builds_root_prefixed_path_when_base_missing() {
        assert_eq!(api_path("api/player-stats"), "/api/player-stats");
        assert_eq!(api_path("/api/player-stats"), "/api/player-stats");
    }

    #[test]
    fn builds_paths_with_configured_base() {
        assert_eq!(
            super::api_path_with_base("api/player-stats", "/play"),
            "/play/api/player-stats"
        );
        assert_eq!(
            super::api_path_with_base("/api/player-stats", "/play/"),
            "/play/api/player-stats"
        );
    }

    #[test]
    fn stats_url_carries_the_hash_query() {
        assert_eq!(
            player_stats_url("abc-123"),
            "/api/player-stats?hash=abc-123"
        );
    }

    #[test]
    fn player_id_url_is_root_anchored_by_default() {
        assert_eq!(player_id_url(), "/api/player-id");
    }
}
