//! Secondary tier: durable cookie plus server round-trip
//!
//! Every write takes two independent paths: a direct `document.cookie`
//! assignment, and a POST to the durability endpoint which re-sets the same
//! cookie via a response header. Some browsers silently expire cookies
//! written only from script, so the server path is what makes this tier
//! durable. Failure of either path degrades durability, not correctness.
use async_trait::async_trait;

use super::{StorageTier, format_cookie, read_cookie};
use crate::{dom, endpoints};

pub struct CookieTier {
    name: &'static str,
}

impl CookieTier {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait(?Send)]
impl StorageTier for CookieTier {
    fn name(&self) -> &'static str {
        "cookie"
    }

    async fn get(&self) -> Option<String> {
        let jar = dom::html_document()?.cookie().ok()?;
        read_cookie(&jar, self.name).filter(|value| !value.is_empty())
    }

    async fn set(&self, value: &str) -> bool {
        let wrote = dom::html_document()
            .is_some_and(|doc| doc.set_cookie(&format_cookie(self.name, value)).is_ok());
        if !wrote {
            log::warn!("cookie tier: direct cookie write failed");
        }

        let body = serde_json::json!({ "hash": value });
        match gloo::net::http::Request::post(&endpoints::player_id_url()).json(&body) {
            Ok(request) => {
                if let Err(err) = request.send().await {
                    log::warn!("cookie tier: durability round-trip failed: {err}");
                }
            }
            Err(err) => log::warn!("cookie tier: durability request build failed: {err}"),
        }

        // Neither path's failure is reported to the caller.
        true
    }
}
