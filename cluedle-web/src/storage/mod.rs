//! Tiered key-value storage for the player identifier
//!
//! Three independent backends sit behind one contract: localStorage
//! (primary, fast, synchronous), a long-lived cookie reinforced by a server
//! round-trip (secondary, survives localStorage clearing), and IndexedDB
//! (tertiary, separate failure domain). Each tier can fail on its own;
//! readers treat corruption or unavailability as absence.
use async_trait::async_trait;
use std::rc::Rc;

mod memory;
pub use memory::MemoryTier;

#[cfg(target_arch = "wasm32")]
mod cookie;
#[cfg(target_arch = "wasm32")]
mod indexed;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use cookie::CookieTier;
#[cfg(target_arch = "wasm32")]
pub use indexed::IndexedDbTier;
#[cfg(target_arch = "wasm32")]
pub use local::{LocalKv, LocalTier};

/// localStorage key holding the player identifier (primary tier).
pub const PLAYER_ID_KEY: &str = "cluedle.player-id";
/// Cookie name holding the player identifier (secondary tier).
pub const PLAYER_ID_COOKIE: &str = "cluedle_player_id";
/// IndexedDB database, object store and record key (tertiary tier).
pub const IDB_NAME: &str = "cluedle";
pub const IDB_STORE: &str = "identity";
pub const IDB_KEY: &str = "player-id";

/// Identifier cookie lifetime: one year.
pub const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Uniform contract every tier implements. Futures here are not `Send`
/// (browser storage handles are thread-bound), hence `?Send`.
#[async_trait(?Send)]
pub trait StorageTier {
    /// Stable tier name for logging.
    fn name(&self) -> &'static str;

    /// Read the stored value. Corrupt or unavailable content surfaces as
    /// `None`, never as an error.
    async fn get(&self) -> Option<String>;

    /// Store the value. Returns whether the write is known to have landed;
    /// callers treat `false` as reduced durability, not as failure.
    async fn set(&self, value: &str) -> bool;
}

/// The three tiers the identity manager resolves across, cheapest first.
pub struct Tiers {
    pub primary: Rc<dyn StorageTier>,
    pub secondary: Rc<dyn StorageTier>,
    pub tertiary: Rc<dyn StorageTier>,
}

impl Tiers {
    /// Production wiring: localStorage, cookie + durability endpoint,
    /// IndexedDB.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn browser() -> Self {
        Self {
            primary: Rc::new(LocalTier::new(PLAYER_ID_KEY)),
            secondary: Rc::new(CookieTier::new(PLAYER_ID_COOKIE)),
            tertiary: Rc::new(IndexedDbTier::new(IDB_NAME, IDB_STORE, IDB_KEY)),
        }
    }
}

/// Serialize a cookie assignment for the secondary tier: long-lived,
/// same-site, readable from script (the backfill path needs to read it).
#[must_use]
pub fn format_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax")
}

/// Pull one cookie's value out of a `document.cookie` jar string.
#[must_use]
pub fn read_cookie(jar: &str, name: &str) -> Option<String> {
    jar.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_cookie, read_cookie};

    #[test]
    fn cookie_assignment_carries_durability_attributes() {
        let cookie = format_cookie("cluedle_player_id", "abc-123");
        assert!(cookie.starts_with("cluedle_player_id=abc-123;"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("HttpOnly"));
    }

    #[test]
    fn reads_value_out_of_a_jar() {
        let jar = "theme=dark; cluedle_player_id=abc-123;other=1";
        assert_eq!(
            read_cookie(jar, "cluedle_player_id").as_deref(),
            Some("abc-123")
        );
        assert_eq!(read_cookie(jar, "theme").as_deref(), Some("dark"));
        assert_eq!(read_cookie(jar, "missing"), None);
        assert_eq!(read_cookie("", "cluedle_player_id"), None);
    }
}
