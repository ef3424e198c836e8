#![forbid(unsafe_code)]
//! Cluedle browser persistence
//!
//! Anonymous-player identity and statistics persistence for the Cluedle
//! daily guessing game. A player identifier is spread across three storage
//! tiers with different durability properties (localStorage, a long-lived
//! cookie reinforced by a server round-trip, and IndexedDB); per-day game
//! records and aggregate statistics live in the primary tier; and when local
//! aggregates are gone but an identifier survives in a backup tier, the
//! recovery coordinator rebuilds them from server-held history.
//!
//! Browser-backed code is gated to `wasm32`; the orchestration layers are
//! written against the [`storage::StorageTier`], [`stats_store::KvStore`]
//! and [`api::StatsApi`] seams and test natively with in-memory doubles.

pub mod api;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod endpoints;
pub mod identity;
pub mod recovery;
pub mod stats_store;
pub mod storage;

// Re-export the types a caller wires together on page load
pub use api::{ApiError, StatsApi};
pub use identity::{BackupProbe, IdentityManager};
pub use recovery::{RecoveryCoordinator, RecoveryFailure, RecoveryOutcome};
pub use stats_store::{KvStore, StatsStore};
pub use storage::{StorageTier, Tiers};
