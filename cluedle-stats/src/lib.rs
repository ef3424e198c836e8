//! Cluedle Statistics Core
//!
//! Platform-agnostic player statistics for the Cluedle daily guessing game.
//! This crate provides the persisted record shapes, their monotonic update
//! operations, identifier generation/validation, and the pure aggregation
//! engine that rebuilds statistics from server-held raw history. No browser
//! or platform-specific dependencies live here.

pub mod game;
pub mod ident;
pub mod recover;
pub mod stats;

// Re-export commonly used types
pub use game::{GameState, GuessResult};
pub use ident::{generate_player_id, is_valid_player_id};
pub use recover::{RawGameResult, RecoveredGameState, RecoveredStatistics, aggregate};
pub use stats::{ArchiveStatistics, Statistics};
