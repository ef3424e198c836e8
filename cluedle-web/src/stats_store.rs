//! Local statistics persistence over the primary tier
//!
//! Keyed JSON records in localStorage: one daily statistics record, one
//! archive statistics record, and one game-state record per day number.
//! Reads never throw: malformed JSON and day-number mismatches are treated
//! as absence and self-heal on the next write.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;

use cluedle_stats::{ArchiveStatistics, GameState, Statistics};

/// Daily statistics record key.
pub const STATS_KEY: &str = "cluedle.stats";
/// Archive statistics record key.
pub const ARCHIVE_STATS_KEY: &str = "cluedle.archive-stats";
/// Per-day game state keys are `"{GAME_STATE_PREFIX}.{day}"`. The bare
/// prefix is the legacy single-slot record discarded by migration.
pub const GAME_STATE_PREFIX: &str = "cluedle.game-state";

/// Synchronous string key-value contract of the primary tier, as the
/// statistics store consumes it.
pub trait KvStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> bool;
    fn remove_item(&self, key: &str);
}

/// In-memory `KvStore` for tests and non-browser targets.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    /// Seed a raw value, bypassing the store's validation on the way in.
    pub fn seed(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.into(), value.into());
    }

    /// Raw stored value, bypassing the store's defaulting on the way out.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }
}

impl KvStore for MemoryKv {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> bool {
        self.map.borrow_mut().insert(key.into(), value.into());
        true
    }

    fn remove_item(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}

/// Read/modify/write statistics store. The UI goes through these functions
/// only; direct key access would bypass validation and defaulting.
pub struct StatsStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> StatsStore<K> {
    /// Build the store and run the one-time legacy migration: a pre-existing
    /// single-slot game-state record is discarded rather than remapped,
    /// since the day it belonged to cannot be reliably recovered.
    pub fn new(kv: K) -> Self {
        kv.remove_item(GAME_STATE_PREFIX);
        Self { kv }
    }

    /// The stored record for `day`, or `None` when absent, malformed, or
    /// stored under the wrong day key.
    pub fn game_state(&self, day: u32) -> Option<GameState> {
        let key = game_state_key(day);
        let state: GameState = self.read_json(&key)?;
        if state.belongs_to(day) {
            Some(state)
        } else {
            log::warn!(
                "discarding game state under day {day} claiming day {}",
                state.day_number
            );
            self.kv.remove_item(&key);
            None
        }
    }

    pub fn save_game_state(&self, state: &GameState) -> bool {
        self.write_json(&game_state_key(state.day_number), state)
    }

    /// Daily statistics, zero-valued when nothing (valid) is stored.
    pub fn statistics(&self) -> Statistics {
        self.read_json(STATS_KEY).unwrap_or_default()
    }

    pub fn save_statistics(&self, stats: &Statistics) -> bool {
        self.write_json(STATS_KEY, stats)
    }

    /// Archive statistics, zero-valued when nothing (valid) is stored.
    pub fn archive_statistics(&self) -> ArchiveStatistics {
        self.read_json(ARCHIVE_STATS_KEY).unwrap_or_default()
    }

    pub fn save_archive_statistics(&self, stats: &ArchiveStatistics) -> bool {
        self.write_json(ARCHIVE_STATS_KEY, stats)
    }

    /// Fold one completed daily game into the stored statistics and return
    /// the updated record.
    pub fn record_result(&self, won: bool, guess_count: u32, day: u32) -> Statistics {
        let mut stats = self.statistics();
        stats.record_result(won, guess_count, day);
        self.save_statistics(&stats);
        stats
    }

    /// Archive-play variant: no streaks, no day linkage.
    pub fn record_archive_result(&self, won: bool, guess_count: u32) -> ArchiveStatistics {
        let mut stats = self.archive_statistics();
        stats.record_result(won, guess_count);
        self.save_archive_statistics(&stats);
        stats
    }

    /// Accumulate per-guess timing; called once per submitted guess.
    pub fn record_guess_time(&self, seconds: f64) -> Statistics {
        let mut stats = self.statistics();
        stats.record_guess_time(seconds);
        self.save_statistics(&stats);
        stats
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.kv.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("treating malformed record under {key} as absent: {err}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.kv.set_item(key, &raw),
            Err(err) => {
                log::warn!("failed to serialize record for {key}: {err}");
                false
            }
        }
    }
}

fn game_state_key(day: u32) -> String {
    format!("{GAME_STATE_PREFIX}.{day}")
}
