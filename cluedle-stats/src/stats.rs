//! Aggregate player statistics and their update rules
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution of guess counts across won games. Keys are the number of
/// guesses a win took; values are how many wins took that many guesses.
/// Losses never appear here.
pub type GuessDistribution = BTreeMap<u32, u32>;

/// Daily-cadence player statistics.
///
/// Every field only ever grows (or, for `current_streak`, resets to zero on
/// a loss); the sole exception is [`Statistics::reset`]. Absence of
/// `last_played_day` means the player has never completed a daily puzzle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub guess_distribution: GuessDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played_day: Option<u32>,
    /// Accumulated seconds spent between guess submissions.
    pub total_guess_time: f64,
    /// Number of guesses submitted, win or lose.
    pub total_guess_count: u32,
}

impl Statistics {
    /// Fold one completed daily game into the aggregates.
    ///
    /// A win extends the streak and records the guess count in the
    /// distribution; a loss zeroes the current streak. `last_played_day` is
    /// always advanced to `day`.
    pub fn record_result(&mut self, won: bool, guess_count: u32, day: u32) {
        self.games_played += 1;
        self.last_played_day = Some(day);
        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
            *self.guess_distribution.entry(guess_count).or_insert(0) += 1;
        } else {
            self.current_streak = 0;
        }
    }

    /// Accumulate time spent on one submitted guess. Called once per guess
    /// regardless of outcome.
    pub fn record_guess_time(&mut self, seconds: f64) {
        self.total_guess_time += seconds;
        self.total_guess_count += 1;
    }

    /// Fraction of played games that were won, in `[0, 1]`. Zero when no
    /// games have been played.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }

    /// Wipe everything back to the zero-valued default. The only permitted
    /// non-monotonic transition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Statistics for archive (backfill) play against past puzzles.
///
/// Archive games are out of daily sequence, so streaks and day linkage are
/// intentionally absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveStatistics {
    pub games_played: u32,
    pub games_won: u32,
    pub guess_distribution: GuessDistribution,
}

impl ArchiveStatistics {
    /// Fold one completed archive game into the aggregates.
    pub fn record_result(&mut self, won: bool, guess_count: u32) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
            *self.guess_distribution.entry(guess_count).or_insert(0) += 1;
        }
    }

    /// Wipe everything back to the zero-valued default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
