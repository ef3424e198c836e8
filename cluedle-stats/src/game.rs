//! Per-day game state records
use serde::{Deserialize, Serialize};

/// Outcome of matching a single guess against the day's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessResult {
    Correct,
    Partial,
    Incorrect,
}

/// State of one day's puzzle for the local player.
///
/// Created on the first guess of a day and immutable once `is_complete`,
/// except for the late-arriving `first_solver` flag which the server may
/// confirm after completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub day_number: u32,
    pub guesses: Vec<String>,
    /// Parallel to `guesses`: `guess_results[i]` grades `guesses[i]`.
    pub guess_results: Vec<GuessResult>,
    pub revealed_hints: u32,
    pub is_complete: bool,
    pub is_won: bool,
    /// Set after the fact when the server confirms this player solved the
    /// puzzle first.
    pub first_solver: bool,
}

impl GameState {
    /// Start a fresh record for `day_number`.
    #[must_use]
    pub fn new(day_number: u32) -> Self {
        Self {
            day_number,
            ..Self::default()
        }
    }

    /// Whether a record loaded from the key for `day` actually belongs to
    /// that day. A mismatch means the stored value is corrupt and must be
    /// discarded.
    #[must_use]
    pub fn belongs_to(&self, day: u32) -> bool {
        self.day_number == day
    }

    /// Append a graded guess, keeping the two lists in lockstep.
    pub fn push_guess(&mut self, guess: impl Into<String>, result: GuessResult) {
        self.guesses.push(guess.into());
        self.guess_results.push(result);
    }
}
