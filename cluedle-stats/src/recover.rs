//! Rebuilding aggregate statistics from server-held raw history
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::stats::{GuessDistribution, Statistics};

/// Audit-trail day value for results whose puzzle has no known day mapping.
pub const UNMAPPED_DAY: i64 = -1;

/// One raw per-puzzle result as the aggregation service stores it. The list
/// a player accumulates is unordered and may reference puzzles with no day
/// mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGameResult {
    pub puzzle_number: u32,
    pub won: bool,
    pub guess_count: u32,
    /// Epoch milliseconds at which the result was reported.
    pub played_at: f64,
}

/// Audit-trail entry describing how one raw result was interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredGameState {
    /// Mapped day number, or [`UNMAPPED_DAY`] when the puzzle is unknown to
    /// the schedule.
    pub day_number: i64,
    pub puzzle_number: u32,
    pub won: bool,
    pub guess_count: u32,
}

/// Output of [`aggregate`]: the same shape the client maintains locally,
/// plus the per-result audit trail (dropped on install).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecoveredStatistics {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub guess_distribution: GuessDistribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played_day: Option<u32>,
    pub total_guess_time: f64,
    pub total_guess_count: u32,
    pub game_states: Vec<RecoveredGameState>,
}

impl RecoveredStatistics {
    /// Convert to the locally persisted shape, dropping the audit trail.
    #[must_use]
    pub fn into_statistics(self) -> Statistics {
        Statistics {
            games_played: self.games_played,
            games_won: self.games_won,
            current_streak: self.current_streak,
            max_streak: self.max_streak,
            guess_distribution: self.guess_distribution,
            last_played_day: self.last_played_day,
            total_guess_time: self.total_guess_time,
            total_guess_count: self.total_guess_count,
        }
    }
}

/// Recompute aggregate statistics from an unordered raw history.
///
/// Every result counts toward `games_played`/`games_won` and (wins only) the
/// guess distribution. Only results whose puzzle appears in `puzzle_to_day`
/// participate in streaks and `last_played_day`; the rest are recorded in
/// the audit trail with [`UNMAPPED_DAY`].
///
/// Streaks walk the mapped days in ascending order: a win on the day right
/// after the previous walked day extends the streak, a win after a gap (or
/// the first day) restarts it at 1, and a loss zeroes it. If the result on
/// the last played day was a loss the final `current_streak` is forced to
/// zero. Guess timing cannot be reconstructed from history and stays zero.
#[must_use]
pub fn aggregate(
    results: &[RawGameResult],
    puzzle_to_day: &HashMap<u32, u32>,
) -> RecoveredStatistics {
    let mut recovered = RecoveredStatistics {
        games_played: results.len() as u32,
        ..RecoveredStatistics::default()
    };

    let mut mapped: Vec<(u32, bool)> = Vec::new();
    for result in results {
        if result.won {
            recovered.games_won += 1;
            *recovered
                .guess_distribution
                .entry(result.guess_count)
                .or_insert(0) += 1;
        }
        let day = puzzle_to_day.get(&result.puzzle_number).copied();
        if let Some(day) = day {
            mapped.push((day, result.won));
        }
        recovered.game_states.push(RecoveredGameState {
            day_number: day.map_or(UNMAPPED_DAY, i64::from),
            puzzle_number: result.puzzle_number,
            won: result.won,
            guess_count: result.guess_count,
        });
    }

    // The input is unordered; streak evaluation needs the mapped days in
    // ascending order.
    mapped.sort_by_key(|(day, _)| *day);

    let mut prev_day: Option<u32> = None;
    for &(day, won) in &mapped {
        if won {
            let adjacent = prev_day.is_some_and(|prev| prev + 1 == day);
            recovered.current_streak = if adjacent {
                recovered.current_streak + 1
            } else {
                1
            };
        } else {
            recovered.current_streak = 0;
        }
        recovered.max_streak = recovered.max_streak.max(recovered.current_streak);
        prev_day = Some(day);
    }

    if let Some(&(day, won)) = mapped.last() {
        recovered.last_played_day = Some(day);
        // The walk can end on a win that followed a gap; only the result on
        // the last played day decides whether the streak survives.
        if !won {
            recovered.current_streak = 0;
        }
    }

    recovered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(puzzle_number: u32, won: bool, guess_count: u32) -> RawGameResult {
        RawGameResult {
            puzzle_number,
            won,
            guess_count,
            played_at: 1_700_000_000_000.0,
        }
    }

    fn identity_mapping(days: impl IntoIterator<Item = u32>) -> HashMap<u32, u32> {
        days.into_iter().map(|d| (d, d)).collect()
    }

    #[test]
    fn empty_history_yields_defaults() {
        let recovered = aggregate(&[], &HashMap::new());
        assert_eq!(recovered, RecoveredStatistics::default());
        assert_eq!(recovered.last_played_day, None);
    }

    #[test]
    fn consecutive_wins_build_a_streak() {
        let results = vec![result(0, true, 3), result(1, true, 4), result(2, true, 2)];
        let recovered = aggregate(&results, &identity_mapping(0..=2));

        assert_eq!(recovered.games_played, 3);
        assert_eq!(recovered.games_won, 3);
        assert_eq!(recovered.current_streak, 3);
        assert_eq!(recovered.max_streak, 3);
        assert_eq!(recovered.last_played_day, Some(2));
    }

    #[test]
    fn gap_restarts_the_streak_without_breaking_the_win() {
        let results = vec![result(0, true, 3), result(5, true, 4)];
        let recovered = aggregate(&results, &identity_mapping([0, 5]));

        assert_eq!(recovered.current_streak, 1);
        assert_eq!(recovered.max_streak, 1);
        assert_eq!(recovered.last_played_day, Some(5));
    }

    #[test]
    fn trailing_loss_forces_current_streak_to_zero() {
        let results = vec![
            result(0, true, 3),
            result(1, true, 3),
            result(2, true, 3),
            result(3, false, 6),
        ];
        let recovered = aggregate(&results, &identity_mapping(0..=3));

        assert_eq!(recovered.current_streak, 0);
        assert_eq!(recovered.max_streak, 3);
        assert_eq!(recovered.last_played_day, Some(3));
    }

    #[test]
    fn unordered_input_is_sorted_before_the_walk() {
        let results = vec![result(2, true, 2), result(0, true, 3), result(1, true, 4)];
        let recovered = aggregate(&results, &identity_mapping(0..=2));

        assert_eq!(recovered.current_streak, 3);
        assert_eq!(recovered.max_streak, 3);
    }

    #[test]
    fn unmapped_results_count_but_never_touch_streaks() {
        let mapping: HashMap<u32, u32> = [(10, 4)].into_iter().collect();
        let results = vec![result(10, true, 3), result(999, true, 2)];
        let recovered = aggregate(&results, &mapping);

        assert_eq!(recovered.games_played, 2);
        assert_eq!(recovered.games_won, 2);
        assert_eq!(recovered.guess_distribution.get(&2), Some(&1));
        assert_eq!(recovered.last_played_day, Some(4));
        assert_eq!(recovered.current_streak, 1);

        let audit: Vec<i64> = recovered.game_states.iter().map(|g| g.day_number).collect();
        assert_eq!(audit, vec![4, UNMAPPED_DAY]);
    }

    #[test]
    fn distribution_only_counts_wins() {
        let results = vec![result(0, true, 2), result(1, true, 2), result(2, false, 5)];
        let recovered = aggregate(&results, &identity_mapping(0..=2));

        assert_eq!(recovered.guess_distribution.len(), 1);
        assert_eq!(recovered.guess_distribution.get(&2), Some(&2));
        assert_eq!(recovered.guess_distribution.get(&5), None);
    }

    #[test]
    fn single_won_day_is_streak_one() {
        let recovered = aggregate(&[result(7, true, 4)], &identity_mapping([7]));
        assert_eq!(recovered.current_streak, 1);
        assert_eq!(recovered.max_streak, 1);
    }

    #[test]
    fn single_lost_day_is_streak_zero() {
        let recovered = aggregate(&[result(7, false, 6)], &identity_mapping([7]));
        assert_eq!(recovered.current_streak, 0);
        assert_eq!(recovered.max_streak, 0);
        assert_eq!(recovered.last_played_day, Some(7));
    }

    #[test]
    fn loss_in_the_middle_splits_streaks() {
        let results = vec![
            result(0, true, 3),
            result(1, false, 6),
            result(2, true, 3),
            result(3, true, 3),
        ];
        let recovered = aggregate(&results, &identity_mapping(0..=3));

        assert_eq!(recovered.current_streak, 2);
        assert_eq!(recovered.max_streak, 2);
    }

    #[test]
    fn recovered_timing_fields_stay_zero() {
        let recovered = aggregate(&[result(0, true, 3)], &identity_mapping([0]));
        assert!(recovered.total_guess_time.abs() < f64::EPSILON);
        assert_eq!(recovered.total_guess_count, 0);
    }

    #[test]
    fn into_statistics_drops_the_audit_trail() {
        let results = vec![result(0, true, 3), result(1, false, 6)];
        let recovered = aggregate(&results, &identity_mapping(0..=1));
        let stats = recovered.clone().into_statistics();

        assert_eq!(stats.games_played, recovered.games_played);
        assert_eq!(stats.games_won, recovered.games_won);
        assert_eq!(stats.current_streak, recovered.current_streak);
        assert_eq!(stats.max_streak, recovered.max_streak);
        assert_eq!(stats.last_played_day, recovered.last_played_day);
        assert_eq!(stats.guess_distribution, recovered.guess_distribution);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let recovered = aggregate(&[result(0, true, 3)], &identity_mapping([0]));
        let value = serde_json::to_value(&recovered).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(object.contains_key("gamesPlayed"));
        assert!(object.contains_key("gameStates"));
        assert_eq!(value["gameStates"][0]["dayNumber"], 0);
        assert_eq!(value["gameStates"][0]["puzzleNumber"], 0);
    }
}
