//! Session-scoped statistics recovery
//!
//! Once per page session, decides whether local aggregate statistics are
//! empty while a backup identifier survives in a slower tier, and if so
//! installs the server-computed aggregates locally. The automatic path
//! never surfaces failures to the UI; the explicit user-triggered path
//! returns a typed reason instead.
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

use crate::api::{ApiError, StatsApi};
use crate::identity::IdentityManager;
use crate::stats_store::{KvStore, StatsStore};
use cluedle_stats::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// Server aggregates were installed into the local store.
    Recovered,
    /// Nothing was installed: not a recovery scenario, already attempted
    /// this session, or the fetch failed. Retry is left to a later session.
    NotRecovered,
}

/// Why an explicit "restore my stats" request could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecoveryFailure {
    #[error("no identity found in any storage tier")]
    NoIdentityFound,
    #[error("no server-side history for this identity")]
    NoHistory,
    #[error("the aggregation service is rate limiting this client")]
    RateLimited,
    #[error("the aggregation service failed")]
    ServerError,
}

pub struct RecoveryCoordinator<K: KvStore, A: StatsApi> {
    identity: Rc<IdentityManager>,
    stats: Rc<StatsStore<K>>,
    api: A,
    attempted: Cell<bool>,
}

impl<K: KvStore, A: StatsApi> RecoveryCoordinator<K, A> {
    /// One coordinator per page session; the attempted flag lives for the
    /// session and resets only on a full reload.
    pub fn new(identity: Rc<IdentityManager>, stats: Rc<StatsStore<K>>, api: A) -> Self {
        Self {
            identity,
            stats,
            api,
            attempted: Cell::new(false),
        }
    }

    /// Automatic recovery, run on load. Idempotent per session.
    pub async fn attempt_recovery(&self) -> RecoveryOutcome {
        // Local aggregates present: nothing to recover.
        if self.stats.statistics().games_played > 0 {
            return RecoveryOutcome::NotRecovered;
        }
        if self.attempted.get() {
            return RecoveryOutcome::NotRecovered;
        }
        // Claim the session's single attempt before the first suspension
        // point so a concurrent mount cannot also reach the network.
        self.attempted.set(true);

        let probe = self.identity.check_backup_only().await;
        if probe.primary_present() {
            // Zero stats alongside a primary identifier is a genuinely new
            // player, not a loss scenario.
            return RecoveryOutcome::NotRecovered;
        }
        let Some(backup) = probe.backup().map(str::to_string) else {
            return RecoveryOutcome::NotRecovered;
        };

        match self.api.fetch_recovered(&backup).await {
            Ok(recovered) => {
                self.stats.save_statistics(&recovered.into_statistics());
                self.identity.persist(&backup).await;
                log::debug!("statistics recovered from server history");
                RecoveryOutcome::Recovered
            }
            Err(ApiError::NoHistory) => {
                // Keep the identifier reachable everywhere so future
                // recovery checks stay cheap.
                self.identity.persist(&backup).await;
                RecoveryOutcome::NotRecovered
            }
            Err(err) => {
                log::warn!("statistics recovery failed: {err}");
                RecoveryOutcome::NotRecovered
            }
        }
    }

    /// Explicit user-triggered restore. Ignores the session flag and the
    /// local-stats-empty precondition; local aggregates are wholesale
    /// replaced on success.
    pub async fn force_recovery(&self) -> Result<Statistics, RecoveryFailure> {
        let probe = self.identity.check_backup_only().await;
        let Some(id) = probe.any().map(str::to_string) else {
            return Err(RecoveryFailure::NoIdentityFound);
        };

        match self.api.fetch_recovered(&id).await {
            Ok(recovered) => {
                let stats = recovered.into_statistics();
                self.stats.save_statistics(&stats);
                self.identity.persist(&id).await;
                Ok(stats)
            }
            Err(ApiError::NoHistory) => {
                self.identity.persist(&id).await;
                Err(RecoveryFailure::NoHistory)
            }
            Err(ApiError::RateLimited { .. }) => Err(RecoveryFailure::RateLimited),
            Err(err) => {
                log::warn!("forced recovery failed: {err}");
                Err(RecoveryFailure::ServerError)
            }
        }
    }
}
