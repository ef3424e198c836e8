//! Multi-tier player identity resolution
//!
//! Reads cheapest-first (localStorage, then cookie, then IndexedDB),
//! repairs faster tiers when a value is only found in a slower one, and
//! generates a fresh identifier when every tier misses. Concurrent
//! `get_or_create` calls share one in-flight resolution so near-simultaneous
//! component mounts can never race to mint different identifiers.
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::storage::{StorageTier, Tiers};

type SharedResolve = Shared<LocalBoxFuture<'static, String>>;

/// Result of a side-effect-free probe of all three tiers.
///
/// The recovery coordinator needs to distinguish "identifier already in the
/// primary tier" from "identifier only in a backup tier"; a repairing read
/// would erase that distinction, so this probe writes nothing back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupProbe {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
}

impl BackupProbe {
    #[must_use]
    pub fn primary_present(&self) -> bool {
        self.primary.is_some()
    }

    /// Candidate identifier recoverable from a backup tier, preferring the
    /// cookie over IndexedDB.
    #[must_use]
    pub fn backup(&self) -> Option<&str> {
        self.secondary.as_deref().or(self.tertiary.as_deref())
    }

    /// Any identifier known to any tier, cheapest tier first.
    #[must_use]
    pub fn any(&self) -> Option<&str> {
        self.primary.as_deref().or_else(|| self.backup())
    }
}

/// Owns identifier generation, multi-tier write-through and
/// read-with-repair. One instance per page session.
pub struct IdentityManager {
    tiers: Rc<Tiers>,
    inflight: RefCell<Option<SharedResolve>>,
}

impl IdentityManager {
    #[must_use]
    pub fn new(tiers: Tiers) -> Self {
        Self {
            tiers: Rc::new(tiers),
            inflight: RefCell::new(None),
        }
    }

    /// Resolve the player identifier, generating and storing a fresh one if
    /// no tier holds a value. Never returns an empty string.
    ///
    /// At most one resolution is in flight at a time: concurrent callers
    /// await the same shared future. Ordinary reads are idempotent and free
    /// to race; only generation needs this guarantee.
    pub async fn get_or_create(&self) -> String {
        let resolve = {
            let mut slot = self.inflight.borrow_mut();
            if let Some(shared) = slot.as_ref() {
                shared.clone()
            } else {
                let shared = resolve_identifier(Rc::clone(&self.tiers))
                    .boxed_local()
                    .shared();
                *slot = Some(shared.clone());
                shared
            }
        };
        let id = resolve.await;
        // Clear the memo once settled so a later genuine loss of identity
        // can generate a fresh value.
        self.inflight.borrow_mut().take();
        id
    }

    /// Report what each tier currently holds without repairing anything.
    pub async fn check_backup_only(&self) -> BackupProbe {
        BackupProbe {
            primary: self.tiers.primary.get().await,
            secondary: self.tiers.secondary.get().await,
            tertiary: self.tiers.tertiary.get().await,
        }
    }

    /// Write `id` through every tier. Primary and secondary are awaited;
    /// the tertiary write is best-effort.
    pub async fn persist(&self, id: &str) {
        if !self.tiers.primary.set(id).await {
            log::warn!("primary tier rejected identifier write");
        }
        let _ = self.tiers.secondary.set(id).await;
        let tertiary = Rc::clone(&self.tiers.tertiary);
        let id = id.to_string();
        detach(async move {
            let _ = tertiary.set(&id).await;
        })
        .await;
    }
}

async fn resolve_identifier(tiers: Rc<Tiers>) -> String {
    if let Some(id) = tiers.primary.get().await {
        // Re-write slower tiers that disagree, without blocking the return.
        let tiers = Rc::clone(&tiers);
        let known = id.clone();
        detach(async move {
            if tiers.secondary.get().await.as_deref() != Some(known.as_str()) {
                let _ = tiers.secondary.set(&known).await;
            }
            if tiers.tertiary.get().await.as_deref() != Some(known.as_str()) {
                let _ = tiers.tertiary.set(&known).await;
            }
        })
        .await;
        return id;
    }

    if let Some(id) = tiers.secondary.get().await {
        log::debug!("identifier restored from {} tier", tiers.secondary.name());
        let _ = tiers.primary.set(&id).await;
        let tertiary = Rc::clone(&tiers.tertiary);
        let known = id.clone();
        detach(async move {
            let _ = tertiary.set(&known).await;
        })
        .await;
        return id;
    }

    if let Some(id) = tiers.tertiary.get().await {
        log::debug!("identifier restored from {} tier", tiers.tertiary.name());
        let _ = tiers.primary.set(&id).await;
        let _ = tiers.secondary.set(&id).await;
        return id;
    }

    let id = generate();
    log::debug!("no identifier in any tier; generated a fresh one");
    if !tiers.primary.set(&id).await {
        log::warn!("primary tier rejected identifier write");
    }
    let _ = tiers.secondary.set(&id).await;
    let tertiary = Rc::clone(&tiers.tertiary);
    let known = id.clone();
    detach(async move {
        let _ = tertiary.set(&known).await;
    })
    .await;
    id
}

fn generate() -> String {
    cluedle_stats::generate_player_id(now_millis(), &mut rand::thread_rng())
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
    crate::dom::now_millis()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// Run a best-effort write without blocking the caller's result. Spawned on
/// wasm; awaited inline on native targets so tests observe the end state.
async fn detach<F>(background: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(background);
    #[cfg(not(target_arch = "wasm32"))]
    background.await;
}
