//! In-memory tier for tests and non-browser targets
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::StorageTier;

/// Single-value store with the same contract as the browser tiers, plus
/// knobs for fault and latency injection so degraded-tier and race paths
/// can be exercised deterministically.
pub struct MemoryTier {
    label: &'static str,
    value: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    slow: Cell<bool>,
    reads: Cell<u32>,
    writes: Cell<u32>,
}

impl MemoryTier {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: RefCell::new(None),
            fail_writes: Cell::new(false),
            slow: Cell::new(false),
            reads: Cell::new(0),
            writes: Cell::new(0),
        }
    }

    /// A tier that already holds `value`.
    #[must_use]
    pub fn holding(label: &'static str, value: &str) -> Self {
        let tier = Self::new(label);
        *tier.value.borrow_mut() = Some(value.to_string());
        tier
    }

    /// Make subsequent writes report failure without storing anything.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every operation suspend once before completing, so concurrent
    /// callers genuinely interleave.
    pub fn slow(&self, slow: bool) {
        self.slow.set(slow);
    }

    /// Drop the stored value, simulating the user clearing this backend.
    pub fn clear(&self) {
        self.value.borrow_mut().take();
    }

    /// Current stored value, read without going through the tier contract.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    #[must_use]
    pub fn read_count(&self) -> u32 {
        self.reads.get()
    }

    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes.get()
    }
}

#[async_trait(?Send)]
impl StorageTier for MemoryTier {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn get(&self) -> Option<String> {
        if self.slow.get() {
            yield_now().await;
        }
        self.reads.set(self.reads.get() + 1);
        self.value.borrow().clone()
    }

    async fn set(&self, value: &str) -> bool {
        if self.slow.get() {
            yield_now().await;
        }
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return false;
        }
        *self.value.borrow_mut() = Some(value.to_string());
        true
    }
}

/// Suspend once and immediately reschedule.
async fn yield_now() {
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    YieldNow(false).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn write_then_read_round_trips() {
        let tier = MemoryTier::new("memory");
        assert!(block_on(tier.set("abc-123")));
        assert_eq!(block_on(tier.get()).as_deref(), Some("abc-123"));
        assert_eq!(tier.write_count(), 1);
        assert_eq!(tier.read_count(), 1);
    }

    #[test]
    fn failed_writes_store_nothing() {
        let tier = MemoryTier::new("memory");
        tier.fail_writes(true);
        assert!(!block_on(tier.set("abc-123")));
        assert_eq!(block_on(tier.get()), None);
    }

    #[test]
    fn slow_tier_still_completes() {
        let tier = MemoryTier::holding("memory", "abc-123");
        tier.slow(true);
        assert_eq!(block_on(tier.get()).as_deref(), Some("abc-123"));
    }
}
