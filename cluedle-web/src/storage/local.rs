//! Primary tier: synchronous localStorage
use async_trait::async_trait;

use super::StorageTier;
use crate::dom;
use crate::stats_store::KvStore;

/// Whole-of-localStorage handle implementing the statistics store's
/// key-value contract. Unavailable or blocked storage reads as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalKv;

impl KvStore for LocalKv {
    fn get_item(&self, key: &str) -> Option<String> {
        dom::local_storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> bool {
        dom::local_storage().is_some_and(|storage| storage.set_item(key, value).is_ok())
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = dom::local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// The identifier's view of localStorage: one fixed key.
pub struct LocalTier {
    key: &'static str,
}

impl LocalTier {
    #[must_use]
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

#[async_trait(?Send)]
impl StorageTier for LocalTier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get(&self) -> Option<String> {
        LocalKv.get_item(self.key).filter(|value| !value.is_empty())
    }

    async fn set(&self, value: &str) -> bool {
        LocalKv.set_item(self.key, value)
    }
}
