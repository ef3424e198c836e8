//! Tertiary tier: IndexedDB
//!
//! Its own failure domain: opening the database can fail outright (storage
//! blocked, private mode) or hang (version-change deadlock in another tab),
//! so every operation is raced against a fixed timeout and resolves to
//! absence/failure instead of hanging the caller.
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{Either, select};
use gloo::timers::future::TimeoutFuture;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IdbDatabase, IdbRequest, IdbTransactionMode};

use super::StorageTier;
use crate::dom;

const DB_VERSION: u32 = 1;
const OP_TIMEOUT_MS: u32 = 3000;

pub struct IndexedDbTier {
    db_name: &'static str,
    store_name: &'static str,
    key: &'static str,
}

impl IndexedDbTier {
    #[must_use]
    pub fn new(db_name: &'static str, store_name: &'static str, key: &'static str) -> Self {
        Self {
            db_name,
            store_name,
            key,
        }
    }

    async fn open(&self) -> Result<IdbDatabase, JsValue> {
        let window = dom::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let factory = window
            .indexed_db()?
            .ok_or_else(|| JsValue::from_str("IndexedDB unavailable"))?;
        let request = factory.open_with_u32(self.db_name, DB_VERSION)?;

        let store_name = self.store_name;
        let upgrade = {
            let request = request.clone();
            Closure::once(move |_: JsValue| {
                let Ok(result) = request.result() else {
                    return;
                };
                let Ok(db) = result.dyn_into::<IdbDatabase>() else {
                    return;
                };
                if !db.object_store_names().contains(store_name) {
                    let _ = db.create_object_store(store_name);
                }
            })
        };
        request.set_onupgradeneeded(Some(upgrade.as_ref().unchecked_ref()));
        upgrade.forget();

        let value = await_request(&request).await?;
        value
            .dyn_into::<IdbDatabase>()
            .map_err(|_| JsValue::from_str("unexpected open result"))
    }

    async fn read(&self) -> Result<Option<String>, JsValue> {
        let db = self.open().await?;
        let tx = db.transaction_with_str(self.store_name)?;
        let store = tx.object_store(self.store_name)?;
        let request = store.get(&JsValue::from_str(self.key))?;
        let value = await_request(&request).await?;
        Ok(value.as_string())
    }

    async fn write(&self, value: &str) -> Result<(), JsValue> {
        let db = self.open().await?;
        let tx =
            db.transaction_with_str_and_mode(self.store_name, IdbTransactionMode::Readwrite)?;
        let store = tx.object_store(self.store_name)?;
        let request =
            store.put_with_key(&JsValue::from_str(value), &JsValue::from_str(self.key))?;
        await_request(&request).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl StorageTier for IndexedDbTier {
    fn name(&self) -> &'static str {
        "indexeddb"
    }

    async fn get(&self) -> Option<String> {
        match bounded(self.read()).await {
            Some(Ok(value)) => value.filter(|v| !v.is_empty()),
            Some(Err(err)) => {
                log::debug!("indexeddb read failed: {}", dom::js_error_message(&err));
                None
            }
            None => {
                log::debug!("indexeddb read timed out after {OP_TIMEOUT_MS}ms");
                None
            }
        }
    }

    async fn set(&self, value: &str) -> bool {
        match bounded(self.write(value)).await {
            Some(Ok(())) => true,
            Some(Err(err)) => {
                log::warn!("indexeddb write failed: {}", dom::js_error_message(&err));
                false
            }
            None => {
                log::warn!("indexeddb write timed out after {OP_TIMEOUT_MS}ms");
                false
            }
        }
    }
}

/// Race an IndexedDB operation against the fixed timeout. `None` means the
/// operation did not settle in time and its eventual result is discarded.
async fn bounded<T>(operation: impl Future<Output = T>) -> Option<T> {
    match select(Box::pin(operation), Box::pin(TimeoutFuture::new(OP_TIMEOUT_MS))).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(((), _)) => None,
    }
}

/// Bridge an `IdbRequest`'s success/error callbacks into a future.
async fn await_request(request: &IdbRequest) -> Result<JsValue, JsValue> {
    let (tx, rx) = oneshot::channel::<Result<JsValue, JsValue>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = Rc::clone(&tx);
        let request = request.clone();
        Closure::once(move |_: JsValue| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(request.result());
            }
        })
    };
    let on_error = {
        let tx = Rc::clone(&tx);
        Closure::once(move |_: JsValue| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(JsValue::from_str("IndexedDB request failed")));
            }
        })
    };
    request.set_onsuccess(Some(on_success.as_ref().unchecked_ref()));
    request.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_success.forget();
    on_error.forget();

    rx.await
        .unwrap_or_else(|_| Err(JsValue::from_str("IndexedDB request dropped")))
}
