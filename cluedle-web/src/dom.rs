//! Browser environment accessors
//!
//! Everything here degrades to `None` instead of panicking: storage tiers
//! treat a missing environment as an unavailable backend, never as a fault
//! to surface to the UI layer.
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage, Window};

/// Retrieve the global `window` object, if the runtime has one.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// The document cast to `HtmlDocument`, which carries the cookie accessors.
#[must_use]
pub fn html_document() -> Option<HtmlDocument> {
    window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// Access the browser `localStorage` handle. `None` when the window is
/// missing or storage is blocked (e.g. some private-mode configurations).
#[must_use]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
