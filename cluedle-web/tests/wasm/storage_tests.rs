//! Browser round-trips for the real storage tiers.
//!
//! These run in a real browser (`wasm-pack test --headless --chrome`); the
//! tier logic itself is unit-tested natively against in-memory doubles.
use wasm_bindgen_test::*;

use cluedle_stats::is_valid_player_id;
use cluedle_web::identity::IdentityManager;
use cluedle_web::stats_store::{KvStore, STATS_KEY, StatsStore};
use cluedle_web::storage::{
    CookieTier, IDB_KEY, IDB_NAME, IDB_STORE, IndexedDbTier, LocalKv, LocalTier, PLAYER_ID_COOKIE,
    PLAYER_ID_KEY, StorageTier, Tiers, format_cookie,
};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::HtmlDocument {
    use wasm_bindgen::JsCast;
    web_sys::window()
        .expect("window")
        .document()
        .expect("document")
        .dyn_into()
        .expect("html document")
}

fn clear_player_id_cookie() {
    let expired = format!("{PLAYER_ID_COOKIE}=; Max-Age=0; Path=/");
    document().set_cookie(&expired).expect("expire cookie");
}

#[wasm_bindgen_test]
async fn local_tier_round_trips() {
    LocalKv.remove_item(PLAYER_ID_KEY);
    let tier = LocalTier::new(PLAYER_ID_KEY);

    assert_eq!(tier.get().await, None);
    assert!(tier.set("abc-123").await);
    assert_eq!(tier.get().await.as_deref(), Some("abc-123"));
}

#[wasm_bindgen_test]
async fn local_tier_treats_empty_string_as_absent() {
    assert!(LocalKv.set_item(PLAYER_ID_KEY, ""));
    let tier = LocalTier::new(PLAYER_ID_KEY);
    assert_eq!(tier.get().await, None);
}

#[wasm_bindgen_test]
async fn cookie_tier_reads_what_the_document_holds() {
    document()
        .set_cookie(&format_cookie(PLAYER_ID_COOKIE, "abc-123"))
        .expect("set cookie");
    let tier = CookieTier::new(PLAYER_ID_COOKIE);
    assert_eq!(tier.get().await.as_deref(), Some("abc-123"));

    clear_player_id_cookie();
    assert_eq!(tier.get().await, None);
}

#[wasm_bindgen_test]
async fn cookie_tier_set_survives_an_unreachable_durability_endpoint() {
    clear_player_id_cookie();
    let tier = CookieTier::new(PLAYER_ID_COOKIE);

    // No server answers the round-trip under the test harness; the direct
    // document.cookie path still has to land.
    assert!(tier.set("xyz-789").await);
    assert_eq!(tier.get().await.as_deref(), Some("xyz-789"));
}

#[wasm_bindgen_test]
async fn indexed_db_tier_round_trips() {
    let tier = IndexedDbTier::new(IDB_NAME, IDB_STORE, IDB_KEY);
    assert!(tier.set("abc-123").await);
    assert_eq!(tier.get().await.as_deref(), Some("abc-123"));
}

#[wasm_bindgen_test]
async fn indexed_db_missing_key_reads_absent() {
    let tier = IndexedDbTier::new(IDB_NAME, IDB_STORE, "never-written");
    assert_eq!(tier.get().await, None);
}

#[wasm_bindgen_test]
async fn get_or_create_is_stable_across_calls() {
    let manager = IdentityManager::new(Tiers::browser());
    let first = manager.get_or_create().await;
    let second = manager.get_or_create().await;

    assert!(is_valid_player_id(&first));
    assert_eq!(first, second);
    assert_eq!(LocalKv.get_item(PLAYER_ID_KEY), Some(first));
}

#[wasm_bindgen_test]
async fn backup_probe_leaves_the_primary_tier_untouched() {
    LocalKv.remove_item(PLAYER_ID_KEY);
    document()
        .set_cookie(&format_cookie(PLAYER_ID_COOKIE, "backup-456"))
        .expect("set cookie");

    let manager = IdentityManager::new(Tiers::browser());
    let probe = manager.check_backup_only().await;

    assert!(!probe.primary_present());
    assert_eq!(probe.secondary.as_deref(), Some("backup-456"));
    assert_eq!(LocalKv.get_item(PLAYER_ID_KEY), None);
}

#[wasm_bindgen_test]
async fn stats_store_persists_through_real_local_storage() {
    LocalKv.remove_item(STATS_KEY);
    let store = StatsStore::new(LocalKv);

    let stats = store.record_result(true, 3, 12);
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.last_played_day, Some(12));

    // A second store over the same backend sees the persisted record.
    let reread = StatsStore::new(LocalKv);
    assert_eq!(reread.statistics(), stats);
}
