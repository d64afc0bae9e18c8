// Browser-only checks; run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use siven::{HighScore, KeyValueStore, LocalStorage};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trips_high_score() {
    let store = LocalStorage::open().expect("localStorage available");
    let mut hs = HighScore::new(store, "siven-test-high-score");
    hs.save(12);
    assert_eq!(hs.load(), 12);
    assert_eq!(
        hs.store().get("siven-test-high-score").unwrap().as_deref(),
        Some("12")
    );
}

#[wasm_bindgen_test]
fn start_game_mounts_start_screen() {
    siven::start_game().expect("mount");
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("siven-start").is_some());
    assert!(doc.get_element_by_id("siven-option-2").is_some());
    let title = doc.get_element_by_id("siven-title").expect("title");
    assert_eq!(title.text_content().as_deref(), Some("SIVEN"));
    let hint = doc.get_element_by_id("siven-hint").expect("hint");
    assert_eq!(hint.text_content().as_deref(), Some("Vypočítej správný výsledek!"));
    // mounting twice keeps the first game
    siven::start_game().expect("second mount");
}

#[wasm_bindgen_test]
fn start_hook_tolerates_a_second_call() {
    siven::wasm_start();
    siven::wasm_start();
    log::info!("console logger installed");
}
