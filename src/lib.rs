//! Siven core crate.
//!
//! A timed multiple-choice arithmetic quiz for kids. The game logic
//! ([`problem`], [`session`], [`game`]) is plain Rust and runs anywhere; the
//! browser shell in `web` mounts it into a page and drives it with
//! `setInterval` / `setTimeout`. `start_game()` is the JS entrypoint.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod game;
pub mod problem;
pub mod session;
pub mod store;
pub mod timers;
mod web;

pub use config::{BONUS_VALUE, ConfigError, GameConfig};
pub use game::Game;
pub use problem::{Operation, Problem, generate};
pub use session::{Feedback, Phase, Session, Transition, Verdict};
pub use store::{HighScore, KeyValueStore, LocalStorage, MemoryStore, StoreError};
pub use timers::{ManualTimers, Signal, Timers};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // a second call finds the logger already set
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::default())
}

/// Same as `start_game` with pacing overrides, e.g. `{"timer_limit_secs": 15}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::mount(config)
}
