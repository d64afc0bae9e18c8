//! Session controller.
//!
//! `Game` owns the [`Session`] together with everything that has a lifetime
//! beyond a single transition: the countdown interval, the post-answer delay,
//! the overlay auto-dismiss, the high score slot and the rng. Every transition
//! that makes a timer pointless cancels it here.

use rand::Rng;

use crate::config::GameConfig;
use crate::session::{Session, Transition};
use crate::store::{HighScore, KeyValueStore};
use crate::timers::{ManualTimers, Signal, Timers};

pub struct Game<S, T: Timers, R> {
    config: GameConfig,
    session: Session,
    high_score: HighScore<S>,
    timers: T,
    rng: R,
    tick_timer: Option<T::Handle>,
    advance_timer: Option<T::Handle>,
    overlay_timer: Option<T::Handle>,
    overlay_visible: bool,
}

impl<S: KeyValueStore, T: Timers, R: Rng> Game<S, T, R> {
    /// Builds an idle game, reading the persisted high score from `store`.
    /// An invalid `config` is replaced by the defaults.
    pub fn new(config: GameConfig, store: S, timers: T, rng: R) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{e}; playing with the default config");
                GameConfig::default()
            }
        };
        let high_score = HighScore::new(store, config.high_score_key.clone());
        let best = high_score.load();
        log::info!("loaded high score {best}");
        Self {
            session: Session::new(&config, best),
            config,
            high_score,
            timers,
            rng,
            tick_timer: None,
            advance_timer: None,
            overlay_timer: None,
            overlay_visible: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn store(&self) -> &S {
        self.high_score.store()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn into_store(self) -> S {
        self.high_score.into_store()
    }

    pub fn start(&mut self) -> Transition {
        self.cancel_advance();
        self.cancel_tick();
        let t = self.session.start(&mut self.rng);
        self.arm_tick();
        t
    }

    pub fn submit_answer(&mut self, selected: i32) -> Transition {
        let t = self.session.submit_answer(selected);
        if let Transition::Answered(verdict) = t {
            self.cancel_tick();
            self.cancel_advance();
            self.advance_timer = self.timers.once(self.config.feedback_delay_ms, Signal::Advance);
            if let Some(best) = verdict.new_high_score {
                self.high_score.save(best);
            }
            if verdict.bonus {
                log::info!("bonus value hit, bonus counter {}", self.session.bonus_counter());
                self.show_overlay();
            }
        }
        t
    }

    /// Answer by button position instead of value.
    pub fn submit_option(&mut self, index: usize) -> Transition {
        let selected = self
            .session
            .problem()
            .and_then(|p| p.options().get(index).copied());
        match selected {
            Some(value) => self.submit_answer(value),
            None => Transition::Ignored,
        }
    }

    pub fn claim_bonus(&mut self) -> Transition {
        let t = self.session.claim_bonus();
        if t == Transition::BonusClaimed {
            self.show_overlay();
        }
        t
    }

    pub fn dismiss_overlay(&mut self) {
        if let Some(h) = self.overlay_timer.take() {
            self.timers.cancel(h);
        }
        self.overlay_visible = false;
    }

    /// Dispatch a fired timer.
    pub fn fire(&mut self, signal: Signal) -> Transition {
        match signal {
            Signal::Tick => self.session.tick(&mut self.rng),
            Signal::Advance => {
                // one-shot already spent
                self.advance_timer = None;
                let t = self.session.advance(&mut self.rng);
                if t == Transition::Advanced {
                    self.arm_tick();
                }
                t
            }
            Signal::DismissOverlay => {
                self.overlay_timer = None;
                self.overlay_visible = false;
                Transition::Ignored
            }
        }
    }

    fn show_overlay(&mut self) {
        if let Some(h) = self.overlay_timer.take() {
            self.timers.cancel(h);
        }
        self.overlay_visible = true;
        self.overlay_timer = self.timers.once(self.config.bonus_overlay_ms, Signal::DismissOverlay);
    }

    fn arm_tick(&mut self) {
        self.cancel_tick();
        self.tick_timer = self.timers.every(self.config.tick_interval_ms, Signal::Tick);
    }

    fn cancel_tick(&mut self) {
        if let Some(h) = self.tick_timer.take() {
            self.timers.cancel(h);
        }
    }

    fn cancel_advance(&mut self) {
        if let Some(h) = self.advance_timer.take() {
            self.timers.cancel(h);
        }
    }
}

impl<S: KeyValueStore, R: Rng> Game<S, ManualTimers, R> {
    /// Let `ms` of virtual time pass, firing every timer that comes due.
    /// Returns the transitions in firing order.
    pub fn run_for(&mut self, ms: u64) -> Vec<Transition> {
        let until = self.timers.now_ms() + ms;
        let mut fired = Vec::new();
        while let Some(signal) = self.timers.pop_due(until) {
            fired.push(self.fire(signal));
        }
        self.timers.set_now(until);
        fired
    }
}
