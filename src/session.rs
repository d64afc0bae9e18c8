//! Round state machine.
//!
//! `Session` is plain data plus transitions; it never touches timers or
//! storage. Each transition reports what happened through [`Transition`] so the
//! controller can arm and cancel timers and persist the high score.

use rand::Rng;

use crate::config::{BONUS_VALUE, GameConfig};
use crate::problem::{self, Problem};

// Residue left by repeated float subtraction is treated as an expired clock.
const TIME_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    Feedback(Feedback),
}

/// Result of evaluating a submitted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub bonus: bool,                 // correct answer was the bonus value
    pub new_high_score: Option<u32>, // set when this answer raised the record
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Not valid in the current phase; nothing changed.
    Ignored,
    Started,
    Answered(Verdict),
    Ticked,
    /// Countdown hit zero and a fresh problem was installed.
    TimedOut,
    Advanced,
    BonusClaimed,
}

#[derive(Clone, Debug)]
pub struct Session {
    phase: Phase,
    score: u32,
    bonus_counter: u32,
    high_score: u32,
    problem: Option<Problem>,
    time_remaining: f64,
    timer_limit: f64,
    tick_step: f64,
}

impl Session {
    pub fn new(config: &GameConfig, high_score: u32) -> Self {
        Self {
            phase: Phase::Start,
            score: 0,
            bonus_counter: 0,
            high_score,
            problem: None,
            time_remaining: config.timer_limit_secs,
            timer_limit: config.timer_limit_secs,
            tick_step: config.tick_step_secs,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bonus_counter(&self) -> u32 {
        self.bonus_counter
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn timer_limit(&self) -> f64 {
        self.timer_limit
    }

    /// Share of the countdown left, for the timer bar.
    pub fn time_fraction(&self) -> f64 {
        (self.time_remaining / self.timer_limit).clamp(0.0, 1.0)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Begin (or restart) a game.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Transition {
        self.score = 0;
        self.bonus_counter = 0;
        self.next_problem(rng);
        log::info!("game started, high score {}", self.high_score);
        Transition::Started
    }

    pub fn submit_answer(&mut self, selected: i32) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::Ignored;
        }
        let Some(problem) = &self.problem else {
            return Transition::Ignored;
        };
        if !problem.is_correct(selected) {
            self.phase = Phase::Feedback(Feedback::Wrong);
            return Transition::Answered(Verdict {
                correct: false,
                bonus: false,
                new_high_score: None,
            });
        }

        self.phase = Phase::Feedback(Feedback::Correct);
        self.score += 1;
        let bonus = selected == BONUS_VALUE;
        if bonus {
            self.bonus_counter += 1;
        }
        let new_high_score = (self.score > self.high_score).then(|| {
            self.high_score = self.score;
            self.score
        });
        Transition::Answered(Verdict {
            correct: true,
            bonus,
            new_high_score,
        })
    }

    /// One countdown step. Only runs while playing.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Transition {
        if self.phase != Phase::Playing {
            return Transition::Ignored;
        }
        let next = self.time_remaining - self.tick_step;
        if next > TIME_EPSILON {
            self.time_remaining = next;
            return Transition::Ticked;
        }
        self.time_remaining = 0.0;
        log::debug!("round timed out at score {}", self.score);
        self.next_problem(rng);
        Transition::TimedOut
    }

    /// Leave the feedback pause with a fresh problem.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Transition {
        if !matches!(self.phase, Phase::Feedback(_)) {
            return Transition::Ignored;
        }
        self.next_problem(rng);
        Transition::Advanced
    }

    pub fn claim_bonus(&mut self) -> Transition {
        if self.bonus_counter == 0 {
            return Transition::Ignored;
        }
        self.bonus_counter -= 1;
        Transition::BonusClaimed
    }

    fn next_problem<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.problem = Some(problem::generate(rng));
        self.time_remaining = self.timer_limit;
        self.phase = Phase::Playing;
    }
}
