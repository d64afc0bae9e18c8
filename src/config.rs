//! Game tuning knobs. Defaults reproduce the reference pacing: a 10 second
//! countdown ticking every 50 ms, a 600 ms feedback pause and a 3 second
//! bonus overlay.

/// The jackpot answer. Standard rounds never produce it; bonus rounds always do.
pub const BONUS_VALUE: i32 = 67;

/// localStorage key the high score lives under.
pub const HIGH_SCORE_KEY: &str = "math-high-score";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub timer_limit_secs: f64,  // countdown length per problem
    pub tick_interval_ms: u32,  // wall-clock period of the countdown timer
    pub tick_step_secs: f64,    // countdown decrement per tick
    pub feedback_delay_ms: u32, // pause before the next problem after an answer
    pub bonus_overlay_ms: u32,  // overlay auto-dismiss
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_limit_secs: 10.0,
            tick_interval_ms: 50,
            tick_step_secs: 0.05,
            feedback_delay_ms: 600,
            bonus_overlay_ms: 3000,
            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
    #[error("`{0}` is longer than a browser timer allows")]
    DelayTooLong(&'static str),
    #[error("high score key must not be empty")]
    EmptyKey,
}

/// Longest delay `setTimeout` / `setInterval` honor.
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

impl GameConfig {
    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer_limit_secs.is_nan() || self.timer_limit_secs <= 0.0 {
            return Err(ConfigError::NonPositive("timer_limit_secs"));
        }
        if self.tick_step_secs.is_nan() || self.tick_step_secs <= 0.0 {
            return Err(ConfigError::NonPositive("tick_step_secs"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::NonPositive("tick_interval_ms"));
        }
        let delays = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("feedback_delay_ms", self.feedback_delay_ms),
            ("bonus_overlay_ms", self.bonus_overlay_ms),
        ];
        if let Some(&(name, _)) = delays.iter().find(|(_, ms)| *ms > MAX_TIMER_MS) {
            return Err(ConfigError::DelayTooLong(name));
        }
        if self.high_score_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        Ok(())
    }
}
