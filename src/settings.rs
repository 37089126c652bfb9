//! Round parameters and engine tuning
//!
//! `ButtonCount` is validated once at the menu boundary; the engine trusts it.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Number of buttons in a round, guaranteed to be in `MIN_BUTTONS..=MAX_BUTTONS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ButtonCount(u32);

impl ButtonCount {
    pub fn new(count: u32) -> Result<Self, ConfigError> {
        if (MIN_BUTTONS..=MAX_BUTTONS).contains(&count) {
            Ok(Self(count))
        } else {
            Err(ConfigError::ButtonCountOutOfRange {
                count: i64::from(count),
            })
        }
    }

    /// Parse raw menu input ("5", " 4 ")
    ///
    /// Whole integers only; "4.5" and "5x" are rejected rather than truncated.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let count: i64 = input
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber)?;
        u32::try_from(count)
            .map_err(|_| ConfigError::ButtonCountOutOfRange { count })
            .and_then(Self::new)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ButtonCount {
    type Error = ConfigError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<ButtonCount> for u32 {
    fn from(count: ButtonCount) -> Self {
        count.0
    }
}

/// Phase lengths for one round
///
/// Both values historically derive from the button count. They are kept
/// separate so a round can memorize for longer than it scrambles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTiming {
    /// Seconds the numbered buttons stay still before scrambling
    pub display_secs: u32,
    /// Number of scramble ticks before recall starts
    pub scramble_ticks: u32,
}

impl RoundTiming {
    /// Countdown length and scramble count both equal to `button_count`
    pub fn from_button_count(button_count: u32) -> Self {
        Self {
            display_secs: button_count,
            scramble_ticks: button_count,
        }
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.display_secs))
    }
}

/// Engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Seed for positions and colors
    pub seed: u64,
    /// Button size subtracted from the viewport when clamping positions
    pub button_footprint: Vec2,
    /// Fraction of the viewport random positions are drawn from
    pub spawn_fraction: f32,
    /// Time between scramble ticks (ms)
    pub scramble_period_ms: u64,
    /// Time between round end and reset (ms)
    pub reset_delay_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            button_footprint: Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
            spawn_fraction: SPAWN_FRACTION,
            scramble_period_ms: SCRAMBLE_PERIOD_MS,
            reset_delay_ms: RESET_DELAY_MS,
        }
    }
}

impl GameSettings {
    /// Default tuning with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn scramble_period(&self) -> Duration {
        Duration::from_millis(self.scramble_period_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
