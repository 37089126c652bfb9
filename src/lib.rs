//! Scramble Recall - a button memory game
//!
//! Core modules:
//! - `sim`: Deterministic game core (entities, timers, observers, engine)
//! - `view`: Display/Render capabilities and their headless + DOM adapters
//! - `settings`: Validated round parameters and engine tuning
//! - `game`: Bootstrap that builds entities from schemas and drives the engine

pub mod error;
pub mod game;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{ConfigError, SchemaError};
pub use game::Game;
pub use settings::{ButtonCount, GameSettings, RoundTiming};

/// Game configuration constants
pub mod consts {
    /// Valid button count range (inclusive)
    pub const MIN_BUTTONS: u32 = 3;
    pub const MAX_BUTTONS: u32 = 7;

    /// Period between scramble ticks (ms)
    pub const SCRAMBLE_PERIOD_MS: u64 = 2000;
    /// Delay between round end and automatic reset (ms)
    pub const RESET_DELAY_MS: u64 = 3000;

    /// Countdown step (ms)
    pub const COUNTDOWN_STEP_MS: u64 = 1000;
    /// How long "Time's up!" stays on screen (ms)
    pub const TIMES_UP_LINGER_MS: u64 = 2000;
    /// Notification banner lifetime (ms)
    pub const NOTIFICATION_MS: u64 = 3000;

    /// Button footprint used when clamping positions to the viewport
    pub const BUTTON_WIDTH: f32 = 100.0;
    pub const BUTTON_HEIGHT: f32 = 50.0;
    /// Fraction of the viewport random positions are drawn from
    pub const SPAWN_FRACTION: f32 = 0.8;

    /// CSS transition applied to every button so moves animate
    pub const MOVE_TRANSITION: &str = "transform 0.5s ease-out";
}

/// Player-facing strings
pub mod text {
    pub const TITLE: &str = "Dynamic Particle Simulator";
    pub const MENU_LABEL: &str = "How many buttons to create? (3 - 7)";
    pub const MENU_BUTTON: &str = "Go";

    pub const INVALID_BUTTON_COUNT: &str = "Please enter a number between 3 and 7.";
    pub const GAME_STARTED: &str = "Game started! Memorize the button order.";
    pub const RECALL_STARTED: &str = "Now click the buttons in the original order.";
    pub const EXCELLENT_MEMORY: &str = "Excellent memory!";
    pub const WRONG_ORDER: &str = "Wrong order! Game over.";

    pub const TIMES_UP: &str = "Time's up!";

    /// Countdown line for `seconds` remaining
    pub fn time_left(seconds: u32) -> String {
        format!("Time left: {seconds} seconds")
    }
}
