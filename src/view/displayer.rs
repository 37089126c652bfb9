//! Headless display model
//!
//! Holds everything the player would read: the message line, the banner, the
//! countdown and the per-button labels. Its own timers (countdown steps,
//! banner dismissal) run on a private scheduler driven by `Display::advance`.
//! The DOM adapter wraps this model and mirrors it onto the page.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

use super::Display;
use crate::consts::{COUNTDOWN_STEP_MS, NOTIFICATION_MS, TIMES_UP_LINGER_MS};
use crate::sim::scheduler::{Scheduler, TimerHandle};
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayTimer {
    CountdownStep,
    ClearCountdown,
    HideNotification,
}

/// A line of text with its success/error styling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub success: bool,
}

impl Notice {
    fn new(text: &str, success: bool) -> Self {
        Self {
            text: text.to_string(),
            success,
        }
    }

    /// CSS class the page uses for this notice
    pub fn class(&self) -> &'static str {
        if self.success {
            "success-message"
        } else {
            "error-message"
        }
    }
}

#[derive(Debug, Default)]
struct Board {
    message: Option<Notice>,
    notification: Option<Notice>,
    notification_visible: bool,
    countdown_text: String,
    remaining: i64,
    countdown: Option<TimerHandle>,
    banner: Option<TimerHandle>,
    labels: BTreeMap<String, String>,
    clock: Scheduler<DisplayTimer>,
}

impl Board {
    fn on_timer(&mut self, timer: DisplayTimer) {
        match timer {
            DisplayTimer::CountdownStep => {
                // The zero step is never shown; it flips straight to "Time's up!"
                self.countdown_text = text::time_left(u32::try_from(self.remaining).unwrap_or(0));
                self.remaining -= 1;
                if self.remaining < 0 {
                    if let Some(handle) = self.countdown.take() {
                        self.clock.cancel(handle);
                    }
                    self.countdown_text = text::TIMES_UP.to_string();
                    self.clock.schedule_once(
                        DisplayTimer::ClearCountdown,
                        Duration::from_millis(TIMES_UP_LINGER_MS),
                    );
                }
            }
            DisplayTimer::ClearCountdown => self.countdown_text.clear(),
            DisplayTimer::HideNotification => {
                self.notification_visible = false;
                self.banner = None;
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Displayer {
    board: RefCell<Board>,
}

impl Displayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<Notice> {
        self.board.borrow().message.clone()
    }

    /// Latest banner, whether or not it is still showing
    pub fn notification(&self) -> Option<Notice> {
        self.board.borrow().notification.clone()
    }

    pub fn notification_visible(&self) -> bool {
        self.board.borrow().notification_visible
    }

    pub fn countdown_text(&self) -> String {
        self.board.borrow().countdown_text.clone()
    }

    pub fn countdown_running(&self) -> bool {
        self.board.borrow().countdown.is_some()
    }

    pub fn label(&self, id: &str) -> Option<String> {
        self.board.borrow().labels.get(id).cloned()
    }

    pub fn labels(&self) -> BTreeMap<String, String> {
        self.board.borrow().labels.clone()
    }
}

impl Display for Displayer {
    fn show_message(&self, text: &str, success: bool) {
        self.board.borrow_mut().message = Some(Notice::new(text, success));
    }

    fn show_notification(&self, text: &str, success: bool) {
        let mut board = self.board.borrow_mut();
        board.notification = Some(Notice::new(text, success));
        board.notification_visible = true;
        if let Some(handle) = board.banner.take() {
            board.clock.cancel(handle);
        }
        let handle = board.clock.schedule_once(
            DisplayTimer::HideNotification,
            Duration::from_millis(NOTIFICATION_MS),
        );
        board.banner = Some(handle);
    }

    fn start_timer(&self, seconds: u32) {
        let mut board = self.board.borrow_mut();
        if let Some(handle) = board.countdown.take() {
            board.clock.cancel(handle);
        }
        board.remaining = i64::from(seconds);
        let handle = board.clock.schedule_repeating(
            DisplayTimer::CountdownStep,
            Duration::from_millis(COUNTDOWN_STEP_MS),
        );
        board.countdown = Some(handle);
    }

    fn stop_timer(&self) {
        let mut board = self.board.borrow_mut();
        if let Some(handle) = board.countdown.take() {
            board.clock.cancel(handle);
        }
    }

    fn show_button_number(&self, id: &str, number: usize) {
        self.board
            .borrow_mut()
            .labels
            .insert(id.to_string(), number.to_string());
    }

    fn clear_button_number(&self, id: &str) {
        self.board
            .borrow_mut()
            .labels
            .insert(id.to_string(), String::new());
    }

    fn clear_canvas(&self) {
        let mut board = self.board.borrow_mut();
        board.message = None;
        board.countdown_text.clear();
        board.labels.clear();
    }

    fn advance(&self, elapsed: Duration) {
        let mut board = self.board.borrow_mut();
        let until = board.clock.now() + elapsed;
        while let Some(fired) = board.clock.pop_due(until) {
            board.on_timer(fired.payload);
        }
    }
}
