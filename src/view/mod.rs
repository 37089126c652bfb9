//! Presentation boundary
//!
//! The engine only talks to the screen through the `Display` and `Render`
//! capabilities defined here. Two adapter sets implement them:
//! - headless (`Displayer`, `HeadlessRender`) for native runs and tests
//! - DOM (`dom` module) for the browser build

pub mod component;
pub mod displayer;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MOVE_TRANSITION;
use crate::sim::entity::{Button, StyleBag, Vertex};

pub use component::{ButtonView, GridView, PositionUpdate};
pub use displayer::Displayer;
pub use headless::HeadlessRender;

/// Visible area buttons are placed in (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Description of a button element ready to be put on the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualHandle {
    pub id: String,
    pub class_name: String,
    pub style: StyleBag,
    pub attributes: StyleBag,
    pub label: Option<String>,
}

impl VisualHandle {
    pub fn set_style(&mut self, key: &str, value: impl Into<String>) {
        self.style.insert(key.to_string(), value.into());
    }

    /// `style` rendered as an inline CSS declaration list
    pub fn css_text(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{}: {};", css_property(k), v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `backgroundColor` -> `background-color`
pub fn css_property(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Text, countdown and banner output
pub trait Display {
    fn show_message(&self, text: &str, success: bool);
    /// Banner that hides itself after a few seconds
    fn show_notification(&self, text: &str, success: bool);
    /// Count down from `seconds`, one step per second
    fn start_timer(&self, seconds: u32);
    fn stop_timer(&self);
    fn show_button_number(&self, id: &str, number: usize);
    fn clear_button_number(&self, id: &str);
    fn clear_canvas(&self);
    /// Let display-side timers catch up with the engine clock
    fn advance(&self, _elapsed: Duration) {}
}

/// Button placement on the canvas
pub trait Render {
    fn viewport(&self) -> Viewport;

    /// Build the element for `button` at its current vertex
    ///
    /// Every element carries a transform transition so later position updates
    /// animate instead of jumping.
    fn render_button(&self, button: &Button) -> VisualHandle {
        let mut handle = VisualHandle {
            id: button.id.clone(),
            class_name: button.class_name.clone(),
            style: button.style.clone(),
            attributes: button.attributes.clone(),
            label: None,
        };
        handle.set_style("transform", button.vertex.translate3d());
        handle.set_style("position", "absolute");
        handle.set_style("transition", MOVE_TRANSITION);
        handle
    }

    fn append_to_canvas(&self, handle: VisualHandle);
    fn update_button_position(&self, id: &str, vertex: &Vertex);
    /// Called when a button starts accepting clicks
    fn enable_click(&self, _id: &str) {}
    fn clear_canvas(&self);
}
