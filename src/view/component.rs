//! Visual components paired with data entities
//!
//! A `ButtonView` is the subject side: moving a button through it publishes
//! `{id, vertex}`. A `GridView` is the observer side: it forwards every
//! published move to the render capability.

use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Render;
use crate::sim::entity::{Button, Grid, Vertex};
use crate::sim::observer::{Observer, ObserverId, StateBag, Subject};

/// Payload published when a button moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: String,
    pub vertex: Vertex,
}

impl PositionUpdate {
    pub fn from_bag(state: &StateBag) -> Option<Self> {
        serde_json::from_value(Value::Object(state.clone())).ok()
    }

    fn to_bag(&self) -> StateBag {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => StateBag::new(),
        }
    }
}

/// Visual side of a button
#[derive(Debug)]
pub struct ButtonView {
    id: String,
    subject: Subject,
}

impl ButtonView {
    pub fn new(button: &Button) -> Self {
        Self {
            id: button.id.clone(),
            subject: Subject::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> ObserverId {
        self.subject.add_observer(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) {
        self.subject.remove_observer(id);
    }

    /// Move `button` and notify observers of its new vertex
    pub fn set_position(&mut self, button: &mut Button, pos: Vec2) {
        button.set_position(pos);
        let update = PositionUpdate {
            id: self.id.clone(),
            vertex: button.vertex,
        };
        self.subject.set_state(update.to_bag());
    }

    pub fn state(&self) -> &StateBag {
        self.subject.state()
    }
}

/// Visual side of the grid; keeps rendered buttons in step with their data
pub struct GridView {
    grid_id: String,
    render: Rc<dyn Render>,
}

impl GridView {
    pub fn new(grid: &Grid, render: Rc<dyn Render>) -> Self {
        Self {
            grid_id: grid.id.clone(),
            render,
        }
    }

    pub fn grid_id(&self) -> &str {
        &self.grid_id
    }
}

impl Observer for GridView {
    fn update(&self, state: &StateBag) {
        match PositionUpdate::from_bag(state) {
            Some(update) => self.render.update_button_position(&update.id, &update.vertex),
            None => log::warn!("grid {}: ignoring malformed position update", self.grid_id),
        }
    }
}
