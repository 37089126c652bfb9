//! Observable snapshot of the current grid and buttons
//!
//! Rebuilt every game. Nothing in the round logic reads it back; it exists so
//! tooling can watch what the engine is holding.

use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use super::observer::{Observer, ObserverId, StateBag, Subject};

#[derive(Debug, Default)]
pub struct StateStore {
    subject: Subject,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` and merge it in under `key`
    ///
    /// A value that fails to serialize is logged and skipped.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                let mut partial = StateBag::new();
                partial.insert(key.to_string(), v);
                self.subject.set_state(partial);
            }
            Err(e) => log::warn!("state store: could not record {key}: {e}"),
        }
    }

    pub fn set_state(&mut self, partial: StateBag) {
        self.subject.set_state(partial);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.subject.state().get(key)
    }

    pub fn state(&self) -> &StateBag {
        self.subject.state()
    }

    pub fn reset_state(&mut self) {
        self.subject.clear_state();
    }

    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> ObserverId {
        self.subject.add_observer(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) {
        self.subject.remove_observer(id);
    }
}
