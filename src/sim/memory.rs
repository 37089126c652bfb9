//! Append-only snapshot log
//!
//! Snapshots are deep copies taken through `serde_json`, so later mutation of
//! the source never leaks into the log.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct Memory {
    states: Vec<Value>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy of `state`; returns its index
    pub fn save_state<T: Serialize>(&mut self, state: &T) -> Option<usize> {
        match serde_json::to_value(state) {
            Ok(value) => {
                self.states.push(value);
                Some(self.states.len() - 1)
            }
            Err(e) => {
                log::warn!("memory: snapshot skipped: {e}");
                None
            }
        }
    }

    pub fn state(&self, index: usize) -> Option<&Value> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[Value] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
