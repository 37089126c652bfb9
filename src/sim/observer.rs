//! One-to-many change notification
//!
//! A `Subject` holds a JSON object bag; `set_state` shallow-merges a partial
//! bag into it and synchronously hands the full result to every observer in
//! registration order.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

/// Opaque state carried by a subject
pub type StateBag = Map<String, Value>;

/// Receives the full state of a subject after every change
///
/// There is no default `update`; an observer that doesn't implement it
/// doesn't compile.
pub trait Observer {
    fn update(&self, state: &StateBag);
}

/// Handle returned by `Subject::add_observer`, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u32);

#[derive(Default)]
pub struct Subject {
    state: StateBag,
    observers: Vec<(ObserverId, Rc<dyn Observer>)>,
    next_id: u32,
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Idempotent; removing an unknown id does nothing
    pub fn remove_observer(&mut self, id: ObserverId) {
        self.observers.retain(|(oid, _)| *oid != id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_observers(&self) {
        for (_, observer) in &self.observers {
            observer.update(&self.state);
        }
    }

    pub fn set_state(&mut self, partial: StateBag) {
        self.state.extend(partial);
        self.notify_observers();
    }

    pub fn state(&self) -> &StateBag {
        &self.state
    }

    /// Drop all state and tell observers about the empty bag
    pub fn clear_state(&mut self) {
        self.state.clear();
        self.notify_observers();
    }
}
