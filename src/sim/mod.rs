//! Game core
//!
//! Everything that decides what happens in a round lives here:
//! - Virtual clock only (the host pumps time in)
//! - Seeded RNG only
//! - Presentation reached only through the `view` capabilities

pub mod engine;
pub mod entity;
pub mod factory;
pub mod memory;
pub mod observer;
pub mod scheduler;
pub mod schema;
pub mod store;

pub use engine::{Engine, EngineSnapshot, GamePhase, Outcome, random_color, sample_position};
pub use entity::{Button, EventCallback, Events, Grid, Layer, StyleBag, Vertex};
pub use factory::{EntityFactory, GridFactory, ObjectFactory, Spawned};
pub use memory::Memory;
pub use observer::{Observer, ObserverId, StateBag, Subject};
pub use scheduler::{Fired, Scheduler, TimerHandle};
pub use schema::{ButtonSchema, ElementSchema, GridSchema, LayerSchema, VertexSchema};
pub use store::StateStore;
