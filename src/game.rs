//! Round bootstrap
//!
//! Builds the grid and buttons from schemas, hands them to the engine and
//! starts the round. One `Game` per round; the menu creates a fresh one each
//! time the player presses Go.

use std::rc::Rc;
use std::time::Duration;

use crate::settings::{ButtonCount, GameSettings};
use crate::sim::{
    ButtonSchema, Engine, EntityFactory, GamePhase, GridFactory, GridSchema, ObjectFactory,
};
use crate::view::{Display, Render};

pub const GRID_ID: &str = "game-grid";

/// Id of the `index`-th button (0-based)
pub fn button_id(index: usize) -> String {
    format!("button-{}", index + 1)
}

pub struct Game {
    button_count: ButtonCount,
    engine: Engine,
    display: Rc<dyn Display>,
    grid_factory: GridFactory,
    grid_schema: GridSchema,
    button_schema: ButtonSchema,
    started: bool,
}

impl Game {
    pub fn new(
        button_count: ButtonCount,
        settings: GameSettings,
        display: Rc<dyn Display>,
        render: Rc<dyn Render>,
    ) -> Self {
        Self {
            button_count,
            engine: Engine::new(settings, display.clone(), render.clone()),
            display,
            grid_factory: GridFactory::new(render),
            grid_schema: GridSchema::default(),
            button_schema: ButtonSchema::default(),
            started: false,
        }
    }

    /// Replace the stock schemas
    pub fn with_schemas(mut self, grid: GridSchema, button: ButtonSchema) -> Self {
        self.grid_schema = grid;
        self.button_schema = button;
        self
    }

    pub fn button_count(&self) -> ButtonCount {
        self.button_count
    }

    pub fn start(&mut self) {
        let grid = self.grid_factory.create_datum(GRID_ID, &self.grid_schema);
        let buttons = (0..self.button_count.get() as usize)
            .map(|i| ObjectFactory.create_datum(&button_id(i), &self.button_schema))
            .collect();
        self.engine.initialize_game(grid, buttons);
        self.engine.start_simulation(self.button_count.get());
        self.started = true;
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.display.clear_canvas();
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed);
    }

    pub fn click(&mut self, id: &str) {
        self.engine.handle_click(id);
    }

    pub fn hover(&self, id: &str) {
        self.engine.handle_hover(id);
    }

    /// Round was started and the engine has since returned to idle
    pub fn is_over(&self) -> bool {
        self.started && self.engine.phase() == GamePhase::Idle
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
