//! Round orchestration
//!
//! Drives one round through `Idle -> Displaying -> Scrambling -> Recalling ->
//! Ended -> Idle`. All timing goes through a single virtual-clock scheduler the
//! host pumps with `advance`; every callback runs to completion before the
//! next one, so round state needs no locking.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Button, Grid};
use super::factory::{EntityFactory, GridFactory, ObjectFactory};
use super::memory::Memory;
use super::observer::Observer;
use super::scheduler::{Scheduler, TimerHandle};
use super::store::StateStore;
use crate::settings::{GameSettings, RoundTiming};
use crate::text;
use crate::view::{ButtonView, Display, Render, Viewport};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing on screen, waiting for a round
    Idle,
    /// Numbered buttons shown still while the countdown runs
    Displaying,
    /// Buttons hop to new positions every scramble period
    Scrambling,
    /// Player clicks buttons back in order
    Recalling,
    /// Outcome shown; reset is pending
    Ended(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTimer {
    BeginScramble,
    ScrambleTick,
    Reset,
}

/// Diagnostic record appended to `Memory` after every phase change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub at_ms: u64,
    pub phase: GamePhase,
    pub original_order: Vec<String>,
    pub clicked_order: Vec<String>,
    pub is_game_active: bool,
    pub scramble_ticks_done: u32,
    pub positions: BTreeMap<String, Vec2>,
}

/// Random `#rrggbb` color
pub fn random_color(rng: &mut impl Rng) -> String {
    format!("#{:06x}", rng.random_range(0..=0x00FF_FFFFu32))
}

/// Random top-left corner for a button
///
/// Drawn from the first `spawn_fraction` of the viewport, then clamped so the
/// whole `footprint` stays on screen. A viewport smaller than the footprint
/// pins the button to the origin.
pub fn sample_position(
    rng: &mut impl Rng,
    viewport: Viewport,
    footprint: Vec2,
    spawn_fraction: f32,
) -> Vec2 {
    let span = viewport.size() * spawn_fraction;
    let raw = Vec2::new(
        (rng.random::<f32>() * span.x).floor(),
        (rng.random::<f32>() * span.y).floor(),
    );
    let limit = viewport.size() - footprint;
    raw.min(limit).max(Vec2::ZERO)
}

pub struct Engine {
    settings: GameSettings,
    display: Rc<dyn Display>,
    render: Rc<dyn Render>,
    rng: Pcg32,
    scheduler: Scheduler<EngineTimer>,
    store: StateStore,
    memory: Memory,

    phase: GamePhase,
    timing: RoundTiming,
    grid: Option<Grid>,
    views: BTreeMap<String, ButtonView>,
    position_observers: Vec<Rc<dyn Observer>>,

    original_order: Vec<String>,
    clicked_order: Vec<String>,
    is_game_active: bool,
    scramble_timer: Option<TimerHandle>,
    scramble_ticks_done: u32,
}

impl Engine {
    pub fn new(settings: GameSettings, display: Rc<dyn Display>, render: Rc<dyn Render>) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self {
            settings,
            display,
            render,
            rng,
            scheduler: Scheduler::new(),
            store: StateStore::new(),
            memory: Memory::new(),
            phase: GamePhase::Idle,
            timing: RoundTiming::from_button_count(0),
            grid: None,
            views: BTreeMap::new(),
            position_observers: Vec::new(),
            original_order: Vec::new(),
            clicked_order: Vec::new(),
            is_game_active: false,
            scramble_timer: None,
            scramble_ticks_done: 0,
        }
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn original_order(&self) -> &[String] {
        &self.original_order
    }

    pub fn clicked_order(&self) -> &[String] {
        &self.clicked_order
    }

    pub fn is_game_active(&self) -> bool {
        self.is_game_active
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Buttons in their original order
    pub fn buttons(&self) -> Vec<&Button> {
        let Some(grid) = &self.grid else {
            return Vec::new();
        };
        self.placed()
            .into_iter()
            .filter_map(|(_, id)| grid.object(&id))
            .collect()
    }

    /// Ids that made it into the grid, with their position in `original_order`
    ///
    /// A repeated id only counts at its first position.
    fn placed(&self) -> Vec<(usize, String)> {
        let mut seen = BTreeSet::new();
        self.original_order
            .iter()
            .enumerate()
            .filter(|(_, id)| self.views.contains_key(*id) && seen.insert(*id))
            .map(|(index, id)| (index, id.clone()))
            .collect()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn timing(&self) -> RoundTiming {
        self.timing
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn scramble_ticks_done(&self) -> u32 {
        self.scramble_ticks_done
    }

    /// Engine clock (time pumped through `advance`)
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Watch every button move, in this round and later ones
    pub fn observe_positions(&mut self, observer: Rc<dyn Observer>) {
        for view in self.views.values_mut() {
            view.add_observer(observer.clone());
        }
        self.position_observers.push(observer);
    }

    // === Round lifecycle ===

    /// Take ownership of the round's grid and buttons
    ///
    /// `buttons` order is the order the player must reproduce.
    pub fn initialize_game(&mut self, mut grid: Grid, buttons: Vec<Button>) {
        if self.phase != GamePhase::Idle {
            log::warn!("initialize_game during {:?}; resetting first", self.phase);
            self.reset();
        }
        self.memory.clear();

        let grid_view = Rc::new(GridFactory::new(self.render.clone()).create_view(&grid));
        self.views.clear();
        self.original_order = buttons.iter().map(|b| b.id.clone()).collect();
        self.clicked_order.clear();

        for button in buttons {
            let mut view = ObjectFactory.create_view(&button);
            view.add_observer(grid_view.clone());
            for observer in &self.position_observers {
                view.add_observer(observer.clone());
            }
            let id = button.id.clone();
            if grid.add_object(button) {
                self.views.insert(id, view);
            }
        }

        self.store.set("grid", &grid);
        self.store.set("buttons", &self.original_order);
        self.grid = Some(grid);
        log::info!("Game initialized with {} buttons", self.original_order.len());
    }

    /// Start a round whose countdown and scramble count equal `button_count`
    pub fn start_simulation(&mut self, button_count: u32) {
        self.start_simulation_with(RoundTiming::from_button_count(button_count));
    }

    pub fn start_simulation_with(&mut self, timing: RoundTiming) {
        if self.phase != GamePhase::Idle {
            log::warn!("start_simulation ignored during {:?}", self.phase);
            return;
        }
        self.timing = timing;
        self.is_game_active = true;
        self.clicked_order.clear();
        self.scramble_ticks_done = 0;

        self.display.show_message(text::GAME_STARTED, false);
        self.display.start_timer(timing.display_secs);
        self.render_initial_buttons();

        self.scheduler
            .schedule_once(EngineTimer::BeginScramble, timing.display_duration());
        self.enter(GamePhase::Displaying);
    }

    fn render_initial_buttons(&mut self) {
        let placed = self.placed();
        let Some(grid) = &self.grid else {
            return;
        };
        for (index, id) in placed {
            let Some(button) = grid.object(&id) else {
                continue;
            };
            let mut handle = self.render.render_button(button);
            handle.set_style("backgroundColor", random_color(&mut self.rng));
            handle.label = Some((index + 1).to_string());
            self.render.append_to_canvas(handle);
        }
    }

    fn begin_scramble(&mut self) {
        self.display.stop_timer();
        self.enter(GamePhase::Scrambling);
        if self.timing.scramble_ticks == 0 {
            self.start_memory_game();
            return;
        }
        let handle = self
            .scheduler
            .schedule_repeating(EngineTimer::ScrambleTick, self.settings.scramble_period());
        self.scramble_timer = Some(handle);
    }

    fn scramble_tick(&mut self) {
        if self.phase != GamePhase::Scrambling {
            return;
        }
        self.scramble_buttons();
        self.scramble_ticks_done += 1;
        log::debug!(
            "Scramble tick {}/{}",
            self.scramble_ticks_done,
            self.timing.scramble_ticks
        );

        if self.scramble_ticks_done >= self.timing.scramble_ticks {
            if let Some(handle) = self.scramble_timer.take() {
                self.scheduler.cancel(handle);
            }
            self.start_memory_game();
        }
    }

    /// Move every button to a fresh random position
    fn scramble_buttons(&mut self) {
        let viewport = self.render.viewport();
        let placed = self.placed();
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        for (_, id) in &placed {
            let pos = sample_position(
                &mut self.rng,
                viewport,
                self.settings.button_footprint,
                self.settings.spawn_fraction,
            );
            if let (Some(button), Some(view)) = (grid.object_mut(id), self.views.get_mut(id)) {
                view.set_position(button, pos);
            }
        }
    }

    fn start_memory_game(&mut self) {
        self.display.show_message(text::RECALL_STARTED, false);
        for (_, id) in self.placed() {
            self.display.clear_button_number(&id);
            self.render.enable_click(&id);
        }
        self.enter(GamePhase::Recalling);
    }

    /// Player clicked button `id`
    ///
    /// Only counts during recall while the round is live; anything else is
    /// dropped.
    pub fn handle_click(&mut self, id: &str) {
        if !self.is_game_active || self.phase != GamePhase::Recalling {
            log::debug!("Click on {id} ignored during {:?}", self.phase);
            return;
        }
        let Some(button) = self.grid.as_ref().and_then(|g| g.object(id)) else {
            log::warn!("Click on unknown button {id}");
            return;
        };
        button.events.click(id);

        self.clicked_order.push(id.to_string());
        let index = self.clicked_order.len() - 1;

        if self.original_order.get(index).map(String::as_str) == Some(id) {
            self.display.show_button_number(id, index + 1);
            if self.clicked_order.len() == self.original_order.len() {
                self.end_game(Outcome::Win);
            }
        } else {
            self.end_game(Outcome::Lose);
        }
    }

    /// Pointer entered button `id`
    pub fn handle_hover(&self, id: &str) {
        if let Some(button) = self.grid.as_ref().and_then(|g| g.object(id)) {
            button.events.hover(id);
        }
    }

    fn end_game(&mut self, outcome: Outcome) {
        self.is_game_active = false;
        match outcome {
            Outcome::Win => self.display.show_notification(text::EXCELLENT_MEMORY, true),
            Outcome::Lose => {
                self.display.show_notification(text::WRONG_ORDER, false);
                self.reveal_correct_order();
            }
        }
        self.scheduler
            .schedule_once(EngineTimer::Reset, self.settings.reset_delay());
        self.enter(GamePhase::Ended(outcome));
    }

    fn reveal_correct_order(&self) {
        for (index, id) in self.placed() {
            self.display.show_button_number(&id, index + 1);
        }
    }

    /// Drop the round and return to `Idle`
    ///
    /// Safe to call from any phase, any number of times.
    pub fn reset(&mut self) {
        if let Some(handle) = self.scramble_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.scheduler.clear_all();
        self.display.stop_timer();
        self.render.clear_canvas();

        self.grid = None;
        self.views.clear();
        self.original_order.clear();
        self.clicked_order.clear();
        self.is_game_active = false;
        self.scramble_ticks_done = 0;
        self.store.reset_state();

        if self.phase != GamePhase::Idle {
            self.enter(GamePhase::Idle);
        }
    }

    // === Clock ===

    /// Pump the clock by `elapsed`, firing due timers in order
    ///
    /// The display is advanced up to each timer's instant before the timer
    /// runs, so both sides see the same time.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        loop {
            let before = self.scheduler.now();
            let fired = self.scheduler.pop_due(until);
            self.display.advance(self.scheduler.now() - before);
            match fired {
                Some(fired) => self.on_timer(fired.payload),
                None => break,
            }
        }
    }

    fn on_timer(&mut self, timer: EngineTimer) {
        match timer {
            EngineTimer::BeginScramble => self.begin_scramble(),
            EngineTimer::ScrambleTick => self.scramble_tick(),
            EngineTimer::Reset => self.reset(),
        }
    }

    fn enter(&mut self, phase: GamePhase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        let snapshot = self.snapshot();
        self.memory.save_state(&snapshot);
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let positions = self
            .buttons()
            .into_iter()
            .map(|b| (b.id.clone(), b.vertex.pos))
            .collect();
        EngineSnapshot {
            at_ms: u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX),
            phase: self.phase,
            original_order: self.original_order.clone(),
            clicked_order: self.clicked_order.clone(),
            is_game_active: self.is_game_active,
            scramble_ticks_done: self.scramble_ticks_done,
            positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::StyleBag;
    use crate::sim::observer::StateBag;
    use crate::sim::schema::ButtonSchema;
    use crate::view::{Displayer, HeadlessRender, PositionUpdate};
    use proptest::prelude::*;
    use std::cell::RefCell;

    const VIEWPORT: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    struct Rig {
        engine: Engine,
        display: Rc<Displayer>,
        render: Rc<HeadlessRender>,
    }

    fn buttons(count: u32) -> Vec<Button> {
        let schema = ButtonSchema::default();
        (1..=count)
            .map(|i| ObjectFactory.create_datum(&format!("button-{i}"), &schema))
            .collect()
    }

    fn grid() -> Grid {
        Grid::new("game-grid", "canvas", StyleBag::new(), StyleBag::new(), Vec::new())
    }

    fn rig_with(seed: u64, viewport: Viewport, count: u32) -> Rig {
        let display = Rc::new(Displayer::new());
        let render = Rc::new(HeadlessRender::new(viewport));
        let mut engine = Engine::new(
            GameSettings::with_seed(seed),
            display.clone(),
            render.clone(),
        );
        engine.initialize_game(grid(), buttons(count));
        Rig {
            engine,
            display,
            render,
        }
    }

    fn rig(count: u32) -> Rig {
        rig_with(7, VIEWPORT, count)
    }

    /// Start a round and pump the clock until recall begins
    fn to_recall(rig: &mut Rig, count: u32) {
        rig.engine.start_simulation(count);
        rig.engine.advance(secs(u64::from(count)));
        rig.engine.advance(secs(2 * u64::from(count)));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling, "should be recalling");
    }

    #[derive(Default)]
    struct MoveLog {
        moves: RefCell<Vec<PositionUpdate>>,
    }

    impl Observer for MoveLog {
        fn update(&self, state: &StateBag) {
            if let Some(update) = PositionUpdate::from_bag(state) {
                self.moves.borrow_mut().push(update);
            }
        }
    }

    #[test]
    fn test_original_order_matches_input() {
        for count in 3..=7 {
            let mut rig = rig(count);
            rig.engine.start_simulation(count);
            let expected: Vec<String> = (1..=count).map(|i| format!("button-{i}")).collect();
            assert_eq!(rig.engine.original_order(), expected.as_slice());
            assert_eq!(rig.render.len(), count as usize);
        }
    }

    #[test]
    fn test_display_phase_renders_numbered_buttons() {
        let mut rig = rig(3);
        rig.engine.start_simulation(3);

        assert_eq!(rig.engine.phase(), GamePhase::Displaying);
        assert!(rig.engine.is_game_active());
        assert_eq!(
            rig.display.message().map(|m| m.text),
            Some(text::GAME_STARTED.to_string())
        );
        assert!(rig.display.countdown_running());

        let first = rig.render.element("button-1").unwrap();
        assert_eq!(first.label.as_deref(), Some("1"));
        let color = first.style.get("backgroundColor").unwrap();
        assert!(color.starts_with('#') && color.len() == 7, "bad color {color}");
        assert_eq!(
            rig.render.element("button-3").and_then(|h| h.label),
            Some("3".to_string())
        );
    }

    #[test]
    fn test_round_timeline() {
        let mut rig = rig(3);
        rig.engine.start_simulation(3);

        rig.engine.advance(ms(2999));
        assert_eq!(rig.engine.phase(), GamePhase::Displaying);
        assert_eq!(rig.display.countdown_text(), "Time left: 2 seconds");

        rig.engine.advance(ms(1));
        assert_eq!(rig.engine.phase(), GamePhase::Scrambling);
        assert!(!rig.display.countdown_running());
        assert_eq!(rig.render.move_count(), 0);

        rig.engine.advance(ms(2000));
        assert_eq!(rig.engine.scramble_ticks_done(), 1);
        assert_eq!(rig.render.move_count(), 3);

        rig.engine.advance(ms(4000));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        assert_eq!(rig.engine.scramble_ticks_done(), 3);
        assert_eq!(rig.render.move_count(), 9);
        assert_eq!(rig.engine.pending_timers(), 0);
        assert_eq!(
            rig.display.message().map(|m| m.text),
            Some(text::RECALL_STARTED.to_string())
        );
        assert_eq!(rig.display.label("button-2").as_deref(), Some(""));
        assert!(rig.render.is_clickable("button-1"));

        // No more ticks once recall started
        rig.engine.advance(secs(60));
        assert_eq!(rig.render.move_count(), 9);
    }

    #[test]
    fn test_large_step_runs_whole_round_in_order() {
        let mut rig = rig(4);
        rig.engine.start_simulation(4);
        rig.engine.advance(secs(600));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        assert_eq!(rig.engine.scramble_ticks_done(), 4);
        assert_eq!(rig.render.move_count(), 16);
    }

    #[test]
    fn test_clicking_in_order_wins() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);

        rig.engine.handle_click("button-1");
        rig.engine.handle_click("button-2");
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        assert_eq!(rig.display.label("button-2").as_deref(), Some("2"));
        rig.engine.handle_click("button-3");

        assert_eq!(rig.engine.phase(), GamePhase::Ended(Outcome::Win));
        assert!(!rig.engine.is_game_active());
        assert_eq!(
            rig.display.notification().map(|n| (n.text, n.success)),
            Some((text::EXCELLENT_MEMORY.to_string(), true))
        );
    }

    #[test]
    fn test_wrong_click_loses_immediately_and_reveals_order() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);

        rig.engine.handle_click("button-1");
        rig.engine.handle_click("button-3");

        assert_eq!(rig.engine.phase(), GamePhase::Ended(Outcome::Lose));
        assert_eq!(rig.engine.clicked_order().len(), 2);
        assert_eq!(
            rig.display.notification().map(|n| n.text),
            Some(text::WRONG_ORDER.to_string())
        );
        for i in 1..=3 {
            assert_eq!(
                rig.display.label(&format!("button-{i}")),
                Some(i.to_string())
            );
        }
    }

    #[test]
    fn test_late_clicks_are_ignored() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);
        rig.engine.handle_click("button-2");
        assert_eq!(rig.engine.phase(), GamePhase::Ended(Outcome::Lose));

        rig.engine.handle_click("button-1");
        rig.engine.handle_click("button-2");
        assert_eq!(rig.engine.clicked_order(), ["button-2".to_string()].as_slice());
    }

    #[test]
    fn test_clicks_before_recall_are_ignored() {
        let mut rig = rig(3);
        rig.engine.handle_click("button-1");
        rig.engine.start_simulation(3);
        rig.engine.handle_click("button-1");
        rig.engine.advance(secs(3));
        rig.engine.handle_click("button-1");
        assert!(rig.engine.clicked_order().is_empty());
        assert_eq!(rig.engine.phase(), GamePhase::Scrambling);
    }

    #[test]
    fn test_unknown_button_click_is_ignored() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);
        rig.engine.handle_click("button-99");
        assert!(rig.engine.clicked_order().is_empty());
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
    }

    #[test]
    fn test_auto_reset_after_end() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);
        for i in 1..=3 {
            rig.engine.handle_click(&format!("button-{i}"));
        }
        rig.engine.advance(ms(2999));
        assert_eq!(rig.engine.phase(), GamePhase::Ended(Outcome::Win));
        rig.engine.advance(ms(1));

        assert_eq!(rig.engine.phase(), GamePhase::Idle);
        assert!(rig.render.is_empty());
        assert!(rig.engine.original_order().is_empty());
        assert!(rig.engine.grid().is_none());
        assert_eq!(rig.engine.pending_timers(), 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = rig(3);
        to_recall(&mut once, 3);
        once.engine.handle_click("button-3");
        once.engine.reset();

        let mut twice = rig(3);
        to_recall(&mut twice, 3);
        twice.engine.handle_click("button-3");
        twice.engine.reset();
        let snapshots = twice.engine.memory().len();
        twice.engine.reset();

        for engine in [&once.engine, &twice.engine] {
            assert_eq!(engine.phase(), GamePhase::Idle);
            assert_eq!(engine.pending_timers(), 0);
            assert!(engine.original_order().is_empty());
            assert!(engine.clicked_order().is_empty());
            assert!(!engine.is_game_active());
            assert!(engine.store().state().is_empty());
        }
        assert_eq!(twice.engine.memory().len(), snapshots);
        assert_eq!(once.engine.snapshot(), twice.engine.snapshot());
    }

    #[test]
    fn test_reset_mid_scramble_cancels_ticks() {
        let mut rig = rig(5);
        rig.engine.start_simulation(5);
        rig.engine.advance(secs(7));
        assert_eq!(rig.engine.phase(), GamePhase::Scrambling);
        let moves = rig.render.move_count();

        rig.engine.reset();
        rig.engine.advance(secs(60));
        assert_eq!(rig.engine.phase(), GamePhase::Idle);
        assert_eq!(rig.render.move_count(), moves);
        assert!(!rig.display.countdown_running());
    }

    #[test]
    fn test_reset_from_idle_is_safe() {
        let display = Rc::new(Displayer::new());
        let render = Rc::new(HeadlessRender::new(VIEWPORT));
        let mut engine = Engine::new(GameSettings::default(), display, render);
        engine.reset();
        engine.reset();
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert!(engine.memory().is_empty());
    }

    #[test]
    fn test_reset_during_display_cancels_scramble() {
        let mut rig = rig(3);
        rig.engine.start_simulation(3);
        rig.engine.advance(secs(1));
        rig.engine.reset();
        rig.engine.advance(secs(30));
        assert_eq!(rig.engine.phase(), GamePhase::Idle);
        assert_eq!(rig.render.move_count(), 0);
    }

    #[test]
    fn test_decoupled_timing() {
        let mut rig = rig(3);
        rig.engine.start_simulation_with(RoundTiming {
            display_secs: 5,
            scramble_ticks: 1,
        });
        rig.engine.advance(secs(4));
        assert_eq!(rig.engine.phase(), GamePhase::Displaying);
        rig.engine.advance(secs(1));
        assert_eq!(rig.engine.phase(), GamePhase::Scrambling);
        rig.engine.advance(secs(2));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        assert_eq!(rig.render.move_count(), 3);
    }

    #[test]
    fn test_zero_scramble_ticks_goes_straight_to_recall() {
        let mut rig = rig(3);
        rig.engine.start_simulation_with(RoundTiming {
            display_secs: 1,
            scramble_ticks: 0,
        });
        rig.engine.advance(secs(1));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        assert_eq!(rig.render.move_count(), 0);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut rig = rig(3);
        rig.engine.start_simulation(3);
        rig.engine.start_simulation(3);
        assert_eq!(rig.engine.pending_timers(), 1);
    }

    #[test]
    fn test_position_observers_fan_out() {
        let mut rig = rig(3);
        let log = Rc::new(MoveLog::default());
        rig.engine.observe_positions(log.clone());
        to_recall(&mut rig, 3);

        let moves = log.moves.borrow();
        assert_eq!(moves.len(), 9);
        for update in moves.iter() {
            assert!(rig.render.position_of(&update.id).is_some());
        }
        // Renderer ends where the data ends
        for button in rig.engine.buttons() {
            assert_eq!(rig.render.position_of(&button.id), Some(button.vertex.pos));
        }
    }

    #[test]
    fn test_observers_survive_into_next_round() {
        let mut rig = rig(3);
        let log = Rc::new(MoveLog::default());
        rig.engine.observe_positions(log.clone());
        rig.engine.reset();
        rig.engine.initialize_game(grid(), buttons(3));
        to_recall(&mut rig, 3);
        assert_eq!(log.moves.borrow().len(), 9);
    }

    #[test]
    fn test_memory_records_each_transition() {
        let mut rig = rig(3);
        to_recall(&mut rig, 3);
        for i in 1..=3 {
            rig.engine.handle_click(&format!("button-{i}"));
        }
        rig.engine.advance(secs(3));

        let phases: Vec<GamePhase> = rig
            .engine
            .memory()
            .states()
            .iter()
            .filter_map(|v| serde_json::from_value::<EngineSnapshot>(v.clone()).ok())
            .map(|s| s.phase)
            .collect();
        assert_eq!(
            phases,
            vec![
                GamePhase::Displaying,
                GamePhase::Scrambling,
                GamePhase::Recalling,
                GamePhase::Ended(Outcome::Win),
                GamePhase::Idle,
            ]
        );
    }

    #[test]
    fn test_store_tracks_round() {
        let rig = rig(4);
        let buttons = rig.engine.store().get("buttons").cloned();
        assert_eq!(
            buttons,
            Some(serde_json::json!(["button-1", "button-2", "button-3", "button-4"]))
        );
        assert!(rig.engine.store().get("grid").is_some());
    }

    #[test]
    fn test_duplicate_button_ids_are_dropped_from_grid() {
        let display = Rc::new(Displayer::new());
        let render = Rc::new(HeadlessRender::new(VIEWPORT));
        let mut engine = Engine::new(GameSettings::default(), display, render.clone());
        let mut list = buttons(3);
        list[2].id = "button-1".to_string();
        engine.initialize_game(grid(), list);
        engine.start_simulation(3);
        assert_eq!(engine.grid().map(Grid::len), Some(2));
        assert_eq!(render.append_count(), 2);
        assert_eq!(engine.buttons().len(), 2);

        // Each surviving button moves once per tick
        engine.advance(secs(5));
        assert_eq!(engine.scramble_ticks_done(), 1);
        assert_eq!(render.move_count(), 2);
    }

    #[test]
    fn test_duplicate_id_reveal_uses_first_position() {
        let display = Rc::new(Displayer::new());
        let render = Rc::new(HeadlessRender::new(VIEWPORT));
        let mut engine = Engine::new(GameSettings::default(), display.clone(), render);
        let mut list = buttons(3);
        list[2].id = "button-1".to_string();
        engine.initialize_game(grid(), list);
        engine.start_simulation(3);
        engine.advance(secs(9));
        assert_eq!(engine.phase(), GamePhase::Recalling);

        engine.handle_click("button-2");
        assert_eq!(engine.phase(), GamePhase::Ended(Outcome::Lose));
        assert_eq!(display.label("button-1").as_deref(), Some("1"));
        assert_eq!(display.label("button-2").as_deref(), Some("2"));
    }

    #[test]
    fn test_scramble_follows_viewport_resize() {
        let mut rig = rig(3);
        rig.engine.start_simulation(3);
        rig.engine.advance(secs(3));
        rig.render.set_viewport(Viewport::new(300.0, 200.0));
        rig.engine.advance(secs(6));
        assert_eq!(rig.engine.phase(), GamePhase::Recalling);
        for button in rig.engine.buttons() {
            assert!(button.vertex.pos.x <= 200.0, "{:?}", button.vertex.pos);
            assert!(button.vertex.pos.y <= 150.0, "{:?}", button.vertex.pos);
        }
    }

    #[test]
    fn test_hover_fires_button_hook_in_any_phase() {
        let hovered = Rc::new(RefCell::new(Vec::new()));
        let sink = hovered.clone();
        let mut list = buttons(3);
        list[1].events.on_hover = Some(Rc::new(move |id: &str| {
            sink.borrow_mut().push(id.to_string());
        }));

        let display = Rc::new(Displayer::new());
        let render = Rc::new(HeadlessRender::new(VIEWPORT));
        let mut engine = Engine::new(GameSettings::default(), display, render);
        engine.initialize_game(grid(), list);
        engine.handle_hover("button-2");
        engine.start_simulation(3);
        engine.handle_hover("button-2");
        engine.handle_hover("button-1");
        engine.handle_hover("button-99");
        assert_eq!(*hovered.borrow(), vec!["button-2".to_string(); 2]);
    }

    #[test]
    fn test_same_seed_same_scramble() {
        let mut a = rig_with(99, VIEWPORT, 4);
        let mut b = rig_with(99, VIEWPORT, 4);
        to_recall(&mut a, 4);
        to_recall(&mut b, 4);
        for id in a.engine.original_order() {
            assert_eq!(a.render.position_of(id), b.render.position_of(id));
        }
    }

    #[test]
    fn test_tiny_viewport_pins_to_origin() {
        let mut rig = rig_with(3, Viewport::new(60.0, 20.0), 3);
        to_recall(&mut rig, 3);
        for button in rig.engine.buttons() {
            assert_eq!(button.vertex.pos, Vec2::ZERO);
        }
    }

    proptest! {
        #[test]
        fn prop_sample_position_in_bounds(
            seed in any::<u64>(),
            width in 0f32..4000.0,
            height in 0f32..3000.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let footprint = Vec2::new(100.0, 50.0);
            let pos = sample_position(&mut rng, Viewport::new(width, height), footprint, 0.8);
            prop_assert!(pos.x >= 0.0 && pos.y >= 0.0);
            prop_assert!(pos.x <= (width - 100.0).max(0.0));
            prop_assert!(pos.y <= (height - 50.0).max(0.0));
        }

        #[test]
        fn prop_every_scramble_tick_stays_on_screen(
            seed in any::<u64>(),
            count in 3u32..=7,
            width in 200f32..2500.0,
            height in 100f32..1600.0,
        ) {
            let mut rig = rig_with(seed, Viewport::new(width, height), count);
            let log = Rc::new(MoveLog::default());
            rig.engine.observe_positions(log.clone());
            rig.engine.start_simulation(count);
            rig.engine.advance(secs(3 * u64::from(count)));

            let moves = log.moves.borrow();
            prop_assert_eq!(moves.len(), (count * count) as usize);
            for update in moves.iter() {
                let pos = update.vertex.pos;
                prop_assert!(pos.x >= 0.0 && pos.x <= width - 100.0);
                prop_assert!(pos.y >= 0.0 && pos.y <= height - 50.0);
            }
        }

        #[test]
        fn prop_any_wrong_first_click_loses(count in 3u32..=7, wrong in 2u32..=7) {
            prop_assume!(wrong <= count);
            let mut rig = rig(count);
            to_recall(&mut rig, count);
            rig.engine.handle_click(&format!("button-{wrong}"));
            prop_assert_eq!(rig.engine.phase(), GamePhase::Ended(Outcome::Lose));
        }
    }
}
