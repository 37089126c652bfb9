//! In-memory canvas used by the native build and tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::{Render, Viewport, VisualHandle};
use crate::sim::entity::Vertex;

/// Parse `translate3d(Xpx, Ypx, 0)` back into a point
pub fn parse_translate3d(transform: &str) -> Option<Vec2> {
    let inner = transform
        .trim()
        .strip_prefix("translate3d(")?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let x = parts.next()?.strip_suffix("px")?.parse().ok()?;
    let y = parts.next()?.strip_suffix("px")?.parse().ok()?;
    Some(Vec2::new(x, y))
}

#[derive(Debug)]
pub struct HeadlessRender {
    viewport: Cell<Viewport>,
    elements: RefCell<BTreeMap<String, VisualHandle>>,
    clickable: RefCell<BTreeSet<String>>,
    moves: Cell<usize>,
    appends: Cell<usize>,
}

impl HeadlessRender {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            elements: RefCell::new(BTreeMap::new()),
            clickable: RefCell::new(BTreeSet::new()),
            moves: Cell::new(0),
            appends: Cell::new(0),
        }
    }

    /// Simulate a window resize
    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn element(&self, id: &str) -> Option<VisualHandle> {
        self.elements.borrow().get(id).cloned()
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        let elements = self.elements.borrow();
        let transform = elements.get(id)?.style.get("transform")?;
        parse_translate3d(transform)
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Number of position updates applied so far
    pub fn move_count(&self) -> usize {
        self.moves.get()
    }

    /// Number of `append_to_canvas` calls, including ones that replaced an id
    pub fn append_count(&self) -> usize {
        self.appends.get()
    }

    pub fn is_clickable(&self, id: &str) -> bool {
        self.clickable.borrow().contains(id)
    }
}

impl Render for HeadlessRender {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn append_to_canvas(&self, handle: VisualHandle) {
        self.appends.set(self.appends.get() + 1);
        self.elements.borrow_mut().insert(handle.id.clone(), handle);
    }

    fn update_button_position(&self, id: &str, vertex: &Vertex) {
        if let Some(handle) = self.elements.borrow_mut().get_mut(id) {
            handle.set_style("transform", vertex.translate3d());
            self.moves.set(self.moves.get() + 1);
        }
    }

    fn enable_click(&self, id: &str) {
        self.clickable.borrow_mut().insert(id.to_string());
    }

    fn clear_canvas(&self) {
        self.elements.borrow_mut().clear();
        self.clickable.borrow_mut().clear();
    }
}
