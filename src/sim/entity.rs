//! Data entities: movable buttons and the grid that contains them
//!
//! Plain records. Presentation attributes are opaque string bags consumed only
//! by the render adapters.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// CSS-like key/value bag (`backgroundColor` -> `blue`)
pub type StyleBag = BTreeMap<String, String>;

/// Position and velocity of a movable entity
///
/// Velocity is carried along but nothing integrates it yet; positions are set
/// directly when a button is scrambled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Vertex {
    pub fn new(px: f32, py: f32, vx: f32, vy: f32) -> Self {
        Self {
            pos: Vec2::new(px, py),
            vel: Vec2::new(vx, vy),
        }
    }

    #[inline]
    pub fn px(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn py(&self) -> f32 {
        self.pos.y
    }

    /// CSS transform placing an element at this vertex
    pub fn translate3d(&self) -> String {
        format!("translate3d({}px, {}px, 0)", self.pos.x, self.pos.y)
    }
}

/// Callback invoked with the id of the button that raised it
pub type EventCallback = Rc<dyn Fn(&str)>;

/// Click/hover hooks a button was created with
#[derive(Clone, Default)]
pub struct Events {
    pub on_click: Option<EventCallback>,
    pub on_hover: Option<EventCallback>,
}

impl Events {
    pub fn click(&self, id: &str) {
        if let Some(cb) = &self.on_click {
            cb(id);
        }
    }

    pub fn hover(&self, id: &str) {
        if let Some(cb) = &self.on_hover {
            cb(id);
        }
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("on_click", &self.on_click.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .finish()
    }
}

/// A movable on-screen button
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: String,
    pub class_name: String,
    pub style: StyleBag,
    pub attributes: StyleBag,
    pub vertex: Vertex,
    #[serde(skip)]
    pub events: Events,
}

impl Button {
    pub fn set_position(&mut self, pos: Vec2) {
        self.vertex.pos = pos;
    }
}

/// A named view layer on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub objects: Vec<String>,
}

/// Container for buttons
///
/// Layers are carried for multi-view support; placement never consults them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub id: String,
    pub class_name: String,
    pub style: StyleBag,
    pub attributes: StyleBag,
    pub layers: Vec<Layer>,
    objects: BTreeMap<String, Button>,
}

impl Grid {
    pub fn new(
        id: impl Into<String>,
        class_name: impl Into<String>,
        style: StyleBag,
        attributes: StyleBag,
        layers: Vec<Layer>,
    ) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            style,
            attributes,
            layers,
            objects: BTreeMap::new(),
        }
    }

    /// Insert a button. Empty or already-present ids are rejected.
    pub fn add_object(&mut self, button: Button) -> bool {
        if button.id.is_empty() {
            log::warn!("grid {}: rejected object without an id", self.id);
            return false;
        }
        if self.objects.contains_key(&button.id) {
            log::warn!("grid {}: duplicate object id {}", self.id, button.id);
            return false;
        }
        self.objects.insert(button.id.clone(), button);
        true
    }

    pub fn remove_object(&mut self, id: &str) -> Option<Button> {
        let removed = self.objects.remove(id);
        if removed.is_none() {
            log::warn!("grid {}: no object found with id {}", self.id, id);
        }
        removed
    }

    pub fn object(&self, id: &str) -> Option<&Button> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut Button> {
        self.objects.get_mut(id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Button> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Shallow-merge new style entries over the current ones
    pub fn update_style(&mut self, new_styles: StyleBag) {
        self.style.extend(new_styles);
    }
}
