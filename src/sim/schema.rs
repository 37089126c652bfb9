//! Entity schemas: creation-time defaults for buttons and grids
//!
//! Every field is defaulted, so a partial JSON record fills in the rest from
//! the stock configuration.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::entity::{Events, Layer, StyleBag, Vertex};
use crate::error::SchemaError;

fn bag(pairs: &[(&str, &str)]) -> StyleBag {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Class, style and attributes shared by every element kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSchema {
    pub class_name: String,
    pub style: StyleBag,
    pub attributes: StyleBag,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexSchema {
    pub px: f32,
    pub py: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Default for VertexSchema {
    fn default() -> Self {
        Self {
            px: 0.0,
            py: 0.0,
            vx: 1.0,
            vy: 1.0,
        }
    }
}

impl From<VertexSchema> for Vertex {
    fn from(v: VertexSchema) -> Self {
        Vertex::new(v.px, v.py, v.vx, v.vy)
    }
}

/// Defaults for a movable button
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSchema {
    pub element: ElementSchema,
    pub vertex: VertexSchema,
    /// Hooks can't come from JSON; parsed schemas get the default loggers
    #[serde(skip)]
    pub events: Events,
}

impl Default for ButtonSchema {
    fn default() -> Self {
        Self {
            element: ElementSchema {
                class_name: "button".to_string(),
                style: bag(&[
                    ("backgroundColor", "blue"),
                    ("width", "100px"),
                    ("height", "50px"),
                    ("border", "1px solid #ccc"),
                ]),
                attributes: bag(&[("type", "button"), ("src", "")]),
            },
            vertex: VertexSchema::default(),
            events: default_events(),
        }
    }
}

fn default_events() -> Events {
    Events {
        on_click: Some(Rc::new(|id: &str| log::debug!("Button clicked! ({id})"))),
        on_hover: Some(Rc::new(|id: &str| log::debug!("Button hovered! ({id})"))),
    }
}

impl ButtonSchema {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let mut schema: Self = serde_json::from_str(json)?;
        schema.events = default_events();
        Ok(schema)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSchema {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub objects: Vec<String>,
}

impl Default for LayerSchema {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            visible: true,
            objects: Vec::new(),
        }
    }
}

impl From<LayerSchema> for Layer {
    fn from(l: LayerSchema) -> Self {
        Layer {
            id: l.id,
            name: l.name,
            visible: l.visible,
            objects: l.objects,
        }
    }
}

/// Defaults for the container grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSchema {
    pub element: ElementSchema,
    pub layers: Vec<LayerSchema>,
}

impl Default for GridSchema {
    fn default() -> Self {
        Self {
            element: ElementSchema {
                class_name: "canvas".to_string(),
                style: bag(&[
                    ("width", "800px"),
                    ("height", "600px"),
                    ("backgroundColor", "white"),
                    ("border", "1px solid #000"),
                ]),
                attributes: bag(&[("type", "canvas"), ("role", "presentation")]),
            },
            layers: vec![
                LayerSchema {
                    id: "layer-1".to_string(),
                    name: "Main View".to_string(),
                    visible: true,
                    objects: Vec::new(),
                },
                LayerSchema {
                    id: "layer-2".to_string(),
                    name: "Secondary View".to_string(),
                    visible: false,
                    objects: Vec::new(),
                },
            ],
        }
    }
}

impl GridSchema {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }
}
