//! Entity factories
//!
//! A factory pairs a data entity with its visual component. Concrete kinds
//! implement both hooks; `create` composes them.

use std::rc::Rc;

use super::entity::{Button, Grid};
use super::schema::{ButtonSchema, GridSchema};
use crate::view::{ButtonView, GridView, Render};

/// A freshly built entity and its view
#[derive(Debug)]
pub struct Spawned<D, V> {
    pub datum: D,
    pub view: V,
}

pub trait EntityFactory {
    type Schema;
    type Datum;
    type View;

    fn create_datum(&self, id: &str, schema: &Self::Schema) -> Self::Datum;
    fn create_view(&self, datum: &Self::Datum) -> Self::View;

    fn create(&self, id: &str, schema: &Self::Schema) -> Spawned<Self::Datum, Self::View> {
        let datum = self.create_datum(id, schema);
        let view = self.create_view(&datum);
        Spawned { datum, view }
    }
}

/// Builds movable buttons
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFactory;

impl EntityFactory for ObjectFactory {
    type Schema = ButtonSchema;
    type Datum = Button;
    type View = ButtonView;

    fn create_datum(&self, id: &str, schema: &ButtonSchema) -> Button {
        Button {
            id: id.to_string(),
            class_name: schema.element.class_name.clone(),
            style: schema.element.style.clone(),
            attributes: schema.element.attributes.clone(),
            vertex: schema.vertex.into(),
            events: schema.events.clone(),
        }
    }

    fn create_view(&self, datum: &Button) -> ButtonView {
        ButtonView::new(datum)
    }
}

/// Builds the container grid; its view forwards moves to `render`
#[derive(Clone)]
pub struct GridFactory {
    render: Rc<dyn Render>,
}

impl GridFactory {
    pub fn new(render: Rc<dyn Render>) -> Self {
        Self { render }
    }
}

impl EntityFactory for GridFactory {
    type Schema = GridSchema;
    type Datum = Grid;
    type View = GridView;

    fn create_datum(&self, id: &str, schema: &GridSchema) -> Grid {
        Grid::new(
            id,
            schema.element.class_name.clone(),
            schema.element.style.clone(),
            schema.element.attributes.clone(),
            schema.layers.iter().cloned().map(Into::into).collect(),
        )
    }

    fn create_view(&self, datum: &Grid) -> GridView {
        GridView::new(datum, self.render.clone())
    }
}
