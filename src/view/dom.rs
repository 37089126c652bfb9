//! Browser adapters
//!
//! `DomRender` puts one absolutely positioned `<button>` per entity into a
//! layer element. `DomDisplay` keeps the headless `Displayer` as its model and
//! copies it onto the page after every change.

use std::cell::RefCell;
use std::time::Duration;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use super::{Display, Displayer, Render, Viewport, VisualHandle};
use crate::sim::entity::Vertex;

pub const MESSAGE_ID: &str = "message-display";
pub const TIMER_ID: &str = "timer-display";
pub const BANNER_ID: &str = "notification-banner";

fn warn_js(context: &str, err: &JsValue) {
    log::warn!("{context}: {err:?}");
}

/// Renders buttons into the element with id `layer_id`
pub struct DomRender {
    document: Document,
    layer: Element,
}

impl DomRender {
    pub fn new(document: Document, layer_id: &str) -> Option<Self> {
        let layer = document.get_element_by_id(layer_id)?;
        Some(Self { document, layer })
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl Render for DomRender {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::new(0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    fn append_to_canvas(&self, handle: VisualHandle) {
        let el = match self.document.create_element("button") {
            Ok(el) => el,
            Err(e) => return warn_js("create button", &e),
        };
        el.set_id(&handle.id);
        el.set_class_name(&handle.class_name);
        for (key, value) in &handle.attributes {
            if let Err(e) = el.set_attribute(key, value) {
                warn_js("set attribute", &e);
            }
        }
        if let Err(e) = el.set_attribute("style", &handle.css_text()) {
            warn_js("set style", &e);
        }
        el.set_text_content(handle.label.as_deref());
        if let Err(e) = self.layer.append_child(&el) {
            warn_js("append button", &e);
        }
    }

    fn update_button_position(&self, id: &str, vertex: &Vertex) {
        if let Some(el) = self.html_element(id) {
            if let Err(e) = el.style().set_property("transform", &vertex.translate3d()) {
                warn_js("move button", &e);
            }
        }
    }

    fn enable_click(&self, id: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            if let Err(e) = el.class_list().add_1("armed") {
                warn_js("arm button", &e);
            }
        }
    }

    fn clear_canvas(&self) {
        while let Some(child) = self.layer.first_element_child() {
            child.remove();
        }
    }
}

/// Mirrors a `Displayer` onto the message, timer and banner elements
pub struct DomDisplay {
    document: Document,
    model: Displayer,
    /// Last banner state pushed to the page, to avoid restarting its CSS animation
    banner_shown: RefCell<Option<(String, bool)>>,
}

impl DomDisplay {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            model: Displayer::new(),
            banner_shown: RefCell::new(None),
        }
    }

    pub fn model(&self) -> &Displayer {
        &self.model
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn sync(&self) {
        match self.model.message() {
            Some(notice) => {
                self.set_text(MESSAGE_ID, &notice.text);
                if let Some(el) = self.document.get_element_by_id(MESSAGE_ID) {
                    el.set_class_name(notice.class());
                }
            }
            None => self.set_text(MESSAGE_ID, ""),
        }

        self.set_text(TIMER_ID, &self.model.countdown_text());

        let banner = self
            .model
            .notification()
            .map(|n| (n.text.clone(), self.model.notification_visible(), n.class()));
        let Some((text, visible, class)) = banner else {
            return;
        };
        if self.banner_shown.borrow().as_ref() == Some(&(text.clone(), visible)) {
            return;
        }
        if let Some(el) = self.document.get_element_by_id(BANNER_ID) {
            el.set_text_content(Some(&text));
            let suffix = if visible { " visible" } else { "" };
            el.set_class_name(&format!("notification {class}{suffix}"));
        }
        *self.banner_shown.borrow_mut() = Some((text, visible));
    }
}

impl Display for DomDisplay {
    fn show_message(&self, text: &str, success: bool) {
        self.model.show_message(text, success);
        self.sync();
    }

    fn show_notification(&self, text: &str, success: bool) {
        self.model.show_notification(text, success);
        *self.banner_shown.borrow_mut() = None;
        self.sync();
    }

    fn start_timer(&self, seconds: u32) {
        self.model.start_timer(seconds);
        self.sync();
    }

    fn stop_timer(&self) {
        self.model.stop_timer();
    }

    fn show_button_number(&self, id: &str, number: usize) {
        self.model.show_button_number(id, number);
        self.set_text(id, &number.to_string());
    }

    fn clear_button_number(&self, id: &str) {
        self.model.clear_button_number(id);
        self.set_text(id, "");
    }

    fn clear_canvas(&self) {
        self.model.clear_canvas();
        self.sync();
    }

    fn advance(&self, elapsed: Duration) {
        self.model.advance(elapsed);
        self.sync();
    }
}
