//! Scramble Recall entry point
//!
//! Browser: builds the menu, pumps the engine clock and routes clicks.
//! Native: plays one round headlessly and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, MouseEvent};

    use scramble_recall::view::dom::{BANNER_ID, DomDisplay, DomRender, MESSAGE_ID, TIMER_ID};
    use scramble_recall::view::Display;
    use scramble_recall::{ButtonCount, Game, GameSettings, text};

    const MENU_ID: &str = "menu-container";
    const INPUT_ID: &str = "button-count";
    const START_ID: &str = "start-game";
    const CONTAINER_ID: &str = "game-container";
    const LAYER_ID: &str = "button-layer";
    /// Clock pump period (ms)
    const PUMP_MS: i32 = 50;

    /// Browser-side app: the running round plus its adapters
    struct App {
        game: Option<Game>,
        display: Rc<DomDisplay>,
        render: Rc<DomRender>,
        last_time: f64,
    }

    fn append(document: &Document, parent: &Element, tag: &str, id: &str) -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        if !id.is_empty() {
            el.set_id(id);
        }
        parent.append_child(&el)?;
        Ok(el)
    }

    fn build_ui(document: &Document) -> Result<(), JsValue> {
        let body = document.body().ok_or("no body")?;

        let menu = append(document, &body, "div", MENU_ID)?;
        let label = append(document, &menu, "label", "")?;
        label.set_text_content(Some(text::MENU_LABEL));
        label.set_attribute("for", INPUT_ID)?;
        let input = append(document, &menu, "input", INPUT_ID)?;
        input.set_attribute("type", "number")?;
        input.set_attribute("min", "3")?;
        input.set_attribute("max", "7")?;
        let start = append(document, &menu, "button", START_ID)?;
        start.set_text_content(Some(text::MENU_BUTTON));

        let container = append(document, &body, "div", CONTAINER_ID)?;
        let title = append(document, &container, "h1", "")?;
        title.set_text_content(Some(text::TITLE));
        append(document, &container, "div", MESSAGE_ID)?;
        append(document, &container, "div", TIMER_ID)?;
        let banner = append(document, &container, "div", BANNER_ID)?;
        banner.set_class_name("notification hidden");
        append(document, &body, "div", LAYER_ID)?;
        Ok(())
    }

    fn set_menu_hidden(document: &Document, hidden: bool) {
        if let Some(menu) = document.get_element_by_id(MENU_ID) {
            let list = menu.class_list();
            let result = if hidden {
                list.add_1("hidden")
            } else {
                list.remove_1("hidden")
            };
            if let Err(e) = result {
                log::warn!("menu visibility: {e:?}");
            }
        }
    }

    fn on_start(app: &Rc<RefCell<App>>, document: &Document) {
        let raw = document
            .get_element_by_id(INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();

        let mut a = app.borrow_mut();
        if a.game.is_some() {
            return;
        }
        match ButtonCount::parse(&raw) {
            Ok(count) => {
                set_menu_hidden(document, true);
                let seed = js_sys::Date::now() as u64;
                let mut game = Game::new(
                    count,
                    GameSettings::with_seed(seed),
                    a.display.clone(),
                    a.render.clone(),
                );
                game.start();
                log::info!("Round started: {} buttons, seed {}", count.get(), seed);
                a.game = Some(game);
            }
            Err(e) => {
                log::info!("Rejected menu input {raw:?}: {e}");
                a.display.show_message(e.user_message(), false);
            }
        }
    }

    fn pump(app: &Rc<RefCell<App>>, document: &Document) {
        let now = js_sys::Date::now();
        let mut a = app.borrow_mut();
        let elapsed = (now - a.last_time).max(0.0);
        a.last_time = now;

        let elapsed = Duration::from_secs_f64(elapsed / 1000.0);
        if let Some(game) = a.game.as_mut() {
            game.advance(elapsed);
            if game.is_over() {
                a.game = None;
                set_menu_hidden(document, false);
            }
        } else {
            a.display.advance(elapsed);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        build_ui(&document).expect("Failed to build UI");

        let render = DomRender::new(document.clone(), LAYER_ID).expect("no button layer");
        let app = Rc::new(RefCell::new(App {
            game: None,
            display: Rc::new(DomDisplay::new(document.clone())),
            render: Rc::new(render),
            last_time: js_sys::Date::now(),
        }));

        // Start button
        if let Some(btn) = document.get_element_by_id(START_ID) {
            let app = app.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                on_start(&app, &document);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Button clicks and hovers, delegated from the layer
        if let Some(layer) = document.get_element_by_id(LAYER_ID) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                let id = target.id();
                if let Some(game) = app.borrow_mut().game.as_mut() {
                    game.click(&id);
                }
            });
            let _ =
                layer.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                if let Some(game) = app.borrow().game.as_ref() {
                    game.hover(&target.id());
                }
            });
            let _ = layer
                .add_event_listener_with_callback("mouseover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clock
        {
            let app = app.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut()>::new(move || pump(&app, &document));
            let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                PUMP_MS,
            );
            closure.forget();
        }

        log::info!("Scramble Recall ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use scramble_recall::sim::GamePhase;
    use scramble_recall::view::{Displayer, HeadlessRender, Viewport};
    use scramble_recall::{ButtonCount, Game, GameSettings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let count = match std::env::args().nth(1).map(|arg| ButtonCount::parse(&arg)) {
        Some(Ok(count)) => count,
        Some(Err(e)) => {
            log::error!("{}: {e}", e.user_message());
            std::process::exit(2);
        }
        None => ButtonCount::new(scramble_recall::consts::MIN_BUTTONS)
            .expect("MIN_BUTTONS is in range"),
    };
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    log::info!("Scramble Recall (headless) - {} buttons, seed {seed}", count.get());

    let display = Rc::new(Displayer::new());
    let render = Rc::new(HeadlessRender::new(Viewport::new(1280.0, 720.0)));
    let mut game = Game::new(count, GameSettings::with_seed(seed), display.clone(), render.clone());
    game.start();

    // Autoplay: click back in the remembered order once recall opens
    let step = Duration::from_millis(100);
    let mut next_click = 0;
    let mut last_countdown = String::new();
    while !game.is_over() {
        game.advance(step);

        let countdown = display.countdown_text();
        if countdown != last_countdown && !countdown.is_empty() {
            log::info!("{countdown}");
        }
        last_countdown = countdown;

        if game.engine().phase() == GamePhase::Recalling {
            let Some(id) = game.engine().original_order().get(next_click).cloned() else {
                break;
            };
            game.click(&id);
            next_click += 1;
        }

        if let Some(notice) = display.notification().filter(|_| display.notification_visible()) {
            log::debug!("Banner: {}", notice.text);
        }
    }

    log::info!(
        "Round over after {:.1}s, {} moves rendered",
        game.engine().now().as_secs_f32(),
        render.move_count()
    );
    if let Some(notice) = display.notification() {
        log::info!("Result: {}", notice.text);
    }
}
