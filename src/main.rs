//! Coin Lander entry point
//!
//! Browser builds render the game with plain DOM elements and drive it from
//! `requestAnimationFrame`. Native builds run the autopilot headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement};

    use coin_lander::sim::{Command, GameEvent};
    use coin_lander::{Autopilot, GameLoop, ScoreBook, Tuning};

    /// Game instance holding the driver and the DOM nodes it draws into
    struct Game {
        game: GameLoop,
        pilot: Autopilot,
        /// Idle/demo mode - autopilot plays the game
        idle_mode: bool,
        vehicle: HtmlElement,
        coin: HtmlElement,
        hud: HtmlElement,
        /// State dump panel, toggled with `d`
        debug: HtmlElement,
        show_debug: bool,
    }

    impl Game {
        /// Feed autopilot input (if idle) and advance one frame
        fn update(&mut self, time: f64) {
            if self.idle_mode {
                if let Some(command) = self.pilot.decide(self.game.state(), self.game.tuning()) {
                    self.game.queue_command(command);
                }
            }

            for event in self.game.frame(time) {
                match event {
                    GameEvent::Crashed { score } => log::info!("Crashed with score {}", score),
                    GameEvent::CoinRespawned { wind } => log::info!("Wind picks up: {:.3}", wind),
                    _ => {}
                }
            }

            if let Some(scores) = self.game.take_dirty_scores() {
                scores.save();
            }
        }

        /// Position DOM nodes from the current state
        fn render(&self) {
            let state = self.game.state();
            set_style(&self.vehicle, "left", &vw(state.pos.x));
            set_style(&self.vehicle, "bottom", &vw(state.pos.y));
            let _ = self
                .vehicle
                .set_attribute("class", if state.engine_on { "vehicle engine" } else { "vehicle" });

            set_style(&self.coin, "left", &vw(state.coin.x));
            set_style(&self.coin, "bottom", &vw(state.coin.y));
            set_style(
                &self.coin,
                "display",
                if state.coin_visible { "block" } else { "none" },
            );

            let scores = self.game.scores();
            let mut text = format!(
                "score {}  best {}  last {}",
                state.score, scores.best, scores.last
            );
            if state.paused {
                text.push_str("  (press to start)");
            }
            if self.idle_mode {
                text.push_str("  [autopilot]");
            }
            self.hud.set_text_content(Some(&text));

            if self.show_debug {
                self.debug.set_text_content(Some(&state.debug_json()));
            }
        }

        fn toggle_idle_mode(&mut self) {
            self.idle_mode = !self.idle_mode;
            log::info!("Idle mode: {}", self.idle_mode);
            if !self.idle_mode {
                if let Some(command) = self.pilot.disengage(self.game.state()) {
                    self.game.queue_command(command);
                }
            }
        }

        fn toggle_debug(&mut self) {
            self.show_debug = !self.show_debug;
            set_style(
                &self.debug,
                "display",
                if self.show_debug { "block" } else { "none" },
            );
        }
    }

    fn vw(value: f64) -> String {
        format!("{value}vw")
    }

    fn set_style(el: &HtmlElement, property: &str, value: &str) {
        let _ = el.style().set_property(property, value);
    }

    fn spawn_div(document: &Document, parent: &Element, class: &str) -> HtmlElement {
        spawn_element(document, parent, "div", class)
    }

    fn spawn_element(document: &Document, parent: &Element, tag: &str, class: &str) -> HtmlElement {
        let el: HtmlElement = document
            .create_element(tag)
            .expect("Failed to create element")
            .dyn_into()
            .expect("element is not an HtmlElement");
        el.set_class_name(class);
        let _ = parent.append_child(&el);
        el
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Coin Lander starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let root: Element = match document.get_element_by_id("game") {
            Some(el) => el,
            None => document.body().expect("no body").into(),
        };

        let tuning = Tuning::default();

        let platform = spawn_div(&document, &root, "platform");
        set_style(&platform, "left", &vw(tuning.platform_left));
        set_style(&platform, "width", &vw(tuning.platform_width));

        let coin = spawn_div(&document, &root, "coin");
        set_style(&coin, "width", &vw(tuning.coin_width));
        set_style(&coin, "height", &vw(tuning.coin_height));

        let vehicle = spawn_div(&document, &root, "vehicle");
        set_style(&vehicle, "width", &vw(tuning.vehicle_width));
        set_style(&vehicle, "height", &vw(tuning.vehicle_height));

        let hud = spawn_div(&document, &root, "hud");
        let debug = spawn_element(&document, &root, "pre", "debug");
        set_style(&debug, "display", "none");

        let game = Rc::new(RefCell::new(Game {
            game: GameLoop::new(tuning, ScoreBook::load()),
            pilot: Autopilot::default(),
            idle_mode: false,
            vehicle,
            coin,
            hud,
            debug,
            show_debug: false,
        }));

        setup_input_handlers(game.clone());
        setup_restart_button(&document, &root, game.clone());

        request_animation_frame(game);

        log::info!("Coin Lander running!");
    }

    /// Hold any input to fire the engine, release to cut it
    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        for kind in ["mousedown", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().game.queue_command(Command::StartEngine);
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["mouseup", "keyup", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().game.queue_command(Command::StopEngine);
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: `i` toggles autopilot, `d` the debug panel, anything else is throttle
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "i" if !event.repeat() => g.toggle_idle_mode(),
                "d" if !event.repeat() => g.toggle_debug(),
                "i" | "d" => {}
                _ => g.game.queue_command(Command::StartEngine),
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, root: &Element, game: Rc<RefCell<Game>>) {
        let Ok(btn) = document.create_element("button") else {
            return;
        };
        btn.set_text_content(Some("restart"));
        let _ = root.append_child(&btn);

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().game.queue_command(Command::Restart);
            log::info!("Game restarted");
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use coin_lander::consts::{DEMO_DURATION_MS, FRAME_MS};
    use coin_lander::sim::{Command, GameEvent};
    use coin_lander::{Autopilot, GameLoop, ScoreBook, Tuning};

    env_logger::init();
    log::info!("Coin Lander (native) starting...");
    log::info!("Native mode runs the autopilot headless - build for wasm32 to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    let mut game = GameLoop::new(tuning, ScoreBook::load());
    let pilot = Autopilot::default();

    let frames = (DEMO_DURATION_MS / FRAME_MS) as u64;
    let (mut coins, mut landings, mut crashes) = (0u32, 0u32, 0u32);
    for frame in 1..=frames {
        if let Some(command) = pilot.decide(game.state(), game.tuning()) {
            game.queue_command(command);
        }
        for event in game.frame(frame as f64 * FRAME_MS) {
            match event {
                GameEvent::CoinCollected { .. } => coins += 1,
                GameEvent::Landed => landings += 1,
                GameEvent::Crashed { .. } => crashes += 1,
                GameEvent::CoinRespawned { .. } => {}
            }
        }
        if let Some(scores) = game.take_dirty_scores() {
            scores.save();
        }
    }

    log::info!(
        "Demo finished: {} coins, {} landings, {} crashes, score {}",
        coins,
        landings,
        crashes,
        game.state().score
    );

    // End the running episode so its score reaches the book
    game.queue_command(Command::Restart);
    game.frame((frames + 1) as f64 * FRAME_MS);
    if let Some(scores) = game.take_dirty_scores() {
        scores.save();
    }

    if let Ok(json) = serde_json::to_string_pretty(game.scores()) {
        println!("{json}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> coin_lander::Tuning {
    use coin_lander::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Cannot read {}: {}, using default tuning", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("{}, using default tuning", e);
            Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
