//! Pixel Muncher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use pixel_muncher::consts::SIM_DT;
    use pixel_muncher::persistence::LocalStore;
    use pixel_muncher::platform::{SwipeTracker, direction_for_key};
    use pixel_muncher::sim::{GameEvent, GamePhase, PickupKind};
    use pixel_muncher::ui::{Hud, palette, tile_color};
    use pixel_muncher::{Difficulty, Session};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore>,
        ctx: CanvasRenderingContext2d,
        document: Document,
        last_time: f64,
        swipe: SwipeTracker,
        // Last HUD written to the DOM
        hud: Option<Hud>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for event in self.session.advance(dt) {
                log_event(&event);
            }
        }

        /// Render the current frame
        fn render(&self) {
            let state = self.session.state();
            let tile = f64::from(state.tuning.tile_size);
            let ctx = &self.ctx;

            ctx.set_fill_style_str(palette::BACKGROUND);
            ctx.fill_rect(
                0.0,
                0.0,
                state.maze.width() as f64 * tile,
                state.maze.height() as f64 * tile,
            );

            for ((col, row), kind) in state.maze.iter() {
                let Some(color) = tile_color(kind) else {
                    continue;
                };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(f64::from(col) * tile, f64::from(row) * tile, tile, tile);
            }

            for pickup in &state.pickups {
                let color = match pickup.kind {
                    PickupKind::Dot => palette::DOT,
                    PickupKind::Power => palette::POWER,
                };
                fill_circle(ctx, pickup.pos.x, pickup.pos.y, pickup.radius, color);
            }

            if state.phase == GamePhase::Menu {
                return;
            }
            let (player, pursuer) = (&state.player, &state.pursuer);
            fill_circle(ctx, player.pos.x, player.pos.y, player.radius, palette::PLAYER);
            fill_circle(ctx, pursuer.pos.x, pursuer.pos.y, pursuer.radius, palette::PURSUER);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = Hud::from_state(self.session.state());
            if self.hud.as_ref() == Some(&hud) {
                return;
            }

            let document = &self.document;
            set_text(document, "score", &hud.score);
            set_text(document, "highscore", &hud.high_score);
            set_text(document, "lives", &hud.lives);
            set_hidden(document, "start-menu", !hud.show_start_menu);

            match hud.end_title {
                Some(title) => {
                    set_text(document, "game-over-title", title);
                    set_text(document, "final-score", &hud.score);
                    set_text(document, "final-highscore", &hud.high_score);
                    set_hidden(document, "game-over-menu", false);
                }
                None => set_hidden(document, "game-over-menu", true),
            }

            self.hud = Some(hud);
        }
    }

    fn fill_circle(ctx: &CanvasRenderingContext2d, x: f32, y: f32, r: f32, color: &str) {
        ctx.begin_path();
        if ctx
            .arc(f64::from(x), f64::from(y), f64::from(r), 0.0, TAU)
            .is_ok()
        {
            ctx.set_fill_style_str(color);
            ctx.fill();
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::SessionEnded {
                outcome,
                score,
                high_score,
            } => log::info!("{:?}: score {} / best {}", outcome, score, high_score),
            GameEvent::HighScoreBeaten(score) => log::info!("New high score {}", score),
            other => log::trace!("{:?}", other),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pixel Muncher starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let session = Session::new(LocalStore);
        let state = session.state();
        let tile = state.tuning.tile_size;
        canvas.set_width((state.maze.width() as f32 * tile) as u32);
        canvas.set_height((state.maze.height() as f32 * tile) as u32);
        let threshold = state.tuning.swipe_threshold;

        let game = Rc::new(RefCell::new(Game {
            session,
            ctx,
            document,
            last_time: 0.0,
            swipe: SwipeTracker::new(threshold),
            hud: None,
        }));

        setup_input_handlers(&window, &canvas, game.clone())?;
        setup_menu_buttons(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Pixel Muncher running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = direction_for_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().session.push_intent(dir);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    game.borrow_mut()
                        .swipe
                        .begin(touch.screen_x() as f32, touch.screen_y() as f32);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end (swipe)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if let Some(dir) = g.swipe.end(touch.screen_x() as f32, touch.screen_y() as f32) {
                    g.session.push_intent(dir);
                }
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = game.borrow().document.clone();

        for (id, difficulty) in [("easy-btn", Difficulty::Easy), ("hard-btn", Difficulty::Hard)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.session.start(difficulty) {
                    for event in g.session.drain_events() {
                        log_event(&event);
                    }
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.return_to_menu();
                g.session.drain_events();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pixel Muncher (native) starting...");
    log::info!("Native mode plays a scripted headless session; use `trunk serve` for the web version");

    let difficulty = std::env::args()
        .nth(1)
        .and_then(|arg| pixel_muncher::Difficulty::from_str(&arg))
        .unwrap_or_default();
    demo::play(difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pixel_muncher::consts::SIM_DT;
    use pixel_muncher::persistence::MemoryStore;
    use pixel_muncher::sim::{Direction, GameEvent};
    use pixel_muncher::ui::{lives_label, outcome_title};
    use pixel_muncher::{Difficulty, Session};

    /// Two minutes of simulated play at most
    const MAX_FRAMES: usize = 60 * 120;
    /// Frames between scripted direction changes
    const HOLD_FRAMES: usize = 45;
    const SCRIPT: [Direction; 8] = [
        Direction::Right,
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn play(difficulty: Difficulty) {
        let mut session = Session::new(MemoryStore::new());
        session.start(difficulty);
        report(&session.drain_events());

        for frame in 0..MAX_FRAMES {
            if frame % HOLD_FRAMES == 0 {
                session.push_intent(SCRIPT[(frame / HOLD_FRAMES) % SCRIPT.len()]);
            }
            let events = session.advance(SIM_DT);
            report(&events);
            if session.state().outcome.is_some() {
                break;
            }
        }

        let state = session.state();
        match state.outcome {
            Some(outcome) => log::info!(
                "{} score {}, best {}",
                outcome_title(outcome),
                state.score,
                state.high_score.best
            ),
            None => log::info!(
                "Time up: score {}, lives {}, {} pickups left",
                state.score,
                lives_label(state.lives),
                state.pickups.len()
            ),
        }
    }

    fn report(events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PickupConsumed { .. } | GameEvent::ScoreChanged(_) => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
    }
}
