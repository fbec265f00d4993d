//! Sling Smash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;

    use sling_smash::Settings;
    use sling_smash::consts::*;
    use sling_smash::input::GestureEvent;
    use sling_smash::render;
    use sling_smash::sim::{ResizeDebouncer, Session, apply_viewport};
    use sling_smash::world::{PhysicsWorld, RapierWorld};

    /// Game instance holding all state
    struct Game {
        world: RapierWorld,
        session: Session,
        settings: Settings,
        debouncer: ResizeDebouncer,
        /// Orientation re-apply deadline; dimensions reported right after a
        /// rotation can be stale, so the size is re-read once this passes
        settle_deadline: Option<f64>,
        accumulator: f32,
        last_time: f64,
        pointer_down: bool,
    }

    impl Game {
        fn new(width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let mut world = RapierWorld::new();
            let session = Session::new(&mut world, width, height, &settings);
            Self {
                world,
                session,
                settings,
                debouncer: ResizeDebouncer::new(RESIZE_DEBOUNCE_MS),
                settle_deadline: None,
                accumulator: 0.0,
                last_time: 0.0,
                pointer_down: false,
            }
        }

        /// Refresh pointer mapping from current element bounds
        fn sync_pointer_frame(&mut self, canvas: &HtmlCanvasElement) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0) as f32;
            let rect = canvas.get_bounding_client_rect();
            self.session
                .pointer
                .set_frame(dpr, Vec2::new(rect.left() as f32, rect.top() as f32));
        }

        fn dispatch(&mut self, event: GestureEvent) {
            self.session.handle_gesture(&mut self.world, event);
        }

        /// Run fixed-tick simulation steps for an elapsed wall-clock delta
        fn update(&mut self, dt_secs: f32) {
            let ticks = dt_secs.min(0.1) * 60.0;
            self.accumulator += ticks;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.session.tick(&mut self.world, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sling Smash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the drawable area to device pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game::new(width as f32, height as f32)));
        game.borrow_mut().sync_pointer_frame(&canvas);

        log::info!("World initialized at {}x{}", width, height);

        setup_input_handlers(&canvas, game.clone());
        setup_viewport_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game, canvas, ctx);

        log::info!("Sling Smash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - begin a pull (or place a block in edit mode)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.sync_pointer_frame(&canvas_clone);
                let pos = g
                    .session
                    .pointer
                    .to_world(Vec2::new(event.client_x() as f32, event.client_y() as f32));
                g.pointer_down = true;
                let hit = g.session.pick(&g.world, pos);
                g.dispatch(GestureEvent::Start { pos, hit });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - gesture tick while the button is held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.pointer_down {
                    return;
                }
                let pos = g
                    .session
                    .pointer
                    .to_world(Vec2::new(event.client_x() as f32, event.client_y() as f32));
                g.dispatch(GestureEvent::Move { pos });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up anywhere ends the gesture (drags often leave the canvas)
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.pointer_down {
                    return;
                }
                g.pointer_down = false;
                let pos = g
                    .session
                    .pointer
                    .to_world(Vec2::new(event.client_x() as f32, event.client_y() as f32));
                g.dispatch(GestureEvent::End { pos });
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.sync_pointer_frame(&canvas_clone);
                    let pos = g
                        .session
                        .pointer
                        .to_world(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                    g.pointer_down = true;
                    let hit = g.session.pick(&g.world, pos);
                    g.dispatch(GestureEvent::Start { pos, hit });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pos = g
                        .session
                        .pointer
                        .to_world(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                    g.dispatch(GestureEvent::Move { pos });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.pointer_down = false;
                    let pos = g
                        .session
                        .pointer
                        .to_world(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                    g.dispatch(GestureEvent::End { pos });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard shortcuts
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "r" | "R" => {
                        let Game { world, session, .. } = &mut *g;
                        session.reset(world);
                    }
                    "e" | "E" => {
                        let Game { world, session, .. } = &mut *g;
                        if session.edit_mode() {
                            session.exit_edit_mode(world);
                        } else {
                            session.enter_edit_mode(world);
                        }
                    }
                    "s" | "S" => {
                        g.settings.next_shape();
                        g.settings.save();
                        let shape = g.settings.shape;
                        g.session.shape = shape;
                        log::info!("Block shape: {:?}", shape);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_viewport_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Resize events arrive in bursts; note them and let the loop apply
        // the coalesced result
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
                let w = (canvas_clone.client_width() as f64 * dpr) as f32;
                let h = (canvas_clone.client_height() as f64 * dpr) as f32;
                game.borrow_mut().debouncer.note(w, h, js_sys::Date::now());
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Orientation changes report stale dimensions for a moment; schedule
        // a re-read after a settle delay instead of trusting the event
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().settle_deadline =
                    Some(js_sys::Date::now() + ORIENTATION_SETTLE_MS);
            });
            let _ = window.add_event_listener_with_callback(
                "orientationchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let Game { world, session, .. } = &mut *g;
                session.reset(world);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("edit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let Game { world, session, .. } = &mut *g;
                if session.edit_mode() {
                    session.exit_edit_mode(world);
                } else {
                    session.enter_edit_mode(world);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(
        game: Rc<RefCell<Game>>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    ) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, ctx, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(
        game: Rc<RefCell<Game>>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        time: f64,
    ) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            // Coalesced resize, then the orientation settle re-read
            let now = js_sys::Date::now();
            if let Some((w, h)) = g.debouncer.poll(now) {
                canvas.set_width(w as u32);
                canvas.set_height(h as u32);
                {
                    let Game { world, session, .. } = &mut *g;
                    apply_viewport(session, world, w, h);
                }
                g.sync_pointer_frame(&canvas);
            }
            if g.settle_deadline.is_some_and(|d| now >= d) {
                g.settle_deadline = None;
                let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
                let w = (canvas.client_width() as f64 * dpr) as f32;
                let h = (canvas.client_height() as f64 * dpr) as f32;
                g.debouncer.note(w, h, now);
            }

            g.update(dt);
            render::draw(&ctx, &g.session, &g.world);
            update_hud(&g);
        }

        request_animation_frame(game, canvas, ctx);
    }

    /// Reflect session state in the DOM chrome
    fn update_hud(game: &Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Reset is hidden while editing
        if let Some(el) = document.get_element_by_id("reset-btn") {
            let class = if game.session.edit_mode() { "hidden" } else { "" };
            let _ = el.set_attribute("class", class);
        }

        if let Some(el) = document.get_element_by_id("edit-btn") {
            el.set_text_content(Some(if game.session.edit_mode() {
                "Done"
            } else {
                "Edit"
            }));
        }

        // Pull hint while a projectile is waiting
        if let Some(el) = document.get_element_by_id("pull-prompt") {
            let waiting = !game.session.launched() && !game.session.edit_mode();
            let _ = el.set_attribute("class", if waiting { "" } else { "hidden" });
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sling Smash (native) starting...");
    log::info!("Run with `trunk serve` for the web version");

    smoke_test_launch();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Minimal headless sanity check against the real engine
#[cfg(not(target_arch = "wasm32"))]
fn smoke_test_launch() {
    use glam::Vec2;
    use sling_smash::Settings;
    use sling_smash::input::GestureEvent;
    use sling_smash::sim::Session;
    use sling_smash::world::{PhysicsWorld, RapierWorld};

    let mut world = RapierWorld::new();
    let mut session = Session::new(&mut world, 800.0, 600.0, &Settings::default());

    let anchor = session.profile.anchor;
    let hit = session.pick(&world, anchor);
    session.handle_gesture(&mut world, GestureEvent::Start { pos: anchor, hit });
    let pulled = anchor + Vec2::new(-120.0, 80.0);
    session.handle_gesture(&mut world, GestureEvent::Move { pos: pulled });
    session.handle_gesture(&mut world, GestureEvent::End { pos: pulled });
    assert!(session.launched(), "launch should fire on gesture end");

    for _ in 0..120 {
        world.step(1.0);
    }
    println!("✓ Headless launch smoke test passed!");
}
