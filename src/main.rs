//! Radial Shooter entry point
//!
//! In the browser this wires the page (canvas, start button, clicks, keys)
//! to the game. Natively it plays a short headless session on autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use radial_shooter::audio::{AudioManager, Mixer};
    use radial_shooter::platform::WebPlatform;
    use radial_shooter::render::WebCanvas;
    use radial_shooter::{Game, Settings, Tuning};

    struct App {
        game: Game<WebPlatform>,
        canvas: WebCanvas,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Radial Shooter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")
            .ok()
            .flatten()
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fill the viewport
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as u32;
        let canvas = WebCanvas::new(canvas).expect("no 2d context");
        canvas.resize(width, height);

        let tuning = Tuning::load();
        let settings = Settings::load();
        let audio = AudioManager::new(Mixer::from_settings(&settings), settings.music_url.clone());
        let platform = WebPlatform::new(window.clone(), audio);

        let seed = js_sys::Date::now() as u64;
        let bounds = Vec2::new(width as f32, height as f32);
        let app = Rc::new(RefCell::new(App {
            game: Game::new(bounds, tuning, settings, seed, platform),
            canvas,
        }));

        install_scheduler_callbacks(&app);
        setup_start_button(app.clone());
        setup_input_handlers(app);

        log::info!("Ready - {}x{}, seed {}", width, height, seed);
    }

    /// Frame and spawn callbacks live in the platform; they hold the app weakly
    fn install_scheduler_callbacks(app: &Rc<RefCell<App>>) {
        let weak: Weak<RefCell<App>> = Rc::downgrade(app);
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(app) = weak.upgrade() {
                let mut app = app.borrow_mut();
                let App { game, canvas } = &mut *app;
                game.on_frame(canvas, time);
            }
        });

        let weak: Weak<RefCell<App>> = Rc::downgrade(app);
        let on_spawn = Closure::<dyn FnMut()>::new(move || {
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().game.on_spawn_timer();
            }
        });

        app.borrow_mut()
            .game
            .platform_mut()
            .install_callbacks(on_frame, on_spawn);
    }

    fn setup_start_button(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("startGameEl") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Don't let the window click handler fire a shot too
                event.stop_propagation();
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Start button #startGameEl not found");
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Click to shoot
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                app.borrow_mut().game.on_click(point);
            });
            let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: i = autopilot, m = mute
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    "i" | "I" => {
                        app.game.toggle_autopilot();
                    }
                    "m" | "M" => {
                        let audio = app.game.platform_mut().audio_mut();
                        let muted = !audio.is_muted();
                        audio.set_muted(muted);
                        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                    }
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated session length for the native demo (ms)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_DURATION_MS: f64 = 60_000.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use radial_shooter::autopilot::Autopilot;
    use radial_shooter::platform::HeadlessPlatform;
    use radial_shooter::platform::headless::run_for;
    use radial_shooter::render::RecordingCanvas;
    use radial_shooter::sim::GamePhase;
    use radial_shooter::{Game, QualityPreset, Settings, Tuning};

    env_logger::init();
    log::info!("Radial Shooter (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut settings = Settings::load();
    if let Ok(name) = std::env::var("RADIAL_SHOOTER_QUALITY") {
        match QualityPreset::from_str(&name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown quality preset {name:?}, keeping {}", settings.quality.as_str()),
        }
    }
    log::info!("Quality: {}", settings.quality.as_str());

    let bounds = Vec2::new(800.0, 600.0);
    let mut canvas = RecordingCanvas::discarding(bounds.x, bounds.y);
    let mut game = Game::new(
        bounds,
        Tuning::load(),
        settings,
        seed,
        HeadlessPlatform::new(),
    );
    game.set_autopilot(Some(Autopilot::default()));
    game.start();

    let summary = run_for(&mut game, &mut canvas, DEMO_DURATION_MS);

    let outcome = match game.phase() {
        GamePhase::GameOver => "overrun",
        _ => "survived",
    };
    log::info!(
        "Demo {} after {} frames: score {}, {} enemies on screen",
        outcome,
        summary.frames,
        game.score(),
        game.state().enemies.len()
    );
    println!("Final score: {}", game.score());
}
