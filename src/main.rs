//! Stick Hero entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use stick_hero::input::{HeldKeys, is_game_key};
    use stick_hero::narration::{self, NarrationRequest};
    use stick_hero::persistence::{LocalStore, MemoryStore, SaveStore};
    use stick_hero::renderer::{RenderState, scene};
    use stick_hero::sim::{Accessory, GameStatus, Helm};
    use stick_hero::{App, Effect, Settings};

    /// How long the "progress saved" toast stays up
    const TOAST_MS: f64 = 2000.0;

    /// Game instance holding all state
    struct Game {
        app: App,
        keys: HeldKeys,
        render_state: Option<RenderState>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Timestamp until which the save toast is shown
        toast_until: f64,
        last_time: f64,
    }

    impl Game {
        fn new(app: App) -> Self {
            Self {
                app,
                keys: HeldKeys::new(),
                render_state: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                toast_until: 0.0,
                last_time: 0.0,
            }
        }

        /// Advance one frame of simulation
        fn update(&mut self, time: f64) {
            let input = self.keys.sample();
            self.app.frame(&input);
            self.last_time = time;

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene::build(&self.app.state, &self.app.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.app.state;

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-message") {
                el.set_text_content(Some(&state.message));
            }
            if let Some(el) = document.get_element_by_id("narration") {
                el.set_text_content(Some(&self.app.narration));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                show(&el, self.app.settings.show_fps);
                if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    val.set_text_content(Some(&self.fps.to_string()));
                }
            }

            if let Some(el) = document.get_element_by_id("save-toast") {
                show(&el, self.last_time < self.toast_until);
            }

            // Overlays follow the status
            if let Some(el) = document.get_element_by_id("hud") {
                show(&el, state.status != GameStatus::Menu);
            }
            if let Some(el) = document.get_element_by_id("menu") {
                show(&el, state.status == GameStatus::Menu);
            }
            if let Some(el) = document.get_element_by_id("victory") {
                show(&el, state.status == GameStatus::Won);
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                show(&el, state.status == GameStatus::GameOver);
            }

            // Continue only when there is something to continue
            if let Some(el) = document.get_element_by_id("continue-btn") {
                show(&el, self.app.has_saved_progress);
            }
            if let Some(el) = document.get_element_by_id("delete-btn") {
                show(&el, self.app.has_saved_progress);
            }
            if state.status == GameStatus::Menu {
                if let (Some(level), Some(el)) = (
                    self.app.saved_level(),
                    document.get_element_by_id("continue-level"),
                ) {
                    el.set_text_content(Some(&level.to_string()));
                }
            }

            // Mark the selected locker-room options
            let custom = &self.app.custom;
            mark_selected(document, ".color-swatch", "data-color", &custom.color);
            mark_selected(document, ".helm-btn", "data-helm", custom.helm.as_str());
            mark_selected(
                document,
                ".accessory-btn",
                "data-accessory",
                custom.accessory.as_str(),
            );
        }
    }

    fn show(el: &Element, visible: bool) {
        let class = el.get_attribute("class").unwrap_or_default();
        let mut classes: Vec<&str> = class
            .split_whitespace()
            .filter(|c| *c != "hidden")
            .collect();
        if !visible {
            classes.push("hidden");
        }
        let new_class = classes.join(" ");
        if new_class != class {
            let _ = el.set_attribute("class", &new_class);
        }
    }

    fn mark_selected(document: &Document, selector: &str, attr: &str, value: &str) {
        for el in elements(document, selector) {
            let selected = el.get_attribute(attr).as_deref() == Some(value);
            let _ = el.class_list().toggle_with_force("selected", selected);
        }
    }

    fn elements(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(nodes) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    /// Carry out queued side effects
    fn run_effects(game: &Rc<RefCell<Game>>) {
        let effects = game.borrow_mut().app.drain_effects();
        for effect in effects {
            match effect {
                Effect::Narrate(request) => request_narration(game.clone(), request),
                Effect::SaveToast => {
                    let mut g = game.borrow_mut();
                    g.toast_until = g.last_time + TOAST_MS;
                    log::info!("Progress saved");
                }
            }
        }
    }

    /// Fire one narration request; the reply lands whenever it lands
    fn request_narration(game: Rc<RefCell<Game>>, request: NarrationRequest) {
        let Some(key) = narration::api_key() else {
            log::debug!("No GEMINI_API_KEY, skipping narration");
            return;
        };
        if let Err(e) = narration::validate_key(key) {
            log::warn!("Narration disabled: {e:#}");
            return;
        }

        wasm_bindgen_futures::spawn_local(async move {
            match narration::fetch_line(&request, key).await {
                Ok(line) => game.borrow_mut().app.set_narration(line),
                Err(e) => log::error!("Narration failed: {e:#}"),
            }
        });
    }

    pub async fn run() -> anyhow::Result<()> {
        use anyhow::Context;

        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).context("init logger")?;

        log::info!("Stick Hero starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no canvas")?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("#canvas is not a canvas"))?;

        let (width, height) = fit_canvas(&window, &canvas);

        // Saves and settings share the same store
        let store: Box<dyn SaveStore> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable, progress will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(store.as_ref());
        let game = Rc::new(RefCell::new(Game::new(App::new(store, settings))));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("request adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        sync_settings_inputs(&document, &game.borrow().app.settings);

        setup_keyboard(game.clone());
        setup_focus_loss(game.clone());
        setup_resize(&canvas, game.clone());
        setup_menu(&document, game.clone());
        setup_locker_room(&document, game.clone());
        setup_settings(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Stick Hero running!");
        Ok(())
    }

    /// Match the backing store to the displayed size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if code == "KeyR" && !event.repeat() {
                    g.app.restart_level();
                }
                g.keys.press(&code);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.release(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_loss(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside): keyup never arrives
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            game.borrow_mut().keys.clear();
            log::debug!("Focus lost, held keys cleared");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Attach a click handler to the element with this id, if present
    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            add_click(&btn, handler);
        }
    }

    fn add_click(el: &Element, mut handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler();
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu(document: &Document, game: Rc<RefCell<Game>>) {
        // New run
        {
            let game = game.clone();
            on_click(document, "start-btn", move || {
                game.borrow_mut().app.start(false);
            });
        }

        // Resume from save
        {
            let game = game.clone();
            on_click(document, "continue-btn", move || {
                game.borrow_mut().app.start(true);
            });
        }

        // Wipe save and cosmetics
        {
            let game = game.clone();
            on_click(document, "delete-btn", move || {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Delete all saved progress?").ok())
                    .unwrap_or(false);
                if confirmed {
                    game.borrow_mut().app.delete_progress();
                    log::info!("Saved progress deleted");
                }
            });
        }

        // Manual save from the HUD
        {
            let game = game.clone();
            on_click(document, "save-btn", move || {
                game.borrow_mut().app.save_progress(None);
            });
        }

        // Game over
        {
            let game = game.clone();
            on_click(document, "revive-btn", move || {
                game.borrow_mut().app.reset_run();
            });
        }

        // Victory
        on_click(document, "go-again-btn", move || {
            game.borrow_mut().app.reset_run();
        });
    }

    fn setup_locker_room(document: &Document, game: Rc<RefCell<Game>>) {
        for el in elements(document, ".color-swatch") {
            let Some(color) = el.get_attribute("data-color") else {
                continue;
            };
            let game = game.clone();
            add_click(&el, move || game.borrow_mut().app.set_color(&color));
        }

        for el in elements(document, ".helm-btn") {
            let Some(helm) = el.get_attribute("data-helm").as_deref().and_then(Helm::parse)
            else {
                continue;
            };
            let game = game.clone();
            add_click(&el, move || game.borrow_mut().app.set_helm(helm));
        }

        for el in elements(document, ".accessory-btn") {
            let Some(accessory) = el
                .get_attribute("data-accessory")
                .as_deref()
                .and_then(Accessory::parse)
            else {
                continue;
            };
            let game = game.clone();
            add_click(&el, move || game.borrow_mut().app.set_accessory(accessory));
        }
    }

    /// Checkbox ids in the settings panel
    const SETTING_INPUTS: [&str; 4] = [
        "setting-narration",
        "setting-grid",
        "setting-glow",
        "setting-fps",
    ];

    /// The flag a settings checkbox controls
    fn setting_flag<'a>(settings: &'a mut Settings, id: &str) -> Option<&'a mut bool> {
        match id {
            "setting-narration" => Some(&mut settings.narration),
            "setting-grid" => Some(&mut settings.show_grid),
            "setting-glow" => Some(&mut settings.glow),
            "setting-fps" => Some(&mut settings.show_fps),
            _ => None,
        }
    }

    fn checkbox(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn sync_settings_inputs(document: &Document, settings: &Settings) {
        let mut settings = settings.clone();
        for id in SETTING_INPUTS {
            if let (Some(input), Some(flag)) =
                (checkbox(document, id), setting_flag(&mut settings, id))
            {
                input.set_checked(*flag);
            }
        }
    }

    fn setup_settings(document: &Document, game: Rc<RefCell<Game>>) {
        for id in SETTING_INPUTS {
            let Some(input) = checkbox(document, id) else {
                continue;
            };
            let game = game.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if let Some(flag) = setting_flag(&mut g.app.settings, id) {
                    *flag = input_clone.checked();
                }
                g.app.settings.save(g.app.store());
                log::info!("Setting {id} = {}", input_clone.checked());
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            g.update(time);
            g.render();
        }

        // Effects may re-borrow the game, so run them outside the borrow above
        run_effects(&game);

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            game.borrow().update_hud(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Stick Hero failed to start: {e:#}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stick Hero (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive level 1 with a scripted "run right, jump when grounded" input and
/// report where it ends up.
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use stick_hero::persistence::MemoryStore;
    use stick_hero::sim::{TickInput, TickOutcome};
    use stick_hero::{App, Settings};

    const MAX_FRAMES: u32 = 600;

    let mut app = App::new(Box::new(MemoryStore::new()), Settings::default());
    app.start(false);

    for frame in 0..MAX_FRAMES {
        let input = TickInput {
            right: true,
            jump: app.state.player.grounded,
            ..Default::default()
        };
        match app.frame(&input) {
            TickOutcome::Continue | TickOutcome::Idle => {}
            outcome => {
                log::info!("Frame {frame}: {outcome:?}");
                break;
            }
        }
    }

    let player = &app.state.player;
    println!(
        "level {} status {:?} at ({:.1}, {:.1}): {}",
        app.state.level, app.state.status, player.pos.x, player.pos.y, app.state.message
    );
}
