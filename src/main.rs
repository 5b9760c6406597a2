//! Penguin Circuit entry point
//!
//! Handles platform-specific initialization and drives the session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use penguin_circuit::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use penguin_circuit::gate::{OpenGate, PaymentGate, PaymentStatus, StartGate};
    use penguin_circuit::leaderboard::remote::RemoteLeaderboard;
    use penguin_circuit::leaderboard::{LeaderboardEntry, ScoreSubmitter};
    use penguin_circuit::renderer::RenderState;
    use penguin_circuit::scheduler::raf::RafFrames;
    use penguin_circuit::sim::{GameEvent, RunPhase};
    use penguin_circuit::{Leaderboard, Session, Settings, Tuning, platform};

    const LEADERBOARD_ROWS: usize = 10;
    /// Remote table re-read interval, picks up other players' records
    const LEADERBOARD_POLL_MS: i32 = 30_000;

    thread_local! {
        /// Payment gate shared with the JS wallet glue
        static PAYMENT: RefCell<Option<Rc<RefCell<PaymentGate>>>> = const { RefCell::new(None) };
    }

    fn with_payment(f: impl FnOnce(&mut PaymentGate)) {
        PAYMENT.with(|gate| {
            if let Some(gate) = gate.borrow().as_ref() {
                f(&mut gate.borrow_mut());
                update_payment_status(&gate.borrow());
            }
        });
    }

    /// Wallet glue: transfer submitted
    #[wasm_bindgen]
    pub fn payment_submitted() {
        with_payment(|gate| {
            gate.begin_payment();
        });
    }

    /// Wallet glue: transfer confirmed on chain
    #[wasm_bindgen]
    pub fn payment_confirmed() {
        with_payment(|gate| gate.confirm());
    }

    /// Wallet glue: transfer rejected or reverted
    #[wasm_bindgen]
    pub fn payment_failed(reason: String) {
        with_payment(|gate| gate.fail(reason));
    }

    /// Game instance holding all state
    struct Game {
        session: Session<RafFrames>,
        frames: RafFrames,
        render_state: Option<RenderState>,
        settings: Settings,
        uses_remote: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Result<Self, penguin_circuit::ConfigError> {
            let frames = RafFrames::default();

            let gate: Box<dyn StartGate> = if settings.require_payment {
                let gate = Rc::new(RefCell::new(PaymentGate::default()));
                PAYMENT.with(|slot| *slot.borrow_mut() = Some(gate.clone()));
                Box::new(gate)
            } else {
                Box::new(OpenGate)
            };

            let (submitter, uses_remote): (Box<dyn ScoreSubmitter>, bool) =
                match remote_leaderboard(&settings) {
                    Some(remote) => (Box::new(remote.on_new_record(refresh_leaderboard)), true),
                    None => (Box::new(Leaderboard::load()), false),
                };

            let mut session = Session::new(Tuning::default(), frames.clone(), gate, submitter)?;
            session.set_player_name(settings.player().unwrap_or_default());

            Ok(Self {
                session,
                frames,
                render_state: None,
                settings,
                uses_remote,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            })
        }

        /// rAF callback
        fn frame(&mut self, time: f64) {
            let Some(handle) = *self.frames.current.borrow() else {
                return;
            };
            if !self.session.on_frame(handle, platform::now_ms()) {
                return;
            }

            self.track_fps(time);
            for event in self.session.drain_events() {
                if let GameEvent::RunEnded { final_score, .. } = event {
                    log::info!("Final score: {}", final_score);
                    // Remote boards refresh once the insert lands
                    if !self.uses_remote {
                        refresh_leaderboard();
                    }
                }
            }
            self.render();
            self.update_hud();
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn start(&mut self) {
            let name = read_player_name();
            self.session.set_player_name(&name);
            if self.settings.player_name != name {
                self.settings.player_name = name;
                self.settings.save();
            }

            let result = if self.session.snapshot().phase == RunPhase::Ended {
                self.session.play_again(platform::now_ms(), platform::run_seed())
            } else {
                self.session.request_start(platform::now_ms(), platform::run_seed())
            };
            match result {
                Ok(()) => set_text("start-error", ""),
                Err(e) => {
                    log::warn!("Start refused: {}", e);
                    set_text("start-error", &e.to_string());
                }
            }
            self.render();
            self.update_hud();
        }

        /// Render the current frame
        fn render(&mut self) {
            let frame = self
                .session
                .render_frame(platform::now_ms(), self.settings.reduced_motion);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render_frame(&frame) {
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
        fn update_hud(&self) {
            let Some(document) = document() else {
                return;
            };
            let snapshot = self.session.snapshot();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            set_visible(&document, "hud-fps", self.settings.show_fps);
            set_visible(&document, "immunity-badge", snapshot.immune);
            set_visible(&document, "start-screen", snapshot.phase == RunPhase::Idle);
            set_visible(&document, "game-over", snapshot.ended);
            if snapshot.ended {
                set_text("final-score", &snapshot.score.to_string());
            }
        }
    }

    fn remote_leaderboard(settings: &Settings) -> Option<RemoteLeaderboard> {
        if !settings.has_remote_leaderboard() {
            return None;
        }
        let url = settings.leaderboard_url.as_deref()?;
        let key = settings.leaderboard_key.as_deref().unwrap_or_default();
        Some(RemoteLeaderboard::new(url, key))
    }

    /// Re-read the leaderboard (remote if configured, else LocalStorage)
    /// and redraw the list
    fn refresh_leaderboard() {
        let settings = Settings::load();
        match remote_leaderboard(&settings) {
            Some(remote) => wasm_bindgen_futures::spawn_local(async move {
                match remote.fetch_top(LEADERBOARD_ROWS).await {
                    Ok(entries) => {
                        let mut board = Leaderboard::new();
                        board.replace(entries);
                        show_leaderboard(board.top(LEADERBOARD_ROWS));
                    }
                    Err(e) => log::error!("Error fetching leaderboard: {}", e),
                }
            }),
            None => show_leaderboard(Leaderboard::load().top(LEADERBOARD_ROWS)),
        }
    }

    fn show_leaderboard(entries: &[LeaderboardEntry]) {
        let Some(document) = document() else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        if entries.is_empty() {
            list.set_inner_html("<li class=\"empty\">No scores yet</li>");
            return;
        }
        let mut html = String::new();
        for (i, entry) in entries.iter().enumerate() {
            html.push_str(&format!(
                "<li><span class=\"rank\">#{}</span><span class=\"name\">{}</span><span class=\"score\">{}</span></li>",
                i + 1,
                escape_html(&entry.player_name),
                entry.score
            ));
        }
        list.set_inner_html(&html);
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn update_payment_status(gate: &PaymentGate) {
        let text = match &gate.status {
            PaymentStatus::Unpaid => format!("Entry fee: {} tokens", gate.fee),
            PaymentStatus::Pending => "Confirming payment...".to_string(),
            PaymentStatus::Paid => "Paid - ready to play".to_string(),
            PaymentStatus::Failed(reason) => reason.clone(),
        };
        set_text("payment-status", &text);
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn read_player_name() -> String {
        document()
            .and_then(|d| d.get_element_by_id("player-name"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value().trim().to_string())
            .unwrap_or_default()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Penguin Circuit starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed-size field
        let width = FIELD_WIDTH as u32;
        let height = FIELD_HEIGHT as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(settings.player().unwrap_or_default());
        }

        let game = match Game::new(settings) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        PAYMENT.with(|gate| {
            if let Some(gate) = gate.borrow().as_ref() {
                update_payment_status(&gate.borrow());
            }
        });

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, (FIELD_WIDTH, FIELD_HEIGHT)).await
        {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        // Frame callback shared by every requestAnimationFrame
        {
            let game_for_frames = game.clone();
            let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                game_for_frames.borrow_mut().frame(time);
            });
            game.borrow().frames.install(callback);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        game.borrow_mut().render();
        game.borrow().update_hud();
        refresh_leaderboard();
        if game.borrow().uses_remote {
            poll_leaderboard(&window);
        }

        log::info!("Penguin Circuit running!");
    }

    fn poll_leaderboard(window: &web_sys::Window) {
        let closure = Closure::<dyn FnMut()>::new(refresh_leaderboard);
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            LEADERBOARD_POLL_MS,
        ) {
            log::warn!("Leaderboard polling unavailable: {:?}", e);
        }
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " || event.code() == "Space" {
                    let mut g = game.borrow_mut();
                    if g.session.snapshot().playing {
                        event.prevent_default();
                        g.session.flap();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        for id in ["start-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pay-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                payment_submitted();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Penguin Circuit (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Autopilot".to_string());
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(penguin_circuit::platform::run_seed);

    let tuning = match headless::load_tuning(std::env::var_os(headless::TUNING_ENV).as_deref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    match headless::run(&name, seed, tuning) {
        Ok(board) => {
            for (i, entry) in board.top(penguin_circuit::consts::LEADERBOARD_SIZE).iter().enumerate() {
                println!("#{:<2} {:<16} {}", i + 1, entry.player_name, entry.score);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Seeded run driven by hand-fired frames and a simple flap policy
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::ffi::OsStr;
    use std::rc::Rc;

    use penguin_circuit::gate::OpenGate;
    use penguin_circuit::scheduler::ManualFrames;
    use penguin_circuit::sim::GameState;
    use penguin_circuit::{Leaderboard, Session, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of play
    const MAX_FRAMES: u32 = 60 * 120;
    /// Flap once the actor's bottom edge gets this close to the gap's end
    const FLAP_MARGIN: f32 = 40.0;
    /// Path to a JSON tuning file; built-in tuning when unset
    pub const TUNING_ENV: &str = "PENGUIN_CIRCUIT_TUNING";

    /// Read tuning overrides from `path`, defaults for any key it leaves out
    pub fn load_tuning(path: Option<&OsStr>) -> Result<Tuning, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("reading tuning file {}: {}", path.to_string_lossy(), e))?;
        let tuning = Tuning::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.to_string_lossy());
        Ok(tuning)
    }

    /// Flap when sinking toward the bottom of the next gap (or of the
    /// field's middle band when no gap is ahead)
    pub fn wants_flap(state: &GameState) -> bool {
        let actor = &state.actor;
        let floor = state
            .obstacles
            .iter()
            .find(|o| o.right_edge() >= actor.x)
            .map(|o| o.gap_end())
            .unwrap_or(state.tuning.field_height / 2.0 + state.tuning.obstacle_gap / 2.0);
        actor.velocity >= 0.0 && actor.y + actor.height > floor - FLAP_MARGIN
    }

    pub fn run(
        name: &str,
        seed: u64,
        tuning: Tuning,
    ) -> Result<Leaderboard, Box<dyn std::error::Error>> {
        let board = Rc::new(RefCell::new(Leaderboard::new()));
        let mut session = Session::new(
            tuning,
            ManualFrames::default(),
            Box::new(OpenGate),
            Box::new(board.clone()),
        )?;
        session.set_player_name(name);

        let mut now = 0.0;
        session.request_start(now, seed)?;

        let mut frames = 0;
        while frames < MAX_FRAMES {
            let Some(handle) = session.frames_mut().fire() else {
                break;
            };
            now += FRAME_MS;
            if wants_flap(session.state()) {
                session.flap();
            }
            session.on_frame(handle, now);
            frames += 1;
        }

        let snapshot = session.snapshot();
        log::info!(
            "Seed {}: {:?} after {} ticks with score {}",
            seed,
            snapshot.phase,
            snapshot.ticks,
            snapshot.score
        );
        session.reset();

        let board = board.borrow().clone();
        Ok(board)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_run_is_reproducible() {
            let a = run("Ada", 42, Tuning::default()).unwrap();
            let b = run("Ada", 42, Tuning::default()).unwrap();
            assert_eq!(a.entries.len(), b.entries.len());
            assert_eq!(a.top_score(), b.top_score());
        }

        #[test]
        fn test_load_tuning_from_file() {
            assert_eq!(load_tuning(None).unwrap(), Tuning::default());

            let path = std::env::temp_dir()
                .join(format!("penguin_circuit_tuning_{}.json", std::process::id()));
            std::fs::write(&path, r#"{ "gravity": 0.5 }"#).unwrap();
            let tuning = load_tuning(Some(path.as_os_str())).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(tuning.gravity, 0.5);
            assert_eq!(tuning.obstacle_gap, Tuning::default().obstacle_gap);

            assert!(load_tuning(Some(OsStr::new("/nonexistent/tuning.json"))).is_err());
        }

        #[test]
        fn test_invalid_loaded_tuning_is_rejected() {
            let tuning = Tuning {
                scroll_speed: 0.0,
                ..Default::default()
            };
            assert!(run("Ada", 1, tuning).is_err());
        }

        #[test]
        fn test_flap_policy() {
            let mut state = GameState::new(Tuning::default(), 1);
            state.start(0.0, 1);
            // Open field: floor at 425
            state.actor.y = 300.0;
            assert!(!wants_flap(&state));
            state.actor.y = 340.0;
            assert!(wants_flap(&state));
            state.actor.velocity = -3.0;
            assert!(!wants_flap(&state));
        }
    }
}
