//! Frame orchestrator
//!
//! [`Application`] owns the window, the renderer, the overlay and the scene
//! and steps them once per frame. The collaborators arrive already
//! constructed; [`Application::initialize`] only acquires the scene's GPU
//! resources on top of them.

use winit::keyboard::KeyCode;

use crate::config::AppConfig;
use crate::error::InitError;
use crate::gfx::camera::{fly_camera::aspect_ratio, CameraController};
use crate::gfx::rendering::Renderer;
use crate::gfx::scene::Scene;
use crate::platform::Platform;
use crate::timing::{FrameClock, FrameStats};
use crate::ui::{ControlPanel, Overlay, OverlayContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    Running,
    ShuttingDown,
    Terminated,
}

pub struct Application<P, R, O>
where
    P: Platform,
    R: Renderer,
    O: Overlay<P, R>,
{
    config: AppConfig,
    state: AppState,
    clock: FrameClock,
    stats: FrameStats,
    controller: CameraController,
    panel: ControlPanel,
    running: bool,
    framebuffer_size: (u32, u32),
    // Released front to back by `teardown`
    overlay: Option<O>,
    scene: Option<Scene<R>>,
    renderer: Option<R>,
    platform: Option<P>,
}

impl<P, R, O> Application<P, R, O>
where
    P: Platform,
    R: Renderer,
    O: Overlay<P, R>,
{
    pub fn new(config: AppConfig, platform: P, renderer: R, overlay: O) -> Self {
        let framebuffer_size = platform.framebuffer_size();
        let panel = ControlPanel::new(config.clear_color);

        Self {
            config,
            state: AppState::Uninitialized,
            clock: FrameClock::new(),
            stats: FrameStats::new(),
            controller: CameraController::default(),
            panel,
            running: true,
            framebuffer_size,
            overlay: Some(overlay),
            scene: None,
            renderer: Some(renderer),
            platform: Some(platform),
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Loads the shader program and the model. On failure everything is
    /// released and the application is left `Terminated`.
    pub fn initialize(&mut self) -> Result<(), InitError> {
        match self.state {
            AppState::Uninitialized => {}
            AppState::Running => return Ok(()),
            AppState::ShuttingDown | AppState::Terminated => return Err(InitError::Terminated),
        }

        match self.load_scene() {
            Ok(scene) => {
                self.scene = Some(scene);
                self.state = AppState::Running;
                log::info!("Application running");
                Ok(())
            }
            Err(error) => {
                log::error!("Initialization failed: {}", error);
                self.state = AppState::ShuttingDown;
                self.teardown();
                Err(error)
            }
        }
    }

    fn load_scene(&mut self) -> Result<Scene<R>, InitError> {
        let renderer = self.renderer.as_mut().ok_or(InitError::Terminated)?;
        Scene::load(renderer, &self.config, self.framebuffer_size)
    }

    /// Initializes if needed, then steps frames until the window closes.
    pub fn run(&mut self) -> Result<(), InitError> {
        if self.state == AppState::Uninitialized {
            self.initialize()?;
        }

        while self.state == AppState::Running {
            if !self.run_frame() {
                break;
            }
        }

        self.teardown();
        Ok(())
    }

    /// Stops the loop at the next close check.
    pub fn request_close(&mut self) {
        self.running = false;
    }

    /// One iteration of the loop. Returns `false` once the window asked to
    /// close, before anything is drawn.
    fn run_frame(&mut self) -> bool {
        let (Some(platform), Some(renderer), Some(scene), Some(overlay)) = (
            self.platform.as_mut(),
            self.renderer.as_mut(),
            self.scene.as_mut(),
            self.overlay.as_mut(),
        ) else {
            return false;
        };

        let delta_time = self.clock.tick();

        let mut input_captured = false;
        for event in platform.poll_events() {
            input_captured |= overlay.handle_event(platform, &event);
        }
        if platform.should_close() || !self.running {
            log::info!("Close requested, leaving the frame loop");
            return false;
        }

        let size = platform.framebuffer_size();
        let visible = size.0 > 0 && size.1 > 0;
        if visible && size != self.framebuffer_size {
            log::debug!("Framebuffer resized to {}x{}", size.0, size.1);
            renderer.resize(size.0, size.1);
            scene
                .camera
                .set_aspect_ratio(aspect_ratio(size.0 as f32, size.1 as f32));
            self.framebuffer_size = size;
        }

        // Input
        if platform.is_key_down(KeyCode::Escape) {
            platform.request_close();
        } else if !input_captured && !overlay.wants_keyboard() {
            self.controller.apply(&*platform, &mut scene.camera, delta_time);
        }

        // Update
        self.panel.apply_to(&mut scene.model.transform);
        scene.update(delta_time);
        self.stats.record(delta_time);

        // Draw
        if !visible {
            return true;
        }
        let Some(mut frame) = renderer.begin_frame() else {
            return true;
        };
        {
            let pass = scene.scene_pass(self.panel.clear_color);
            renderer.draw_scene(&mut frame, &pass);
        }
        overlay.render(
            platform,
            renderer,
            &mut frame,
            OverlayContext {
                panel: &mut self.panel,
                camera: &scene.camera,
                stats: &self.stats,
            },
        );
        renderer.present(frame);

        true
    }

    /// Releases the overlay, the scene's GPU resources, the renderer and the
    /// window, in that order. Does nothing once terminated.
    pub fn teardown(&mut self) {
        if self.state == AppState::Terminated {
            return;
        }
        self.state = AppState::ShuttingDown;
        log::info!("Shutting down after {} frame(s)", self.stats.frame_count());

        if let Some(overlay) = self.overlay.take() {
            log::info!("Releasing UI overlay");
            drop(overlay);
        }
        if let Some(scene) = self.scene.take() {
            log::info!("Releasing shader program and meshes");
            drop(scene);
        }
        if let Some(renderer) = self.renderer.take() {
            log::info!("Releasing renderer");
            drop(renderer);
        }
        if let Some(platform) = self.platform.take() {
            log::info!("Closing window");
            drop(platform);
        }

        self.state = AppState::Terminated;
    }
}

impl<P, R, O> Drop for Application<P, R, O>
where
    P: Platform,
    R: Renderer,
    O: Overlay<P, R>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSource;
    use crate::error::{ModelError, ShaderError};
    use crate::gfx::camera::Camera;
    use crate::gfx::rendering::ScenePass;
    use crate::gfx::resources::{ShaderConfig, ShaderSources, ShaderStage, StageSource};
    use crate::gfx::scene::MeshData;
    use crate::platform::KeyState;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use cgmath::Vector3;

    type Log = Rc<RefCell<Vec<String>>>;

    fn push(log: &Log, entry: impl Into<String>) {
        log.borrow_mut().push(entry.into());
    }

    fn entries(log: &Log, prefix: &str) -> Vec<String> {
        log.borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .cloned()
            .collect()
    }

    struct FakePlatform {
        log: Log,
        close_on_poll: usize,
        polls: usize,
        closed: bool,
        keys: HashSet<KeyCode>,
        size: (u32, u32),
    }

    impl FakePlatform {
        fn new(log: &Log, close_on_poll: usize) -> Self {
            Self {
                log: log.clone(),
                close_on_poll,
                polls: 0,
                closed: false,
                keys: HashSet::new(),
                size: (800, 600),
            }
        }
    }

    impl KeyState for FakePlatform {
        fn is_key_down(&self, key: KeyCode) -> bool {
            self.keys.contains(&key)
        }
    }

    impl Platform for FakePlatform {
        type Event = String;

        fn poll_events(&mut self) -> Vec<String> {
            self.polls += 1;
            push(&self.log, "poll");
            if self.polls >= self.close_on_poll {
                self.closed = true;
            }
            vec![format!("event {}", self.polls)]
        }

        fn should_close(&self) -> bool {
            self.closed
        }

        fn request_close(&mut self) {
            self.closed = true;
        }

        fn framebuffer_size(&self) -> (u32, u32) {
            self.size
        }

        fn content_scale(&self) -> f32 {
            1.0
        }
    }

    impl Drop for FakePlatform {
        fn drop(&mut self) {
            push(&self.log, "release window");
        }
    }

    struct FakeHandle {
        log: Log,
        name: String,
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            push(&self.log, format!("release {}", self.name));
        }
    }

    struct FakeRenderer {
        log: Log,
        fail_shader: bool,
    }

    impl Renderer for FakeRenderer {
        type Shader = FakeHandle;
        type Mesh = FakeHandle;
        type Frame = ();

        fn compile_shader(&mut self, sources: &ShaderSources) -> Result<FakeHandle, ShaderError> {
            if self.fail_shader {
                return Err(ShaderError::Compile {
                    label: sources.label.clone(),
                    stage: ShaderStage::Fragment,
                    message: "syntax error".into(),
                });
            }
            push(&self.log, "acquire shader");
            Ok(FakeHandle {
                log: self.log.clone(),
                name: "shader".into(),
            })
        }

        fn upload_mesh(&mut self, _mesh: &MeshData) -> Result<FakeHandle, ModelError> {
            push(&self.log, "acquire mesh");
            Ok(FakeHandle {
                log: self.log.clone(),
                name: "mesh".into(),
            })
        }

        fn resize(&mut self, width: u32, height: u32) {
            push(&self.log, format!("resize {}x{}", width, height));
        }

        fn begin_frame(&mut self) -> Option<()> {
            Some(())
        }

        fn draw_scene(&mut self, _frame: &mut (), pass: &ScenePass<'_, Self>) {
            push(&self.log, format!("draw {}", pass.len()));
        }

        fn present(&mut self, _frame: ()) {
            push(&self.log, "present");
        }
    }

    impl Drop for FakeRenderer {
        fn drop(&mut self) {
            push(&self.log, "release renderer");
        }
    }

    struct FakeOverlay {
        log: Log,
        captures_input: bool,
    }

    impl FakeOverlay {
        fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                captures_input: false,
            }
        }
    }

    impl Overlay<FakePlatform, FakeRenderer> for FakeOverlay {
        fn handle_event(&mut self, _platform: &FakePlatform, event: &String) -> bool {
            push(&self.log, format!("overlay {}", event));
            self.captures_input
        }

        fn wants_keyboard(&self) -> bool {
            false
        }

        fn render(
            &mut self,
            _platform: &FakePlatform,
            _renderer: &FakeRenderer,
            _frame: &mut (),
            _context: OverlayContext<'_>,
        ) {
            push(&self.log, "overlay render");
        }
    }

    impl Drop for FakeOverlay {
        fn drop(&mut self) {
            push(&self.log, "release overlay");
        }
    }

    fn test_config() -> AppConfig {
        AppConfig::default()
            .with_shader(ShaderConfig::new(
                "test",
                StageSource::Inline("vertex".into()),
                StageSource::Inline("fragment".into()),
            ))
            .with_model(ModelSource::Sphere {
                radius: 1.0,
                sectors: 8,
                stacks: 4,
            })
    }

    fn test_app(
        log: &Log,
        close_on_poll: usize,
        fail_shader: bool,
    ) -> Application<FakePlatform, FakeRenderer, FakeOverlay> {
        Application::new(
            test_config(),
            FakePlatform::new(log, close_on_poll),
            FakeRenderer {
                log: log.clone(),
                fail_shader,
            },
            FakeOverlay::new(log),
        )
    }

    #[test]
    fn test_close_on_first_poll_draws_nothing() {
        let log = Log::default();
        let mut app = test_app(&log, 1, false);

        app.run().unwrap();

        assert_eq!(app.state(), AppState::Terminated);
        assert!(entries(&log, "draw").is_empty());
        assert!(entries(&log, "present").is_empty());
        assert_eq!(entries(&log, "poll").len(), 1);
        // Events of the closing poll still reach the overlay
        assert_eq!(entries(&log, "overlay event"), vec!["overlay event 1"]);
    }

    #[test]
    fn test_shader_failure_never_runs() {
        let log = Log::default();
        let mut app = test_app(&log, 10, true);

        let result = app.initialize();

        assert!(matches!(result, Err(InitError::Shader(ShaderError::Compile { .. }))));
        assert_eq!(app.state(), AppState::Terminated);
        assert!(entries(&log, "poll").is_empty());
        assert!(entries(&log, "draw").is_empty());
        assert!(entries(&log, "acquire mesh").is_empty());
        assert_eq!(
            entries(&log, "release"),
            vec!["release overlay", "release renderer", "release window"]
        );
    }

    #[test]
    fn test_run_propagates_init_failure() {
        let log = Log::default();
        let mut app = test_app(&log, 10, true);

        assert!(matches!(app.run(), Err(InitError::Shader(_))));
        assert!(entries(&log, "draw").is_empty());
        assert!(matches!(app.initialize(), Err(InitError::Terminated)));
    }

    #[test]
    fn test_frames_draw_every_mesh_then_overlay() {
        let log = Log::default();
        let mut app = test_app(&log, 3, false);

        app.run().unwrap();

        // Two full frames before the third poll closes
        assert_eq!(entries(&log, "draw"), vec!["draw 1", "draw 1"]);
        assert_eq!(entries(&log, "present").len(), 2);
        assert_eq!(app.stats().frame_count(), 2);

        let log = log.borrow();
        let draw = log.iter().position(|e| e == "draw 1").unwrap();
        let overlay = log.iter().position(|e| e == "overlay render").unwrap();
        let present = log.iter().position(|e| e == "present").unwrap();
        assert!(draw < overlay && overlay < present);
    }

    #[test]
    fn test_teardown_order_and_single_release() {
        let log = Log::default();
        {
            let mut app = test_app(&log, 2, false);
            app.run().unwrap();
            app.teardown();
        }

        assert_eq!(
            entries(&log, "release"),
            vec![
                "release overlay",
                "release shader",
                "release mesh",
                "release renderer",
                "release window",
            ]
        );
    }

    #[test]
    fn test_drop_tears_down_running_app() {
        let log = Log::default();
        {
            let mut app = test_app(&log, 10, false);
            app.initialize().unwrap();
            assert_eq!(app.state(), AppState::Running);
        }

        assert_eq!(entries(&log, "release").len(), 5);
        assert_eq!(entries(&log, "release overlay").len(), 1);
    }

    #[test]
    fn test_escape_requests_close() {
        let log = Log::default();
        let mut platform = FakePlatform::new(&log, usize::MAX);
        platform.keys.insert(KeyCode::Escape);
        let mut app = Application::new(
            test_config(),
            platform,
            FakeRenderer {
                log: log.clone(),
                fail_shader: false,
            },
            FakeOverlay::new(&log),
        );

        app.run().unwrap();

        // The Escape frame is drawn, the next poll sees the close flag
        assert_eq!(entries(&log, "poll").len(), 2);
        assert_eq!(entries(&log, "draw").len(), 1);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let log = Log::default();
        let mut app = test_app(&log, 3, false);
        app.initialize().unwrap();
        if let Some(platform) = app.platform.as_mut() {
            platform.size = (400, 400);
        }

        assert!(app.run_frame());

        assert_eq!(entries(&log, "resize"), vec!["resize 400x400"]);
        let camera: &Camera = &app.scene.as_ref().unwrap().camera;
        assert_eq!(camera.aspect(), 1.0);
    }

    type TestApp = Application<FakePlatform, FakeRenderer, FakeOverlay>;

    fn held_forward_app(log: &Log, captures_input: bool) -> TestApp {
        let mut platform = FakePlatform::new(log, usize::MAX);
        platform.keys.insert(KeyCode::KeyW);
        let mut overlay = FakeOverlay::new(log);
        overlay.captures_input = captures_input;
        let mut app = Application::new(
            test_config(),
            platform,
            FakeRenderer {
                log: log.clone(),
                fail_shader: false,
            },
            overlay,
        );
        app.initialize().unwrap();
        app.clock = FrameClock::starting_at(Instant::now() - Duration::from_millis(100));
        app
    }

    fn camera_position(app: &TestApp) -> Vector3<f32> {
        app.scene.as_ref().unwrap().camera.position()
    }

    #[test]
    fn test_captured_input_suspends_camera() {
        let log = Log::default();
        let mut app = held_forward_app(&log, true);
        let start = camera_position(&app);

        assert!(app.run_frame());

        assert_eq!(camera_position(&app), start);
    }

    #[test]
    fn test_uncaptured_input_moves_camera() {
        let log = Log::default();
        let mut app = held_forward_app(&log, false);
        let start = camera_position(&app);

        assert!(app.run_frame());

        // Default camera looks down -Z
        assert!(camera_position(&app).z < start.z);
    }

    #[test]
    fn test_zero_framebuffer_skips_draw() {
        let log = Log::default();
        let mut app = test_app(&log, 3, false);
        app.initialize().unwrap();
        if let Some(platform) = app.platform.as_mut() {
            platform.size = (0, 0);
        }

        assert!(app.run_frame());

        assert!(entries(&log, "resize").is_empty());
        assert!(entries(&log, "draw").is_empty());
        assert_eq!(app.stats().frame_count(), 1);
    }
}
