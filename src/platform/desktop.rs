use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::WindowConfig;
use crate::error::InitError;

use super::{KeyState, Platform};

/// How many non-blocking pumps to wait for the window to appear.
const WINDOW_CREATION_PUMPS: usize = 16;

/// A winit window driven by `pump_app_events`, so the caller owns the loop.
pub struct DesktopPlatform {
    window: Arc<Window>,
    state: WindowState,
    event_loop: EventLoop<()>,
}

/// Receives winit callbacks between pumps.
struct WindowState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    creation_error: Option<String>,
    pending: Vec<Event<()>>,
    keys_down: HashSet<KeyCode>,
    close_requested: bool,
    exited: bool,
}

impl DesktopPlatform {
    /// Creates the event loop and the window.
    pub fn new(config: &WindowConfig) -> Result<Self, InitError> {
        let mut event_loop = EventLoop::new()?;

        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let mut state = WindowState {
            attributes,
            window: None,
            creation_error: None,
            pending: Vec::new(),
            keys_down: HashSet::new(),
            close_requested: false,
            exited: false,
        };

        for _ in 0..WINDOW_CREATION_PUMPS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut state)
            {
                return Err(InitError::Window(format!(
                    "event loop exited with code {} before the window opened",
                    code
                )));
            }
            if let Some(error) = state.creation_error.take() {
                return Err(InitError::Window(error));
            }
            if state.window.is_some() {
                break;
            }
        }

        let window = state
            .window
            .clone()
            .ok_or_else(|| InitError::Window("window was never created".into()))?;

        log::info!(
            "Opened window '{}' ({}x{} physical)",
            config.title,
            window.inner_size().width,
            window.inner_size().height
        );

        Ok(Self {
            window,
            state,
            event_loop,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl KeyState for DesktopPlatform {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.state.keys_down.contains(&key)
    }
}

impl Platform for DesktopPlatform {
    type Event = Event<()>;

    fn poll_events(&mut self) -> Vec<Event<()>> {
        if !self.state.exited {
            if let PumpStatus::Exit(code) = self
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut self.state)
            {
                log::info!("Event loop exited with code {}", code);
                self.state.exited = true;
            }
        }
        // Keep the loop spinning even when the compositor stops sending events
        self.window.request_redraw();
        std::mem::take(&mut self.state.pending)
    }

    fn should_close(&self) -> bool {
        self.state.close_requested || self.state.exited
    }

    fn request_close(&mut self) {
        log::debug!("Close requested");
        self.state.close_requested = true;
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let PhysicalSize { width, height } = self.window.inner_size();
        (width, height)
    }

    fn content_scale(&self) -> f32 {
        match self.window.current_monitor() {
            Some(monitor) => monitor.scale_factor() as f32,
            None => {
                log::warn!("Could not query the monitor content scale, using 1.0");
                1.0
            }
        }
    }
}

impl Drop for DesktopPlatform {
    fn drop(&mut self) {
        log::debug!("Closing window");
    }
}

impl WindowState {
    fn track_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            match event.state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            }
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(error) => self.creation_error = Some(error.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::KeyboardInput { event: key, .. } => self.track_key(key),
            // Releases that happen while unfocused are never delivered
            WindowEvent::Focused(false) => self.keys_down.clear(),
            _ => (),
        }
        self.pending.push(Event::WindowEvent { window_id, event });
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.exited = true;
    }
}
