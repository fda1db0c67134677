//! ImGui overlay on wgpu and winit
//!
//! Owns the imgui context and its winit/wgpu backends, and draws the
//! [`ControlPanel`](super::panel::ControlPanel) on top of the scene.
//!
//! imgui runs with a locked DPI factor of 1.0. The monitor's content scale
//! is applied by hand: fonts are rasterized at the start-up scale, and a
//! later scale change rescales widget sizes and the global font scale.

use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer as ImguiRenderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use wgpu::{Device, Queue, TextureFormat};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

use crate::gfx::rendering::{RenderEngine, RenderFrame};
use crate::platform::DesktopPlatform;

use super::overlay::{Overlay, OverlayContext};

/// Font size at a content scale of 1.0
const BASE_FONT_SIZE: f32 = 16.0;

/// Scale changes smaller than this are ignored.
const SCALE_EPSILON: f32 = 1e-4;

/// A usable content scale: positive and finite, 1.0 otherwise.
pub fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Content scale the fonts were rasterized at and the one currently shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentScale {
    baked: f32,
    current: f32,
}

impl ContentScale {
    pub fn new(scale: f32) -> Self {
        let scale = sanitize_scale(scale);
        Self {
            baked: scale,
            current: scale,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Switches to `scale`. Returns the factor to multiply widget sizes by,
    /// or `None` when the scale did not change.
    pub fn change_to(&mut self, scale: f32) -> Option<f32> {
        let scale = sanitize_scale(scale);
        if (scale - self.current).abs() < SCALE_EPSILON {
            return None;
        }
        let factor = scale / self.current;
        self.current = scale;
        Some(factor)
    }

    /// Value for imgui's `font_global_scale`.
    pub fn font_global_scale(&self) -> f32 {
        self.current / self.baked
    }
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: ImguiRenderer,
    scale: ContentScale,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Sets up imgui with locked DPI, sizing fonts and widgets by
    /// `content_scale` instead.
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
        content_scale: f32,
    ) -> Self {
        let scale = ContentScale::new(content_scale);
        let content_scale = scale.current();

        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: (BASE_FONT_SIZE * content_scale).round(),
                ..Default::default()
            }),
        }]);
        context.style_mut().scale_all_sizes(content_scale);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = ImguiRenderer::new(&mut context, device, queue, renderer_config);

        log::info!("UI initialized at content scale {:.2}", content_scale);

        Self {
            context,
            platform,
            renderer,
            scale,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Follows the window onto a monitor with a different content scale.
    fn rescale(&mut self, scale_factor: f32) {
        let Some(factor) = self.scale.change_to(scale_factor) else {
            return;
        };
        self.context.style_mut().scale_all_sizes(factor);
        self.context.io_mut().font_global_scale = self.scale.font_global_scale();
        log::info!("UI content scale changed to {:.2}", self.scale.current());
    }
}

impl Overlay<DesktopPlatform, RenderEngine> for UiManager {
    fn handle_event(&mut self, platform: &DesktopPlatform, event: &Event<()>) -> bool {
        let Event::WindowEvent {
            event: window_event,
            ..
        } = event
        else {
            return false;
        };

        match window_event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_)
            | WindowEvent::Resized(_) => {
                self.platform
                    .handle_event(self.context.io_mut(), platform.window(), event);
                let io = self.context.io();
                io.want_capture_mouse || io.want_capture_keyboard
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.platform
                    .handle_event(self.context.io_mut(), platform.window(), event);
                self.rescale(*scale_factor as f32);
                false
            }
            _ => false,
        }
    }

    fn wants_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    fn render(
        &mut self,
        platform: &DesktopPlatform,
        renderer: &RenderEngine,
        frame: &mut RenderFrame,
        context: OverlayContext<'_>,
    ) {
        let window = platform.window();

        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Skipping UI frame: {}", error);
            return;
        }

        let OverlayContext {
            panel,
            camera,
            stats,
        } = context;

        let ui = self.context.frame();
        panel.build(ui, camera, stats);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let (encoder, view) = frame.target();
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self.renderer.render(
            draw_data,
            renderer.queue(),
            renderer.device(),
            &mut render_pass,
        ) {
            log::warn!("UI render failed: {:?}", error);
        }
    }
}

impl Drop for UiManager {
    fn drop(&mut self) {
        log::debug!("Shutting down UI");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scale_falls_back_to_one() {
        assert_eq!(sanitize_scale(0.0), 1.0);
        assert_eq!(sanitize_scale(-2.0), 1.0);
        assert_eq!(sanitize_scale(f32::NAN), 1.0);
        assert_eq!(sanitize_scale(1.5), 1.5);
        assert_eq!(ContentScale::new(f32::INFINITY).current(), 1.0);
    }

    #[test]
    fn test_scale_change_is_relative_to_current() {
        let mut scale = ContentScale::new(1.0);

        assert_eq!(scale.change_to(2.0), Some(2.0));
        assert_eq!(scale.font_global_scale(), 2.0);

        assert_eq!(scale.change_to(1.5), Some(0.75));
        assert_eq!(scale.current(), 1.5);
        assert_eq!(scale.font_global_scale(), 1.5);
    }

    #[test]
    fn test_font_scale_is_relative_to_baked_fonts() {
        let mut scale = ContentScale::new(2.0);
        assert_eq!(scale.font_global_scale(), 1.0);

        assert_eq!(scale.change_to(1.0), Some(0.5));
        assert_eq!(scale.font_global_scale(), 0.5);
    }

    #[test]
    fn test_unchanged_scale_is_ignored() {
        let mut scale = ContentScale::new(1.25);
        assert_eq!(scale.change_to(1.25), None);
        assert_eq!(scale.change_to(0.0), Some(0.8));
        assert_eq!(scale.change_to(f32::NAN), None);
    }
}
