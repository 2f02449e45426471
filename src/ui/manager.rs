// src/ui/manager.rs
//! ImGui overlay for the room view
//!
//! Owns the ImGui context and its winit/wgpu glue. The overlay is drawn in a
//! second render pass on top of the room.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

/// ImGui context plus platform and renderer bindings.
///
/// Pointer events are withheld from the room while the cursor is over a
/// panel, keyboard events while a widget has keyboard focus.
pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    frame_started: Instant,
    cursor: Option<MouseCursor>,
}

impl UiManager {
    pub fn new(device: &Device, queue: &Queue, surface_format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: surface_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            frame_started: Instant::now(),
            cursor: None,
        }
    }

    /// Must follow every surface resize
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards an input event to ImGui. Returns true when the overlay keeps
    /// the event for itself.
    pub fn capture(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        let keyboard = match event {
            WindowEvent::KeyboardInput { .. } => true,
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::Focused(_) => false,
            _ => return false,
        };

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &wrapped);

        let io = self.context.io();
        match event {
            WindowEvent::Focused(_) => false,
            _ if keyboard => io.want_capture_keyboard,
            _ => io.want_capture_mouse,
        }
    }

    /// Builds one frame with `build` and renders it over `target`
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        target: &TextureView,
        build: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.frame_started);
        self.frame_started = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Skipping UI frame: {}", err);
            return;
        }

        let ui = self.context.frame();
        build(ui);
        if self.cursor != ui.mouse_cursor() {
            self.cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        let [width, height] = draw_data.display_size;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let mut overlay_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
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

        if let Err(err) = self
            .renderer
            .render(draw_data, queue, device, &mut overlay_pass)
        {
            log::error!("Failed to render UI: {}", err);
        }
    }
}
