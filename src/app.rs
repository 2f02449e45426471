use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::RoomPlanConfig,
    error::{AppError, RenderError},
    frame_loop::FrameLoop,
    gfx::rendering::RenderEngine,
    placement::{input::is_quit_key, ClickTracker, ModelLoader, PlacementCommand},
    planner::RoomPlanner,
    ui::{catalog_panel, CatalogAction, UiManager},
};

/// Window shell around a [`RoomPlanner`]
pub struct RoomPlanApp {
    app_state: AppState,
}

struct AppState {
    config: RoomPlanConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    planner: RoomPlanner,
    frames: FrameLoop,
    clicks: ClickTracker,
    cursor: (f32, f32),
    startup_error: Option<RenderError>,
}

impl RoomPlanApp {
    pub fn new(config: RoomPlanConfig) -> Self {
        let planner = RoomPlanner::new(
            &config,
            ModelLoader::obj(),
            config.window.width,
            config.window.height,
        );

        Self {
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                planner,
                frames: FrameLoop::new(),
                clicks: ClickTracker::default(),
                cursor: (0.0, 0.0),
                startup_error: None,
            },
        }
    }

    /// Runs until the window closes or the frame loop is cancelled
    pub fn run(mut self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.startup_error.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.frames.is_running() {
            log::info!("Shutting down after {} frames", self.frames.frames_produced());
        }
        self.frames.cancel_handle().cancel();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(tick) = self.frames.tick() else {
            event_loop.exit();
            return;
        };

        let Self {
            window,
            render_engine,
            ui_manager,
            planner,
            ..
        } = self;
        let (Some(window), Some(render_engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return;
        };

        planner.tick(tick);
        render_engine.update(planner.camera().camera.uniform);

        let status = planner.status();
        let catalog = planner.catalog().to_vec();
        let mut action = None;

        let result = match ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame_with_ui(
                planner.scene_mut(),
                |device, queue, encoder, color_attachment| {
                    ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                        action = catalog_panel(ui, &catalog, &status);
                    });
                },
            ),
            None => render_engine.render_frame_with_ui(planner.scene_mut(), |_, _, _, _| {}),
        };

        if let Some(CatalogAction::Load(index)) = action {
            planner.request_catalog(index);
        }

        if let Err(err) = result {
            log::error!("Rendering stopped: {}", err);
            self.shutdown(event_loop);
        }
    }

    fn handle_left_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => self.clicks.press(self.cursor),
            ElementState::Released => {
                if self.clicks.release(self.cursor) {
                    let (x, y) = self.cursor;
                    let outcome = self.planner.click(x, y);
                    log::debug!("Click at ({}, {}): {:?}", x, y, outcome);
                }
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                self.shutdown(event_loop);
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height): (u32, u32) = window.inner_size().into();
        let vsync = self.config.window.vsync;
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height, vsync));

        let renderer = match renderer {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("Rendering is not available: {}", err);
                eprintln!("This application needs a GPU with wgpu support: {}", err);
                self.startup_error = Some(err);
                self.shutdown(event_loop);
                return;
            }
        };

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.planner.resize(width, height);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        log::info!("Window ready at {}x{}", width, height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let WindowEvent::CursorMoved { position, .. } = &event {
            self.cursor = (position.x as f32, position.y as f32);
        }

        let captured = self
            .ui_manager
            .as_mut()
            .is_some_and(|ui_manager| ui_manager.capture(&window, window_id, &event));
        if captured {
            // Releases still end drags that began over the room
            if let WindowEvent::MouseInput {
                state: ElementState::Released,
                button,
                ..
            } = event
            {
                self.planner.mouse_button(button, ElementState::Released);
                self.clicks.release(self.cursor);
            }
            window.request_redraw();
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if is_quit_key(&logical_key) {
                    self.shutdown(event_loop);
                } else if let Some(command) = PlacementCommand::from_key(&logical_key) {
                    let applied = self.planner.command(command);
                    log::debug!("{:?} applied: {}", command, applied);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                self.planner.pointer_moved(self.cursor.0, self.cursor.1);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.planner.mouse_button(button, state);
                if button == MouseButton::Left {
                    self.handle_left_button(state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.planner.scroll(&delta);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.planner.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.frames.is_running() {
            event_loop.exit();
            return;
        }
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
