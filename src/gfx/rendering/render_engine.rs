//! WGPU-based rendering engine for the room view
//!
//! Owns the surface, device and the single lit pipeline every room and
//! furniture mesh is drawn with. UI overlays are recorded by a callback into
//! the same command encoder after the scene pass.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{global_bindings::GlobalBindings, texture_resource::DepthTexture},
        scene::{object::DrawMesh, room::hex_color, scene::Scene},
    },
    wgpu_utils::binding_types,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const ROOM_PIPELINE: &str = "Room";
const SKY_COLOR: u32 = 0x87CEEB;

/// What happened to a frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No surface texture this time; the surface was reconfigured if needed
    Skipped,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: Option<DepthTexture>,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
}

impl RenderEngine {
    /// Creates a render engine for the given window.
    ///
    /// Fails when no adapter, device or surface format is available; the
    /// caller treats that as fatal.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");
        let global_bindings = GlobalBindings::new(&device);
        let object_layout =
            binding_types::single_uniform_layout(&device, "Object Bind Group Layout");

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("room", include_str!("room.wgsl"));
        pipeline_manager.register_pipeline(
            ROOM_PIPELINE,
            PipelineConfig::default()
                .with_label("ROOM")
                .with_shader("room")
                // Walls are seen from both sides as the camera orbits
                .with_cull_mode(None)
                .with_depth_format(DepthTexture::FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.clone(),
                ]),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture: Some(depth_texture),
            format,
            pipeline_manager,
            global_bindings,
            object_layout,
        })
    }

    /// Writes the camera for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        self.global_bindings.update(&self.queue, camera_uniform);
    }

    /// Uploads new meshes, refreshes transforms and draws the scene followed
    /// by the UI callback.
    pub fn render_frame_with_ui<F>(
        &mut self,
        scene: &mut Scene,
        ui_callback: F,
    ) -> Result<FrameOutcome, RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        scene.init_gpu_resources(&self.device, &self.object_layout);
        scene.update_gpu_transforms(&self.queue);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => {
                log::warn!("Skipping frame: {}", err);
                return Ok(FrameOutcome::Skipped);
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b, _] = hex_color(SKY_COLOR);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_texture.as_ref().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(ROOM_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for (mesh, _) in scene.meshes() {
                    render_pass.draw_mesh(mesh);
                }
            }
        }

        ui_callback(
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_texture_view,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Reconfigures the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = self
            .depth_texture
            .take()
            .map(|depth| depth.recreate(&self.device, &self.config, "depth_texture"));
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
