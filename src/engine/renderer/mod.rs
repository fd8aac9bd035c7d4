// Rendering system using wgpu

pub mod batch;
mod camera;
pub mod gpu;
pub mod shader;
#[cfg(test)]
pub(crate) mod testing;
pub mod texture;
mod vertex;

pub use batch::{BatchSession, BatchStats, QuadBatch};
pub use camera::{Camera, CameraMatrices};
pub use gpu::{FrameTarget, GraphicsDevice};
pub use shader::QuadShader;
pub use texture::{TextureHandle, TextureManager};
pub use vertex::Vertex;

use glam::Vec2;
use image::RgbaImage;
use log::{info, warn};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::engine::config::EngineConfig;

/// Errors raised while setting up or presenting frames
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Main renderer responsible for initializing wgpu and driving the quad batch
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    shader: QuadShader,
    batch: QuadBatch,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    texture_manager: TextureManager,
    camera: Camera,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>, engine_config: &EngineConfig) -> Result<Self, RenderError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = QuadShader::new(&device, surface_format);
        let batch = QuadBatch::new();

        // Vertex storage is rewritten on every flush, indices never change
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quad Vertex Buffer"),
            size: (batch.max_vertices() * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(batch.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let texture_manager = TextureManager::new(&device, &queue, shader.texture_layout());

        let camera = Camera::new(
            Vec2::ZERO,
            config.width as f32,
            config.height as f32,
            engine_config.pixels_per_unit,
        );

        let [r, g, b, a] = engine_config.clear_color;
        let clear_color = wgpu::Color { r, g, b, a };

        info!(
            "Renderer initialized with {}x{} resolution, {} quads per batch",
            size.width,
            size.height,
            batch.max_quads()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            clear_color,
            shader,
            batch,
            vertex_buffer,
            index_buffer,
            texture_manager,
            camera,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera
                .resize(new_size.width as f32, new_size.height as f32);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Render a frame
    ///
    /// Clears the frame, hands a batch session to `draw`, flushes what is left
    /// and presents. A lost or outdated surface is reconfigured and the frame
    /// is skipped.
    pub fn render<F>(&mut self, draw: F) -> Result<BatchStats, RenderError>
    where
        F: FnOnce(&mut BatchSession<'_, FrameTarget<'_>, Camera>),
    {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(BatchStats::default());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.clear(&view);

        let target = FrameTarget::new(
            &self.device,
            &self.queue,
            &view,
            &self.vertex_buffer,
            &self.index_buffer,
            &self.texture_manager,
        );
        let mut session = self.batch.begin_batch(target, &mut self.shader, &self.camera);
        draw(&mut session);
        let stats = session.end_batch();

        output.present();

        Ok(stats)
    }

    fn clear(&self, view: &wgpu::TextureView) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });

        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Upload an image the batch can draw with
    pub fn create_texture(&mut self, img: &RgbaImage, label: &str) -> TextureHandle {
        self.texture_manager.create_texture(
            &self.device,
            &self.queue,
            self.shader.texture_layout(),
            img,
            label,
        )
    }
}
