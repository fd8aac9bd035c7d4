// Graphics device seam and its wgpu implementation

use log::trace;

use super::shader::{QuadShader, ShaderProgram};
use super::texture::{TextureHandle, TextureManager};
use super::Vertex;

/// The operations the quad batch needs from a GPU backend
pub trait GraphicsDevice {
    type Shader: ShaderProgram;

    /// Select the texture for the next draw (`None` = untextured)
    fn bind_texture(&mut self, texture: Option<TextureHandle>);

    /// Replace the contents of the dynamic vertex buffer
    fn upload_vertices(&mut self, vertices: &[Vertex]);

    /// Draw `index_count` indices of the static quad index buffer
    fn draw_indexed(&mut self, shader: &Self::Shader, index_count: u32);
}

impl<T: GraphicsDevice + ?Sized> GraphicsDevice for &mut T {
    type Shader = T::Shader;

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        (**self).bind_texture(texture);
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        (**self).upload_vertices(vertices);
    }

    fn draw_indexed(&mut self, shader: &Self::Shader, index_count: u32) {
        (**self).draw_indexed(shader, index_count);
    }
}

/// One frame's render target plus the shared batch buffers
///
/// Each draw records its own render pass that loads the existing frame
/// contents, so successive flushes layer on top of each other.
pub struct FrameTarget<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
    vertex_buffer: &'a wgpu::Buffer,
    index_buffer: &'a wgpu::Buffer,
    textures: &'a TextureManager,
    texture: Option<TextureHandle>,
}

impl<'a> FrameTarget<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
        vertex_buffer: &'a wgpu::Buffer,
        index_buffer: &'a wgpu::Buffer,
        textures: &'a TextureManager,
    ) -> Self {
        Self {
            device,
            queue,
            view,
            vertex_buffer,
            index_buffer,
            textures,
            texture: None,
        }
    }
}

impl GraphicsDevice for FrameTarget<'_> {
    type Shader = QuadShader;

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.queue
            .write_buffer(self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    fn draw_indexed(&mut self, shader: &QuadShader, index_count: u32) {
        self.queue.write_buffer(
            shader.uniform_buffer(),
            0,
            bytemuck::bytes_of(shader.uniforms()),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Quad Batch Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quad Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.view,
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

            render_pass.set_pipeline(shader.pipeline());
            render_pass.set_bind_group(0, shader.uniform_bind_group(), &[]);
            render_pass.set_bind_group(1, self.textures.bind_group(self.texture), &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        trace!("Submitted quad draw with {} indices", index_count);
    }
}
