// Batched quad rendering
//
// Quads are accumulated into a CPU vertex array and drawn with a single
// indexed call per flush. A flush happens when the batch is full, when the
// texture changes, and when the session ends.

use glam::{Mat4, Vec2, Vec3, Vec4};
use log::{debug, trace};

use super::camera::CameraMatrices;
use super::gpu::GraphicsDevice;
use super::shader::{
    ShaderProgram, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_USE_TEXTURE, UNIFORM_VIEW,
};
use super::texture::TextureHandle;
use super::Vertex;

/// Quads per draw call
pub const MAX_QUADS: usize = 10_000;
pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;
pub const MAX_VERTICES: usize = MAX_QUADS * VERTICES_PER_QUAD;
pub const MAX_INDICES: usize = MAX_QUADS * INDICES_PER_QUAD;

/// Unit quad corners (counter-clockwise from bottom-left) and their UVs
const QUAD_CORNERS: [(Vec2, Vec2); VERTICES_PER_QUAD] = [
    (Vec2::new(-0.5, -0.5), Vec2::new(0.0, 0.0)),
    (Vec2::new(0.5, -0.5), Vec2::new(1.0, 0.0)),
    (Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0)),
    (Vec2::new(-0.5, 0.5), Vec2::new(0.0, 1.0)),
];

/// Counters for one batch session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub draw_calls: u32,
    pub quads: u32,
    pub vertices: u32,
    pub indices: u32,
}

/// CPU side of the quad batch: vertex staging and the static index pattern
pub struct QuadBatch {
    max_quads: usize,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    index_count: usize,
}

impl QuadBatch {
    /// Create a batch holding up to `MAX_QUADS` quads
    pub fn new() -> Self {
        Self::with_capacity(MAX_QUADS)
    }

    /// Create a batch holding up to `max_quads` quads (at least one)
    pub fn with_capacity(max_quads: usize) -> Self {
        let max_quads = max_quads.max(1);
        let indices = (0..max_quads as u32)
            .flat_map(|quad| {
                let offset = quad * VERTICES_PER_QUAD as u32;
                [0, 1, 2, 2, 3, 0].map(|i| offset + i)
            })
            .collect();

        Self {
            max_quads,
            vertices: Vec::with_capacity(max_quads * VERTICES_PER_QUAD),
            indices,
            index_count: 0,
        }
    }

    /// The full static index pattern, uploaded once
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn max_quads(&self) -> usize {
        self.max_quads
    }

    pub fn max_vertices(&self) -> usize {
        self.max_quads * VERTICES_PER_QUAD
    }

    pub fn max_indices(&self) -> usize {
        self.max_quads * INDICES_PER_QUAD
    }

    /// Vertices staged since the last flush
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Indices covering the staged quads
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    fn is_full(&self) -> bool {
        self.index_count >= self.max_indices()
            || self.vertices.len() + VERTICES_PER_QUAD > self.max_vertices()
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.index_count = 0;
    }

    /// Start a session drawing through `device` with `shader` and `camera`
    ///
    /// Any quads left over from an abandoned session are discarded.
    pub fn begin_batch<'a, D, C>(
        &'a mut self,
        device: D,
        shader: &'a mut D::Shader,
        camera: &'a C,
    ) -> BatchSession<'a, D, C>
    where
        D: GraphicsDevice,
        C: CameraMatrices + ?Sized,
    {
        self.reset();
        BatchSession {
            batch: self,
            device,
            shader,
            camera,
            texture: None,
            stats: BatchStats::default(),
        }
    }
}

impl Default for QuadBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// An open batch with its collaborators
///
/// Dropping the session flushes whatever is still pending.
pub struct BatchSession<'a, D: GraphicsDevice, C: CameraMatrices + ?Sized> {
    batch: &'a mut QuadBatch,
    device: D,
    shader: &'a mut D::Shader,
    camera: &'a C,
    texture: Option<TextureHandle>,
    stats: BatchStats,
}

impl<'a, D: GraphicsDevice, C: CameraMatrices + ?Sized> BatchSession<'a, D, C> {
    /// Queue a quad of `size` centred on the model's origin
    pub fn draw_quad(
        &mut self,
        model: Mat4,
        size: Vec2,
        color: Vec4,
        texture: Option<TextureHandle>,
    ) {
        if texture != self.texture {
            if self.batch.index_count > 0 {
                trace!("Texture change, flushing batch");
                self.flush();
            }
            self.texture = texture;
        }

        if self.batch.is_full() {
            debug!(
                "Quad batch full ({} quads), flushing",
                self.batch.index_count / INDICES_PER_QUAD
            );
            self.flush();
        }

        for (corner, uv) in QUAD_CORNERS {
            let local = (corner * size).extend(0.0);
            let position: Vec3 = model.transform_point3(local);
            self.batch.vertices.push(Vertex::new(position, uv, color));
        }
        self.batch.index_count += INDICES_PER_QUAD;
    }

    /// Draw everything pending and start an empty batch
    pub fn flush(&mut self) {
        let index_count = self.batch.index_count;
        if index_count == 0 {
            return;
        }

        self.shader.bind();
        self.shader
            .set_matrix4(UNIFORM_VIEW, self.camera.view_matrix());
        self.shader
            .set_matrix4(UNIFORM_PROJECTION, self.camera.projection_matrix());
        // Vertices are already in world space
        self.shader.set_matrix4(UNIFORM_MODEL, Mat4::IDENTITY);
        self.shader
            .set_bool(UNIFORM_USE_TEXTURE, self.texture.is_some());

        self.device.bind_texture(self.texture);
        self.device.upload_vertices(&self.batch.vertices);
        self.device.draw_indexed(&*self.shader, index_count as u32);

        self.stats.draw_calls += 1;
        self.stats.quads += (index_count / INDICES_PER_QUAD) as u32;
        self.stats.vertices += self.batch.vertices.len() as u32;
        self.stats.indices += index_count as u32;

        self.batch.reset();
    }

    /// Counters so far
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Quads waiting for the next flush
    pub fn pending_quads(&self) -> usize {
        self.batch.index_count / INDICES_PER_QUAD
    }

    /// Flush and close the session
    pub fn end_batch(mut self) -> BatchStats {
        self.flush();
        self.stats
    }
}

impl<D: GraphicsDevice, C: CameraMatrices + ?Sized> Drop for BatchSession<'_, D, C> {
    fn drop(&mut self) {
        self.flush();
    }
}
