// Recording test doubles for the batch seams

use std::collections::HashMap;

use glam::Mat4;

use super::camera::CameraMatrices;
use super::gpu::GraphicsDevice;
use super::shader::ShaderProgram;
use super::texture::TextureHandle;
use super::Vertex;

/// Remembers the last value written to each uniform
#[derive(Debug, Default)]
pub struct RecordingShader {
    pub binds: usize,
    matrices: HashMap<String, Mat4>,
    flags: HashMap<String, bool>,
}

impl RecordingShader {
    pub fn matrix(&self, name: &str) -> Option<Mat4> {
        self.matrices.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }
}

impl ShaderProgram for RecordingShader {
    fn bind(&mut self) {
        self.binds += 1;
    }

    fn set_matrix4(&mut self, name: &str, value: Mat4) {
        self.matrices.insert(name.to_string(), value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }
}

#[derive(Debug, Clone)]
pub struct DrawCall {
    pub texture: Option<TextureHandle>,
    pub vertices: Vec<Vertex>,
    pub index_count: u32,
}

/// Captures every draw instead of talking to a GPU
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub draws: Vec<DrawCall>,
    texture: Option<TextureHandle>,
    uploaded: Vec<Vertex>,
}

impl RecordingDevice {
    pub fn texture(index: usize) -> TextureHandle {
        TextureHandle::from_index(index)
    }

    /// Quads drawn across all calls
    pub fn quad_count(&self) -> usize {
        self.draws.iter().map(|d| d.vertices.len() / 4).sum()
    }
}

impl GraphicsDevice for RecordingDevice {
    type Shader = RecordingShader;

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        self.uploaded = vertices.to_vec();
    }

    fn draw_indexed(&mut self, _shader: &RecordingShader, index_count: u32) {
        self.draws.push(DrawCall {
            texture: self.texture,
            vertices: std::mem::take(&mut self.uploaded),
            index_count,
        });
    }
}

/// Camera with fixed matrices
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl CameraMatrices for FixedCamera {
    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}
