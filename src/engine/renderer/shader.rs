// Shader program abstraction and the wgpu quad pipeline

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::warn;
use wgpu::util::DeviceExt;

use super::Vertex;

/// Uniform names understood by the quad shader
pub const UNIFORM_MODEL: &str = "model";
pub const UNIFORM_VIEW: &str = "view";
pub const UNIFORM_PROJECTION: &str = "projection";
pub const UNIFORM_USE_TEXTURE: &str = "useTexture";

/// A shader program that takes named uniforms
pub trait ShaderProgram {
    /// Make this program current for the following draws
    fn bind(&mut self);
    fn set_matrix4(&mut self, name: &str, value: Mat4);
    fn set_bool(&mut self, name: &str, value: bool);
}

/// Uniform block layout of `shaders/quad.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub use_texture: u32,
    _padding: [u32; 3],
}

impl Default for QuadUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            use_texture: 0,
            _padding: [0; 3],
        }
    }
}

impl QuadUniforms {
    fn set_matrix4(&mut self, name: &str, value: Mat4) -> bool {
        let slot = match name {
            UNIFORM_MODEL => &mut self.model,
            UNIFORM_VIEW => &mut self.view,
            UNIFORM_PROJECTION => &mut self.projection,
            _ => return false,
        };
        *slot = value.to_cols_array_2d();
        true
    }

    fn set_bool(&mut self, name: &str, value: bool) -> bool {
        match name {
            UNIFORM_USE_TEXTURE => {
                self.use_texture = u32::from(value);
                true
            }
            _ => false,
        }
    }
}

/// Quad render pipeline with a CPU-side copy of its uniforms
///
/// Uniform values are staged here and uploaded by the frame target right
/// before each draw.
pub struct QuadShader {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    uniforms: QuadUniforms,
}

impl QuadShader {
    /// Create the quad pipeline for the given surface format
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Quad Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Quad Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Model matrices may mirror quads
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let uniforms = QuadUniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Quad Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            uniforms,
        }
    }

    /// Layout that texture bind groups must be created against
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    pub fn uniform_bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform_bind_group
    }

    /// Staged uniform values
    pub fn uniforms(&self) -> &QuadUniforms {
        &self.uniforms
    }
}

impl ShaderProgram for QuadShader {
    // The pipeline is selected per render pass, so binding only resets the
    // staged uniforms.
    fn bind(&mut self) {
        self.uniforms = QuadUniforms::default();
    }

    fn set_matrix4(&mut self, name: &str, value: Mat4) {
        if !self.uniforms.set_matrix4(name, value) {
            warn!("Quad shader has no matrix uniform '{}'", name);
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        if !self.uniforms.set_bool(name, value) {
            warn!("Quad shader has no bool uniform '{}'", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_uniform_block_size_matches_wgsl() {
        // 3 x mat4x4<f32> + u32, rounded up to 16 bytes
        assert_eq!(std::mem::size_of::<QuadUniforms>(), 208);
    }

    #[test]
    fn test_named_uniforms() {
        let mut uniforms = QuadUniforms::default();
        let translation = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

        assert!(uniforms.set_matrix4(UNIFORM_VIEW, translation));
        assert!(uniforms.set_bool(UNIFORM_USE_TEXTURE, true));

        assert_eq!(uniforms.view, translation.to_cols_array_2d());
        assert_eq!(uniforms.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniforms.use_texture, 1);
    }

    #[test]
    fn test_unknown_uniform_is_rejected() {
        let mut uniforms = QuadUniforms::default();
        assert!(!uniforms.set_matrix4("normalMatrix", Mat4::ZERO));
        assert!(!uniforms.set_bool(UNIFORM_MODEL, true));
        assert_eq!(uniforms, QuadUniforms::default());
    }
}
