// Texture creation and lookup for the quad batch

use image::{Rgba, RgbaImage};
use log::{debug, warn};

/// Handle to a texture owned by the texture manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

impl TextureHandle {
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// A texture's bind group for the quad pipeline
///
/// The bind group keeps its view and sampler alive.
pub struct Texture {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Upload an RGBA image and bind it against `layout`
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        img: &RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = img.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            img.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            bind_group,
            width,
            height,
        }
    }

    /// Create a 1x1 solid color texture
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        color: [u8; 4],
        label: Option<&str>,
    ) -> Self {
        let img = RgbaImage::from_pixel(1, 1, Rgba(color));
        Self::from_image(device, queue, layout, &img, label)
    }
}

/// Checkerboard pattern with square cells of `cell` pixels
pub fn checkerboard(size: u32, cell: u32, light: [u8; 4], dark: [u8; 4]) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba(light)
        } else {
            Rgba(dark)
        }
    })
}

/// Owns every texture the batch can reference
///
/// Untextured draws and unknown handles sample a 1x1 white texture, so the
/// pipeline always has a texture bound.
pub struct TextureManager {
    textures: Vec<Texture>,
    white: Texture,
}

impl TextureManager {
    /// Create a new texture manager
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, layout: &wgpu::BindGroupLayout) -> Self {
        let white = Texture::from_color(device, queue, layout, [255, 255, 255, 255], Some("White"));
        Self {
            textures: Vec::new(),
            white,
        }
    }

    /// Upload an image and return its handle
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        img: &RgbaImage,
        label: &str,
    ) -> TextureHandle {
        let texture = Texture::from_image(device, queue, layout, img, Some(label));
        let handle = TextureHandle(self.textures.len());
        debug!(
            "Created texture '{}' {}x{} as {:?}",
            label, texture.width, texture.height, handle
        );
        self.textures.push(texture);
        handle
    }

    /// Get a texture by handle
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    /// Bind group to use for a draw, falling back to white
    pub fn bind_group(&self, handle: Option<TextureHandle>) -> &wgpu::BindGroup {
        match handle {
            None => &self.white.bind_group,
            Some(handle) => match self.get(handle) {
                Some(texture) => &texture.bind_group,
                None => {
                    warn!("Unknown texture {:?}, drawing untextured", handle);
                    &self.white.bind_group
                }
            },
        }
    }

}
