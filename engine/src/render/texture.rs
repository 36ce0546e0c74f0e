use glam::UVec2;
use image::RgbaImage;
use thiserror::Error;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Device, Queue};

use super::SpritePipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextureSizeError {
    #[error("image has no pixels ({}x{})", .0.x, .0.y)]
    Empty(UVec2),
    #[error("image is {}x{}, larger than the {max}px texture limit", .size.x, .size.y)]
    TooLarge { size: UVec2, max: u32 },
}

/// Reject extents the device cannot hold before wgpu sees them.
pub fn check_extent(size: UVec2, max_dimension: u32) -> Result<(), TextureSizeError> {
    if size.x == 0 || size.y == 0 {
        return Err(TextureSizeError::Empty(size));
    }
    if size.x > max_dimension || size.y > max_dimension {
        return Err(TextureSizeError::TooLarge {
            size,
            max: max_dimension,
        });
    }
    Ok(())
}

/// An RGBA image resident on the GPU, ready to bind to the sprite pipeline.
pub struct Texture {
    _texture: wgpu::Texture,
    bind_group: BindGroup,
    size: UVec2,
}

impl Texture {
    pub fn from_image(
        device: &Device,
        queue: &Queue,
        sprites: &SpritePipeline,
        image: &RgbaImage,
        label: &str,
    ) -> Result<Self, TextureSizeError> {
        let size = UVec2::new(image.width(), image.height());
        check_extent(size, device.limits().max_texture_dimension_2d)?;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: size.x,
                    height: size.y,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: sprites.texture_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sprites.sampler()),
                },
            ],
        });

        Ok(Self {
            _texture: texture,
            bind_group,
            size,
        })
    }

    /// Pixel dimensions of the uploaded image.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub(super) fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}
