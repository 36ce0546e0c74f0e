//! wgpu device and surface lifecycle, and per-frame presentation.

use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;
use log::{info, warn};
use wgpu::{
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureUsages, TextureViewDescriptor,
};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{Sprite, SpritePipeline, Texture, TextureSizeError};
use crate::error::{Result, ShellError};
use crate::lifecycle::InitStage;

/// The drawing surface bound to the shell's window.
pub struct Graphics {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    sprites: SpritePipeline,
    /// Layout space the scene is authored in.
    resolution: Vec2,
}

impl Graphics {
    pub async fn new(window: Arc<Window>, resolution: Vec2) -> Result<Self> {
        let fail = |e: &dyn std::fmt::Display| ShellError::init(InitStage::Surface, e);

        let size = window.inner_size();
        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).map_err(|e| fail(&e))?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| fail(&e))?;
        info!(
            "GPU adapter: {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("mediashell-device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                ..Default::default()
            })
            .await
            .map_err(|e| fail(&e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| fail(&"surface reports no supported formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sprites = SpritePipeline::new(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprites,
            resolution,
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Copy a CPU-side image into a new GPU texture. Fails if the image is
    /// empty or exceeds the device's texture size limit.
    pub fn upload(&self, image: &RgbaImage, label: &str) -> Result<Texture, TextureSizeError> {
        Texture::from_image(&self.device, &self.queue, &self.sprites, image, label)
    }

    /// Clear to `clear`, draw `sprites` in order and present. A frame that
    /// cannot be acquired is skipped.
    pub fn render_frame(&mut self, clear: wgpu::Color, sprites: &[Sprite<'_>]) {
        let output = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                warn!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.sprites
                .render(&mut pass, &self.device, &self.queue, self.resolution, sprites);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
