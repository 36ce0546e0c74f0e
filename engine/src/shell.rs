//! The application shell: every handle the running program owns.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::ImageFormat;
use log::info;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::assets::{self, AssetKind, Assets, MediaLoader};
use crate::audio::{Mixer, Music, Playback, Sample};
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::input::{Command, Controller};
use crate::lifecycle::{InitStage, Ledger, Resource, Tracked};
use crate::render::{self, Graphics, Rect, Sprite, Texture};
use crate::text::FontFace;

pub type MediaAssets = Assets<FontFace, Music, Sample, Texture>;

/// Image decoding keeps no runtime state, so its bring-up only confirms the
/// decoder for the configured image is compiled in.
pub fn check_image_support(config: &Config) -> Result<()> {
    let path = config.assets.path(AssetKind::Image);
    let format =
        ImageFormat::from_path(&path).map_err(|e| ShellError::init(InitStage::Image, e))?;
    if !format.reading_enabled() {
        return Err(ShellError::init(
            InitStage::Image,
            format!("{format:?} decoding is not compiled in"),
        ));
    }
    Ok(())
}

pub fn check_font_support(config: &Config) -> Result<()> {
    let size = config.layout.font_size;
    if !size.is_finite() || size <= 0.0 {
        return Err(ShellError::init(
            InitStage::Font,
            format!("unusable point size {size}"),
        ));
    }
    Ok(())
}

/// Loads media against the live mixer and GPU.
struct DeviceLoader<'a> {
    mixer: &'a Mixer,
    graphics: &'a Graphics,
}

impl MediaLoader for DeviceLoader<'_> {
    type Font = FontFace;
    type Music = Music;
    type Sample = Sample;
    type Image = Texture;

    fn font(&mut self, path: &Path, size: f32) -> Result<FontFace> {
        FontFace::load(path, size)
    }

    fn music(&mut self, path: &Path) -> Result<Music> {
        Music::load(path, self.mixer)
    }

    fn sample(&mut self, path: &Path) -> Result<Sample> {
        Sample::load(path)
    }

    fn image(&mut self, path: &Path) -> Result<Texture> {
        let decoded = assets::decode_image(path)?;
        let texture = self
            .graphics
            .upload(&decoded, "image")
            .map_err(|e| ShellError::asset(AssetKind::Image, path, e));
        drop(decoded);
        texture
    }
}

/// Owns every live handle. Fields drop top to bottom, which is the shutdown
/// order: text, image, sample, music, font, surface, window, audio device.
pub struct Shell {
    text: Tracked<Texture>,
    assets: MediaAssets,
    graphics: Tracked<Graphics>,
    window: Tracked<Arc<Window>>,
    mixer: Tracked<Mixer>,
    controller: Controller,
    config: Config,
    next_frame: Instant,
}

impl Shell {
    /// Create the window and surface, then load the media. The window stays
    /// hidden until everything has loaded.
    pub fn launch(
        event_loop: &ActiveEventLoop,
        config: Config,
        mixer: Tracked<Mixer>,
        ledger: &Ledger,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .with_resizable(false)
            .with_visible(false);
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| ShellError::init(InitStage::Window, e))?;
        let window = ledger.track(Resource::Window, Arc::new(window));
        info!("Window created");

        let graphics = pollster::block_on(Graphics::new(
            Arc::clone(&*window),
            config.window.resolution(),
        ))?;
        let graphics = ledger.track(Resource::Surface, graphics);

        let assets = assets::load_all(
            &mut DeviceLoader {
                mixer: &mixer,
                graphics: &graphics,
            },
            &config.assets,
            config.layout.font_size,
            ledger,
        )?;

        let rendered = assets
            .font
            .rasterize(&config.layout.text, config.layout.text_color);
        let text = graphics.upload(&rendered, "instructions").map_err(|e| {
            ShellError::asset(AssetKind::Font, &config.assets.path(AssetKind::Font), e)
        })?;
        let text = ledger.track(Resource::TextTexture, text);

        window.set_visible(true);
        window.request_redraw();

        Ok(Self {
            text,
            assets,
            graphics,
            window,
            mixer,
            controller: Controller::default(),
            config,
            next_frame: Instant::now(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn handle(&mut self, command: Command) -> bool {
        let mut playback = Playback {
            mixer: &self.mixer,
            music: &self.assets.music,
            sample: &self.assets.sample,
        };
        self.controller.drain([command], &mut playback)
    }

    pub fn resized(&mut self, size: PhysicalSize<u32>) {
        self.graphics.resize(size);
    }

    /// When the next frame is due.
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// Draw the scene and schedule the next frame a fixed delay from now.
    pub fn render(&mut self) {
        let layout = &self.config.layout;
        let sprites = [
            Sprite {
                texture: &self.assets.image,
                rect: layout.image_rect(),
            },
            Sprite {
                texture: &self.text,
                rect: Rect::new(layout.text_origin, self.text.size().as_vec2()),
            },
        ];
        self.graphics
            .render_frame(render::clear_color(layout.background), &sprites);
        self.next_frame = Instant::now() + self.config.frame_delay();
    }
}
