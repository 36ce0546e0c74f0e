//! Fixed application settings.
//!
//! Every constant the shell needs (window, resource paths, layout, key
//! bindings) is kept in one `Config` value. The values come from a TOML
//! document compiled into the binary, so the running program has no
//! configuration file to read.

use std::path::PathBuf;
use std::time::Duration;

use glam::Vec2;
use serde::Deserialize;

use crate::assets::AssetKind;
use crate::error::{Result, ShellError};
use crate::render::Rect;

const BUILTIN: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub layout: LayoutConfig,
    pub keys: KeyBindings,
    /// Fixed wait after each rendered frame.
    pub frame_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Resource file names, relative to `root`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub font: String,
    pub music: String,
    pub sample: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    pub background: [u8; 4],
    pub image_origin: Vec2,
    pub image_size: Vec2,
    /// Point size the font is opened at.
    pub font_size: f32,
    pub text: String,
    pub text_color: [u8; 4],
    pub text_origin: Vec2,
}

/// Characters matched case-insensitively against the logical key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyBindings {
    pub toggle_music: String,
    pub play_sound: String,
}

impl Config {
    /// The settings shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ShellError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ShellError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.keys.toggle_music.is_empty() || self.keys.play_sound.is_empty() {
            return Err(ShellError::Config("key bindings must not be empty".into()));
        }
        if self.keys.toggle_music.eq_ignore_ascii_case(&self.keys.play_sound) {
            return Err(ShellError::Config(format!(
                "toggle and sound keys are both bound to {:?}",
                self.keys.play_sound
            )));
        }
        Ok(())
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

impl WindowConfig {
    /// Logical drawing area; layout coordinates are expressed in this space.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl AssetPaths {
    pub fn path(&self, asset: AssetKind) -> PathBuf {
        let name = match asset {
            AssetKind::Font => &self.font,
            AssetKind::Music => &self.music,
            AssetKind::Sample => &self.sample,
            AssetKind::Image => &self.image,
        };
        self.root.join(name)
    }
}

impl LayoutConfig {
    pub fn image_rect(&self) -> Rect {
        Rect::new(self.image_origin, self.image_size)
    }
}
