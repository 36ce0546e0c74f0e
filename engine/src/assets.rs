//! Ordered, short-circuiting media loading.
//!
//! Assets load strictly in the order font, music, sample, image. The first
//! failure stops the sequence; whatever was already loaded unwinds in
//! reverse.

use std::fmt;
use std::path::Path;

use image::RgbaImage;
use log::info;

use crate::config::AssetPaths;
use crate::error::{Result, ShellError};
use crate::lifecycle::{Ledger, Resource, Tracked};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Font,
    Music,
    Sample,
    Image,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Font => "font",
            AssetKind::Music => "music",
            AssetKind::Sample => "sound effect",
            AssetKind::Image => "image",
        })
    }
}

/// Decode an image file into a CPU-side RGBA buffer.
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let decoded = image::open(path).map_err(|e| ShellError::asset(AssetKind::Image, path, e))?;
    Ok(decoded.into_rgba8())
}

/// Turns asset files into live handles.
pub trait MediaLoader {
    type Font;
    type Music;
    type Sample;
    type Image;

    fn font(&mut self, path: &Path, size: f32) -> Result<Self::Font>;
    fn music(&mut self, path: &Path) -> Result<Self::Music>;
    fn sample(&mut self, path: &Path) -> Result<Self::Sample>;
    fn image(&mut self, path: &Path) -> Result<Self::Image>;
}

/// The four loaded media handles.
///
/// Fields are declared in release order (the reverse of loading), which is
/// the order Rust drops them in.
pub struct Assets<F, M, S, I> {
    pub image: Tracked<I>,
    pub sample: Tracked<S>,
    pub music: Tracked<M>,
    pub font: Tracked<F>,
}

pub type LoadedAssets<L> = Assets<
    <L as MediaLoader>::Font,
    <L as MediaLoader>::Music,
    <L as MediaLoader>::Sample,
    <L as MediaLoader>::Image,
>;

pub fn load_all<L: MediaLoader>(
    loader: &mut L,
    paths: &AssetPaths,
    font_size: f32,
    ledger: &Ledger,
) -> Result<LoadedAssets<L>> {
    let path = paths.path(AssetKind::Font);
    let font = ledger.track(Resource::Font, loader.font(&path, font_size)?);
    info!("Loaded font {} at {font_size}pt", path.display());

    let path = paths.path(AssetKind::Music);
    let music = ledger.track(Resource::Music, loader.music(&path)?);
    info!("Loaded music {}", path.display());

    let path = paths.path(AssetKind::Sample);
    let sample = ledger.track(Resource::Sample, loader.sample(&path)?);
    info!("Loaded sound effect {}", path.display());

    let path = paths.path(AssetKind::Image);
    let image = ledger.track(Resource::ImageTexture, loader.image(&path)?);
    info!("Loaded image {}", path.display());

    Ok(Assets {
        image,
        sample,
        music,
        font,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lifecycle::Transition;

    const LOAD_ORDER: [AssetKind; 4] = [
        AssetKind::Font,
        AssetKind::Music,
        AssetKind::Sample,
        AssetKind::Image,
    ];

    /// Records each attempt and fails on the chosen asset.
    struct ScriptedLoader {
        fail_on: Option<AssetKind>,
        attempts: Vec<AssetKind>,
    }

    impl ScriptedLoader {
        fn new(fail_on: Option<AssetKind>) -> Self {
            Self {
                fail_on,
                attempts: Vec::new(),
            }
        }

        fn attempt(&mut self, asset: AssetKind, path: &Path) -> Result<()> {
            self.attempts.push(asset);
            if self.fail_on == Some(asset) {
                return Err(ShellError::asset(asset, path, "scripted failure"));
            }
            Ok(())
        }
    }

    impl MediaLoader for ScriptedLoader {
        type Font = f32;
        type Music = ();
        type Sample = ();
        type Image = ();

        fn font(&mut self, path: &Path, size: f32) -> Result<f32> {
            self.attempt(AssetKind::Font, path).map(|_| size)
        }
        fn music(&mut self, path: &Path) -> Result<()> {
            self.attempt(AssetKind::Music, path)
        }
        fn sample(&mut self, path: &Path) -> Result<()> {
            self.attempt(AssetKind::Sample, path)
        }
        fn image(&mut self, path: &Path) -> Result<()> {
            self.attempt(AssetKind::Image, path)
        }
    }

    fn paths() -> AssetPaths {
        Config::builtin().unwrap().assets
    }

    #[test]
    fn loads_in_fixed_order() {
        let ledger = Ledger::default();
        let mut loader = ScriptedLoader::new(None);
        let assets = load_all(&mut loader, &paths(), 28.0, &ledger).unwrap();

        assert_eq!(loader.attempts, LOAD_ORDER);
        assert_eq!(*assets.font, 28.0);
        let acquired: Vec<_> = ledger.entries().into_iter().map(|(r, _)| r).collect();
        assert_eq!(
            acquired,
            vec![
                Resource::Font,
                Resource::Music,
                Resource::Sample,
                Resource::ImageTexture
            ]
        );
    }

    #[test]
    fn dropping_assets_releases_in_reverse_order() {
        let ledger = Ledger::default();
        let assets = load_all(&mut ScriptedLoader::new(None), &paths(), 28.0, &ledger).unwrap();
        drop(assets);

        assert_eq!(
            ledger.released(),
            vec![
                Resource::ImageTexture,
                Resource::Sample,
                Resource::Music,
                Resource::Font
            ]
        );
        assert!(ledger.outstanding().is_empty());
    }

    #[test]
    fn font_failure_stops_before_anything_else() {
        let ledger = Ledger::default();
        let mut loader = ScriptedLoader::new(Some(AssetKind::Font));
        let err = load_all(&mut loader, &paths(), 28.0, &ledger)
            .err()
            .unwrap();

        assert_eq!(err.failed_asset(), Some(AssetKind::Font));
        assert_eq!(loader.attempts, vec![AssetKind::Font]);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn image_failure_unwinds_what_was_loaded() {
        let ledger = Ledger::default();
        let mut loader = ScriptedLoader::new(Some(AssetKind::Image));
        let err = load_all(&mut loader, &paths(), 28.0, &ledger)
            .err()
            .unwrap();

        assert_eq!(err.failed_asset(), Some(AssetKind::Image));
        assert_eq!(loader.attempts, LOAD_ORDER);
        assert_eq!(
            ledger.released(),
            vec![Resource::Sample, Resource::Music, Resource::Font]
        );
        assert!(ledger.outstanding().is_empty());
        assert!(!ledger
            .entries()
            .contains(&(Resource::ImageTexture, Transition::Acquired)));
    }
}
