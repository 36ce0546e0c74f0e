use std::path::Path;

use mediashell_engine::assets::{self, AssetKind};
use mediashell_engine::audio::Sample;
use mediashell_engine::lifecycle::InitStage;
use mediashell_engine::shell::{check_font_support, check_image_support};
use mediashell_engine::text::FontFace;
use mediashell_engine::{Config, ShellError};

fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let value = ((i % 64) as i16 - 32) * 512;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn sample_decodes_to_pcm() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btn.wav");
    write_wav(&path, 2, 22_050, 11_025);

    let sample = Sample::load(&path).unwrap();
    assert_eq!(sample.channels(), 2);
    assert_eq!(sample.sample_rate(), 22_050);

    let mono = dir.path().join("mono.wav");
    write_wav(&mono, 1, 44_100, 4_410);
    let sample = Sample::load(&mono).unwrap();
    assert_eq!(sample.channels(), 1);
    assert_eq!(sample.sample_rate(), 44_100);
}

#[test]
fn missing_sample_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btn.wav");

    let err = Sample::load(&path).err().unwrap();
    assert_eq!(err.failed_asset(), Some(AssetKind::Sample));
    assert!(err.to_string().contains("btn.wav"));
}

#[test]
fn undecodable_sample_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btn.wav");
    std::fs::write(&path, b"definitely not audio").unwrap();

    let err = Sample::load(&path).err().unwrap();
    assert_eq!(err.failed_asset(), Some(AssetKind::Sample));
}

#[test]
fn font_errors_name_the_font() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Times New Roman.ttf");
    let err = FontFace::load(&missing, 28.0).err().unwrap();
    assert_eq!(err.failed_asset(), Some(AssetKind::Font));

    let garbage = dir.path().join("garbage.ttf");
    std::fs::write(&garbage, [0u8; 128]).unwrap();
    let err = FontFace::load(&garbage, 28.0).err().unwrap();
    assert_eq!(err.failed_asset(), Some(AssetKind::Font));
}

#[test]
fn builtin_assets_need_only_supported_decoders() {
    let config = Config::builtin().unwrap();
    check_image_support(&config).unwrap();
    check_font_support(&config).unwrap();
}

#[test]
fn unknown_image_format_fails_image_bring_up() {
    let mut config = Config::builtin().unwrap();
    config.assets.image = "rev.unknownformat".into();

    let err = check_image_support(&config).unwrap_err();
    assert!(matches!(
        err,
        ShellError::Init {
            stage: InitStage::Image,
            ..
        }
    ));
}

#[test]
fn non_positive_font_size_fails_font_bring_up() {
    let mut config = Config::builtin().unwrap();
    config.layout.font_size = 0.0;

    let err = check_font_support(&config).unwrap_err();
    assert!(matches!(
        err,
        ShellError::Init {
            stage: InitStage::Font,
            ..
        }
    ));
}

#[test]
fn image_decodes_to_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rev.png");
    image::RgbImage::from_pixel(64, 32, image::Rgb([200, 10, 10]))
        .save(&path)
        .unwrap();

    let decoded = assets::decode_image(&path).unwrap();
    assert_eq!(decoded.dimensions(), (64, 32));
    assert_eq!(decoded.get_pixel(0, 0).0, [200, 10, 10, 255]);
}

#[test]
fn missing_image_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rev.jpg");

    let err = assets::decode_image(&path).unwrap_err();
    assert!(matches!(
        err,
        ShellError::Asset {
            asset: AssetKind::Image,
            ..
        }
    ));
    assert!(err.to_string().contains("rev.jpg"));
}

#[test]
fn undecodable_image_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rev.jpg");
    std::fs::write(&path, b"not a jpeg at all").unwrap();

    let err = assets::decode_image(&path).unwrap_err();
    assert_eq!(err.failed_asset(), Some(AssetKind::Image));
    assert!(err.to_string().contains(&path.display().to_string()));
}
