use std::fmt::Display;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assets::AssetKind;
use crate::lifecycle::{InitStage, Phase};

pub type Result<T, E = ShellError> = std::result::Result<T, E>;

/// Everything that can stop the shell from reaching its running state.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A subsystem, the window or the drawing surface could not be brought up.
    #[error("{stage} initialization failed: {message}")]
    Init { stage: InitStage, message: String },

    /// A required media file could not be read or decoded.
    #[error("failed to load {asset} from {}: {message}", path.display())]
    Asset {
        asset: AssetKind,
        path: PathBuf,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("illegal lifecycle transition {from:?} -> {to:?}")]
    Phase { from: Phase, to: Phase },
}

impl ShellError {
    pub fn init(stage: InitStage, err: impl Display) -> Self {
        Self::Init {
            stage,
            message: err.to_string(),
        }
    }

    pub fn asset(asset: AssetKind, path: &Path, err: impl Display) -> Self {
        Self::Asset {
            asset,
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// The failing asset, if this is an asset error.
    pub fn failed_asset(&self) -> Option<AssetKind> {
        match self {
            Self::Asset { asset, .. } => Some(*asset),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_stage_and_cause() {
        let err = ShellError::init(InitStage::Audio, "no output device");
        assert_eq!(
            err.to_string(),
            "audio mixer initialization failed: no output device"
        );

        let err = ShellError::asset(AssetKind::Image, Path::new("resources/rev.jpg"), "not found");
        assert_eq!(
            err.to_string(),
            "failed to load image from resources/rev.jpg: not found"
        );
        assert_eq!(err.failed_asset(), Some(AssetKind::Image));
    }
}
