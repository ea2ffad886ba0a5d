//! Error taxonomy for atlas builds. Every variant aborts the current build;
//! there is no partial-success mode.

use std::path::PathBuf;

use crate::config::ConfigError;

pub type AtlasResult<T> = Result<T, AtlasError>;

#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    /// Input image is unreadable or in an unrecognized format.
    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad { path: PathBuf, #[source] source: image::ImageError },

    /// Side-car glyph descriptor contains a malformed line.
    #[error("malformed font descriptor {} (line {line}): {reason}", .path.display())]
    FontParse { path: PathBuf, line: usize, reason: String },

    /// Size search reached the configured ceiling without a fit.
    #[error("atlas does not fit within {max_dimension}x{max_dimension}")]
    AtlasTooLarge { max_dimension: u32 },

    /// No placement carries the marker item. Internal bug, not an input problem.
    #[error("marker item '{name}' is missing from the placements")]
    MissingMarker { name: String },

    /// Packer proposed a rotated placement; compositing cannot rotate.
    #[error("packer rotated '{name}', rotated placements are not supported")]
    UnsupportedRotation { name: String },

    /// Placement spills outside the composite; the packer broke its contract.
    #[error("failed to paste '{name}' into the atlas at {x},{y}")]
    Paste { name: String, x: u32, y: u32 },

    #[error("failed to save image {}: {source}", .path.display())]
    ImageSave { path: PathBuf, #[source] source: image::ImageError },

    #[error("i/o error on {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to format descriptor: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("invalid configuration: {0:?}")]
    Config(ConfigError),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl From<ConfigError> for AtlasError {
    fn from(e: ConfigError) -> Self { AtlasError::Config(e) }
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AtlasError::Io { path: path.into(), source }
    }
}
