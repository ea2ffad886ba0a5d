//! Build configuration. Replaces the process-wide constants of older
//! packers (bin dimension, bin count, marker name/size) with one value
//! passed into the loader and the driver.

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};

/// Pre-pass ordering applied to items before they reach the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Largest area first. Ties keep input order.
    AreaDesc,
    /// Longest side first. Ties keep input order.
    MaxSideDesc,
    /// Keep the input order.
    None,
}

impl Default for SortOrder {
    fn default() -> Self { SortOrder::AreaDesc }
}

/// The opaque swatch appended to every atlas as a solid-color texel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Reserved item name. Callers must not use it for an input image.
    pub name: String,
    /// Side length of the square swatch in pixels.
    pub size: u32,
}

impl Default for MarkerConfig {
    fn default() -> Self { Self { name: "__whitepixel__".to_string(), size: 3 } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// First candidate canvas side; doubled after each failed round.
    pub min_dimension: u32,
    /// Ceiling for the size search. Exceeding it yields `AtlasTooLarge`.
    pub max_dimension: u32,
    pub canvas_count: u32,
    pub marker: MarkerConfig,
    /// Extension of side-car font descriptors and of the emitted descriptor.
    pub descriptor_extension: String,
    pub sort: SortOrder,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            min_dimension: 128,
            max_dimension: 8192,
            canvas_count: 1,
            marker: MarkerConfig::default(),
            descriptor_extension: "gorilla".to_string(),
            sort: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroMinDimension,
    MaxBelowMin { min: u32, max: u32 },
    /// The descriptor names a single texture, so only one canvas is supported.
    UnsupportedCanvasCount { count: u32 },
    ZeroMarkerSize,
    EmptyMarkerName,
    EmptyDescriptorExtension,
}

pub fn validate_config(cfg: &AtlasConfig) -> Result<(), ConfigError> {
    if cfg.min_dimension == 0 { return Err(ConfigError::ZeroMinDimension); }
    if cfg.max_dimension < cfg.min_dimension {
        return Err(ConfigError::MaxBelowMin { min: cfg.min_dimension, max: cfg.max_dimension });
    }
    if cfg.canvas_count != 1 { return Err(ConfigError::UnsupportedCanvasCount { count: cfg.canvas_count }); }
    if cfg.marker.size == 0 { return Err(ConfigError::ZeroMarkerSize); }
    if cfg.marker.name.is_empty() { return Err(ConfigError::EmptyMarkerName); }
    if cfg.descriptor_extension.is_empty() { return Err(ConfigError::EmptyDescriptorExtension); }
    Ok(())
}

pub fn load_from_yaml_str(s: &str) -> AtlasResult<AtlasConfig> {
    let cfg: AtlasConfig = serde_yaml::from_str(s)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> AtlasResult<AtlasConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|e| AtlasError::io(path, e))?;
    load_from_yaml_str(&data)
}
