//! Texture atlas builder: packs sprites, cropped bitmap-font sheets and a
//! white-pixel marker into one image plus a text descriptor.

pub mod config;
pub mod content;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod glyph;
pub mod packer;
pub mod surface;

pub use config::{AtlasConfig, MarkerConfig, SortOrder};
pub use driver::{pack, PackResult};
pub use error::{AtlasError, AtlasResult};
pub use packer::{GuillotinePacker, RectPacker};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load `inputs`, pack them with the default packer, and write `output`
/// plus its descriptor.
pub fn build_atlas<P: AsRef<std::path::Path>>(
    inputs: &[P],
    output: &std::path::Path,
    cfg: &AtlasConfig,
) -> AtlasResult<PackResult> {
    config::validate_config(cfg)?;
    if inputs.is_empty() { return Ok(PackResult::Empty); }
    let items = content::load_items(inputs, cfg)?;
    driver::pack(&items, output, cfg, &mut GuillotinePacker)
}
