//! Atlas descriptor: texture file, white-pixel texel, font sections, sprites.
//!
//! ```text
//! [Texture]
//! file atlas.png
//! whitepixel 11 21
//!
//! [Font.default]
//! ...
//!
//! [Sprites]
//! player 0 0 40 30
//! ```

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::content::ItemKind;
use crate::driver::Placement;
use crate::error::{AtlasError, AtlasResult};
use crate::glyph::sidecar_path;

/// Sprite key: the input name without directories or extension.
pub fn sprite_name(name: &str) -> &str {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

/// Centre texel of the marker placement, truncated.
pub fn white_pixel(placements: &[Placement<'_>], marker_name: &str) -> AtlasResult<(u32, u32)> {
    placements
        .iter()
        .find(|p| p.item.is_marker())
        .map(|p| (p.x + p.item.width / 2, p.y + p.item.height / 2))
        .ok_or_else(|| AtlasError::MissingMarker { name: marker_name.to_string() })
}

/// Render the whole descriptor in memory. Font sections keep placement order.
pub fn render(image: &Path, placements: &[Placement<'_>], marker_name: &str) -> AtlasResult<String> {
    let mut out = String::new();
    let (wx, wy) = white_pixel(placements, marker_name)?;
    writeln!(out, "[Texture]")?;
    writeln!(out, "file {}", image.display())?;
    writeln!(out, "whitepixel {} {}", wx, wy)?;
    writeln!(out)?;

    for p in placements {
        if let ItemKind::Font(font) = &p.item.kind {
            font.rewrite(&mut out, p.x, p.y)?;
            writeln!(out)?;
        }
    }

    writeln!(out, "[Sprites]")?;
    for p in placements.iter().filter(|p| matches!(p.item.kind, ItemKind::Sprite)) {
        writeln!(out, "{} {} {} {} {}", sprite_name(&p.item.name), p.x, p.y, p.item.width, p.item.height)?;
    }
    Ok(out)
}

/// Write the descriptor for `image` next to it and return its path.
pub fn emit(image: &Path, placements: &[Placement<'_>], marker_name: &str, extension: &str) -> AtlasResult<PathBuf> {
    let text = render(image, placements, marker_name)?;
    let path = sidecar_path(image, extension);
    std::fs::write(&path, text).map_err(|e| AtlasError::io(&path, e))?;
    Ok(path)
}
