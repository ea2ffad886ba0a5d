//! Turns input image paths into packable items.

use std::path::Path;

use log::{info, warn};

use crate::config::{AtlasConfig, MarkerConfig, SortOrder};
use crate::error::{AtlasError, AtlasResult};
use crate::glyph::{sidecar_path, FontDescriptor};
use crate::surface::{Surface, OPAQUE_WHITE};

#[derive(Debug, Clone)]
pub enum ItemKind {
    Sprite,
    /// Font sheet, already cropped to its glyph bounding box.
    Font(FontDescriptor),
    Marker,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Sprite => "sprite",
            ItemKind::Font(_) => "font",
            ItemKind::Marker => "marker",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackableItem {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub surface: Surface,
    pub kind: ItemKind,
}

impl PackableItem {
    pub fn area(&self) -> u64 { u64::from(self.width) * u64::from(self.height) }
    pub fn max_side(&self) -> u32 { self.width.max(self.height) }
    pub fn is_marker(&self) -> bool { matches!(self.kind, ItemKind::Marker) }
}

/// Load one input image, classifying it as a font sheet when a side-car
/// descriptor is present next to it.
pub fn load_item(path: &Path, cfg: &AtlasConfig) -> AtlasResult<PackableItem> {
    let surface = Surface::load(path)?;
    let name = path.to_string_lossy().into_owned();

    let descriptor = match FontDescriptor::open(&sidecar_path(path, &cfg.descriptor_extension)) {
        Ok(d) => d,
        Err(e) => {
            warn!("ignoring unreadable font descriptor for {}: {}", name, e);
            None
        }
    };

    let item = match descriptor {
        None => PackableItem { name, width: surface.width(), height: surface.height(), surface, kind: ItemKind::Sprite },
        Some(font) => {
            let (width, height) = font.bounding_box()?;
            let cropped = surface.crop(0, 0, width, height).ok_or_else(|| AtlasError::FontParse {
                path: font.path().to_path_buf(),
                line: 0,
                reason: format!(
                    "glyphs extend to {}x{} but the sheet is {}x{}",
                    width, height, surface.width(), surface.height()
                ),
            })?;
            PackableItem { name, width, height, surface: cropped, kind: ItemKind::Font(font) }
        }
    };
    info!("loaded {} {}x{} ({})", item.name, item.width, item.height, item.kind.label());
    Ok(item)
}

/// The opaque swatch consumers sample as a solid-color texel.
pub fn marker_item(marker: &MarkerConfig) -> PackableItem {
    let mut surface = Surface::allocate(marker.size, marker.size);
    surface.fill(OPAQUE_WHITE);
    PackableItem {
        name: marker.name.clone(),
        width: marker.size,
        height: marker.size,
        surface,
        kind: ItemKind::Marker,
    }
}

/// Stable in-place ordering pre-pass; larger items first usually packs denser.
pub fn sort_items(items: &mut [PackableItem], order: SortOrder) {
    match order {
        SortOrder::AreaDesc => items.sort_by(|a, b| b.area().cmp(&a.area())),
        SortOrder::MaxSideDesc => items.sort_by(|a, b| b.max_side().cmp(&a.max_side())),
        SortOrder::None => {}
    }
}

/// Load every input, append the marker, and sort.
///
/// Precondition: no input path equals `cfg.marker.name`.
pub fn load_items<P: AsRef<Path>>(paths: &[P], cfg: &AtlasConfig) -> AtlasResult<Vec<PackableItem>> {
    let mut items = paths
        .iter()
        .map(|p| load_item(p.as_ref(), cfg))
        .collect::<AtlasResult<Vec<_>>>()?;
    items.push(marker_item(&cfg.marker));
    sort_items(&mut items, cfg.sort);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(name: &str, w: u32, h: u32) -> PackableItem {
        PackableItem { name: name.into(), width: w, height: h, surface: Surface::allocate(w, h), kind: ItemKind::Sprite }
    }

    fn names(items: &[PackableItem]) -> Vec<&str> { items.iter().map(|i| i.name.as_str()).collect() }

    #[test]
    fn marker_is_opaque_square() {
        let m = marker_item(&MarkerConfig::default());
        assert!(m.is_marker());
        assert_eq!((m.width, m.height), (3, 3));
        assert!(m.surface.as_rgba().pixels().all(|p| p.0 == OPAQUE_WHITE));
    }

    #[test]
    fn area_sort_is_stable_and_descending() {
        let mut items = vec![sprite("a", 2, 2), sprite("b", 10, 1), sprite("c", 1, 4), sprite("d", 5, 5)];
        sort_items(&mut items, SortOrder::AreaDesc);
        assert_eq!(names(&items), ["d", "b", "a", "c"]);
        sort_items(&mut items, SortOrder::MaxSideDesc);
        assert_eq!(names(&items), ["b", "d", "c", "a"]);
    }

    #[test]
    fn missing_image_is_a_load_error() {
        let err = load_items(&["/definitely/not/here.png"], &AtlasConfig::default()).unwrap_err();
        assert!(matches!(err, AtlasError::ImageLoad { .. }));
    }
}
