//! Atlas packing driver: walks candidate canvas sizes until the packer
//! places every item, then composites the atlas and writes the descriptor.
//!
//! Candidate order is fixed: for each side `D` starting at the configured
//! minimum, try `D x D`, then `2D x D`, then `D x 2D`, then double `D`.
//! The first candidate that fits wins; smaller area at a later step is
//! never considered. The search stops at `max_dimension`.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{validate_config, AtlasConfig};
use crate::content::PackableItem;
use crate::descriptor;
use crate::error::{AtlasError, AtlasResult};
use crate::packer::{CanvasSize, PackRect, RectPacker};
use crate::surface::Surface;

/// Where the packer put one item.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub item: &'a PackableItem,
    pub canvas: u32,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// One packing attempt at a single candidate size.
#[derive(Debug)]
pub struct AtlasRun<'a> {
    pub canvas: CanvasSize,
    pub canvas_count: u32,
    pub placements: Vec<Placement<'a>>,
    pub remainder: Vec<&'a PackableItem>,
}

impl AtlasRun<'_> {
    pub fn is_complete(&self) -> bool { self.remainder.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackResult {
    /// Atlas image and descriptor were both written.
    Done { width: u32, height: u32, image: PathBuf, descriptor: PathBuf, placed: usize },
    /// No items were given; nothing was written.
    Empty,
}

/// Candidate canvas sizes in search order, bounded by `max` on both sides.
pub fn candidate_sizes(min: u32, max: u32) -> impl Iterator<Item = CanvasSize> {
    let sides = std::iter::successors(Some(min), |d| d.checked_mul(2)).take_while(move |d| *d <= max);
    sides
        .flat_map(|d| {
            let wide = d.checked_mul(2);
            [Some((d, d)), wide.map(|w| (w, d)), wide.map(|w| (d, w))]
        })
        .flatten()
        .take_while(move |&(w, h)| w <= max && h <= max)
        .map(|(width, height)| CanvasSize { width, height })
}

/// Run the packer once against `canvas_count` canvases of one size.
pub fn attempt<'a, P: RectPacker + ?Sized>(
    items: &'a [PackableItem],
    canvas: CanvasSize,
    canvas_count: u32,
    packer: &mut P,
) -> AtlasRun<'a> {
    let rects: Vec<PackRect> = items
        .iter()
        .enumerate()
        .map(|(id, it)| PackRect { id, width: it.width, height: it.height })
        .collect();
    let canvases = vec![canvas; canvas_count as usize];
    let outcome = packer.place(&rects, &canvases);

    let placements = outcome
        .placed
        .iter()
        .map(|p| Placement { item: &items[p.id], canvas: p.canvas, x: p.x, y: p.y, rotated: p.rotated })
        .collect();
    let remainder = outcome.unplaced.iter().map(|&id| &items[id]).collect();
    AtlasRun { canvas, canvas_count, placements, remainder }
}

fn report(run: &AtlasRun<'_>, total: usize, packer: &str) {
    info!(
        "candidate {}x{} ({}): placed {}/{}",
        run.canvas.width, run.canvas.height, packer, run.placements.len(), total
    );
    for p in &run.placements {
        debug!(
            "  {} {}x{} at {},{},{} rotated={}",
            p.item.name, p.item.width, p.item.height, p.x, p.y, p.canvas, p.rotated
        );
    }
    for it in &run.remainder {
        debug!("  not placed: {} {}x{}", it.name, it.width, it.height);
    }
}

/// Paste every placement onto one transparent surface of the run's size.
pub fn composite(run: &AtlasRun<'_>) -> AtlasResult<Surface> {
    let mut out = Surface::allocate(run.canvas.width, run.canvas.height);
    for p in &run.placements {
        if p.rotated { return Err(AtlasError::UnsupportedRotation { name: p.item.name.clone() }); }
        if !out.paste(&p.item.surface, p.x, p.y) {
            return Err(AtlasError::Paste { name: p.item.name.clone(), x: p.x, y: p.y });
        }
    }
    Ok(out)
}

/// Pack `items`, then write the atlas image to `output` and the descriptor
/// beside it. Either both files are written or neither is: a failed
/// descriptor write removes the saved image again.
pub fn pack<P: RectPacker + ?Sized>(
    items: &[PackableItem],
    output: &Path,
    cfg: &AtlasConfig,
    packer: &mut P,
) -> AtlasResult<PackResult> {
    validate_config(cfg)?;
    if items.is_empty() {
        info!("no input items, nothing to pack");
        return Ok(PackResult::Empty);
    }

    for canvas in candidate_sizes(cfg.min_dimension, cfg.max_dimension) {
        let run = attempt(items, canvas, cfg.canvas_count, packer);
        report(&run, items.len(), packer.name());
        if !run.is_complete() { continue; }
        return write_outputs(&run, output, cfg);
    }
    Err(AtlasError::AtlasTooLarge { max_dimension: cfg.max_dimension })
}

fn write_outputs(run: &AtlasRun<'_>, output: &Path, cfg: &AtlasConfig) -> AtlasResult<PackResult> {
    let image = composite(run)?;
    image.save(output)?;
    let descriptor_path = match descriptor::emit(output, &run.placements, &cfg.marker.name, &cfg.descriptor_extension) {
        Ok(path) => path,
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(output) {
                warn!("could not remove {} after failed descriptor write: {}", output.display(), rm);
            }
            return Err(e);
        }
    };
    info!(
        "wrote {} ({}x{}) and {}",
        output.display(), run.canvas.width, run.canvas.height, descriptor_path.display()
    );
    Ok(PackResult::Done {
        width: run.canvas.width,
        height: run.canvas.height,
        image: output.to_path_buf(),
        descriptor: descriptor_path,
        placed: run.placements.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkerConfig;
    use crate::content::{marker_item, ItemKind};
    use crate::packer::{GuillotinePacker, PackOutcome, PlacedRect};

    fn sprite(name: &str, w: u32, h: u32) -> PackableItem {
        PackableItem { name: name.into(), width: w, height: h, surface: Surface::allocate(w, h), kind: ItemKind::Sprite }
    }

    fn sizes(min: u32, max: u32) -> Vec<(u32, u32)> {
        candidate_sizes(min, max).map(|c| (c.width, c.height)).collect()
    }

    /// Records every canvas list it is asked about and fails everything
    /// until the canvas reaches `fit_at`.
    struct Recording { seen: Vec<Vec<CanvasSize>>, fit_at: CanvasSize, rotate: bool }

    impl RectPacker for Recording {
        fn name(&self) -> &'static str { "recording" }
        fn place(&mut self, rects: &[PackRect], canvases: &[CanvasSize]) -> PackOutcome {
            self.seen.push(canvases.to_vec());
            if canvases[0] != self.fit_at {
                return PackOutcome { placed: Vec::new(), unplaced: rects.iter().map(|r| r.id).collect() };
            }
            let mut x = 0;
            let placed = rects
                .iter()
                .map(|r| {
                    let p = PlacedRect { id: r.id, canvas: 0, x, y: 0, rotated: self.rotate };
                    x += r.width;
                    p
                })
                .collect();
            PackOutcome { placed, unplaced: Vec::new() }
        }
    }

    #[test]
    fn candidate_sequence_doubles_in_fixed_shape_order() {
        assert_eq!(
            sizes(128, 1024),
            vec![
                (128, 128), (256, 128), (128, 256),
                (256, 256), (512, 256), (256, 512),
                (512, 512), (1024, 512), (512, 1024),
                (1024, 1024),
            ]
        );
        assert_eq!(sizes(64, 64), vec![(64, 64)]);
        assert_eq!(sizes(u32::MAX, u32::MAX), vec![(u32::MAX, u32::MAX)]);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("atlas.png");
        let res = pack(&[], &out, &AtlasConfig::default(), &mut GuillotinePacker).unwrap();
        assert_eq!(res, PackResult::Empty);
        assert!(!out.exists());
    }

    #[test]
    fn driver_walks_candidates_one_canvas_at_a_time() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("atlas.png");
        let items = vec![sprite("a.png", 4, 4), marker_item(&MarkerConfig::default())];
        let mut packer = Recording { seen: Vec::new(), fit_at: CanvasSize { width: 32, height: 64 }, rotate: false };
        let cfg = AtlasConfig { min_dimension: 16, ..Default::default() };
        let res = pack(&items, &out, &cfg, &mut packer).unwrap();
        let seen: Vec<_> = packer.seen.iter().map(|c| { assert_eq!(c.len(), 1); (c[0].width, c[0].height) }).collect();
        assert_eq!(seen, vec![(16, 16), (32, 16), (16, 32), (32, 32), (64, 32), (32, 64)]);
        assert!(matches!(res, PackResult::Done { width: 32, height: 64, placed: 2, .. }));
        assert!(out.exists());
    }

    #[test]
    fn ceiling_reports_atlas_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("atlas.png");
        let items = vec![sprite("huge.png", 600, 600), marker_item(&MarkerConfig::default())];
        let cfg = AtlasConfig { min_dimension: 128, max_dimension: 512, ..Default::default() };
        let err = pack(&items, &out, &cfg, &mut GuillotinePacker).unwrap_err();
        assert!(matches!(err, AtlasError::AtlasTooLarge { max_dimension: 512 }));
        assert!(!out.exists());
    }

    #[test]
    fn rotated_placement_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("atlas.png");
        let items = vec![sprite("a.png", 4, 8), marker_item(&MarkerConfig::default())];
        let mut packer = Recording { seen: Vec::new(), fit_at: CanvasSize { width: 128, height: 128 }, rotate: true };
        let err = pack(&items, &out, &AtlasConfig::default(), &mut packer).unwrap_err();
        assert!(matches!(err, AtlasError::UnsupportedRotation { .. }));
        assert!(!out.exists());
        assert!(!dir.path().join("atlas.gorilla").exists());
    }

    #[test]
    fn composite_places_pixels_at_offsets() {
        let items = vec![marker_item(&MarkerConfig::default())];
        let run = AtlasRun {
            canvas: CanvasSize { width: 16, height: 16 },
            canvas_count: 1,
            placements: vec![Placement { item: &items[0], canvas: 0, x: 10, y: 5, rotated: false }],
            remainder: Vec::new(),
        };
        let img = composite(&run).unwrap();
        assert_eq!(img.as_rgba().get_pixel(10, 5).0, [255; 4]);
        assert_eq!(img.as_rgba().get_pixel(12, 7).0, [255; 4]);
        assert_eq!(img.as_rgba().get_pixel(9, 5).0, [0; 4]);
    }
}
