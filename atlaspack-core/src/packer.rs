//! Rectangle packer seam. The driver only needs "place these rectangles
//! into these canvases"; the heuristic behind it is replaceable.

use guillotiere::{size2, AtlasAllocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackRect {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRect {
    pub id: usize,
    pub canvas: u32,
    pub x: u32,
    pub y: u32,
    /// Set when the packer swapped width and height.
    pub rotated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackOutcome {
    pub placed: Vec<PlacedRect>,
    pub unplaced: Vec<usize>,
}

impl PackOutcome {
    pub fn is_complete(&self) -> bool { self.unplaced.is_empty() }
}

/// Implementations must never overlap two rectangles on one canvas and
/// must keep every placed rectangle inside its canvas. `placed` preserves
/// the input order of the rectangles it contains.
pub trait RectPacker {
    fn name(&self) -> &'static str;
    fn place(&mut self, rects: &[PackRect], canvases: &[CanvasSize]) -> PackOutcome;
}

/// Guillotine allocator (`guillotiere`), one allocator per canvas, first fit
/// across canvases. Never rotates.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuillotinePacker;

impl RectPacker for GuillotinePacker {
    fn name(&self) -> &'static str { "guillotine" }

    fn place(&mut self, rects: &[PackRect], canvases: &[CanvasSize]) -> PackOutcome {
        let mut allocators: Vec<Option<AtlasAllocator>> = canvases
            .iter()
            .map(|c| match (i32::try_from(c.width), i32::try_from(c.height)) {
                (Ok(w), Ok(h)) if w > 0 && h > 0 => Some(AtlasAllocator::new(size2(w, h))),
                _ => None,
            })
            .collect();

        let mut out = PackOutcome::default();
        for r in rects {
            // Zero-area rectangles take no space; pin them to the first canvas origin.
            if r.width == 0 || r.height == 0 {
                if canvases.is_empty() {
                    out.unplaced.push(r.id);
                } else {
                    out.placed.push(PlacedRect { id: r.id, canvas: 0, x: 0, y: 0, rotated: false });
                }
                continue;
            }
            let size = match (i32::try_from(r.width), i32::try_from(r.height)) {
                (Ok(w), Ok(h)) => size2(w, h),
                _ => { out.unplaced.push(r.id); continue; }
            };
            let hit = allocators.iter_mut().enumerate().find_map(|(idx, a)| {
                a.as_mut()?.allocate(size).map(|alloc| (idx, alloc.rectangle.min))
            });
            match hit {
                Some((idx, min)) => out.placed.push(PlacedRect {
                    id: r.id,
                    canvas: idx as u32,
                    x: min.x as u32,
                    y: min.y as u32,
                    rotated: false,
                }),
                None => out.unplaced.push(r.id),
            }
        }
        out
    }
}
