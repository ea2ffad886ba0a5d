//! Bitmap-font side-car descriptors.
//!
//! A font sheet image `name.png` may come with `name.gorilla` listing each
//! glyph's rectangle in sheet-local pixels:
//!
//! ```text
//! [Font.default]
//! lineheight 15
//! range 33 126
//! glyph_33 0 0 4 12
//! verticaloffset_103 2
//! ```
//!
//! Loading uses the glyph lines to find the tight bounding box the sheet is
//! cropped to. Emission rewrites the descriptor into the atlas descriptor,
//! shifting every glyph by the sheet's placement offset.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::error::{AtlasError, AtlasResult};

pub const GLYPH_PREFIX: &str = "glyph_";
pub const VERTICAL_OFFSET_PREFIX: &str = "verticaloffset_";

const FONT_HEADER: &str = "[Font.";

/// Copied verbatim, in this order, between the header and the `offset` line.
const ATTRIBUTE_LABELS: [&str; 7] = [
    "lineheight ",
    "spacelength ",
    "baseline ",
    "kerning ",
    "letterspacing ",
    "monowidth ",
    "range ",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    pub key: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Tokens after the fourth numeric field, carried through untouched.
    pub extra: Vec<String>,
}

impl GlyphRecord {
    /// Parse `glyph_<id> x y w h [...]`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut tokens = line.split_whitespace();
        let key = tokens.next().ok_or_else(|| "empty glyph line".to_string())?;
        let mut values = [0i32; 4];
        for (i, slot) in values.iter_mut().enumerate() {
            let tok = tokens
                .next()
                .ok_or_else(|| format!("'{}' has {} numeric fields, expected 4", key, i))?;
            *slot = tok
                .parse()
                .map_err(|_| format!("'{}' field {} is not an integer: '{}'", key, i + 1, tok))?;
        }
        let [x, y, w, h] = values;
        if w < 0 || h < 0 {
            return Err(format!("'{}' has a negative size {}x{}", key, w, h));
        }
        Ok(Self { key: key.to_string(), x, y, w, h, extra: tokens.map(str::to_string).collect() })
    }

    pub fn right(&self) -> i64 { i64::from(self.x) + i64::from(self.w) }
    pub fn bottom(&self) -> i64 { i64::from(self.y) + i64::from(self.h) }
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

pub fn is_glyph_line(line: &str) -> bool { first_token(line).starts_with(GLYPH_PREFIX) }

pub fn is_vertical_offset_line(line: &str) -> bool {
    first_token(line).starts_with(VERTICAL_OFFSET_PREFIX)
}

/// Same base name, descriptor extension. Used both for a font sheet's
/// side-car and for the atlas descriptor written beside the output image.
pub fn sidecar_path(image: &Path, extension: &str) -> PathBuf {
    image.with_extension(extension)
}

/// A font descriptor held in memory. Never mutated; `rewrite` streams a
/// translated copy into another buffer.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    path: PathBuf,
    text: String,
}

impl FontDescriptor {
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }

    /// Read the descriptor at `path`. `Ok(None)` when the file does not exist.
    pub fn open(path: &Path) -> AtlasResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(Self::from_text(path, text))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AtlasError::io(path, e)),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn parse_error(&self, line: usize, reason: String) -> AtlasError {
        AtlasError::FontParse { path: self.path.clone(), line, reason }
    }

    /// All glyph records in file order. Fails on the first malformed glyph line.
    pub fn glyphs(&self) -> AtlasResult<Vec<GlyphRecord>> {
        self.text
            .lines()
            .enumerate()
            .filter(|(_, l)| is_glyph_line(l))
            .map(|(i, l)| GlyphRecord::parse(l).map_err(|r| self.parse_error(i + 1, r)))
            .collect()
    }

    /// Tight box `(max(x + w), max(y + h))` over all glyphs, anchored at the sheet origin.
    pub fn bounding_box(&self) -> AtlasResult<(u32, u32)> {
        let mut width = 0i64;
        let mut height = 0i64;
        for g in self.glyphs()? {
            width = width.max(g.right());
            height = height.max(g.bottom());
        }
        let to_u32 = |v: i64| u32::try_from(v).map_err(|_| self.parse_error(0, format!("glyph extent {} out of range", v)));
        Ok((to_u32(width)?, to_u32(height)?))
    }

    /// Append this font's section, translated by `(x_offset, y_offset)`, to `out`.
    ///
    /// Order: header, fixed attribute lines, `offset`, shifted glyph lines,
    /// `verticaloffset_` lines. Glyph lines are validated before anything is
    /// written, so a malformed file leaves `out` untouched.
    pub fn rewrite<W: Write>(&self, out: &mut W, x_offset: u32, y_offset: u32) -> AtlasResult<()> {
        let glyphs = self.glyphs()?;
        let dx = i64::from(x_offset);
        let dy = i64::from(y_offset);

        if let Some(header) = self.find_line(FONT_HEADER) { writeln!(out, "{}", header)?; }
        for label in ATTRIBUTE_LABELS {
            if let Some(line) = self.find_line(label) { writeln!(out, "{}", line)?; }
        }
        writeln!(out, "offset {} {}", x_offset, y_offset)?;

        for g in &glyphs {
            write!(out, "{} {} {} {} {}", g.key, i64::from(g.x) + dx, i64::from(g.y) + dy, g.w, g.h)?;
            for tok in &g.extra { write!(out, " {}", tok)?; }
            writeln!(out)?;
        }
        for line in self.text.lines().filter(|l| is_vertical_offset_line(l)) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    fn find_line(&self, label: &str) -> Option<&str> {
        self.text.lines().find(|l| l.contains(label))
    }
}
