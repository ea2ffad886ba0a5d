//! Thin RGBA8 surface over `image`: load, allocate, crop, paste, fill, save.

use std::path::Path;

use image::{imageops, GenericImage, Rgba, RgbaImage};

use crate::error::{AtlasError, AtlasResult};

pub const OPAQUE_WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Decode an image file. The format is sniffed from the content, not the extension.
    pub fn load<P: AsRef<Path>>(path: P) -> AtlasResult<Self> {
        let path = path.as_ref();
        let reader = image::io::Reader::open(path)
            .map_err(|e| AtlasError::ImageLoad { path: path.to_path_buf(), source: e.into() })?
            .with_guessed_format()
            .map_err(|e| AtlasError::ImageLoad { path: path.to_path_buf(), source: e.into() })?;
        let img = reader
            .decode()
            .map_err(|e| AtlasError::ImageLoad { path: path.to_path_buf(), source: e })?;
        Ok(Self { pixels: img.to_rgba8() })
    }

    /// Blank, fully transparent surface.
    pub fn allocate(width: u32, height: u32) -> Self {
        Self { pixels: RgbaImage::new(width, height) }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self { Self { pixels } }

    pub fn width(&self) -> u32 { self.pixels.width() }
    pub fn height(&self) -> u32 { self.pixels.height() }
    pub fn as_rgba(&self) -> &RgbaImage { &self.pixels }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for p in self.pixels.pixels_mut() { *p = Rgba(rgba); }
    }

    /// Copy out a sub-rectangle. Returns `None` if it does not lie inside the surface.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<Surface> {
        let fits_x = x.checked_add(w).map_or(false, |r| r <= self.width());
        let fits_y = y.checked_add(h).map_or(false, |b| b <= self.height());
        if !fits_x || !fits_y { return None; }
        Some(Self { pixels: imageops::crop_imm(&self.pixels, x, y, w, h).to_image() })
    }

    /// Overwrite pixels at `(x, y)` with `src`. Returns false if `src` would spill past the edge.
    pub fn paste(&mut self, src: &Surface, x: u32, y: u32) -> bool {
        let fits_x = x.checked_add(src.width()).map_or(false, |r| r <= self.width());
        let fits_y = y.checked_add(src.height()).map_or(false, |b| b <= self.height());
        if !fits_x || !fits_y { return false; }
        self.pixels.copy_from(&src.pixels, x, y).is_ok()
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AtlasResult<()> {
        let path = path.as_ref();
        self.pixels
            .save(path)
            .map_err(|e| AtlasError::ImageSave { path: path.to_path_buf(), source: e })
    }
}
