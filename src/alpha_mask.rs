//! 8-bit clip mask.
//!
//! A [`ClipMask`] holds one coverage byte per surface pixel, addressed in
//! drawing coordinates. Clipping to a shape rasterizes the shape into a new
//! mask and multiplies it into the current one, so nested clips only ever
//! shrink the drawable area.

use crate::basics::{CoverType, COVER_FULL, COVER_SHIFT};
use crate::rasterizer_scanline_aa::PathRasterizer;
use crate::rendering_buffer::RowAccessor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// `a * b / 255` with the same rounding the mask has always used: exact
/// when either side is 0 or 255.
#[inline]
fn combine(a: u8, b: u8) -> u8 {
    ((COVER_FULL as u32 + a as u32 * b as u32) >> COVER_SHIFT) as u8
}

impl ClipMask {
    /// A mask that lets everything through.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![COVER_FULL; width * height],
        }
    }

    /// A mask that blocks everything.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Render the coverage of `ras` into a fresh mask.
    pub fn from_rasterizer(width: usize, height: usize, ras: &mut PathRasterizer) -> Self {
        let mut mask = Self::empty(width, height);
        ras.sweep(|sl| {
            if sl.y < 0 || sl.y as usize >= height {
                return;
            }
            let row = sl.y as usize * width;
            for span in &sl.spans {
                let x1 = span.x.max(0) as usize;
                let x2 = ((span.x + span.len).max(0) as usize).min(width);
                if x1 < x2 {
                    mask.data[row + x1..row + x2].fill(span.cover);
                }
            }
        });
        mask
    }

    /// Use the alpha channel of an RGBA layer as coverage.
    pub fn from_alpha(layer: &RowAccessor) -> Self {
        let width = layer.width() as usize;
        let height = layer.height() as usize;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..layer.height() {
            data.extend(layer.row(y).chunks_exact(4).take(width).map(|px| px[3]));
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coverage at `(x, y)`, 0 outside the mask.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> CoverType {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: CoverType) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Multiply `other` into this mask.
    pub fn intersect(&mut self, other: &ClipMask) {
        for (d, s) in self.data.iter_mut().zip(&other.data) {
            *d = combine(*d, *s);
        }
    }

    /// Multiply the mask row starting at `(x, y)` into `covers`.
    pub fn combine_hspan(&self, x: i32, y: i32, covers: &mut [CoverType]) {
        for (i, c) in covers.iter_mut().enumerate() {
            *c = combine(*c, self.pixel(x + i as i32, y));
        }
    }

    /// True when no pixel can be drawn through the mask.
    pub fn is_blocking(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }
}
