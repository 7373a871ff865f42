//! Checkerboard pattern generator.

use crate::basics::{ifloor, Point};
use crate::color::Rgba;
use crate::error::Result;
use crate::pixel_buffer::BPP;
use crate::surface::RasterSurface;

/// Checkerboard parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkerboard {
    /// A corner shared by four checks, in public coordinates.
    pub center: Point,
    pub check_size: f64,
    pub color0: Rgba,
    pub color1: Rgba,
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self {
            center: Point::new(150.0, 150.0),
            check_size: 20.0,
            color0: Rgba::BLACK,
            color1: Rgba::WHITE,
        }
    }
}

impl Checkerboard {
    /// Color of the check containing the center of pixel `(x, y)`. The
    /// check up and to the right of `center` uses `color0`.
    pub fn color_at(&self, x: usize, y: usize) -> Rgba {
        if self.is_even(x, y) {
            self.color0
        } else {
            self.color1
        }
    }

    fn is_even(&self, x: usize, y: usize) -> bool {
        let size = if self.check_size > 0.0 { self.check_size } else { 1.0 };
        let i = ifloor((x as f64 + 0.5 - self.center.x) / size);
        let j = ifloor((y as f64 + 0.5 - self.center.y) / size);
        (i + j).rem_euclid(2) == 0
    }
}

impl RasterSurface {
    /// A `width x height` surface painted with `pattern`.
    pub fn checkerboard(width: usize, height: usize, pattern: &Checkerboard) -> Result<RasterSurface> {
        let mut surface = RasterSurface::new(width, height)?;
        let c0 = pattern.color0.premultiplied();
        let c1 = pattern.color1.premultiplied();
        let bytes = surface.buffer_mut().as_bytes_mut();
        for (row, line) in bytes.chunks_exact_mut(width * BPP).enumerate() {
            let y = height - 1 - row;
            for (x, px) in line.chunks_exact_mut(BPP).enumerate() {
                let c = if pattern.is_even(x, y) { c0 } else { c1 };
                c.write_to(px);
            }
        }
        Ok(surface)
    }
}
