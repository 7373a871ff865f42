//! Blur, clipping blocks and inner shadows.

use log::trace;

use crate::basics::FillingRule;
use crate::blur::{box_blur_rgba32, kernel_size, BlurEdge};
use crate::color::Rgba;
use crate::context::DrawContext;
use crate::path_storage::Path;
use crate::pixel_buffer::BPP;
use crate::rendering_buffer::RowAccessor;
use crate::shadow::Shadow;
use crate::surface::RasterSurface;
use crate::trans_affine::TransAffine;

/// Radius used by [`RasterSurface::blur`] when none is given.
pub const DEFAULT_BLUR_RADIUS: f64 = 5.0;

impl DrawContext<'_> {
    /// Paint a shadow cast by the outside of `path` onto its inside.
    pub fn draw_inner_shadow(&mut self, path: &Path, shadow: Shadow) {
        let Some(inverse) = self.ctm().inverted() else {
            return;
        };
        let Some(shape) = path.bounding_box() else {
            return;
        };
        let margin = shadow.blur.abs() * 2.0 + shadow.offset.width.abs() + shadow.offset.height.abs() + 1.0;
        let outer = self
            .bounds()
            .applying(&inverse)
            .union(&shape)
            .inset_by(-margin, -margin);

        let mut ring = Path::rect(outer);
        ring.add_path(path, &TransAffine::new());
        self.with_saved_state(|ctx| {
            ctx.clip_to_path(path, FillingRule::NonZero);
            ctx.set_shadow(Some(shadow));
            ctx.set_fill_color(shadow.color);
            ctx.fill_path(&ring, FillingRule::EvenOdd);
        });
    }
}

impl RasterSurface {
    /// Box blur approximating a Gaussian of `radius`. Pixels closer to the
    /// edge than the kernel reach keep their value.
    pub fn blur(&mut self, radius: f64) {
        let kernel = kernel_size(radius);
        let (w, h) = (self.width() as u32, self.height() as u32);
        trace!("blur radius {} -> kernel {}", radius, kernel);
        let stride = (w as usize * BPP) as i32;
        let mut rbuf = RowAccessor::new(self.buffer_mut().as_bytes_mut(), w, h, stride);
        box_blur_rgba32(&mut rbuf, kernel, BlurEdge::CopyInPlace);
    }

    pub fn blurred(&self, radius: f64) -> RasterSurface {
        let mut copy = self.clone();
        copy.blur(radius);
        copy
    }

    /// Copy with `block` drawn clipped to `path`.
    pub fn clipping<F>(&self, path: &Path, block: F) -> RasterSurface
    where
        F: FnOnce(&mut DrawContext),
    {
        let mut copy = self.clone();
        copy.clip_to_path(path, block);
        copy
    }

    /// Optionally fill `path` with `fill`, then draw an inner shadow inside
    /// it.
    pub fn draw_inner_shadow(&mut self, path: &Path, fill: Option<Rgba>, shadow: Shadow) {
        self.draw(|ctx| {
            if let Some(color) = fill {
                ctx.set_fill_color(color);
                ctx.fill_path(path, FillingRule::NonZero);
            }
            ctx.draw_inner_shadow(path, shadow);
        });
    }

    pub fn drawing_inner_shadow(&self, path: &Path, fill: Option<Rgba>, shadow: Shadow) -> RasterSurface {
        let mut copy = self.clone();
        copy.draw_inner_shadow(path, fill, shadow);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{Rect, Size};

    #[test]
    fn test_blur_uniform_and_edges() {
        let s = RasterSurface::with_background(12, 12, Rgba::RED).unwrap();
        assert_eq!(s.blurred(DEFAULT_BLUR_RADIUS), s);

        let mut t = RasterSurface::new(12, 12).unwrap();
        t.set_pixel(6, 6, Rgba::WHITE).unwrap();
        t.set_pixel(0, 0, Rgba::WHITE).unwrap();
        t.blur(DEFAULT_BLUR_RADIUS);
        // Kernel 5: the center spreads over 25 pixels, the corner is kept.
        assert_eq!(t.pixel(0, 0).unwrap(), Rgba::WHITE);
        assert_eq!(t.pixel(6, 6).unwrap(), Rgba::new(10, 10, 10, 10));
        assert_eq!(t.pixel(8, 8).unwrap(), Rgba::new(10, 10, 10, 10));
        assert_eq!(t.pixel(9, 9).unwrap(), Rgba::CLEAR);
    }

    #[test]
    fn test_blur_zero_radius_is_noop() {
        let mut s = RasterSurface::new(4, 4).unwrap();
        s.set_pixel(1, 2, Rgba::GREEN).unwrap();
        assert_eq!(s.blurred(0.0), s);
    }

    #[test]
    fn test_clipping_copy() {
        let s = RasterSurface::new(4, 4).unwrap();
        let c = s.clipping(&Path::rect(Rect::new(0.0, 0.0, 2.0, 2.0)), |ctx| {
            ctx.set_fill_color(Rgba::BLUE);
            ctx.fill_rect(ctx.bounds());
        });
        assert_eq!(c.pixel(1, 1).unwrap(), Rgba::BLUE);
        assert_eq!(c.pixel(2, 2).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(1, 1).unwrap(), Rgba::CLEAR);
    }

    #[test]
    fn test_inner_shadow_stays_inside() {
        let mut s = RasterSurface::new(10, 10).unwrap();
        let path = Path::rect(Rect::new(2.0, 2.0, 6.0, 6.0));
        let shadow = Shadow::new(Size::new(2.0, 0.0), 0.0, Rgba::BLACK);
        s.draw_inner_shadow(&path, Some(Rgba::WHITE), shadow);
        // The outside casts two columns of shadow over the left edge.
        assert_eq!(s.pixel(2, 4).unwrap(), Rgba::BLACK);
        assert_eq!(s.pixel(3, 4).unwrap(), Rgba::BLACK);
        assert_eq!(s.pixel(4, 4).unwrap(), Rgba::WHITE);
        assert_eq!(s.pixel(7, 4).unwrap(), Rgba::WHITE);
        assert_eq!(s.pixel(1, 4).unwrap(), Rgba::CLEAR);
    }
}
