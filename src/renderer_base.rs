//! Clipped span renderer.
//!
//! `RendererBase` blends horizontal spans into a [`RowAccessor`] after
//! clipping them to an integer clip box. Coverage is further modulated by an
//! optional [`ClipMask`], and the source is scaled by the global alpha before
//! the blend mode combines it with the destination.

use crate::alpha_mask::ClipMask;
use crate::basics::{CoverType, RectI, COVER_FULL};
use crate::color::Rgba;
use crate::comp_op::{blend_pixel, BlendMode};
use crate::rasterizer_scanline_aa::PathRasterizer;
use crate::rendering_buffer::RowAccessor;

pub struct RendererBase<'a> {
    rbuf: RowAccessor<'a>,
    clip_box: RectI,
    mask: Option<&'a ClipMask>,
    blend_mode: BlendMode,
    alpha: u8,
}

/// Scale a premultiplied color by `alpha / 255`.
#[inline]
fn fade(c: Rgba, alpha: u8) -> Rgba {
    if alpha == 255 {
        return c;
    }
    Rgba::new(
        Rgba::multiply(c.r, alpha),
        Rgba::multiply(c.g, alpha),
        Rgba::multiply(c.b, alpha),
        Rgba::multiply(c.a, alpha),
    )
}

impl<'a> RendererBase<'a> {
    /// Wrap `rbuf` with a clip box covering the whole buffer.
    pub fn new(rbuf: RowAccessor<'a>) -> Self {
        let clip_box = RectI::new(0, 0, rbuf.width() as i32 - 1, rbuf.height() as i32 - 1);
        Self {
            rbuf,
            clip_box,
            mask: None,
            blend_mode: BlendMode::Normal,
            alpha: 255,
        }
    }

    pub fn width(&self) -> u32 {
        self.rbuf.width()
    }

    pub fn height(&self) -> u32 {
        self.rbuf.height()
    }

    /// Restrict drawing to the inclusive box. Returns `false` (and blocks
    /// all drawing) when the box misses the buffer.
    pub fn set_clip_box(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        let mut cb = RectI::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2));
        let bounds = RectI::new(0, 0, self.width() as i32 - 1, self.height() as i32 - 1);
        if cb.clip(&bounds) {
            self.clip_box = cb;
            true
        } else {
            self.clip_box = RectI::new(1, 1, 0, 0);
            false
        }
    }

    pub fn clip_box(&self) -> RectI {
        self.clip_box
    }

    pub fn set_mask(&mut self, mask: Option<&'a ClipMask>) {
        self.mask = mask;
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Global alpha in `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = Rgba::from_double(alpha);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        if self.clip_box.hit_test(x, y) {
            Rgba::from_slice(self.rbuf.pixel(x as u32, y as u32))
        } else {
            Rgba::CLEAR
        }
    }

    /// Overwrite every pixel, ignoring clip, mask and blend mode.
    pub fn clear(&mut self, c: Rgba) {
        for y in 0..self.height() {
            for px in self.rbuf.row_mut(y).chunks_exact_mut(4) {
                c.write_to(px);
            }
        }
    }

    /// Clip `[x, x + len)` on row `y`. Returns the clipped start and the
    /// offset of that start within the original span.
    #[inline]
    fn clip_span(&self, x: i32, y: i32, len: i32) -> Option<(i32, usize, i32)> {
        let cb = &self.clip_box;
        if y < cb.y1 || y > cb.y2 || len <= 0 {
            return None;
        }
        let x1 = x.max(cb.x1);
        let x2 = (x + len - 1).min(cb.x2);
        if x1 > x2 {
            return None;
        }
        Some((x1, (x1 - x) as usize, x2 - x1 + 1))
    }

    #[inline]
    fn covers_for(&self, x: i32, y: i32, len: usize, cover: CoverType) -> Vec<CoverType> {
        let mut covers = vec![cover; len];
        if let Some(mask) = self.mask {
            mask.combine_hspan(x, y, &mut covers);
        }
        covers
    }

    /// Blend one premultiplied color over `len` pixels.
    pub fn blend_solid_hspan(&mut self, x: i32, y: i32, len: i32, c: Rgba, cover: CoverType) {
        let Some((x1, _, n)) = self.clip_span(x, y, len) else {
            return;
        };
        let c = fade(c, self.alpha);
        let mode = self.blend_mode;
        if self.mask.is_none() {
            let row = self.rbuf.row_mut(y as u32);
            for px in row[x1 as usize * 4..(x1 + n) as usize * 4].chunks_exact_mut(4) {
                blend_pixel(mode, px, c, cover);
            }
            return;
        }
        let covers = self.covers_for(x1, y, n as usize, cover);
        let row = self.rbuf.row_mut(y as u32);
        for (px, &cv) in row[x1 as usize * 4..(x1 + n) as usize * 4]
            .chunks_exact_mut(4)
            .zip(&covers)
        {
            blend_pixel(mode, px, c, cv);
        }
    }

    /// Blend per-pixel premultiplied colors; `colors[0]` lands on `x`.
    pub fn blend_color_hspan(&mut self, x: i32, y: i32, colors: &[Rgba], cover: CoverType) {
        let Some((x1, skip, n)) = self.clip_span(x, y, colors.len() as i32) else {
            return;
        };
        let covers = self.covers_for(x1, y, n as usize, cover);
        let alpha = self.alpha;
        let mode = self.blend_mode;
        let row = self.rbuf.row_mut(y as u32);
        for ((px, &c), &cv) in row[x1 as usize * 4..(x1 + n) as usize * 4]
            .chunks_exact_mut(4)
            .zip(&colors[skip..])
            .zip(&covers)
        {
            blend_pixel(mode, px, fade(c, alpha), cv);
        }
    }

    /// Fill the rasterized shape with a premultiplied color.
    pub fn render_solid(&mut self, ras: &mut PathRasterizer, c: Rgba) {
        ras.sweep(|sl| {
            for span in &sl.spans {
                self.blend_solid_hspan(span.x, sl.y, span.len, c, span.cover);
            }
        });
    }

    /// Fill the rasterized shape with colors produced by `generate`, called
    /// as `generate(x, y, out)` with `out` sized to the span.
    pub fn render_generated<F>(&mut self, ras: &mut PathRasterizer, mut generate: F)
    where
        F: FnMut(i32, i32, &mut [Rgba]),
    {
        let mut colors = Vec::new();
        ras.sweep(|sl| {
            for span in &sl.spans {
                colors.clear();
                colors.resize(span.len as usize, Rgba::CLEAR);
                generate(span.x, sl.y, &mut colors);
                self.blend_color_hspan(span.x, sl.y, &colors, span.cover);
            }
        });
    }

    /// Blend a premultiplied color over every pixel inside the clip box.
    pub fn fill_clip_box(&mut self, c: Rgba) {
        let cb = self.clip_box;
        for y in cb.y1..=cb.y2 {
            self.blend_solid_hspan(cb.x1, y, cb.x2 - cb.x1 + 1, c, COVER_FULL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::Rect;
    use crate::path_storage::Path;
    use crate::trans_affine::TransAffine;

    fn px(buf: &[u8], w: usize, h: usize, x: usize, y: usize) -> Rgba {
        // Negative stride: drawing row y is memory row h - 1 - y.
        let off = ((h - 1 - y) * w + x) * 4;
        Rgba::from_slice(&buf[off..off + 4])
    }

    #[test]
    fn test_render_solid_bottom_up() {
        let mut buf = vec![0u8; 4 * 4 * 4];
        {
            let mut ren = RendererBase::new(RowAccessor::new(&mut buf, 4, 4, -16));
            let mut ras = PathRasterizer::new();
            ras.add_path(&Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0)), &TransAffine::new());
            ren.render_solid(&mut ras, Rgba::RED);
        }
        assert_eq!(px(&buf, 4, 4, 0, 0), Rgba::RED);
        // Memory row 3 is the bottom row.
        assert_eq!(&buf[48..52], &[255, 0, 0, 255]);
        assert_eq!(px(&buf, 4, 4, 0, 3), Rgba::CLEAR);
    }

    #[test]
    fn test_clip_box_limits_spans() {
        let mut buf = vec![0u8; 4 * 1 * 4];
        {
            let mut ren = RendererBase::new(RowAccessor::new(&mut buf, 4, 1, -16));
            assert!(ren.set_clip_box(1, 0, 2, 0));
            ren.blend_solid_hspan(-5, 0, 20, Rgba::BLUE, 255);
        }
        assert_eq!(px(&buf, 4, 1, 0, 0), Rgba::CLEAR);
        assert_eq!(px(&buf, 4, 1, 1, 0), Rgba::BLUE);
        assert_eq!(px(&buf, 4, 1, 2, 0), Rgba::BLUE);
        assert_eq!(px(&buf, 4, 1, 3, 0), Rgba::CLEAR);
    }

    #[test]
    fn test_clip_box_outside_blocks_everything() {
        let mut buf = vec![0u8; 16];
        let mut ren = RendererBase::new(RowAccessor::new(&mut buf, 2, 2, -8));
        assert!(!ren.set_clip_box(10, 10, 20, 20));
        ren.fill_clip_box(Rgba::RED);
        assert_eq!(ren.pixel(0, 0), Rgba::CLEAR);
    }

    #[test]
    fn test_mask_and_alpha() {
        let mut mask = ClipMask::full(2, 1);
        mask.set_pixel(1, 0, 0);
        let mut buf = vec![0u8; 8];
        {
            let mut ren = RendererBase::new(RowAccessor::new(&mut buf, 2, 1, -8));
            ren.set_mask(Some(&mask));
            ren.set_alpha(0.5);
            ren.blend_solid_hspan(0, 0, 2, Rgba::WHITE, 255);
        }
        assert_eq!(px(&buf, 2, 1, 0, 0), Rgba::new(128, 128, 128, 128));
        assert_eq!(px(&buf, 2, 1, 1, 0), Rgba::CLEAR);
    }

    #[test]
    fn test_color_hspan_skips_clipped_prefix() {
        let mut buf = vec![0u8; 8];
        {
            let mut ren = RendererBase::new(RowAccessor::new(&mut buf, 2, 1, -8));
            ren.blend_color_hspan(-1, 0, &[Rgba::RED, Rgba::GREEN, Rgba::BLUE], 255);
        }
        assert_eq!(px(&buf, 2, 1, 0, 0), Rgba::GREEN);
        assert_eq!(px(&buf, 2, 1, 1, 0), Rgba::BLUE);
    }
}
