//! Per-pixel color filters.
//!
//! These scan the bytes directly. Filters that work on color values
//! de-premultiply each pixel, transform the straight channels and store the
//! result premultiplied again; alpha is never changed. Fully transparent
//! pixels are left alone.

use log::trace;

use crate::color::Rgba;
use crate::error::Result;
use crate::pixel_buffer::BPP;
use crate::surface::RasterSurface;

/// Rec. 709 luma weights.
pub(crate) const LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

pub(crate) fn luma(rgb: [f64; 3]) -> f64 {
    rgb[0] * LUMA[0] + rgb[1] * LUMA[1] + rgb[2] * LUMA[2]
}

impl RasterSurface {
    /// Replace the straight color of every visible pixel by `f(r, g, b)`,
    /// channels in 0..=1.
    pub(crate) fn map_straight_rgb<F>(&mut self, f: F)
    where
        F: Fn([f64; 3]) -> [f64; 3],
    {
        for px in self.buffer_mut().as_bytes_mut().chunks_exact_mut(BPP) {
            let c = Rgba::from_slice(px);
            if c.a == 0 {
                continue;
            }
            let s = c.demultiplied();
            let out = f([s.rf(), s.gf(), s.bf()]);
            Rgba::new(
                Rgba::from_double(out[0]),
                Rgba::from_double(out[1]),
                Rgba::from_double(out[2]),
                c.a,
            )
            .premultiplied()
            .write_to(px);
        }
    }

    /// Convert to gray levels, keeping alpha.
    pub fn grayscale(&mut self) {
        for px in self.buffer_mut().as_bytes_mut().chunks_exact_mut(BPP) {
            let g = Rgba::from_slice(px).gray();
            px[..3].fill(g);
        }
    }

    pub fn grayscaled(&self) -> RasterSurface {
        let mut copy = self.clone();
        copy.grayscale();
        copy
    }

    /// Invert the color channels, keeping alpha. On premultiplied storage
    /// each channel becomes `alpha - c`, which is `255 - c` for opaque
    /// pixels.
    pub fn invert_colors(&mut self) {
        for px in self.buffer_mut().as_bytes_mut().chunks_exact_mut(BPP) {
            let a = px[3];
            for c in &mut px[..3] {
                *c = a.saturating_sub(*c);
            }
        }
    }

    pub fn inverting_colors(&self) -> RasterSurface {
        let mut copy = self.clone();
        copy.invert_colors();
        copy
    }

    /// Replace every pixel whose bytes equal `color` by `replacement`. With
    /// `include_alpha` false only the color channels have to match.
    pub fn map_color(&mut self, color: Rgba, replacement: Rgba, include_alpha: bool) {
        let mut count = 0usize;
        for px in self.buffer_mut().as_bytes_mut().chunks_exact_mut(BPP) {
            if px[..3] == color.to_bytes()[..3] && (!include_alpha || px[3] == color.a) {
                replacement.write_to(px);
                count += 1;
            }
        }
        trace!("mapped {} pixels of {:?} to {:?}", count, color, replacement);
    }

    pub fn mapping_color(&self, color: Rgba, replacement: Rgba, include_alpha: bool) -> RasterSurface {
        let mut copy = self.clone();
        copy.map_color(color, replacement, include_alpha);
        copy
    }

    /// Make every pixel matching `color` fully transparent.
    pub fn map_color_to_transparency(&mut self, color: Rgba, include_alpha: bool) {
        self.map_color(color, Rgba::CLEAR, include_alpha);
    }

    pub fn mapping_color_to_transparency(&self, color: Rgba, include_alpha: bool) -> RasterSurface {
        let mut copy = self.clone();
        copy.map_color_to_transparency(color, include_alpha);
        copy
    }

    /// Raise each straight color channel to `power`.
    pub fn adjust_gamma(&mut self, power: f64) {
        self.map_straight_rgb(|c| c.map(|v| v.powf(power)));
    }

    pub fn adjusting_gamma(&self, power: f64) -> RasterSurface {
        let mut copy = self.clone();
        copy.adjust_gamma(power);
        copy
    }

    /// Saturation (1 = unchanged, 0 = gray), brightness (added, 0 =
    /// unchanged) and contrast (around mid gray, 1 = unchanged).
    pub fn adjust_color_controls(&mut self, saturation: f64, brightness: f64, contrast: f64) {
        self.map_straight_rgb(|c| {
            let l = luma(c);
            c.map(|v| {
                let v = l + (v - l) * saturation + brightness;
                (v - 0.5) * contrast + 0.5
            })
        });
    }

    pub fn adjusting_color_controls(&self, saturation: f64, brightness: f64, contrast: f64) -> RasterSurface {
        let mut copy = self.clone();
        copy.adjust_color_controls(saturation, brightness, contrast);
        copy
    }

    /// Copy drawn over an opaque `background`.
    pub fn removing_transparency(&self, background: Rgba) -> Result<RasterSurface> {
        let mut result = RasterSurface::with_background(self.width(), self.height(), background.with_alpha(255))?;
        let image = self.snapshot();
        let bounds = self.bounds();
        result.draw(|ctx| ctx.draw_image(&image, bounds));
        Ok(result)
    }

    pub fn remove_transparency(&mut self, background: Rgba) -> Result<()> {
        let opaque = self.removing_transparency(background)?;
        self.assign_surface(opaque)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_surface() -> RasterSurface {
        RasterSurface::from_pixels(
            &[
                Rgba::rgb(200, 100, 50),
                Rgba::new(0, 0, 0, 0),
                Rgba::new(64, 32, 0, 128),
                Rgba::WHITE,
            ],
            2,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_invert_involution() {
        let s = make_surface();
        let inv = s.inverting_colors();
        assert_eq!(inv.raw_pixels()[0], Rgba::rgb(55, 155, 205));
        assert_eq!(inv.raw_pixels()[2], Rgba::new(64, 96, 128, 128));
        assert_eq!(inv.raw_pixels()[3], Rgba::rgb(0, 0, 0));
        assert_eq!(inv.inverting_colors(), s);
    }

    #[test]
    fn test_map_color() {
        let mut s = make_surface();
        s.map_color(Rgba::WHITE, Rgba::RED, true);
        assert_eq!(s.raw_pixels()[3], Rgba::RED);
        s.map_color(Rgba::new(200, 100, 50, 7), Rgba::BLUE, true);
        assert_eq!(s.raw_pixels()[0], Rgba::rgb(200, 100, 50));
        s.map_color(Rgba::new(200, 100, 50, 7), Rgba::BLUE, false);
        assert_eq!(s.raw_pixels()[0], Rgba::BLUE);
    }

    #[test]
    fn test_map_color_to_transparency() {
        let s = make_surface();
        let t = s.mapping_color_to_transparency(Rgba::rgb(200, 100, 50), true);
        assert_eq!(t.raw_pixels()[0], Rgba::CLEAR);
        assert_eq!(t.raw_pixels()[3], Rgba::WHITE);
    }

    #[test]
    fn test_grayscale_keeps_alpha() {
        let g = make_surface().grayscaled();
        for p in g.raw_pixels() {
            assert_eq!(p.r, p.g);
            assert_eq!(p.g, p.b);
        }
        assert_eq!(g.raw_pixels()[2].a, 128);
        assert_eq!(g.raw_pixels()[3], Rgba::WHITE);
    }

    #[test]
    fn test_gamma() {
        let s = RasterSurface::from_pixels(&[Rgba::rgb(128, 0, 255)], 1, 1).unwrap();
        assert_eq!(s.adjusting_gamma(1.0), s);
        let g = s.adjusting_gamma(2.0).raw_pixels()[0];
        assert_eq!(g, Rgba::rgb(64, 0, 255));
    }

    #[test]
    fn test_color_controls() {
        let s = make_surface();
        assert_eq!(s.adjusting_color_controls(1.0, 0.0, 1.0), s);
        let gray = s.adjusting_color_controls(0.0, 0.0, 1.0).raw_pixels()[0];
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        let bright = s.adjusting_color_controls(1.0, 1.0, 1.0).raw_pixels()[0];
        assert_eq!(bright, Rgba::WHITE);
    }

    #[test]
    fn test_remove_transparency() {
        let s = make_surface();
        let o = s.removing_transparency(Rgba::BLACK).unwrap();
        assert!(o.raw_pixels().iter().all(|p| p.is_opaque()));
        assert_eq!(o.raw_pixels()[1], Rgba::BLACK);
        assert_eq!(o.raw_pixels()[0], Rgba::rgb(200, 100, 50));
    }
}
