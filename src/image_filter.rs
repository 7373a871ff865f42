//! Image sampling for drawing one buffer into another.
//!
//! The sampler maps each destination pixel center back into the source image
//! through the inverse of the image-to-device transform. Source coordinates
//! use the same bottom-left convention as the pixel buffer, and lookups
//! outside the image clamp to the nearest edge pixel. Bilinear weights are
//! computed in 8-bit subpixel fixed point, so a sample that lands exactly on
//! a pixel center returns that pixel's bytes unchanged.

use crate::basics::{iround, ifloor};
use crate::color::Rgba;
use crate::pixel_buffer::PixelBuffer;
use crate::trans_affine::TransAffine;

pub const IMAGE_SUBPIXEL_SHIFT: u32 = 8;
pub const IMAGE_SUBPIXEL_SCALE: i32 = 1 << IMAGE_SUBPIXEL_SHIFT;
pub const IMAGE_SUBPIXEL_MASK: i32 = IMAGE_SUBPIXEL_SCALE - 1;

/// Resampling filter used when an image is transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Pick the source pixel under the sample point. Used for blocky
    /// upscaling.
    Nearest,
    #[default]
    Bilinear,
}

/// Span generator reading premultiplied pixels from a source buffer.
pub struct ImageSampler<'a> {
    source: &'a PixelBuffer,
    inverse: TransAffine,
    interpolation: Interpolation,
}

impl<'a> ImageSampler<'a> {
    /// `image_to_device` maps source pixel space onto the destination.
    /// Returns `None` for a degenerate transform.
    pub fn new(
        source: &'a PixelBuffer,
        image_to_device: &TransAffine,
        interpolation: Interpolation,
    ) -> Option<Self> {
        let inverse = image_to_device.inverted()?;
        Some(Self {
            source,
            inverse,
            interpolation,
        })
    }

    /// Transform mapping a `w x h` image onto `rect` = `(x, y, width, height)`
    /// in user space, followed by `ctm`.
    pub fn placement(
        image_width: usize,
        image_height: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        ctm: &TransAffine,
    ) -> TransAffine {
        let mut mtx = TransAffine::new_scaling(
            width / image_width as f64,
            height / image_height as f64,
        );
        mtx.multiply(&TransAffine::new_translation(x, y));
        mtx.multiply(ctm);
        mtx
    }

    /// Edge-clamped pixel in public coordinates.
    #[inline]
    fn texel(&self, x: i32, y: i32) -> [u8; 4] {
        let w = self.source.width() as i32;
        let h = self.source.height() as i32;
        let x = x.clamp(0, w - 1) as usize;
        let y = y.clamp(0, h - 1) as usize;
        let off = (self.source.height() - 1 - y) * self.source.stride() + x * 4;
        let b = &self.source.as_bytes()[off..off + 4];
        [b[0], b[1], b[2], b[3]]
    }

    fn sample_nearest(&self, u: f64, v: f64) -> Rgba {
        Rgba::from_bytes(self.texel(ifloor(u), ifloor(v)))
    }

    fn sample_bilinear(&self, u: f64, v: f64) -> Rgba {
        let x_hr = iround((u - 0.5) * IMAGE_SUBPIXEL_SCALE as f64);
        let y_hr = iround((v - 0.5) * IMAGE_SUBPIXEL_SCALE as f64);
        let x_lr = x_hr >> IMAGE_SUBPIXEL_SHIFT;
        let y_lr = y_hr >> IMAGE_SUBPIXEL_SHIFT;
        let x_frac = x_hr & IMAGE_SUBPIXEL_MASK;
        let y_frac = y_hr & IMAGE_SUBPIXEL_MASK;
        let subpix = IMAGE_SUBPIXEL_SCALE;

        let mut fg = [subpix * subpix / 2; 4];
        let taps = [
            (x_lr, y_lr, (subpix - x_frac) * (subpix - y_frac)),
            (x_lr + 1, y_lr, x_frac * (subpix - y_frac)),
            (x_lr, y_lr + 1, (subpix - x_frac) * y_frac),
            (x_lr + 1, y_lr + 1, x_frac * y_frac),
        ];
        for (x, y, weight) in taps {
            if weight == 0 {
                continue;
            }
            let p = self.texel(x, y);
            for (acc, &c) in fg.iter_mut().zip(&p) {
                *acc += weight * c as i32;
            }
        }
        let shift = IMAGE_SUBPIXEL_SHIFT * 2;
        let a = (fg[3] >> shift) as u8;
        // Keep the result a valid premultiplied color.
        Rgba::new(
            ((fg[0] >> shift) as u8).min(a),
            ((fg[1] >> shift) as u8).min(a),
            ((fg[2] >> shift) as u8).min(a),
            a,
        )
    }

    /// Fill `span` with samples for device pixels `x..x + span.len()` on row `y`.
    pub fn generate(&self, x: i32, y: i32, span: &mut [Rgba]) {
        for (i, out) in span.iter_mut().enumerate() {
            let mut u = (x + i as i32) as f64 + 0.5;
            let mut v = y as f64 + 0.5;
            self.inverse.transform(&mut u, &mut v);
            *out = match self.interpolation {
                Interpolation::Nearest => self.sample_nearest(u, v),
                Interpolation::Bilinear => self.sample_bilinear(u, v),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> PixelBuffer {
        let mut b = PixelBuffer::new(2, 2).unwrap();
        b.set(0, 0, Rgba::RED).unwrap();
        b.set(1, 0, Rgba::GREEN).unwrap();
        b.set(0, 1, Rgba::BLUE).unwrap();
        b.set(1, 1, Rgba::WHITE).unwrap();
        b
    }

    #[test]
    fn test_unit_scale_is_exact() {
        let src = checker();
        let mtx = TransAffine::new_translation(3.0, 5.0);
        for interp in [Interpolation::Nearest, Interpolation::Bilinear] {
            let s = ImageSampler::new(&src, &mtx, interp).unwrap();
            let mut row = [Rgba::CLEAR; 2];
            s.generate(3, 5, &mut row);
            assert_eq!(row, [Rgba::RED, Rgba::GREEN]);
            s.generate(3, 6, &mut row);
            assert_eq!(row, [Rgba::BLUE, Rgba::WHITE]);
        }
    }

    #[test]
    fn test_nearest_upscale_repeats_pixels() {
        let src = checker();
        let mtx = TransAffine::new_scaling(2.0, 2.0);
        let s = ImageSampler::new(&src, &mtx, Interpolation::Nearest).unwrap();
        let mut row = [Rgba::CLEAR; 4];
        s.generate(0, 1, &mut row);
        assert_eq!(row, [Rgba::RED, Rgba::RED, Rgba::GREEN, Rgba::GREEN]);
    }

    #[test]
    fn test_bilinear_midpoint_mixes() {
        let mut src = PixelBuffer::new(2, 1).unwrap();
        src.set(0, 0, Rgba::BLACK).unwrap();
        src.set(1, 0, Rgba::WHITE).unwrap();
        // Sample exactly between the two pixel centers.
        let mtx = TransAffine::new_translation(-0.5, 0.0);
        let s = ImageSampler::new(&src, &mtx, Interpolation::Bilinear).unwrap();
        let mut out = [Rgba::CLEAR; 1];
        s.generate(0, 0, &mut out);
        assert_eq!(out[0].a, 255);
        assert!((out[0].r as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_degenerate_transform() {
        let src = checker();
        let mtx = TransAffine::new_scaling(0.0, 1.0);
        assert!(ImageSampler::new(&src, &mtx, Interpolation::Bilinear).is_none());
    }

    #[test]
    fn test_placement_maps_rect() {
        let m = ImageSampler::placement(2, 2, 10.0, 20.0, 4.0, 8.0, &TransAffine::new());
        let p = m.transform_point(crate::basics::Point::new(2.0, 2.0));
        assert_eq!((p.x, p.y), (14.0, 28.0));
    }
}
