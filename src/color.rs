//! RGBA color value type and 8-bit channel arithmetic.
//!
//! `Rgba` is exactly four bytes (R, G, B, A) and is the element type of a
//! pixel buffer. Bytes stored in a buffer are treated as premultiplied by the
//! drawing code; colors handed to drawing calls (fill colors, stroke colors)
//! are straight alpha and are premultiplied on the way in.

use crate::error::{BitmapError, Result};

// ============================================================================
// Rgba
// ============================================================================

/// A four channel, 8 bit per channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_MASK: u32 = (1 << Self::BASE_SHIFT) - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub const CLEAR: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);
    pub const YELLOW: Rgba = Rgba::rgb(255, 255, 0);
    pub const MAGENTA: Rgba = Rgba::rgb(255, 0, 255);
    pub const CYAN: Rgba = Rgba::rgb(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build from fractional components. Each is clamped to `[0, 1]` and then
    /// truncated from `255 * v`.
    pub fn from_fractional(rf: f64, gf: f64, bf: f64, af: f64) -> Self {
        let conv = |v: f64| (255.0 * v.clamp(0.0, 1.0)) as u8;
        Self::new(conv(rf), conv(gf), conv(bf), conv(af))
    }

    /// Like [`Rgba::from_fractional`], but rejects components that have no
    /// meaning in the working color space (NaN, infinities).
    pub fn try_from_fractional(rf: f64, gf: f64, bf: f64, af: f64) -> Result<Self> {
        if [rf, gf, bf, af].iter().all(|v| v.is_finite()) {
            Ok(Self::from_fractional(rf, gf, bf, af))
        } else {
            Err(BitmapError::CannotConvertColorSpace)
        }
    }

    #[inline]
    pub fn rf(&self) -> f64 {
        self.r as f64 / 255.0
    }
    #[inline]
    pub fn gf(&self) -> f64 {
        self.g as f64 / 255.0
    }
    #[inline]
    pub fn bf(&self) -> f64 {
        self.b as f64 / 255.0
    }
    #[inline]
    pub fn af(&self) -> f64 {
        self.a as f64 / 255.0
    }

    #[inline]
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Read a color from the first four bytes of `p`.
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    /// Write this color into the first four bytes of `p`.
    #[inline]
    pub fn write_to(&self, p: &mut [u8]) {
        p[0] = self.r;
        p[1] = self.g;
        p[2] = self.b;
        p[3] = self.a;
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Scale the color channels by alpha.
    pub fn premultiplied(self) -> Self {
        if self.a == 255 {
            return self;
        }
        Self::new(
            Self::multiply(self.r, self.a),
            Self::multiply(self.g, self.a),
            Self::multiply(self.b, self.a),
            self.a,
        )
    }

    /// Undo [`Rgba::premultiplied`], saturating at 255.
    pub fn demultiplied(self) -> Self {
        match self.a {
            255 => self,
            0 => Self::CLEAR,
            a => {
                let d = |c: u8| ((c as u32 * Self::BASE_MASK + (a as u32 >> 1)) / a as u32).min(255) as u8;
                Self::new(d(self.r), d(self.g), d(self.b), a)
            }
        }
    }

    /// Gray level using the 77/150/29 integer weights.
    #[inline]
    pub fn gray(&self) -> u8 {
        ((self.r as u32 * 77 + self.g as u32 * 150 + self.b as u32 * 29) >> 8) as u8
    }

    // ------------------------------------------------------------------------
    // Channel arithmetic
    // ------------------------------------------------------------------------

    #[inline]
    pub fn to_double(a: u8) -> f64 {
        a as f64 / Self::BASE_MASK as f64
    }

    #[inline]
    pub fn from_double(a: f64) -> u8 {
        (a.clamp(0.0, 1.0) * Self::BASE_MASK as f64 + 0.5) as u8
    }

    /// `a * b / 255`, exactly rounded.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Interpolate `p` towards `q` by `a / 255`.
    #[inline]
    pub fn lerp(p: u8, q: u8, a: u8) -> u8 {
        let t = (q as i32 - p as i32) * a as i32 + Self::BASE_MSB as i32 - (p > q) as i32;
        (p as i32 + (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT)) as u8
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(b: [u8; 4]) -> Self {
        Self::from_bytes(b)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        c.to_bytes()
    }
}

/// Reinterpret a byte slice (length a multiple of 4) as colors.
pub fn pixels_from_bytes(bytes: &[u8]) -> Vec<Rgba> {
    bytes.chunks_exact(4).map(Rgba::from_slice).collect()
}

/// Flatten colors into R,G,B,A bytes.
pub fn bytes_from_pixels(pixels: &[Rgba]) -> Vec<u8> {
    pixels.iter().flat_map(|c| c.to_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Rgba>(), 4);
    }

    #[test]
    fn test_fractional_accessors() {
        let c = Rgba::new(255, 0, 51, 102);
        assert_eq!(c.rf(), 1.0);
        assert_eq!(c.gf(), 0.0);
        assert!((c.bf() - 0.2).abs() < 1e-12);
        assert!((c.af() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_from_fractional_clamps_and_truncates() {
        let c = Rgba::from_fractional(1.5, -0.2, 0.5, 1.0);
        assert_eq!(c, Rgba::new(255, 0, 127, 255));
    }

    #[test]
    fn test_try_from_fractional_rejects_nan() {
        assert_eq!(
            Rgba::try_from_fractional(f64::NAN, 0.0, 0.0, 1.0),
            Err(BitmapError::CannotConvertColorSpace)
        );
        assert_eq!(Rgba::try_from_fractional(0.0, 0.0, 0.0, 1.0), Ok(Rgba::BLACK));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(Rgba::CLEAR.to_bytes(), [0, 0, 0, 0]);
        assert_eq!(Rgba::MAGENTA.to_bytes(), [255, 0, 255, 255]);
        assert_eq!(Rgba::CYAN.to_bytes(), [0, 255, 255, 255]);
    }

    #[test]
    fn test_premultiply_round_trip() {
        let c = Rgba::new(200, 100, 50, 128);
        let p = c.premultiplied();
        assert_eq!(p, Rgba::new(100, 50, 25, 128));
        let d = p.demultiplied();
        assert!((d.r as i32 - 200).abs() <= 1);
        assert!((d.g as i32 - 100).abs() <= 1);
        assert_eq!(Rgba::CLEAR.demultiplied(), Rgba::CLEAR);
    }

    #[test]
    fn test_multiply_and_lerp() {
        assert_eq!(Rgba::multiply(255, 255), 255);
        assert_eq!(Rgba::multiply(255, 0), 0);
        assert_eq!(Rgba::multiply(128, 255), 128);
        assert_eq!(Rgba::lerp(0, 255, 255), 255);
        assert_eq!(Rgba::lerp(10, 200, 0), 10);
    }

    #[test]
    fn test_byte_conversions() {
        let pixels = vec![Rgba::RED, Rgba::BLUE];
        let bytes = bytes_from_pixels(&pixels);
        assert_eq!(bytes, vec![255, 0, 0, 255, 0, 0, 255, 255]);
        assert_eq!(pixels_from_bytes(&bytes), pixels);
    }

    #[test]
    fn test_gray_weights() {
        assert_eq!(Rgba::WHITE.gray(), 255);
        assert_eq!(Rgba::BLACK.gray(), 0);
        assert_eq!(Rgba::RED.gray(), 76);
    }
}
