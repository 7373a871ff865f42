//! Blend modes and per-pixel compositing.
//!
//! All arithmetic runs on premultiplied colors in an `f64` working space.
//! Separable and non-separable blend modes use the general form
//!
//! ```text
//!   Ra  = Sa + Da - Sa.Da
//!   Rca = Sca.(1 - Da) + Dca.(1 - Sa) + Sa.Da.B(Dc, Sc)
//! ```
//!
//! where `Sc`/`Dc` are the straight-alpha colors and `B` the mode's blend
//! function. Porter-Duff modes use their own operators. Partial coverage
//! interpolates between the destination and the fully covered result.

use crate::basics::CoverType;
use crate::color::Rgba;

/// How a source color is combined with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    Copy,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Xor,
    PlusDarker,
    PlusLighter,
}

impl BlendMode {
    pub const ALL: [BlendMode; 28] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::SoftLight,
        BlendMode::HardLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
        BlendMode::Clear,
        BlendMode::Copy,
        BlendMode::SourceIn,
        BlendMode::SourceOut,
        BlendMode::SourceAtop,
        BlendMode::DestinationOver,
        BlendMode::DestinationIn,
        BlendMode::DestinationOut,
        BlendMode::DestinationAtop,
        BlendMode::Xor,
        BlendMode::PlusDarker,
        BlendMode::PlusLighter,
    ];
}

// ============================================================================
// Premultiplied f64 working space
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct PremulRgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl PremulRgba {
    const ZERO: PremulRgba = PremulRgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    #[inline]
    fn from_pix(p: &[u8]) -> Self {
        Self {
            r: Rgba::to_double(p[0]),
            g: Rgba::to_double(p[1]),
            b: Rgba::to_double(p[2]),
            a: Rgba::to_double(p[3]),
        }
    }

    #[inline]
    fn from_color(c: Rgba) -> Self {
        Self::from_pix(&c.to_bytes())
    }

    #[inline]
    fn store(&self, p: &mut [u8]) {
        let a = self.a.clamp(0.0, 1.0);
        p[3] = Rgba::from_double(a);
        // Premultiplied channels never exceed alpha.
        p[0] = Rgba::from_double(self.r.clamp(0.0, a));
        p[1] = Rgba::from_double(self.g.clamp(0.0, a));
        p[2] = Rgba::from_double(self.b.clamp(0.0, a));
    }

    #[inline]
    fn scale(&self, k: f64) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }

    #[inline]
    fn add(&self, o: &PremulRgba) -> Self {
        Self {
            r: self.r + o.r,
            g: self.g + o.g,
            b: self.b + o.b,
            a: self.a + o.a,
        }
    }

    /// Straight-alpha color channels.
    #[inline]
    fn straight(&self) -> [f64; 3] {
        if self.a <= 0.0 {
            [0.0; 3]
        } else {
            [self.r / self.a, self.g / self.a, self.b / self.a]
        }
    }
}

// ============================================================================
// Blend functions
// ============================================================================

#[inline]
fn hard_light(cb: f64, cs: f64) -> f64 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        let s = 2.0 * cs - 1.0;
        cb + s - cb * s
    }
}

#[inline]
fn soft_light(cb: f64, cs: f64) -> f64 {
    if cs <= 0.5 {
        cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
    } else {
        let d = if cb <= 0.25 {
            ((16.0 * cb - 12.0) * cb + 4.0) * cb
        } else {
            cb.sqrt()
        };
        cb + (2.0 * cs - 1.0) * (d - cb)
    }
}

#[inline]
fn color_dodge(cb: f64, cs: f64) -> f64 {
    if cb <= 0.0 {
        0.0
    } else if cs >= 1.0 {
        1.0
    } else {
        (cb / (1.0 - cs)).min(1.0)
    }
}

#[inline]
fn color_burn(cb: f64, cs: f64) -> f64 {
    if cb >= 1.0 {
        1.0
    } else if cs <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - cb) / cs).min(1.0)
    }
}

fn separable(mode: BlendMode, cb: f64, cs: f64) -> f64 {
    match mode {
        BlendMode::Multiply => cb * cs,
        BlendMode::Screen => cb + cs - cb * cs,
        BlendMode::Overlay => hard_light(cs, cb),
        BlendMode::Darken => cb.min(cs),
        BlendMode::Lighten => cb.max(cs),
        BlendMode::ColorDodge => color_dodge(cb, cs),
        BlendMode::ColorBurn => color_burn(cb, cs),
        BlendMode::SoftLight => soft_light(cb, cs),
        BlendMode::HardLight => hard_light(cb, cs),
        BlendMode::Difference => (cb - cs).abs(),
        BlendMode::Exclusion => cb + cs - 2.0 * cb * cs,
        _ => cs,
    }
}

// Non-separable helpers, luminance weights 0.3 / 0.59 / 0.11.

#[inline]
fn lum(c: [f64; 3]) -> f64 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f64; 3]) -> [f64; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > 0.0 {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 && x - l > 0.0 {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: [f64; 3], l: f64) -> [f64; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

#[inline]
fn sat(c: [f64; 3]) -> f64 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f64; 3], s: f64) -> [f64; 3] {
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&i, &j| c[i].total_cmp(&c[j]));
    let (min, mid, max) = (idx[0], idx[1], idx[2]);
    let mut out = [0.0; 3];
    if c[max] > c[min] {
        out[mid] = (c[mid] - c[min]) * s / (c[max] - c[min]);
        out[max] = s;
    }
    out
}

fn non_separable(mode: BlendMode, cb: [f64; 3], cs: [f64; 3]) -> [f64; 3] {
    match mode {
        BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        BlendMode::Color => set_lum(cs, lum(cb)),
        BlendMode::Luminosity => set_lum(cb, lum(cs)),
        _ => cs,
    }
}

/// Result of compositing a fully covered source over `d`.
fn composite(mode: BlendMode, s: PremulRgba, d: PremulRgba) -> PremulRgba {
    match mode {
        BlendMode::Normal => s.add(&d.scale(1.0 - s.a)),
        BlendMode::Clear => PremulRgba::ZERO,
        BlendMode::Copy => s,
        BlendMode::SourceIn => s.scale(d.a),
        BlendMode::SourceOut => s.scale(1.0 - d.a),
        BlendMode::SourceAtop => {
            let mut r = s.scale(d.a).add(&d.scale(1.0 - s.a));
            r.a = d.a;
            r
        }
        BlendMode::DestinationOver => d.add(&s.scale(1.0 - d.a)),
        BlendMode::DestinationIn => d.scale(s.a),
        BlendMode::DestinationOut => d.scale(1.0 - s.a),
        BlendMode::DestinationAtop => {
            let mut r = d.scale(s.a).add(&s.scale(1.0 - d.a));
            r.a = s.a;
            r
        }
        BlendMode::Xor => s.scale(1.0 - d.a).add(&d.scale(1.0 - s.a)),
        BlendMode::PlusLighter => {
            let r = s.add(&d);
            PremulRgba {
                r: r.r.min(1.0),
                g: r.g.min(1.0),
                b: r.b.min(1.0),
                a: r.a.min(1.0),
            }
        }
        BlendMode::PlusDarker => {
            let a = (s.a + d.a).min(1.0);
            let dark = |sc: f64, dc: f64| (a - ((d.a - dc) + (s.a - sc))).max(0.0);
            PremulRgba {
                r: dark(s.r, d.r),
                g: dark(s.g, d.g),
                b: dark(s.b, d.b),
                a,
            }
        }
        BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity => {
            let b = non_separable(mode, d.straight(), s.straight());
            general(s, d, b)
        }
        _ => {
            let cs = s.straight();
            let cb = d.straight();
            let b = [
                separable(mode, cb[0], cs[0]),
                separable(mode, cb[1], cs[1]),
                separable(mode, cb[2], cs[2]),
            ];
            general(s, d, b)
        }
    }
}

#[inline]
fn general(s: PremulRgba, d: PremulRgba, b: [f64; 3]) -> PremulRgba {
    let sada = s.a * d.a;
    let f = |sc: f64, dc: f64, bc: f64| sc * (1.0 - d.a) + dc * (1.0 - s.a) + sada * bc;
    PremulRgba {
        r: f(s.r, d.r, b[0]),
        g: f(s.g, d.g, b[1]),
        b: f(s.b, d.b, b[2]),
        a: s.a + d.a - sada,
    }
}

/// Composite premultiplied `src` onto the RGBA8 pixel `p` with coverage
/// `cover`.
#[inline]
pub fn blend_pixel(mode: BlendMode, p: &mut [u8], src: Rgba, cover: CoverType) {
    if cover == 0 {
        return;
    }
    if cover == 255 {
        match mode {
            BlendMode::Normal if src.a == 255 => return src.write_to(p),
            BlendMode::Normal if src.a == 0 => return,
            BlendMode::Copy => return src.write_to(p),
            BlendMode::Clear => return Rgba::CLEAR.write_to(p),
            _ => {}
        }
    } else if mode == BlendMode::Normal && src.a == 0 {
        return;
    }

    let s = PremulRgba::from_color(src);
    let d = PremulRgba::from_pix(p);
    let mut r = composite(mode, s, d);
    if cover < 255 {
        let c = cover as f64 / 255.0;
        r = d.scale(1.0 - c).add(&r.scale(c));
    }
    r.store(p);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend(mode: BlendMode, dst: Rgba, src: Rgba, cover: u8) -> Rgba {
        let mut p = dst.to_bytes();
        blend_pixel(mode, &mut p, src, cover);
        Rgba::from_bytes(p)
    }

    #[test]
    fn test_normal_opaque_replaces() {
        assert_eq!(blend(BlendMode::Normal, Rgba::BLUE, Rgba::RED, 255), Rgba::RED);
    }

    #[test]
    fn test_normal_half_alpha_over_transparent() {
        let src = Rgba::new(255, 0, 0, 128).premultiplied();
        assert_eq!(blend(BlendMode::Normal, Rgba::CLEAR, src, 255), src);
    }

    #[test]
    fn test_normal_partial_cover() {
        let out = blend(BlendMode::Normal, Rgba::CLEAR, Rgba::WHITE, 128);
        assert_eq!(out, Rgba::new(128, 128, 128, 128));
    }

    #[test]
    fn test_multiply() {
        let out = blend(BlendMode::Multiply, Rgba::rgb(128, 255, 0), Rgba::rgb(255, 128, 255), 255);
        assert_eq!(out, Rgba::rgb(128, 128, 0));
    }

    #[test]
    fn test_screen_with_black_is_identity() {
        let d = Rgba::rgb(10, 20, 30);
        assert_eq!(blend(BlendMode::Screen, d, Rgba::BLACK, 255), d);
    }

    #[test]
    fn test_destination_in_keeps_source_alpha() {
        let out = blend(BlendMode::DestinationIn, Rgba::RED, Rgba::new(0, 0, 0, 0), 255);
        assert_eq!(out, Rgba::CLEAR);
        let out = blend(BlendMode::DestinationIn, Rgba::RED, Rgba::BLACK, 255);
        assert_eq!(out, Rgba::RED);
    }

    #[test]
    fn test_destination_out_removes() {
        let out = blend(BlendMode::DestinationOut, Rgba::RED, Rgba::BLACK, 255);
        assert_eq!(out, Rgba::CLEAR);
    }

    #[test]
    fn test_copy_and_clear() {
        let src = Rgba::new(0, 0, 100, 100);
        assert_eq!(blend(BlendMode::Copy, Rgba::RED, src, 255), src);
        assert_eq!(blend(BlendMode::Clear, Rgba::RED, src, 255), Rgba::CLEAR);
    }

    #[test]
    fn test_source_atop_keeps_destination_alpha() {
        let out = blend(BlendMode::SourceAtop, Rgba::CLEAR, Rgba::RED, 255);
        assert_eq!(out, Rgba::CLEAR);
        let out = blend(BlendMode::SourceAtop, Rgba::BLUE, Rgba::RED, 255);
        assert_eq!(out, Rgba::RED);
    }

    #[test]
    fn test_color_mode_keeps_luminosity() {
        let gray = Rgba::rgb(128, 128, 128);
        let out = blend(BlendMode::Color, gray, Rgba::RED, 255);
        let l = |c: Rgba| 0.3 * c.rf() + 0.59 * c.gf() + 0.11 * c.bf();
        assert!((l(out) - l(gray)).abs() < 0.01);
        assert!(out.r > out.g && out.r > out.b);
    }

    #[test]
    fn test_difference_of_equal_is_black() {
        let c = Rgba::rgb(90, 160, 20);
        assert_eq!(blend(BlendMode::Difference, c, c, 255), Rgba::BLACK);
    }

    #[test]
    fn test_plus_lighter_saturates() {
        let out = blend(BlendMode::PlusLighter, Rgba::rgb(200, 0, 0), Rgba::rgb(200, 0, 0), 255);
        assert_eq!(out, Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_all_modes_stay_premultiplied() {
        let dst = Rgba::new(200, 40, 90, 220).premultiplied();
        let src = Rgba::new(30, 250, 120, 160).premultiplied();
        for mode in BlendMode::ALL {
            for cover in [0u8, 77, 255] {
                let out = blend(mode, dst, src, cover);
                assert!(out.r <= out.a && out.g <= out.a && out.b <= out.a, "{mode:?}");
            }
        }
    }

    #[test]
    fn test_zero_cover_is_noop() {
        for mode in BlendMode::ALL {
            assert_eq!(blend(mode, Rgba::RED, Rgba::BLUE, 0), Rgba::RED);
        }
    }
}
