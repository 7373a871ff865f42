//! 2D affine transformation matrix.
//!
//! The six components `[sx, shy, shx, sy, tx, ty]` describe
//!
//! ```text
//!   | sx  shx tx |
//!   | shy  sy ty |
//!   |  0    0  1 |
//! ```
//!
//! so that `x' = x*sx + y*shx + tx` and `y' = x*shy + y*sy + ty`.
//!
//! `a.multiply(&b)` means "apply `a`, then `b`". Drawing contexts build their
//! current transform the other way around (new operations act on user space
//! first), which is what [`TransAffine::premultiply`] provides.

use crate::basics::Point;

/// Epsilon for matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

#[derive(Debug, Clone, Copy)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub const fn new() -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Counter-clockwise rotation by `a` radians (y up).
    pub fn new_rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    pub const fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    pub const fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Maps the unit square onto `rect`.
    pub fn new_rect_mapping(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new_custom(width, 0.0, 0.0, height, x, y)
    }

    // ====================================================================
    // Composition
    // ====================================================================

    /// `self = self * m`: apply `self`, then `m`.
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let t0 = self.sx * m.sx + self.shy * m.shx;
        let t2 = self.shx * m.sx + self.sy * m.shx;
        let t4 = self.tx * m.sx + self.ty * m.shx + m.tx;
        self.shy = self.sx * m.shy + self.shy * m.sy;
        self.sy = self.shx * m.shy + self.sy * m.sy;
        self.ty = self.tx * m.shy + self.ty * m.sy + m.ty;
        self.sx = t0;
        self.shx = t2;
        self.tx = t4;
        self
    }

    /// `self = m * self`: apply `m`, then `self`.
    pub fn premultiply(&mut self, m: &TransAffine) -> &mut Self {
        let mut t = *m;
        t.multiply(self);
        *self = t;
        self
    }

    /// Add a translation applied after the current transform.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.tx += x;
        self.ty += y;
        self
    }

    /// Invert in place. A singular matrix produces non-finite components;
    /// check [`TransAffine::is_invertible`] first when that matters.
    pub fn invert(&mut self) -> &mut Self {
        let d = 1.0 / self.determinant();
        let t0 = self.sy * d;
        self.sy = self.sx * d;
        self.shy = -self.shy * d;
        self.shx = -self.shx * d;
        let t4 = -self.tx * t0 - self.ty * self.shx;
        self.ty = -self.tx * self.shy - self.ty * self.sy;
        self.sx = t0;
        self.tx = t4;
        self
    }

    /// The inverse, or `None` for a degenerate matrix.
    pub fn inverted(&self) -> Option<TransAffine> {
        if !self.is_invertible() {
            return None;
        }
        let mut t = *self;
        t.invert();
        Some(t)
    }

    // ====================================================================
    // Application
    // ====================================================================

    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let tmp = *x;
        *x = tmp * self.sx + *y * self.shx + self.tx;
        *y = tmp * self.shy + *y * self.sy + self.ty;
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        let (mut x, mut y) = (p.x, p.y);
        self.transform(&mut x, &mut y);
        Point::new(x, y)
    }

    // ====================================================================
    // Queries
    // ====================================================================

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    pub fn is_invertible(&self) -> bool {
        let d = self.determinant();
        d.is_finite() && d.abs() > AFFINE_EPSILON
    }

    /// Average scale factor, used to pick curve flattening tolerances.
    pub fn scale_factor(&self) -> f64 {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let x = s * self.sx + s * self.shx;
        let y = s * self.shy + s * self.sy;
        (x * x + y * y).sqrt()
    }

    pub fn is_identity(&self) -> bool {
        self.is_equal(&TransAffine::new(), AFFINE_EPSILON)
    }

    /// True for pure translations (no rotation, scaling or shear).
    pub fn is_translation_only(&self) -> bool {
        let eq = |a: f64, b: f64| (a - b).abs() <= AFFINE_EPSILON;
        eq(self.sx, 1.0) && eq(self.sy, 1.0) && eq(self.shx, 0.0) && eq(self.shy, 0.0)
    }

    pub fn is_equal(&self, m: &TransAffine, epsilon: f64) -> bool {
        let eq = |a: f64, b: f64| (a - b).abs() <= epsilon;
        eq(self.sx, m.sx)
            && eq(self.shy, m.shy)
            && eq(self.shx, m.shx)
            && eq(self.sy, m.sy)
            && eq(self.tx, m.tx)
            && eq(self.ty, m.ty)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransAffine {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, AFFINE_EPSILON)
    }
}

impl std::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        let mut result = self;
        result.multiply(&rhs);
        result
    }
}
