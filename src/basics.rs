//! Foundation types, constants and geometry value types.
//!
//! Everything here uses the bottom-left origin: `y` grows upwards, and the
//! unit square `[x, x+1] x [y, y+1]` is the pixel at public coordinate
//! `(x, y)`.

use core::ops::{Add, Sub};

use crate::trans_affine::TransAffine;

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round to the nearest integer, halves away from zero.
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Round to the nearest unsigned integer, halves up.
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Floor toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

/// Truncate a length to whole pixels, tolerating floating point noise just
/// below an integer (`19.999999999` becomes `20`, `19.6` becomes `19`).
#[inline]
pub fn pixel_extent(v: f64) -> usize {
    if v <= 0.0 {
        return 0;
    }
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        nearest as usize
    } else {
        v.trunc() as usize
    }
}

// ============================================================================
// Cover (anti-aliasing) constants
// ============================================================================

/// Anti-aliasing coverage of a pixel.
pub type CoverType = u8;

pub const COVER_SHIFT: u32 = 8;
pub const COVER_MASK: u32 = (1 << COVER_SHIFT) - 1;
pub const COVER_NONE: CoverType = 0;
pub const COVER_FULL: CoverType = COVER_MASK as CoverType;

// ============================================================================
// Subpixel constants
// ============================================================================

/// 24.8 fixed point: 8 fractional bits for rasterizer coordinates.
pub const POLY_SUBPIXEL_SHIFT: u32 = 8;
pub const POLY_SUBPIXEL_SCALE: u32 = 1 << POLY_SUBPIXEL_SHIFT;
pub const POLY_SUBPIXEL_MASK: u32 = POLY_SUBPIXEL_SCALE - 1;

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization and clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    #[default]
    NonZero,
    EvenOdd,
}

// ============================================================================
// Point / Size
// ============================================================================

/// A point in drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ============================================================================
// Rect
// ============================================================================

/// An origin + size rectangle. A negative size is allowed on input and is
/// normalized by the `min_*`/`max_*` accessors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size {
            width: 0.0,
            height: 0.0,
        },
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Smallest rect containing both corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x1 = a.x.min(b.x);
        let y1 = a.y.min(b.y);
        Rect::new(x1, y1, a.x.max(b.x) - x1, a.y.max(b.y) - y1)
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }
    pub fn y(&self) -> f64 {
        self.origin.y
    }
    pub fn width(&self) -> f64 {
        self.size.width.abs()
    }
    pub fn height(&self) -> f64 {
        self.size.height.abs()
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x.min(self.origin.x + self.size.width)
    }
    pub fn max_x(&self) -> f64 {
        self.origin.x.max(self.origin.x + self.size.width)
    }
    pub fn min_y(&self) -> f64 {
        self.origin.y.min(self.origin.y + self.size.height)
    }
    pub fn max_y(&self) -> f64 {
        self.origin.y.max(self.origin.y + self.size.height)
    }
    pub fn mid_x(&self) -> f64 {
        (self.min_x() + self.max_x()) * 0.5
    }
    pub fn mid_y(&self) -> f64 {
        (self.min_y() + self.max_y()) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.size.width == 0.0 || self.size.height == 0.0
    }

    /// Shrink (positive values) or grow (negative values) on every side.
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.min_x() + dx,
            self.min_y() + dy,
            self.width() - 2.0 * dx,
            self.height() - 2.0 * dy,
        )
    }

    pub fn offset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.min_x() + dx, self.min_y() + dy, self.width(), self.height())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }

    /// Overlapping area, or `None` when the rects do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.min_x().max(other.min_x());
        let y1 = self.min_y().max(other.min_y());
        let x2 = self.max_x().min(other.max_x());
        let y2 = self.max_y().min(other.max_y());
        if x1 < x2 && y1 < y2 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Bounding box of both rects.
    pub fn union(&self, other: &Rect) -> Rect {
        let x1 = self.min_x().min(other.min_x());
        let y1 = self.min_y().min(other.min_y());
        let x2 = self.max_x().max(other.max_x());
        let y2 = self.max_y().max(other.max_y());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Smallest rect with integer edges containing this one.
    pub fn integral(&self) -> Rect {
        let x1 = self.min_x().floor();
        let y1 = self.min_y().floor();
        Rect::new(x1, y1, self.max_x().ceil() - x1, self.max_y().ceil() - y1)
    }

    /// Bounding box of the four transformed corners.
    pub fn applying(&self, mtx: &TransAffine) -> Rect {
        let corners = [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ];
        let mut x1 = f64::MAX;
        let mut y1 = f64::MAX;
        let mut x2 = f64::MIN;
        let mut y2 = f64::MIN;
        for c in corners {
            let p = mtx.transform_point(c);
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Reflect vertically within a container of height `height`
    /// (bottom-left origin to top-left origin, or back).
    pub fn flipped_y(&self, height: f64) -> Rect {
        Rect::new(self.min_x(), height - self.min_y() - self.height(), self.width(), self.height())
    }
}

// ============================================================================
// RectI: integer box with inclusive corners
// ============================================================================

/// Integer rectangle with inclusive corners, used for clip boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectI {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RectI {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Clip to the intersection with `r`. Returns `true` if non-empty.
    pub fn clip(&mut self, r: &RectI) -> bool {
        self.x1 = self.x1.max(r.x1);
        self.y1 = self.y1.max(r.y1);
        self.x2 = self.x2.min(r.x2);
        self.y2 = self.y2.min(r.y2);
        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn hit_test(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

// ============================================================================
// Insets
// ============================================================================

/// Edge insets used by padding and inset operations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same value on all four edges.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn is_non_negative(&self) -> bool {
        self.top >= 0.0 && self.left >= 0.0 && self.bottom >= 0.0 && self.right >= 0.0
    }
}
