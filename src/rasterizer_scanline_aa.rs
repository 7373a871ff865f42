//! Polygon rasterizer producing anti-aliased coverage spans.
//!
//! Contours are fed in device coordinates (pixel units, `y` up, pixel
//! `(x, y)` covering `[x, x+1] x [y, y+1]`). Segments are clipped against
//! the clip box in floating point before conversion to 24.8 fixed point:
//! parts above or below the box are dropped, parts to the left or right are
//! moved onto the box edge so the winding of the remaining area is kept.
//!
//! [`PathRasterizer::sweep`] walks the sorted cells row by row and reports
//! coverage spans. Sweeping leaves the cells in place, so one rasterized
//! shape can be rendered several times.

use crate::basics::{iround, FillingRule, Point, Rect, CoverType, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};
use crate::path_storage::{Contour, Path};
use crate::rasterizer_cells_aa::CellStorage;
use crate::trans_affine::TransAffine;

const AA_SHIFT: u32 = 8;
const AA_SCALE: i32 = 1 << AA_SHIFT;
const AA_MASK: i32 = AA_SCALE - 1;
const AA_SCALE2: i32 = AA_SCALE * 2;
const AA_MASK2: i32 = AA_SCALE2 - 1;

/// A run of `len` pixels starting at `x`, all with the same coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub len: i32,
    pub cover: CoverType,
}

/// The spans of one pixel row, ordered by `x`.
#[derive(Debug, Clone, Default)]
pub struct Scanline {
    pub y: i32,
    pub spans: Vec<Span>,
}

impl Scanline {
    fn add(&mut self, x: i32, len: i32, cover: CoverType) {
        if let Some(last) = self.spans.last_mut() {
            if last.x + last.len == x && last.cover == cover {
                last.len += len;
                return;
            }
        }
        self.spans.push(Span { x, len, cover });
    }
}

#[inline]
fn upscale(v: f64) -> i32 {
    iround(v * POLY_SUBPIXEL_SCALE as f64)
}

/// Scanline polygon rasterizer.
#[derive(Debug, Clone, Default)]
pub struct PathRasterizer {
    cells: CellStorage,
    clip_box: Option<Rect>,
    filling_rule: FillingRule,
    start: Option<Point>,
    last: Point,
}

impl PathRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all edges. The clip box and filling rule are kept.
    pub fn reset(&mut self) {
        self.cells.reset();
        self.start = None;
    }

    pub fn set_filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    pub fn filling_rule(&self) -> FillingRule {
        self.filling_rule
    }

    /// Restrict output to `[x1, x2] x [y1, y2]` (device pixels).
    pub fn set_clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.clip_box = Some(Rect::from_corners(Point::new(x1, y1), Point::new(x2, y2)));
    }

    pub fn reset_clipping(&mut self) {
        self.clip_box = None;
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn move_to(&mut self, p: Point) {
        self.close_polygon();
        self.start = Some(p);
        self.last = p;
    }

    pub fn line_to(&mut self, p: Point) {
        if self.start.is_none() {
            self.move_to(p);
            return;
        }
        let from = self.last;
        self.edge(from, p);
        self.last = p;
    }

    /// Close the current contour back to its first point.
    pub fn close_polygon(&mut self) {
        if let Some(start) = self.start {
            let from = self.last;
            if from != start {
                self.edge(from, start);
            }
            self.last = start;
        }
    }

    /// Add flattened contours. Every contour is filled as if closed.
    pub fn add_contours(&mut self, contours: &[Contour]) {
        for contour in contours {
            let mut points = contour.points.iter();
            if let Some(&first) = points.next() {
                self.move_to(first);
                for &p in points {
                    self.line_to(p);
                }
                self.close_polygon();
            }
        }
        self.start = None;
    }

    /// Flatten `path` through `mtx` and add it.
    pub fn add_path(&mut self, path: &Path, mtx: &TransAffine) {
        self.add_contours(&path.flatten(mtx));
    }

    /// Add one edge, clipped against the clip box.
    fn edge(&mut self, a: Point, b: Point) {
        let Some(clip) = self.clip_box else {
            self.cells
                .line(upscale(a.x), upscale(a.y), upscale(b.x), upscale(b.y));
            return;
        };
        let Some((a, b)) = clip_y(a, b, clip.min_y(), clip.max_y()) else {
            return;
        };

        let (x1, x2) = (clip.min_x(), clip.max_x());
        let mut cuts = [0.0, 1.0, 1.0, 1.0];
        let mut n = 1;
        if a.x != b.x {
            for bound in [x1, x2] {
                let t = (bound - a.x) / (b.x - a.x);
                if t > 0.0 && t < 1.0 {
                    cuts[n] = t;
                    n += 1;
                }
            }
        }
        cuts[1..n].sort_by(|p, q| p.total_cmp(q));
        cuts[n] = 1.0;

        let lerp = |t: f64| {
            if t <= 0.0 {
                a
            } else if t >= 1.0 {
                b
            } else {
                Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
            }
        };
        for i in 0..n {
            let p = lerp(cuts[i]);
            let q = lerp(cuts[i + 1]);
            self.cells.line(
                upscale(p.x.clamp(x1, x2)),
                upscale(p.y),
                upscale(q.x.clamp(x1, x2)),
                upscale(q.y),
            );
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Coverage (0..=255) for a doubled area value under the filling rule.
    pub fn calculate_alpha(&self, area: i32) -> CoverType {
        let mut cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT)).abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2;
            if cover > AA_SCALE {
                cover = AA_SCALE2 - cover;
            }
        }
        cover.min(AA_MASK) as CoverType
    }

    /// Device-space rows touched by the shape, `(min_y, max_y)` inclusive.
    pub fn row_range(&self) -> Option<(i32, i32)> {
        if self.cells.is_empty() {
            None
        } else {
            Some((self.cells.min_y(), self.cells.max_y()))
        }
    }

    /// Call `f` for every row that has non-zero coverage, bottom row first.
    pub fn sweep<F: FnMut(&Scanline)>(&mut self, mut f: F) {
        self.close_polygon();
        self.cells.sort();
        if self.cells.total_cells() == 0 {
            return;
        }
        let mut sl = Scanline::default();
        for y in self.cells.min_y()..=self.cells.max_y() {
            sl.y = y;
            sl.spans.clear();
            let mut cover = 0;
            let mut cells = self.cells.row(y).peekable();
            while let Some(cell) = cells.next() {
                let x = cell.x;
                let mut area = cell.area;
                cover += cell.cover;
                while let Some(next) = cells.peek().filter(|c| c.x == x) {
                    area += next.area;
                    cover += next.cover;
                    cells.next();
                }

                let mut span_start = x;
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha != 0 {
                        sl.add(x, 1, alpha);
                    }
                    span_start = x + 1;
                }
                if let Some(next) = cells.peek() {
                    if next.x > span_start {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha != 0 {
                            sl.add(span_start, next.x - span_start, alpha);
                        }
                    }
                }
            }
            if !sl.spans.is_empty() {
                f(&sl);
            }
        }
    }
}

/// Cut segment `a`-`b` to the horizontal band `[y1, y2]`.
fn clip_y(a: Point, b: Point, y1: f64, y2: f64) -> Option<(Point, Point)> {
    if (a.y < y1 && b.y < y1) || (a.y > y2 && b.y > y2) {
        return None;
    }
    let at_y = |y: f64| {
        let t = (y - a.y) / (b.y - a.y);
        Point::new(a.x + (b.x - a.x) * t, y)
    };
    let mut p = a;
    let mut q = b;
    if p.y < y1 {
        p = at_y(y1);
    } else if p.y > y2 {
        p = at_y(y2);
    }
    if q.y < y1 {
        q = at_y(y1);
    } else if q.y > y2 {
        q = at_y(y2);
    }
    Some((p, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(ras: &mut PathRasterizer) -> Vec<(i32, i32, CoverType)> {
        let mut out = Vec::new();
        ras.sweep(|sl| {
            for span in &sl.spans {
                for x in span.x..span.x + span.len {
                    out.push((x, sl.y, span.cover));
                }
            }
        });
        out
    }

    #[test]
    fn test_calculate_alpha() {
        let mut ras = PathRasterizer::new();
        assert_eq!(ras.calculate_alpha(0), 0);
        assert_eq!(ras.calculate_alpha(256 << 9), 255);
        assert_eq!(ras.calculate_alpha(-(256 << 9)), 255);
        ras.set_filling_rule(FillingRule::EvenOdd);
        assert_eq!(ras.calculate_alpha(512 << 9), 0);
    }

    #[test]
    fn test_integer_rect_is_exact() {
        let mut ras = PathRasterizer::new();
        ras.add_path(&Path::rect(Rect::new(1.0, 2.0, 3.0, 2.0)), &TransAffine::new());
        let cov = coverage(&mut ras);
        assert_eq!(cov.len(), 6);
        for (x, y, c) in cov {
            assert!((1..4).contains(&x) && (2..4).contains(&y));
            assert_eq!(c, 255);
        }
    }

    #[test]
    fn test_half_pixel_edge_is_antialiased() {
        let mut ras = PathRasterizer::new();
        ras.add_path(&Path::rect(Rect::new(0.5, 0.0, 1.0, 1.0)), &TransAffine::new());
        let cov = coverage(&mut ras);
        assert_eq!(cov.len(), 2);
        for (_, _, c) in cov {
            assert!((126..=129).contains(&c), "cover {c}");
        }
    }

    #[test]
    fn test_clip_box_clamps_left_and_cuts_rows() {
        let mut ras = PathRasterizer::new();
        ras.set_clip_box(0.0, 0.0, 4.0, 4.0);
        ras.add_path(&Path::rect(Rect::new(-10.0, -10.0, 12.0, 30.0)), &TransAffine::new());
        let cov = coverage(&mut ras);
        // Columns 0 and 1, rows 0..4.
        assert_eq!(cov.len(), 8);
        assert!(cov.iter().all(|&(x, y, c)| x < 2 && (0..4).contains(&y) && c == 255));
    }

    #[test]
    fn test_even_odd_leaves_hole() {
        let mut path = Path::rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        path.add_rect(Rect::new(1.0, 1.0, 2.0, 2.0));
        let mut ras = PathRasterizer::new();
        ras.set_filling_rule(FillingRule::EvenOdd);
        ras.add_path(&path, &TransAffine::new());
        let cov = coverage(&mut ras);
        assert_eq!(cov.len(), 12);
        assert!(!cov.iter().any(|&(x, y, _)| x == 1 && y == 1));
    }

    #[test]
    fn test_sweep_is_repeatable() {
        let mut ras = PathRasterizer::new();
        ras.add_path(&Path::ellipse(Rect::new(0.0, 0.0, 10.0, 10.0)), &TransAffine::new());
        let first = coverage(&mut ras);
        let second = coverage(&mut ras);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_shape() {
        let mut ras = PathRasterizer::new();
        assert!(ras.is_empty());
        assert!(coverage(&mut ras).is_empty());
        assert_eq!(ras.row_range(), None);
    }
}
