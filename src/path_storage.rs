//! Path storage and curve flattening.
//!
//! A [`Path`] is an ordered list of drawing commands in user space. It can
//! hold several sub-paths, each started by `MoveTo`. Before rasterization a
//! path is transformed into device space and flattened into polylines
//! ([`Contour`]s) by recursive Bezier subdivision.

use crate::basics::{Point, Rect};
use crate::trans_affine::TransAffine;

/// Magic constant for approximating a quarter circle with a cubic Bezier.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Maximum distance (device pixels) between a flattened curve and the
/// real one.
const FLATTEN_TOLERANCE: f64 = 0.1;
const CURVE_RECURSION_LIMIT: u32 = 16;
const CURVE_COLLINEARITY_EPSILON: f64 = 1e-30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// A flattened sub-path in device space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Constructors for common shapes
    // ---------------------------------------------------------------

    pub fn rect(rect: Rect) -> Self {
        let mut p = Path::new();
        p.add_rect(rect);
        p
    }

    pub fn ellipse(rect: Rect) -> Self {
        let mut p = Path::new();
        p.add_ellipse(rect);
        p
    }

    pub fn rounded_rect(rect: Rect, radius: f64) -> Self {
        let mut p = Path::new();
        p.add_rounded_rect(rect, radius);
        p
    }

    pub fn line(from: Point, to: Point) -> Self {
        let mut p = Path::new();
        p.move_to(from);
        p.line_to(to);
        p
    }

    pub fn polygon(points: &[Point]) -> Self {
        let mut p = Path::new();
        p.add_polygon(points);
        p
    }

    // ---------------------------------------------------------------
    // Building
    // ---------------------------------------------------------------

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    /// A `line_to` without a current point starts a sub-path there.
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        if self.current_point().is_none() {
            return self.move_to(p);
        }
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        if self.current_point().is_none() {
            self.move_to(ctrl);
        }
        self.commands.push(PathCommand::QuadTo(ctrl, to));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        if self.current_point().is_none() {
            self.move_to(ctrl1);
        }
        self.commands.push(PathCommand::CubicTo(ctrl1, ctrl2, to));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if !matches!(self.commands.last(), None | Some(PathCommand::Close)) {
            self.commands.push(PathCommand::Close);
        }
        self
    }

    /// Closed rectangle, counter-clockwise from the min corner.
    pub fn add_rect(&mut self, r: Rect) -> &mut Self {
        let (x1, y1, x2, y2) = (r.min_x(), r.min_y(), r.max_x(), r.max_y());
        self.move_to(Point::new(x1, y1))
            .line_to(Point::new(x2, y1))
            .line_to(Point::new(x2, y2))
            .line_to(Point::new(x1, y2))
            .close()
    }

    /// Ellipse inscribed in `r`, built from four cubic arcs.
    pub fn add_ellipse(&mut self, r: Rect) -> &mut Self {
        let (cx, cy) = (r.mid_x(), r.mid_y());
        let (rx, ry) = (r.width() * 0.5, r.height() * 0.5);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        self.move_to(Point::new(cx + rx, cy));
        self.cubic_to(
            Point::new(cx + rx, cy + ky),
            Point::new(cx + kx, cy + ry),
            Point::new(cx, cy + ry),
        );
        self.cubic_to(
            Point::new(cx - kx, cy + ry),
            Point::new(cx - rx, cy + ky),
            Point::new(cx - rx, cy),
        );
        self.cubic_to(
            Point::new(cx - rx, cy - ky),
            Point::new(cx - kx, cy - ry),
            Point::new(cx, cy - ry),
        );
        self.cubic_to(
            Point::new(cx + kx, cy - ry),
            Point::new(cx + rx, cy - ky),
            Point::new(cx + rx, cy),
        );
        self.close()
    }

    /// Rectangle with circular corners. The radius is clamped to half the
    /// shorter side.
    pub fn add_rounded_rect(&mut self, r: Rect, radius: f64) -> &mut Self {
        let radius = radius.max(0.0).min(r.width() * 0.5).min(r.height() * 0.5);
        if radius == 0.0 {
            return self.add_rect(r);
        }
        let (x1, y1, x2, y2) = (r.min_x(), r.min_y(), r.max_x(), r.max_y());
        let k = radius * KAPPA;
        self.move_to(Point::new(x1 + radius, y1));
        self.line_to(Point::new(x2 - radius, y1));
        self.cubic_to(
            Point::new(x2 - radius + k, y1),
            Point::new(x2, y1 + radius - k),
            Point::new(x2, y1 + radius),
        );
        self.line_to(Point::new(x2, y2 - radius));
        self.cubic_to(
            Point::new(x2, y2 - radius + k),
            Point::new(x2 - radius + k, y2),
            Point::new(x2 - radius, y2),
        );
        self.line_to(Point::new(x1 + radius, y2));
        self.cubic_to(
            Point::new(x1 + radius - k, y2),
            Point::new(x1, y2 - radius + k),
            Point::new(x1, y2 - radius),
        );
        self.line_to(Point::new(x1, y1 + radius));
        self.cubic_to(
            Point::new(x1, y1 + radius - k),
            Point::new(x1 + radius - k, y1),
            Point::new(x1 + radius, y1),
        );
        self.close()
    }

    /// Closed polygon through `points`. Fewer than two points add nothing.
    pub fn add_polygon(&mut self, points: &[Point]) -> &mut Self {
        if points.len() < 2 {
            return self;
        }
        self.move_to(points[0]);
        for p in &points[1..] {
            self.line_to(*p);
        }
        self.close()
    }

    /// Append every command of `other`, transformed by `mtx`.
    pub fn add_path(&mut self, other: &Path, mtx: &TransAffine) -> &mut Self {
        let t = |p: Point| mtx.transform_point(p);
        for cmd in &other.commands {
            self.commands.push(match *cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(t(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(t(p)),
                PathCommand::QuadTo(c, p) => PathCommand::QuadTo(t(c), t(p)),
                PathCommand::CubicTo(c1, c2, p) => PathCommand::CubicTo(t(c1), t(c2), t(p)),
                PathCommand::Close => PathCommand::Close,
            });
        }
        self
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// End point of the last drawing command, if any.
    pub fn current_point(&self) -> Option<Point> {
        match self.commands.last()? {
            PathCommand::MoveTo(p)
            | PathCommand::LineTo(p)
            | PathCommand::QuadTo(_, p)
            | PathCommand::CubicTo(_, _, p) => Some(*p),
            PathCommand::Close => self.commands.iter().rev().find_map(|c| match c {
                PathCommand::MoveTo(p) => Some(*p),
                _ => None,
            }),
        }
    }

    /// Bounding box of every point of the path, control points included.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadTo(c, p) => vec![c, p],
            PathCommand::CubicTo(c1, c2, p) => vec![c1, c2, p],
            PathCommand::Close => Vec::new(),
        });
        let first = points.next()?;
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for p in points {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn transformed(&self, mtx: &TransAffine) -> Path {
        let mut p = Path::new();
        p.add_path(self, mtx);
        p
    }

    // ---------------------------------------------------------------
    // Flattening
    // ---------------------------------------------------------------

    /// Transform by `mtx` and flatten into polylines. Sub-paths with fewer
    /// than two points are dropped.
    pub fn flatten(&self, mtx: &TransAffine) -> Vec<Contour> {
        let mut contours = Vec::new();
        let mut current = Contour::default();
        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        let t = |p: Point| mtx.transform_point(p);

        fn finish(c: &mut Contour, contours: &mut Vec<Contour>) {
            if c.points.len() > 1 {
                contours.push(std::mem::take(c));
            } else {
                c.points.clear();
                c.closed = false;
            }
        }

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    finish(&mut current, &mut contours);
                    start = t(p);
                    last = start;
                    current.points.push(start);
                }
                PathCommand::LineTo(p) => {
                    last = t(p);
                    current.points.push(last);
                }
                PathCommand::QuadTo(c, p) => {
                    let (c, p) = (t(c), t(p));
                    flatten_quad(&mut current.points, last, c, p, 0);
                    current.points.push(p);
                    last = p;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    let (c1, c2, p) = (t(c1), t(c2), t(p));
                    flatten_cubic(&mut current.points, last, c1, c2, p, 0);
                    current.points.push(p);
                    last = p;
                }
                PathCommand::Close => {
                    current.closed = true;
                    finish(&mut current, &mut contours);
                    // A following line_to continues from the sub-path start.
                    current.points.push(start);
                    last = start;
                }
            }
        }
        finish(&mut current, &mut contours);
        contours
    }
}

/// Emit interior points of a quadratic Bezier (end point excluded).
fn flatten_quad(out: &mut Vec<Point>, p1: Point, p2: Point, p3: Point, level: u32) {
    if level > CURVE_RECURSION_LIMIT {
        return;
    }
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p123 = mid(p12, p23);

    let dx = p3.x - p1.x;
    let dy = p3.y - p1.y;
    let d = ((p2.x - p3.x) * dy - (p2.y - p3.y) * dx).abs();
    let flat = if d > CURVE_COLLINEARITY_EPSILON {
        d * d <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE * (dx * dx + dy * dy)
    } else {
        p1.distance(p2) <= FLATTEN_TOLERANCE && p2.distance(p3) <= FLATTEN_TOLERANCE
    };
    if flat {
        out.push(p123);
        return;
    }
    flatten_quad(out, p1, p12, p123, level + 1);
    out.push(p123);
    flatten_quad(out, p123, p23, p3, level + 1);
}

/// Emit interior points of a cubic Bezier (end point excluded).
fn flatten_cubic(out: &mut Vec<Point>, p1: Point, p2: Point, p3: Point, p4: Point, level: u32) {
    if level > CURVE_RECURSION_LIMIT {
        return;
    }
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p34 = mid(p3, p4);
    let p123 = mid(p12, p23);
    let p234 = mid(p23, p34);
    let p1234 = mid(p123, p234);

    let dx = p4.x - p1.x;
    let dy = p4.y - p1.y;
    let d2 = ((p2.x - p4.x) * dy - (p2.y - p4.y) * dx).abs();
    let d3 = ((p3.x - p4.x) * dy - (p3.y - p4.y) * dx).abs();
    let len2 = dx * dx + dy * dy;
    let flat = if len2 > CURVE_COLLINEARITY_EPSILON {
        (d2 + d3) * (d2 + d3) <= FLATTEN_TOLERANCE * FLATTEN_TOLERANCE * len2
    } else {
        p1.distance(p2) + p2.distance(p3) + p3.distance(p4) <= FLATTEN_TOLERANCE
    };
    if flat {
        out.push(p1234);
        return;
    }
    flatten_cubic(out, p1, p12, p123, p1234, level + 1);
    out.push(p1234);
    flatten_cubic(out, p1234, p234, p34, p4, level + 1);
}

#[inline]
fn mid(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_commands() {
        let p = Path::rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(p.commands().len(), 5);
        assert_eq!(p.commands()[0], PathCommand::MoveTo(Point::new(1.0, 2.0)));
        assert_eq!(p.commands()[4], PathCommand::Close);
    }

    #[test]
    fn test_bounding_box() {
        let p = Path::ellipse(Rect::new(10.0, 20.0, 30.0, 40.0));
        let bb = p.bounding_box().unwrap();
        assert!((bb.min_x() - 10.0).abs() < 1e-9);
        assert!((bb.max_y() - 60.0).abs() < 1e-9);
        assert_eq!(Path::new().bounding_box(), None);
    }

    #[test]
    fn test_line_to_without_move_starts_subpath() {
        let mut p = Path::new();
        p.line_to(Point::new(1.0, 1.0));
        assert_eq!(p.commands()[0], PathCommand::MoveTo(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_flatten_rect_is_closed_polyline() {
        let p = Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let contours = p.flatten(&TransAffine::new());
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
        assert_eq!(contours[0].points.len(), 4);
    }

    #[test]
    fn test_flatten_ellipse_stays_near_circle() {
        let p = Path::ellipse(Rect::new(-50.0, -50.0, 100.0, 100.0));
        let contours = p.flatten(&TransAffine::new());
        assert_eq!(contours.len(), 1);
        assert!(contours[0].points.len() > 16);
        for pt in &contours[0].points {
            let r = pt.distance(Point::ZERO);
            assert!((r - 50.0).abs() < 0.1, "radius {r}");
        }
    }

    #[test]
    fn test_flatten_applies_transform() {
        let p = Path::line(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let contours = p.flatten(&TransAffine::new_translation(5.0, 5.0));
        assert_eq!(contours[0].points, vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)]);
        assert!(!contours[0].closed);
    }

    #[test]
    fn test_multiple_subpaths() {
        let mut p = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        p.add_rect(Rect::new(5.0, 5.0, 1.0, 1.0));
        assert_eq!(p.flatten(&TransAffine::new()).len(), 2);
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        let p = Path::rounded_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 50.0);
        let bb = p.bounding_box().unwrap();
        assert_eq!(bb, Rect::new(0.0, 0.0, 10.0, 4.0));
    }

    #[test]
    fn test_transformed() {
        let p = Path::rect(Rect::new(0.0, 0.0, 2.0, 2.0))
            .transformed(&TransAffine::new_scaling(2.0, 3.0));
        assert_eq!(p.bounding_box(), Some(Rect::new(0.0, 0.0, 4.0, 6.0)));
    }
}
