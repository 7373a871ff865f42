//! Stroke styles and stroke outline generation.
//!
//! A stroke is turned into a set of closed polygons (one per segment body,
//! join and cap), all wound counter-clockwise. Filling them together with
//! the NonZero rule yields their union, so overlapping pieces never cancel
//! out and never double-blend.

use std::f64::consts::PI;

use crate::basics::Point;
use crate::color::Rgba;
use crate::path_storage::Contour;

/// Shape drawn at the open ends of a stroked sub-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Shape drawn where two stroked segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Alternating on/off lengths, starting `phase` units into the pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    pub lengths: Vec<f64>,
    pub phase: f64,
}

impl DashPattern {
    pub fn new(lengths: Vec<f64>, phase: f64) -> Self {
        Self { lengths, phase }
    }

    /// A pattern that draws something: non-empty, no negative entries and
    /// a positive total length.
    fn is_usable(&self) -> bool {
        !self.lengths.is_empty()
            && self.lengths.iter().all(|&l| l >= 0.0 && l.is_finite())
            && self.lengths.iter().sum::<f64>() > 0.0
    }
}

/// Color, width and geometry of a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub line_width: f64,
    pub dash: Option<DashPattern>,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            line_width: 1.0,
            dash: None,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

impl StrokeStyle {
    pub fn new(color: Rgba, line_width: f64) -> Self {
        Self {
            color,
            line_width,
            ..Self::default()
        }
    }

    pub fn with_dash(mut self, lengths: Vec<f64>, phase: f64) -> Self {
        self.dash = Some(DashPattern::new(lengths, phase));
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }
}

// ============================================================================
// Outline generation
// ============================================================================

const VERTEX_EPSILON: f64 = 1e-9;

#[inline]
fn sub(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

#[inline]
fn add(a: Point, b: Point) -> Point {
    Point::new(a.x + b.x, a.y + b.y)
}

#[inline]
fn scale(a: Point, k: f64) -> Point {
    Point::new(a.x * k, a.y * k)
}

#[inline]
fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
fn dot(a: Point, b: Point) -> f64 {
    a.x * b.x + a.y * b.y
}

#[inline]
fn length(a: Point) -> f64 {
    (a.x * a.x + a.y * a.y).sqrt()
}

/// Left-hand normal of `a - b`'s direction, scaled to `hw`.
#[inline]
fn offset(from: Point, to: Point, hw: f64) -> Point {
    let d = sub(to, from);
    let len = length(d);
    Point::new(-d.y / len * hw, d.x / len * hw)
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Polygon sink that keeps every emitted piece counter-clockwise.
struct Outline {
    polygons: Vec<Contour>,
    approx_scale: f64,
}

impl Outline {
    fn push(&mut self, mut points: Vec<Point>) {
        if points.len() < 3 {
            return;
        }
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        self.polygons.push(Contour {
            points,
            closed: true,
        });
    }

    fn circle(&mut self, c: Point, r: f64) {
        let ra = r * self.approx_scale;
        let da = (ra / (ra + 0.125)).acos() * 2.0;
        let n = ((2.0 * PI / da).ceil() as usize).clamp(8, 720);
        let points = (0..n)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / n as f64;
                Point::new(c.x + r * a.cos(), c.y + r * a.sin())
            })
            .collect();
        self.push(points);
    }
}

/// Drop consecutive duplicates (and the closing duplicate of a closed ring).
fn clean(contour: &Contour) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(contour.points.len());
    for &p in &contour.points {
        match pts.last() {
            Some(&q) if length(sub(p, q)) <= VERTEX_EPSILON => {}
            _ => pts.push(p),
        }
    }
    if contour.closed && pts.len() > 1 {
        if let (Some(&first), Some(&last)) = (pts.first(), pts.last()) {
            if length(sub(first, last)) <= VERTEX_EPSILON {
                pts.pop();
            }
        }
    }
    pts
}

/// Split polylines into the "on" pieces of a dash pattern.
pub fn apply_dash(contours: &[Contour], dash: &DashPattern) -> Vec<Contour> {
    if !dash.is_usable() {
        return contours.to_vec();
    }
    let total: f64 = dash.lengths.iter().sum();
    let mut out = Vec::new();
    for contour in contours {
        let mut pts = contour.points.clone();
        if contour.closed {
            if let Some(&first) = pts.first() {
                pts.push(first);
            }
        }
        // The pattern restarts for every sub-path.
        let mut idx = 0;
        let mut drawing = true;
        let mut remaining = dash.lengths[0];
        let mut phase = dash.phase.rem_euclid(total);
        while phase > 0.0 {
            if phase >= remaining {
                phase -= remaining;
                idx = (idx + 1) % dash.lengths.len();
                drawing = !drawing;
                remaining = dash.lengths[idx];
            } else {
                remaining -= phase;
                phase = 0.0;
            }
        }

        let mut current: Vec<Point> = Vec::new();
        if drawing {
            if let Some(&first) = pts.first() {
                current.push(first);
            }
        }
        for w in pts.windows(2) {
            let (mut a, b) = (w[0], w[1]);
            let mut seg = length(sub(b, a));
            while seg > 0.0 {
                if remaining > seg {
                    remaining -= seg;
                    if drawing {
                        current.push(b);
                    }
                    break;
                }
                let t = remaining / seg;
                let p = add(a, scale(sub(b, a), t));
                seg -= remaining;
                a = p;
                if drawing {
                    current.push(p);
                    if current.len() > 1 {
                        out.push(Contour {
                            points: std::mem::take(&mut current),
                            closed: false,
                        });
                    }
                    current.clear();
                } else {
                    current.push(p);
                }
                idx = (idx + 1) % dash.lengths.len();
                drawing = !drawing;
                remaining = dash.lengths[idx];
            }
        }
        if drawing && current.len() > 1 {
            out.push(Contour {
                points: current,
                closed: false,
            });
        }
    }
    out
}

/// Build the fill polygons of a stroke around `contours`.
///
/// `approx_scale` is the user-to-device scale, used to choose how finely
/// round joins and caps are approximated.
pub fn stroke_polygons(contours: &[Contour], style: &StrokeStyle, approx_scale: f64) -> Vec<Contour> {
    if style.line_width <= 0.0 || !style.line_width.is_finite() {
        return Vec::new();
    }
    let dashed;
    let contours = match &style.dash {
        Some(d) => {
            dashed = apply_dash(contours, d);
            &dashed[..]
        }
        None => contours,
    };

    let hw = style.line_width / 2.0;
    let mut outline = Outline {
        polygons: Vec::new(),
        approx_scale: approx_scale.max(1e-3),
    };
    for contour in contours {
        let pts = clean(contour);
        match pts.len() {
            0 => {}
            1 => stroke_dot(&mut outline, pts[0], hw, style.line_cap),
            _ => stroke_polyline(&mut outline, &pts, contour.closed, hw, style),
        }
    }
    outline.polygons
}

fn stroke_dot(outline: &mut Outline, p: Point, hw: f64, cap: LineCap) {
    match cap {
        LineCap::Butt => {}
        LineCap::Square => outline.push(vec![
            Point::new(p.x - hw, p.y - hw),
            Point::new(p.x + hw, p.y - hw),
            Point::new(p.x + hw, p.y + hw),
            Point::new(p.x - hw, p.y + hw),
        ]),
        LineCap::Round => outline.circle(p, hw),
    }
}

fn stroke_polyline(outline: &mut Outline, pts: &[Point], closed: bool, hw: f64, style: &StrokeStyle) {
    let n = pts.len();
    let closed = closed && n > 2;
    let segments = if closed { n } else { n - 1 };

    for i in 0..segments {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let o = offset(a, b, hw);
        outline.push(vec![add(a, o), sub(a, o), sub(b, o), add(b, o)]);
    }

    let joints = if closed { 0..n } else { 1..n - 1 };
    for i in joints {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        stroke_join(outline, prev, cur, next, hw, style);
    }

    if !closed {
        stroke_cap(outline, pts[1], pts[0], hw, style.line_cap);
        stroke_cap(outline, pts[n - 2], pts[n - 1], hw, style.line_cap);
    }
}

fn stroke_join(outline: &mut Outline, prev: Point, cur: Point, next: Point, hw: f64, style: &StrokeStyle) {
    let d0 = sub(cur, prev);
    let d1 = sub(next, cur);
    let turn = cross(d0, d1);
    if turn.abs() <= VERTEX_EPSILON * length(d0) * length(d1) {
        if dot(d0, d1) < 0.0 && style.line_join == LineJoin::Round {
            outline.circle(cur, hw);
        }
        return;
    }
    // The outer side of a left turn is on the right.
    let side = if turn > 0.0 { -1.0 } else { 1.0 };
    let o0 = scale(offset(prev, cur, hw), side);
    let o1 = scale(offset(cur, next, hw), side);
    match style.line_join {
        LineJoin::Round => outline.circle(cur, hw),
        LineJoin::Bevel => outline.push(vec![cur, add(cur, o0), add(cur, o1)]),
        LineJoin::Miter => {
            let u = add(o0, o1);
            let k = hw * hw / dot(u, o0);
            let miter = scale(u, k);
            if length(miter) <= style.miter_limit * hw {
                outline.push(vec![cur, add(cur, o0), add(cur, miter), add(cur, o1)]);
            } else {
                outline.push(vec![cur, add(cur, o0), add(cur, o1)]);
            }
        }
    }
}

/// Cap at `end`, for a segment arriving from `from`.
fn stroke_cap(outline: &mut Outline, from: Point, end: Point, hw: f64, cap: LineCap) {
    match cap {
        LineCap::Butt => {}
        LineCap::Round => outline.circle(end, hw),
        LineCap::Square => {
            let d = sub(end, from);
            let ext = scale(d, hw / length(d));
            let o = offset(from, end, hw);
            let tip = add(end, ext);
            outline.push(vec![add(end, o), sub(end, o), sub(tip, o), add(tip, o)]);
        }
    }
}
