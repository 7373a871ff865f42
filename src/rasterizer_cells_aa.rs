//! Coverage cell accumulation for the anti-aliased rasterizer.
//!
//! Edges arrive as line segments in 24.8 fixed point. Each pixel an edge
//! crosses receives a cell holding the edge's vertical extent inside the
//! pixel (`cover`) and twice the signed area to the left of the edge
//! (`area`). Summing covers from the left while sweeping a row gives the
//! winding count; `area` refines the partially covered boundary pixels.

use crate::basics::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

/// Segments wider than this are split before rendering to keep the
/// intermediate products in range.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

const SCALE: i32 = POLY_SUBPIXEL_SCALE as i32;
const MASK: i32 = POLY_SUBPIXEL_MASK as i32;

/// One pixel's accumulated edge data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };

    #[inline]
    fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RowIndex {
    start: usize,
    len: usize,
}

/// Collects cells for every edge and sorts them into rows.
#[derive(Debug, Clone)]
pub struct CellStorage {
    cells: Vec<Cell>,
    sorted: Vec<usize>,
    rows: Vec<RowIndex>,
    curr: Cell,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    is_sorted: bool,
}

impl CellStorage {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            sorted: Vec::new(),
            rows: Vec::new(),
            curr: Cell::EMPTY,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
            is_sorted: false,
        }
    }

    pub fn reset(&mut self) {
        self.cells.clear();
        self.sorted.clear();
        self.rows.clear();
        self.curr = Cell::EMPTY;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
        self.is_sorted = false;
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
    pub fn max_x(&self) -> i32 {
        self.max_x
    }
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.curr.cover == 0 && self.curr.area == 0
    }

    /// Cells of row `y`, sorted by `x`. Only meaningful after [`sort`].
    ///
    /// [`sort`]: CellStorage::sort
    pub fn row(&self, y: i32) -> impl Iterator<Item = &Cell> + '_ {
        let slot = if self.is_sorted && y >= self.min_y && y <= self.max_y {
            self.rows[(y - self.min_y) as usize]
        } else {
            RowIndex::default()
        };
        self.sorted[slot.start..slot.start + slot.len]
            .iter()
            .map(move |&i| &self.cells[i])
    }

    // ------------------------------------------------------------------
    // Cell bookkeeping
    // ------------------------------------------------------------------

    #[inline]
    fn flush_curr(&mut self) {
        if self.curr.area | self.curr.cover != 0 {
            self.cells.push(self.curr);
        }
    }

    #[inline]
    fn set_curr(&mut self, x: i32, y: i32) {
        if !self.curr.is_at(x, y) {
            self.flush_curr();
            self.curr = Cell {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    #[inline]
    fn accumulate(&mut self, cover: i32, area: i32) {
        self.curr.cover += cover;
        self.curr.area += area;
    }

    fn extend_bounds(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    // ------------------------------------------------------------------
    // Edge rendering
    // ------------------------------------------------------------------

    /// Walk the part of an edge that lies inside row `ey`. `y1` and `y2`
    /// are the fractional heights (0..=256) where it enters and leaves.
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & MASK;
        let fx2 = x2 & MASK;

        if y1 == y2 {
            self.set_curr(ex2, ey);
            return;
        }

        if ex1 == ex2 {
            let delta = y2 - y1;
            self.accumulate(delta, (fx1 + fx2) * delta);
            return;
        }

        // The edge spans several cells of this row.
        let (mut p, first, incr, dx) = if x2 < x1 {
            (fx1 as i64 * (y2 - y1) as i64, 0, -1, x1 as i64 - x2 as i64)
        } else {
            (
                (SCALE - fx1) as i64 * (y2 - y1) as i64,
                SCALE,
                1,
                x2 as i64 - x1 as i64,
            )
        };

        let mut delta = p.div_euclid(dx) as i32;
        let mut modulo = p.rem_euclid(dx);
        self.accumulate(delta, (fx1 + first) * delta);

        let mut ex = ex1 + incr;
        self.set_curr(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            p = SCALE as i64 * (y2 - y + delta) as i64;
            let lift = p.div_euclid(dx) as i32;
            let rem = p.rem_euclid(dx);
            modulo -= dx;

            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.accumulate(delta, SCALE * delta);
                y += delta;
                ex += incr;
                self.set_curr(ex, ey);
            }
        }
        delta = y2 - y;
        self.accumulate(delta, (fx2 + SCALE - first) * delta);
    }

    /// Add an edge in 24.8 fixed point.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;
        if dx.abs() >= DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }
        self.is_sorted = false;

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & MASK;
        let fy2 = y2 & MASK;

        self.extend_bounds(ex1, ey1);
        self.extend_bounds(ex2, ey2);
        self.set_curr(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        let (first, incr) = if dy < 0 { (0, -1) } else { (SCALE, 1) };

        if dx == 0 {
            // Vertical edge: one cell per row, constant area factor.
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;
            let mut delta = first - fy1;
            self.accumulate(delta, two_fx * delta);
            ey1 += incr;
            self.set_curr(ex1, ey1);

            delta = first + first - SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr.cover = delta;
                self.curr.area = area;
                ey1 += incr;
                self.set_curr(ex1, ey1);
            }
            delta = fy2 - SCALE + first;
            self.accumulate(delta, two_fx * delta);
            return;
        }

        // General case: split the edge at every row boundary.
        let dy_abs = dy.abs();
        let mut p = if dy < 0 {
            fy1 as i64 * dx
        } else {
            (SCALE - fy1) as i64 * dx
        };
        let mut delta = p.div_euclid(dy_abs) as i32;
        let mut modulo = p.rem_euclid(dy_abs);

        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        ey1 += incr;
        self.set_curr(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = SCALE as i64 * dx;
            let lift = p.div_euclid(dy_abs) as i32;
            let rem = p.rem_euclid(dy_abs);
            modulo -= dy_abs;

            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, SCALE - first, x2, fy2);
    }

    /// Sort cells by row, then by `x` within each row. Cheap when nothing
    /// was added since the last sort.
    pub fn sort(&mut self) {
        if self.is_sorted {
            return;
        }
        self.flush_curr();
        self.curr = Cell::EMPTY;
        self.sorted.clear();
        self.rows.clear();
        if self.cells.is_empty() {
            return;
        }

        let height = (self.max_y - self.min_y + 1) as usize;
        self.rows.resize(height, RowIndex::default());
        for cell in &self.cells {
            self.rows[(cell.y - self.min_y) as usize].start += 1;
        }
        let mut start = 0;
        for row in &mut self.rows {
            let count = row.start;
            row.start = start;
            start += count;
        }

        self.sorted.resize(self.cells.len(), 0);
        for (i, cell) in self.cells.iter().enumerate() {
            let row = &mut self.rows[(cell.y - self.min_y) as usize];
            self.sorted[row.start + row.len] = i;
            row.len += 1;
        }

        let cells = &self.cells;
        for row in &self.rows {
            self.sorted[row.start..row.start + row.len].sort_by_key(|&i| cells[i].x);
        }
        self.is_sorted = true;
    }
}

impl Default for CellStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: i32 = POLY_SUBPIXEL_SCALE as i32;

    #[test]
    fn test_empty() {
        let mut c = CellStorage::new();
        assert!(c.is_empty());
        c.sort();
        assert_eq!(c.total_cells(), 0);
        assert_eq!(c.row(0).count(), 0);
    }

    #[test]
    fn test_vertical_edge_one_cell_per_row() {
        let mut c = CellStorage::new();
        c.line(2 * S, 0, 2 * S, 3 * S);
        c.sort();
        for y in 0..3 {
            let cells: Vec<_> = c.row(y).collect();
            assert_eq!(cells.len(), 1);
            assert_eq!(cells[0].x, 2);
            assert_eq!(cells[0].cover, S);
        }
    }

    #[test]
    fn test_net_cover_of_closed_square_is_zero_per_row() {
        let mut c = CellStorage::new();
        c.line(S, S, 3 * S, S);
        c.line(3 * S, S, 3 * S, 3 * S);
        c.line(3 * S, 3 * S, S, 3 * S);
        c.line(S, 3 * S, S, S);
        c.sort();
        for y in 1..3 {
            let total: i32 = c.row(y).map(|cell| cell.cover).sum();
            assert_eq!(total, 0);
        }
        assert_eq!(c.min_y(), 1);
        assert_eq!(c.max_y(), 3);
    }

    #[test]
    fn test_row_cells_sorted_by_x() {
        let mut c = CellStorage::new();
        c.line(5 * S, 0, 5 * S, S);
        c.line(S, 0, S, S);
        c.line(3 * S, 0, 3 * S, S);
        c.sort();
        let xs: Vec<i32> = c.row(0).map(|cell| cell.x).collect();
        assert_eq!(xs, vec![1, 3, 5]);
    }

    #[test]
    fn test_diagonal_edge_touches_each_row() {
        let mut c = CellStorage::new();
        c.line(0, 0, 4 * S, 4 * S);
        c.sort();
        for y in 0..4 {
            assert!(c.row(y).count() > 0);
            let cover: i32 = c.row(y).map(|cell| cell.cover).sum();
            assert_eq!(cover, S);
        }
    }

    #[test]
    fn test_wide_edge_is_subdivided() {
        let mut c = CellStorage::new();
        c.line(0, 0, 40000 * S, S);
        c.sort();
        let cover: i32 = c.row(0).map(|cell| cell.cover).sum();
        assert_eq!(cover, S);
    }
}
