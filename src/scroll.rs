//! Scrolling the pixel rows and columns.
//!
//! Scrolling works directly on the memory layout. Memory rows run top to
//! bottom, so scrolling content down (towards public `y = 0`) moves bytes
//! towards the end of the buffer. Horizontal scrolls rotate each row on its
//! own.

use log::trace;

use crate::error::{BitmapError, Result};
use crate::pixel_buffer::BPP;
use crate::surface::RasterSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    fn is_vertical(self) -> bool {
        matches!(self, ScrollDirection::Up | ScrollDirection::Down)
    }
}

impl RasterSurface {
    /// Move the content `count` pixels in `direction`. With `wraps`,
    /// content leaving one edge comes back on the opposite edge; otherwise
    /// the vacated pixels become transparent. `count` must be smaller than
    /// the extent along the scroll axis, and 0 does nothing.
    pub fn scroll(&mut self, direction: ScrollDirection, count: usize, wraps: bool) -> Result<()> {
        let (w, h) = (self.width(), self.height());
        let extent = if direction.is_vertical() { h } else { w };
        if count >= extent {
            let (x, y) = if direction.is_vertical() { (0, count) } else { (count, 0) };
            return Err(BitmapError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: w,
                height: h,
            });
        }
        if count == 0 {
            return Ok(());
        }
        trace!("scroll {:?} by {} (wraps: {})", direction, count, wraps);

        let stride = w * BPP;
        let bytes = self.buffer_mut().as_bytes_mut();
        match direction {
            ScrollDirection::Down => {
                let split = count * stride;
                bytes.rotate_right(split);
                if !wraps {
                    bytes[..split].fill(0);
                }
            }
            ScrollDirection::Up => {
                let split = count * stride;
                bytes.rotate_left(split);
                if !wraps {
                    let len = bytes.len();
                    bytes[len - split..].fill(0);
                }
            }
            ScrollDirection::Left => {
                let split = count * BPP;
                for row in bytes.chunks_exact_mut(stride) {
                    row.rotate_left(split);
                    if !wraps {
                        row[stride - split..].fill(0);
                    }
                }
            }
            ScrollDirection::Right => {
                let split = count * BPP;
                for row in bytes.chunks_exact_mut(stride) {
                    row.rotate_right(split);
                    if !wraps {
                        row[..split].fill(0);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn scrolled(&self, direction: ScrollDirection, count: usize, wraps: bool) -> Result<RasterSurface> {
        let mut copy = self.clone();
        copy.scroll(direction, count, wraps)?;
        Ok(copy)
    }

    /// Scroll both axes: `dy` first (positive is up), then `dx` (positive
    /// is right). Nothing changes if either count is out of range.
    pub fn scroll_by(&mut self, dx: i64, dy: i64, wraps: bool) -> Result<()> {
        let vertical = if dy < 0 { ScrollDirection::Down } else { ScrollDirection::Up };
        let horizontal = if dx < 0 { ScrollDirection::Left } else { ScrollDirection::Right };
        let mut copy = self.clone();
        copy.scroll(vertical, dy.unsigned_abs() as usize, wraps)?;
        copy.scroll(horizontal, dx.unsigned_abs() as usize, wraps)?;
        self.assign_surface(copy)
    }

    /// Make public `(x, y)` the new origin by wrapping the content left by
    /// `x` and down by `y`.
    pub fn zero_point(&mut self, x: usize, y: usize) -> Result<()> {
        let mut copy = self.clone();
        copy.scroll(ScrollDirection::Left, x, true)?;
        copy.scroll(ScrollDirection::Down, y, true)?;
        self.assign_surface(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn make_surface(w: usize, h: usize) -> RasterSurface {
        let mut s = RasterSurface::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                s.set_pixel(x, y, Rgba::new(x as u8 + 1, y as u8 + 1, 7, 255)).unwrap();
            }
        }
        s
    }

    #[test_log::test]
    fn test_scroll_zero_is_noop() {
        let s = make_surface(4, 3);
        for dir in [
            ScrollDirection::Up,
            ScrollDirection::Down,
            ScrollDirection::Left,
            ScrollDirection::Right,
        ] {
            assert_eq!(s.scrolled(dir, 0, true).unwrap(), s);
            assert_eq!(s.scrolled(dir, 0, false).unwrap(), s);
        }
    }

    #[test]
    fn test_scroll_full_cycle_restores() {
        let s = make_surface(5, 4);
        for n in 1..4 {
            let mut t = s.scrolled(ScrollDirection::Down, n, true).unwrap();
            t.scroll(ScrollDirection::Down, 4 - n, true).unwrap();
            assert_eq!(t, s);
        }
        for n in 1..5 {
            let mut t = s.scrolled(ScrollDirection::Right, n, true).unwrap();
            t.scroll(ScrollDirection::Right, 5 - n, true).unwrap();
            assert_eq!(t, s);
        }
    }

    #[test]
    fn test_scroll_down_moves_towards_origin() {
        let s = make_surface(4, 4);
        let t = s.scrolled(ScrollDirection::Down, 1, true).unwrap();
        for x in 0..4 {
            assert_eq!(t.pixel(x, 0).unwrap(), s.pixel(x, 1).unwrap());
            assert_eq!(t.pixel(x, 3).unwrap(), s.pixel(x, 0).unwrap());
        }
    }

    #[test]
    fn test_scroll_down_without_wrap_clears_top_row() {
        let s = make_surface(4, 4);
        let t = s.scrolled(ScrollDirection::Down, 1, false).unwrap();
        for x in 0..4 {
            assert_eq!(t.pixel(x, 3).unwrap(), Rgba::CLEAR);
            assert_eq!(t.pixel(x, 2).unwrap(), s.pixel(x, 3).unwrap());
        }
    }

    #[test]
    fn test_scroll_up_and_left() {
        let s = make_surface(3, 3);
        let up = s.scrolled(ScrollDirection::Up, 1, false).unwrap();
        assert_eq!(up.pixel(0, 1).unwrap(), s.pixel(0, 0).unwrap());
        assert_eq!(up.pixel(0, 0).unwrap(), Rgba::CLEAR);

        let left = s.scrolled(ScrollDirection::Left, 2, true).unwrap();
        assert_eq!(left.pixel(0, 1).unwrap(), s.pixel(2, 1).unwrap());
        assert_eq!(left.pixel(1, 1).unwrap(), s.pixel(0, 1).unwrap());
    }

    #[test]
    fn test_scroll_right_without_wrap() {
        let s = make_surface(3, 2);
        let t = s.scrolled(ScrollDirection::Right, 1, false).unwrap();
        for y in 0..2 {
            assert_eq!(t.pixel(0, y).unwrap(), Rgba::CLEAR);
            assert_eq!(t.pixel(1, y).unwrap(), s.pixel(0, y).unwrap());
            assert_eq!(t.pixel(2, y).unwrap(), s.pixel(1, y).unwrap());
        }
    }

    #[test]
    fn test_scroll_count_out_of_range() {
        let mut s = make_surface(3, 2);
        assert!(matches!(
            s.scroll(ScrollDirection::Up, 2, true),
            Err(BitmapError::OutOfBounds { .. })
        ));
        assert!(s.scroll(ScrollDirection::Left, 2, true).is_ok());
        assert!(s.scroll(ScrollDirection::Left, 3, true).is_err());
    }

    #[test]
    fn test_zero_point() {
        let s = make_surface(4, 4);
        let mut t = s.clone();
        t.zero_point(1, 2).unwrap();
        assert_eq!(t.pixel(0, 0).unwrap(), s.pixel(1, 2).unwrap());
        assert_eq!(t.pixel(3, 1).unwrap(), s.pixel(0, 3).unwrap());
    }

    #[test]
    fn test_scroll_by_is_atomic() {
        let mut s = make_surface(3, 3);
        let before = s.clone();
        assert!(s.scroll_by(5, 1, true).is_err());
        assert_eq!(s, before);
        s.scroll_by(-1, -1, true).unwrap();
        assert_eq!(s.pixel(0, 0).unwrap(), before.pixel(1, 1).unwrap());
    }
}
