//! Coordinate and pixel value types used for bulk reads and exports.

use core::cmp::Ordering;

use crate::color::Rgba;

/// An integer pixel coordinate.
///
/// The origin convention belongs to the buffer that interprets the
/// coordinate, not to the coordinate itself. Sorting is row-major starting
/// at `y`: `(0,0) < (1,0) < (0,1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

/// A color together with the coordinate it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub point: Coordinate,
    pub color: Rgba,
}

impl Pixel {
    pub const fn new(x: usize, y: usize, color: Rgba) -> Self {
        Self {
            point: Coordinate::new(x, y),
            color,
        }
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.point.x
    }

    #[inline]
    pub fn y(&self) -> usize {
        self.point.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ordering_is_row_major() {
        let mut coords = vec![
            Coordinate::new(0, 1),
            Coordinate::new(1, 0),
            Coordinate::new(0, 0),
            Coordinate::new(1, 1),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_pixel_accessors() {
        let p = Pixel::new(3, 4, Rgba::RED);
        assert_eq!(p.x(), 3);
        assert_eq!(p.y(), 4);
        assert_eq!(p.point, Coordinate::from((3, 4)));
    }
}
