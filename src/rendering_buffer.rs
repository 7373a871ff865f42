//! Row-oriented access to RGBA8 pixel storage.
//!
//! [`RowAccessor`] borrows a byte slice and locates row `y` at
//! `start + y * stride`. A negative stride runs the rows bottom-up: with
//! `stride = -(width * 4)` drawing row 0 is the last row in memory, which is
//! how the surface lines the drawing coordinate system up with the
//! bottom-left public convention of the pixel buffer.

/// Row accessor over borrowed pixel bytes.
#[derive(Debug)]
pub struct RowAccessor<'a> {
    buf: &'a mut [u8],
    width: u32,
    height: u32,
    stride: i32,
}

impl<'a> RowAccessor<'a> {
    /// Attach to `buf`. `buf.len()` must be at least `height * |stride|`.
    pub fn new(buf: &'a mut [u8], width: u32, height: u32, stride: i32) -> Self {
        debug_assert!(buf.len() >= height as usize * stride.unsigned_abs() as usize);
        Self {
            buf,
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    pub fn stride_abs(&self) -> usize {
        self.stride.unsigned_abs() as usize
    }

    /// Byte offset of the first pixel of row `y`.
    #[inline]
    pub fn row_offset(&self, y: u32) -> usize {
        if self.stride < 0 {
            (self.height - 1 - y) as usize * self.stride_abs()
        } else {
            y as usize * self.stride_abs()
        }
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.row_offset(y);
        &self.buf[start..start + self.stride_abs()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.row_offset(y);
        let len = self.stride_abs();
        &mut self.buf[start..start + len]
    }

    /// The four bytes of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.row_offset(y) + x as usize * 4;
        &self.buf[start..start + 4]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let start = self.row_offset(y) + x as usize * 4;
        &mut self.buf[start..start + 4]
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_stride() {
        let mut data = vec![0u8; 2 * 3 * 4];
        let mut ra = RowAccessor::new(&mut data, 2, 3, 8);
        ra.row_mut(0)[0] = 7;
        assert_eq!(ra.row_offset(2), 16);
        drop(ra);
        assert_eq!(data[0], 7);
    }

    #[test]
    fn test_negative_stride_reverses_rows() {
        let mut data = vec![0u8; 2 * 3 * 4];
        let mut ra = RowAccessor::new(&mut data, 2, 3, -8);
        assert_eq!(ra.row_offset(0), 16);
        assert_eq!(ra.row_offset(2), 0);
        ra.pixel_mut(1, 0).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(ra.pixel(1, 0), &[1, 2, 3, 4]);
        drop(ra);
        assert_eq!(&data[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let mut data = vec![9u8; 16];
        RowAccessor::new(&mut data, 2, 2, -8).clear();
        assert!(data.iter().all(|&v| v == 0));
    }
}
