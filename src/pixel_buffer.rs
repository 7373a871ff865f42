//! RGBA8 pixel buffer with a bottom-left public coordinate system.
//!
//! Bytes are stored row-major, four bytes per pixel (R, G, B, A), with rows
//! laid out top to bottom in memory. The coordinate API puts `(0, 0)` at
//! the bottom-left, so public row `y` lives at memory row `height - 1 - y`:
//!
//! ```text
//!   offset(x, y) = (height - 1 - y) * width * 4 + x * 4
//! ```
//!
//! Bulk iteration (`raw_pixels`, `pixels`, `coordinates_matching`) walks
//! memory order, i.e. the top row first. That is the opposite vertical
//! direction to the coordinate API and is part of the contract.

use crate::basics::{Rect, Size};
use crate::color::{bytes_from_pixels, pixels_from_bytes, Rgba};
use crate::error::{BitmapError, Result};
use crate::pixel::{Coordinate, Pixel};

/// Bytes per pixel.
pub const BPP: usize = 4;

/// An owned RGBA8 raster. `bytes.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    // ========================================================================
    // Construction
    // ========================================================================

    /// A zero-filled (fully transparent) buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            bytes: vec![0; len],
        })
    }

    /// Wrap an existing byte array. Fails with `SizeMismatch` unless
    /// `bytes.len() == width * height * 4`.
    pub fn from_bytes(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if bytes.len() != expected {
            return Err(BitmapError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Build from colors in memory order (top row first).
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgba]) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if pixels.len() * BPP != expected {
            return Err(BitmapError::SizeMismatch {
                expected,
                actual: pixels.len() * BPP,
            });
        }
        Self::from_bytes(width, height, bytes_from_pixels(pixels))
    }

    // ========================================================================
    // Dimensions
    // ========================================================================

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width * BPP
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    // ========================================================================
    // Raw storage
    // ========================================================================

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view of the storage. The length can not change through it.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Zero every byte without reallocating.
    pub fn erase_all(&mut self) {
        self.bytes.fill(0);
    }

    /// Overwrite the storage in place. Fails with `SizeMismatch` unless the
    /// new bytes have exactly the current length.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.bytes.len() {
            return Err(BitmapError::SizeMismatch {
                expected: self.bytes.len(),
                actual: bytes.len(),
            });
        }
        self.bytes.copy_from_slice(bytes);
        Ok(())
    }

    // ========================================================================
    // Pixel access (bottom-left origin)
    // ========================================================================

    /// Byte offset of public coordinate `(x, y)`.
    #[inline]
    pub fn byte_offset(&self, x: usize, y: usize) -> Result<usize> {
        self.check(x, y)?;
        Ok((self.height - 1 - y) * self.stride() + x * BPP)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Rgba> {
        let offset = self.byte_offset(x, y)?;
        Ok(Rgba::from_slice(&self.bytes[offset..offset + BPP]))
    }

    pub fn set(&mut self, x: usize, y: usize, color: Rgba) -> Result<()> {
        let offset = self.byte_offset(x, y)?;
        color.write_to(&mut self.bytes[offset..offset + BPP]);
        Ok(())
    }

    pub fn get_at(&self, c: Coordinate) -> Result<Rgba> {
        self.get(c.x, c.y)
    }

    pub fn set_pixel(&mut self, pixel: Pixel) -> Result<()> {
        self.set(pixel.x(), pixel.y(), pixel.color)
    }

    /// The `4 * width` bytes of public row `y`.
    pub fn row_bytes(&self, y: usize) -> Result<&[u8]> {
        let offset = self.byte_offset(0, y)?;
        Ok(&self.bytes[offset..offset + self.stride()])
    }

    pub fn row_pixels(&self, y: usize) -> Result<Vec<Rgba>> {
        Ok(pixels_from_bytes(self.row_bytes(y)?))
    }

    /// The pixels of column `x`, bottom public row (`y == 0`) first.
    pub fn column_pixels(&self, x: usize) -> Result<Vec<Rgba>> {
        if x >= self.width {
            return Err(self.out_of_bounds(x as i64, 0));
        }
        let column = (0..self.height)
            .rev()
            .map(|y| {
                let offset = (y * self.width + x) * BPP;
                Rgba::from_slice(&self.bytes[offset..offset + BPP])
            })
            .collect();
        Ok(column)
    }

    // ========================================================================
    // Bulk reads (memory order)
    // ========================================================================

    /// Every pixel in memory order (top-left to bottom-right).
    pub fn raw_pixels(&self) -> Vec<Rgba> {
        pixels_from_bytes(&self.bytes)
    }

    /// Every pixel in memory order, tagged with its coordinate. With
    /// `bottom_left` the coordinates use the public convention, otherwise
    /// `(0, 0)` is the top-left.
    pub fn pixels(&self, bottom_left: bool) -> Vec<Pixel> {
        self.bytes
            .chunks_exact(BPP)
            .enumerate()
            .map(|(index, p)| {
                let x = index % self.width;
                let row = index / self.width;
                let y = if bottom_left { self.height - row - 1 } else { row };
                Pixel::new(x, y, Rgba::from_slice(p))
            })
            .collect()
    }

    /// Public coordinates of every pixel equal to `color`, in memory order.
    pub fn coordinates_matching(&self, color: Rgba) -> Vec<Coordinate> {
        let needle = color.to_bytes();
        self.bytes
            .chunks_exact(BPP)
            .enumerate()
            .filter(|(_, p)| *p == needle)
            .map(|(index, _)| {
                Coordinate::new(index % self.width, self.height - (index / self.width) - 1)
            })
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(self.out_of_bounds(x as i64, y as i64))
        }
    }

    pub(crate) fn out_of_bounds(&self, x: i64, y: i64) -> BitmapError {
        BitmapError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl AsRef<PixelBuffer> for PixelBuffer {
    fn as_ref(&self) -> &PixelBuffer {
        self
    }
}

/// `width * height * 4`, or `InvalidContext` for an empty or overflowing
/// size.
fn byte_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidContext { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BPP))
        .ok_or(BitmapError::InvalidContext { width, height })
}
