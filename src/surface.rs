//! Raster surface: a pixel buffer paired with its drawing handle.
//!
//! [`RasterSurface`] exclusively owns a [`PixelBuffer`] and the handle that
//! describes how the drawing context attaches to that buffer's bytes. The
//! handle is only rebuilt when the storage is replaced by one of different
//! dimensions (see [`RasterSurface::assign`]); in-place writes keep it.
//!
//! Every drawing call goes through [`RasterSurface::draw`], which attaches
//! a fresh [`DrawContext`] to the buffer. State changes made inside a draw
//! block never outlive it, and all writes are visible in the buffer as soon
//! as the block returns.

use log::{debug, trace};

use crate::basics::{pixel_extent, FillingRule, Point, Rect, Size};
use crate::color::Rgba;
use crate::context::DrawContext;
use crate::error::{BitmapError, Result};
use crate::path_storage::Path;
use crate::pixel::{Coordinate, Pixel};
use crate::pixel_buffer::{PixelBuffer, BPP};
use crate::scale::ScalingPolicy;
use crate::shadow::Shadow;

/// Largest width or height a surface accepts.
pub const MAX_DIMENSION: usize = 20_000;

/// How the drawing context addresses the owned bytes. Rows run bottom-up
/// (negative stride) so drawing coordinates match the public coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SurfaceHandle {
    width: u32,
    height: u32,
    stride: i32,
}

impl SurfaceHandle {
    fn bind(buffer: &PixelBuffer) -> Result<Self> {
        let (w, h) = (buffer.width(), buffer.height());
        if w == 0 || h == 0 || w > MAX_DIMENSION || h > MAX_DIMENSION {
            return Err(BitmapError::InvalidContext {
                width: w,
                height: h,
            });
        }
        Ok(Self {
            width: w as u32,
            height: h as u32,
            stride: -((w * BPP) as i32),
        })
    }

    fn matches(&self, buffer: &PixelBuffer) -> bool {
        self.width as usize == buffer.width() && self.height as usize == buffer.height()
    }
}

// ============================================================================
// Image
// ============================================================================

/// An immutable capture of a surface's pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    buffer: PixelBuffer,
}

impl Image {
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgba> {
        self.buffer.get(x, y)
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

impl From<PixelBuffer> for Image {
    fn from(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }
}

impl AsRef<PixelBuffer> for Image {
    fn as_ref(&self) -> &PixelBuffer {
        &self.buffer
    }
}

// ============================================================================
// RasterSurface
// ============================================================================

/// An RGBA8 raster with a bottom-left coordinate system and a drawing
/// context bound to the same storage.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    buffer: PixelBuffer,
    handle: SurfaceHandle,
}

impl PartialEq for RasterSurface {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl Eq for RasterSurface {}

impl RasterSurface {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Take ownership of `buffer` and bind a drawing handle to it.
    pub fn from_buffer(buffer: PixelBuffer) -> Result<Self> {
        let handle = SurfaceHandle::bind(&buffer)?;
        debug!("created {}x{} surface", buffer.width(), buffer.height());
        Ok(Self { buffer, handle })
    }

    /// A fully transparent surface.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BitmapError::InvalidContext { width, height });
        }
        Self::from_buffer(PixelBuffer::new(width, height)?)
    }

    /// Size components are truncated to whole pixels.
    pub fn from_size(size: Size) -> Result<Self> {
        Self::new(pixel_extent(size.width), pixel_extent(size.height))
    }

    /// A surface filled with `background`.
    pub fn with_background(width: usize, height: usize, background: Rgba) -> Result<Self> {
        let mut s = Self::new(width, height)?;
        s.fill(background);
        Ok(s)
    }

    pub fn from_rgba_bytes(bytes: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        Self::from_buffer(PixelBuffer::from_bytes(width, height, bytes)?)
    }

    /// Colors are taken in memory order (top row first).
    pub fn from_pixels(pixels: &[Rgba], width: usize, height: usize) -> Result<Self> {
        Self::from_buffer(PixelBuffer::from_pixels(width, height, pixels)?)
    }

    pub fn from_image(image: &Image) -> Result<Self> {
        Self::from_buffer(image.buffer.clone())
    }

    /// Create a transparent surface and run `setup` on it.
    pub fn with_setup<F>(width: usize, height: usize, setup: F) -> Result<Self>
    where
        F: FnOnce(&mut DrawContext),
    {
        let mut s = Self::new(width, height)?;
        s.draw(setup);
        Ok(s)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Mutable access to the pixels. The buffer's dimensions can not change
    /// through it, so the drawing handle stays valid.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    pub fn rgba_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgba> {
        self.buffer.get(x, y)
    }

    pub fn pixel_at(&self, c: Coordinate) -> Result<Rgba> {
        self.buffer.get_at(c)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) -> Result<()> {
        self.buffer.set(x, y, color)
    }

    pub fn put_pixel(&mut self, pixel: Pixel) -> Result<()> {
        self.buffer.set_pixel(pixel)
    }

    pub fn pixels(&self, bottom_left: bool) -> Vec<Pixel> {
        self.buffer.pixels(bottom_left)
    }

    pub fn raw_pixels(&self) -> Vec<Rgba> {
        self.buffer.raw_pixels()
    }

    pub fn row_pixels(&self, y: usize) -> Result<Vec<Rgba>> {
        self.buffer.row_pixels(y)
    }

    pub fn column_pixels(&self, x: usize) -> Result<Vec<Rgba>> {
        self.buffer.column_pixels(x)
    }

    pub fn coordinates_matching(&self, color: Rgba) -> Vec<Coordinate> {
        self.buffer.coordinates_matching(color)
    }

    pub fn erase_all(&mut self) {
        self.buffer.erase_all();
    }

    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.set_bytes(bytes)
    }

    // ------------------------------------------------------------------
    // Storage replacement
    // ------------------------------------------------------------------

    /// Replace the contents with `buffer`. Equal dimensions copy the bytes
    /// in place; different dimensions swap in the new storage and rebind
    /// the drawing handle. On error `self` is left untouched.
    pub fn assign(&mut self, buffer: PixelBuffer) -> Result<()> {
        if self.handle.matches(&buffer) {
            return self.buffer.set_bytes(buffer.as_bytes());
        }
        let handle = SurfaceHandle::bind(&buffer)?;
        debug!(
            "rebinding drawing handle: {}x{} -> {}x{}",
            self.width(),
            self.height(),
            buffer.width(),
            buffer.height()
        );
        self.buffer = buffer;
        self.handle = handle;
        Ok(())
    }

    /// [`RasterSurface::assign`] from another surface.
    pub fn assign_surface(&mut self, other: RasterSurface) -> Result<()> {
        self.assign(other.buffer)
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Run `block` with a drawing context attached to this surface.
    pub fn draw<F, R>(&mut self, block: F) -> R
    where
        F: FnOnce(&mut DrawContext) -> R,
    {
        let SurfaceHandle {
            width,
            height,
            stride,
        } = self.handle;
        let mut ctx = DrawContext::new(self.buffer.as_bytes_mut(), width, height, stride);
        block(&mut ctx)
    }

    /// Copy of this surface with `block` drawn on top.
    pub fn drawing<F>(&self, block: F) -> Self
    where
        F: FnOnce(&mut DrawContext),
    {
        let mut copy = self.clone();
        copy.draw(block);
        copy
    }

    /// An immutable capture of the current pixels.
    pub fn snapshot(&self) -> Image {
        Image {
            buffer: self.buffer.clone(),
        }
    }

    /// Draw `image` into `rect` (public coordinates) following `policy`.
    pub fn draw_image<I: AsRef<PixelBuffer>>(&mut self, image: &I, rect: Rect, policy: ScalingPolicy) {
        self.draw(|ctx| ctx.draw_image_scaled(image, rect, policy));
    }

    /// Draw `image` at its natural size with its bottom-left corner at
    /// `point`, clipped to the surface.
    pub fn draw_image_at<I: AsRef<PixelBuffer>>(&mut self, image: &I, point: Point) {
        let bounds = self.bounds();
        let dest = Rect::from_origin_size(point, image.as_ref().size());
        trace!("draw image at {:?}", dest);
        self.draw(|ctx| {
            ctx.clip_to_rect(bounds);
            ctx.draw_image(image, dest);
        });
    }

    pub fn drawing_image_at<I: AsRef<PixelBuffer>>(&self, image: &I, point: Point) -> Self {
        let mut copy = self.clone();
        copy.draw_image_at(image, point);
        copy
    }

    /// Run `block` clipped to `path` (nonzero rule).
    pub fn clip_to_path<F>(&mut self, path: &Path, block: F)
    where
        F: FnOnce(&mut DrawContext),
    {
        self.draw(|ctx| {
            ctx.clip_to_path(path, FillingRule::NonZero);
            block(ctx);
        });
    }

    /// Run `block` with `shadow` applied to everything it paints.
    pub fn applying_shadow<F>(&mut self, shadow: Shadow, block: F)
    where
        F: FnOnce(&mut DrawContext),
    {
        self.draw(|ctx| {
            ctx.set_shadow(Some(shadow));
            block(ctx);
        });
    }
}

impl AsRef<PixelBuffer> for RasterSurface {
    fn as_ref(&self) -> &PixelBuffer {
        &self.buffer
    }
}

impl TryFrom<PixelBuffer> for RasterSurface {
    type Error = BitmapError;

    fn try_from(buffer: PixelBuffer) -> Result<Self> {
        Self::from_buffer(buffer)
    }
}
