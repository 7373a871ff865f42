//! Drawing images with blend modes.

use crate::basics::{Point, Rect};
use crate::color::Rgba;
use crate::comp_op::BlendMode;
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::surface::RasterSurface;

impl RasterSurface {
    /// Draw `image` into `dest` (default: its natural size at the origin)
    /// with `mode`, limited to `clip_rects` (default: the whole surface).
    pub fn blend<I: AsRef<PixelBuffer>>(
        &mut self,
        image: &I,
        mode: BlendMode,
        dest: Option<Rect>,
        clip_rects: Option<&[Rect]>,
    ) {
        let bounds = self.bounds();
        let dest = dest.unwrap_or_else(|| image.as_ref().bounds());
        self.draw(|ctx| {
            ctx.clip_to_rects(clip_rects.unwrap_or(&[bounds]));
            ctx.set_blend_mode(mode);
            ctx.draw_image(image, dest);
        });
    }

    /// [`RasterSurface::blend`] at `position`, natural size.
    pub fn blend_at<I: AsRef<PixelBuffer>>(
        &mut self,
        image: &I,
        mode: BlendMode,
        position: Point,
        clip_rects: Option<&[Rect]>,
    ) {
        let dest = Rect::from_origin_size(position, image.as_ref().size());
        self.blend(image, mode, Some(dest), clip_rects);
    }

    pub fn blending<I: AsRef<PixelBuffer>>(
        &self,
        image: &I,
        mode: BlendMode,
        dest: Option<Rect>,
        clip_rects: Option<&[Rect]>,
    ) -> RasterSurface {
        let mut copy = self.clone();
        copy.blend(image, mode, dest, clip_rects);
        copy
    }

    pub fn blending_at<I: AsRef<PixelBuffer>>(
        &self,
        image: &I,
        mode: BlendMode,
        position: Point,
        clip_rects: Option<&[Rect]>,
    ) -> RasterSurface {
        let mut copy = self.clone();
        copy.blend_at(image, mode, position, clip_rects);
        copy
    }

    /// A surface the size of `image`, optionally filled with `background`,
    /// with `image` drawn on top using `mode`.
    pub fn blended_image<I: AsRef<PixelBuffer>>(
        image: &I,
        mode: BlendMode,
        background: Option<Rgba>,
        clip_rects: Option<&[Rect]>,
    ) -> Result<RasterSurface> {
        let buffer = image.as_ref();
        let mut result = RasterSurface::new(buffer.width(), buffer.height())?;
        if let Some(bg) = background {
            result.fill(bg);
        }
        result.blend(image, mode, None, clip_rects);
        Ok(result)
    }
}
