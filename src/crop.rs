//! Cropping to rects and paths.

use log::trace;

use crate::basics::{FillingRule, Rect};
use crate::error::{BitmapError, Result};
use crate::path_storage::Path;
use crate::pixel_buffer::{PixelBuffer, BPP};
use crate::surface::RasterSurface;
use crate::trans_affine::TransAffine;

impl RasterSurface {
    /// Copy the pixels inside `rect` (public coordinates) into a new
    /// surface. The rect is expanded to whole pixels and limited to the
    /// surface; a rect that misses the surface entirely fails with
    /// `CannotCreateImage`.
    pub fn cropped(&self, rect: Rect) -> Result<RasterSurface> {
        let area = rect
            .integral()
            .intersection(&self.bounds())
            .ok_or(BitmapError::CannotCreateImage)?;
        // Rows are addressed top-down in memory.
        let flipped = area.flipped_y(self.height() as f64);
        let (x0, y0) = (flipped.min_x() as usize, flipped.min_y() as usize);
        let (w, h) = (area.width() as usize, area.height() as usize);
        trace!("crop {:?} -> memory rows {}..{} cols {}..{}", rect, y0, y0 + h, x0, x0 + w);

        let src = self.rgba_bytes();
        let src_stride = self.width() * BPP;
        let mut bytes = Vec::with_capacity(w * h * BPP);
        for row in y0..y0 + h {
            let start = row * src_stride + x0 * BPP;
            bytes.extend_from_slice(&src[start..start + w * BPP]);
        }
        RasterSurface::from_buffer(PixelBuffer::from_bytes(w, h, bytes)?)
    }

    pub fn crop(&mut self, rect: Rect) -> Result<()> {
        let cropped = self.cropped(rect)?;
        self.assign_surface(cropped)
    }

    /// Crop to the bounding box of `path`, then make everything outside
    /// the path fully transparent.
    pub fn cropped_to_path(&self, path: &Path, rule: FillingRule) -> Result<RasterSurface> {
        let bbox = path.bounding_box().ok_or(BitmapError::CannotCreateImage)?;
        let mut result = self.cropped(bbox)?;
        let origin = bbox.integral().intersection(&self.bounds()).unwrap_or(bbox);
        let local = path.transformed(&TransAffine::new_translation(-origin.min_x(), -origin.min_y()));
        result.retain_path(&local, rule);
        Ok(result)
    }

    pub fn crop_to_path(&mut self, path: &Path, rule: FillingRule) -> Result<()> {
        let cropped = self.cropped_to_path(path, rule)?;
        self.assign_surface(cropped)
    }

    /// Clear the surface to transparent and redraw the previous contents
    /// through `path`. Pixels outside the path end up as (0,0,0,0).
    pub(crate) fn retain_path(&mut self, path: &Path, rule: FillingRule) {
        let image = self.snapshot();
        let bounds = self.bounds();
        self.erase_all();
        self.draw(|ctx| {
            ctx.clip_to_path(path, rule);
            ctx.draw_image(&image, bounds);
        });
    }
}
