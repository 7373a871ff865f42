//! Masking by image alpha or by path.

use crate::basics::FillingRule;
use crate::error::Result;
use crate::path_storage::Path;
use crate::pixel_buffer::PixelBuffer;
use crate::surface::RasterSurface;

impl RasterSurface {
    /// Copy whose alpha is limited by the alpha of `mask`, stretched over
    /// the whole surface.
    pub fn masked_by_image<I: AsRef<PixelBuffer>>(&self, mask: &I) -> Result<RasterSurface> {
        let image = self.snapshot();
        let bounds = self.bounds();
        let mut result = RasterSurface::new(self.width(), self.height())?;
        result.draw(|ctx| {
            ctx.clip_to_mask(bounds, mask);
            ctx.draw_image(&image, bounds);
        });
        Ok(result)
    }

    pub fn mask_by_image<I: AsRef<PixelBuffer>>(&mut self, mask: &I) -> Result<()> {
        let masked = self.masked_by_image(mask)?;
        self.assign_surface(masked)
    }

    /// Copy with everything outside `path` made fully transparent. The
    /// surface keeps its size; see [`RasterSurface::cropped_to_path`] for the
    /// cropping variant.
    pub fn masked_by_path(&self, path: &Path) -> RasterSurface {
        let mut copy = self.clone();
        copy.mask_by_path(path);
        copy
    }

    pub fn mask_by_path(&mut self, path: &Path) {
        self.retain_path(path, FillingRule::NonZero);
    }
}
