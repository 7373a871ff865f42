//! Rotation around the image center.

use log::trace;

use crate::angle::Angle;
use crate::basics::{pixel_extent, Rect};
use crate::error::Result;
use crate::surface::RasterSurface;
use crate::trans_affine::TransAffine;

impl RasterSurface {
    /// The image rotated clockwise by `angle` in a surface just large
    /// enough to hold it.
    pub fn rotated(&self, angle: Angle) -> Result<RasterSurface> {
        let (w, h) = (self.width() as f64, self.height() as f64);
        let turned = self.bounds().applying(&TransAffine::new_rotation(angle.as_radians()));
        let mut result =
            RasterSurface::new(pixel_extent(turned.width()), pixel_extent(turned.height()))?;
        trace!(
            "rotate {}x{} by {} deg -> {}x{}",
            self.width(),
            self.height(),
            angle.as_degrees(),
            result.width(),
            result.height()
        );
        let image = self.snapshot();
        let (cx, cy) = (result.width() as f64 * 0.5, result.height() as f64 * 0.5);
        result.draw(|ctx| {
            ctx.translate_by(cx, cy);
            // y is up, so a clockwise turn is a negative rotation.
            ctx.rotate_by(-angle);
            ctx.draw_image(&image, Rect::new(-w * 0.5, -h * 0.5, w, h));
        });
        Ok(result)
    }

    pub fn rotate(&mut self, angle: Angle) -> Result<()> {
        let rotated = self.rotated(angle)?;
        self.assign_surface(rotated)
    }
}
