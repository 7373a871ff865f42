//! Tinting.

use log::trace;

use crate::basics::Rect;
use crate::color::Rgba;
use crate::color_adjust::luma;
use crate::comp_op::BlendMode;
use crate::error::{BitmapError, Result};
use crate::surface::RasterSurface;

impl RasterSurface {
    /// Copy with the hue and saturation of `color` and the luminosity of
    /// this image. With `keeping_alpha` the original alpha is restored,
    /// otherwise the result is opaque.
    pub fn tinted(&self, color: Rgba, keeping_alpha: bool) -> Result<RasterSurface> {
        let image = self.snapshot();
        let bounds = self.bounds();
        RasterSurface::with_setup(self.width(), self.height(), |ctx| {
            // Black under the image gives transparent pixels a defined color.
            ctx.set_fill_color(Rgba::BLACK);
            ctx.fill_rect(bounds);
            ctx.draw_image(&image, bounds);
            ctx.set_blend_mode(BlendMode::Color);
            ctx.set_fill_color(color);
            ctx.fill_rect(bounds);
            if keeping_alpha {
                ctx.set_blend_mode(BlendMode::DestinationIn);
                ctx.draw_image(&image, bounds);
            }
        })
    }

    pub fn tint(&mut self, color: Rgba, keeping_alpha: bool) -> Result<()> {
        let tinted = self.tinted(color, keeping_alpha)?;
        self.assign_surface(tinted)
    }

    /// Tint only the pixels inside `rect` (public coordinates).
    pub fn tint_in_rect(&mut self, color: Rgba, rect: Rect, keeping_alpha: bool) -> Result<()> {
        let area = rect
            .integral()
            .intersection(&self.bounds())
            .ok_or(BitmapError::CannotCreateImage)?;
        trace!("tint {:?} in {:?}", color, area);
        let tinted = self.cropped(area)?.tinted(color, keeping_alpha)?.snapshot();
        self.draw(|ctx| {
            ctx.clip_to_rect(area);
            ctx.set_blend_mode(BlendMode::Copy);
            ctx.draw_image(&tinted, area);
        });
        Ok(())
    }

    pub fn tinting_in_rect(&self, color: Rgba, rect: Rect, keeping_alpha: bool) -> Result<RasterSurface> {
        let mut copy = self.clone();
        copy.tint_in_rect(color, rect, keeping_alpha)?;
        Ok(copy)
    }

    /// Monochrome tint: each pixel's luminance times `color`, mixed with
    /// the original by `intensity` (0 = unchanged, 1 = full tint). Alpha is
    /// kept.
    pub fn tint_intensity(&mut self, color: Rgba, intensity: f64) {
        let tint = color.demultiplied();
        let tint = [tint.rf(), tint.gf(), tint.bf()];
        let k = intensity.clamp(0.0, 1.0);
        self.map_straight_rgb(|c| {
            let l = luma(c);
            [
                c[0] + (l * tint[0] - c[0]) * k,
                c[1] + (l * tint[1] - c[1]) * k,
                c[2] + (l * tint[2] - c[2]) * k,
            ]
        });
    }

    pub fn tinting_intensity(&self, color: Rgba, intensity: f64) -> RasterSurface {
        let mut copy = self.clone();
        copy.tint_intensity(color, intensity);
        copy
    }
}
