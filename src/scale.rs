//! Scaling policies and image resizing.

use log::trace;

use crate::basics::{pixel_extent, Rect, Size};
use crate::error::{BitmapError, Result};
use crate::pixel_buffer::{PixelBuffer, BPP};
use crate::surface::{RasterSurface, MAX_DIMENSION};

/// How an image is fitted into a destination rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingPolicy {
    /// Stretch each axis to the destination independently.
    #[default]
    AxesIndependent,
    /// Uniform scale so the whole image fits, centered.
    AspectFit,
    /// Uniform scale so the destination is fully covered, centered. The
    /// overflow is expected to be clipped by the caller.
    AspectFill,
}

impl ScalingPolicy {
    /// Rect the image occupies when drawn into `target`.
    pub fn placement(&self, image: Size, target: Rect) -> Rect {
        if image.width <= 0.0 || image.height <= 0.0 {
            return target;
        }
        let wr = target.width() / image.width;
        let hr = target.height() / image.height;
        let scale = match self {
            ScalingPolicy::AxesIndependent => return target,
            ScalingPolicy::AspectFit => wr.min(hr),
            ScalingPolicy::AspectFill => wr.max(hr),
        };
        let w = image.width * scale;
        let h = image.height * scale;
        Rect::new(
            target.min_x() + (target.width() - w) / 2.0,
            target.min_y() + (target.height() - h) / 2.0,
            w,
            h,
        )
    }
}

impl RasterSurface {
    /// A new surface of `size` holding this image scaled per `policy`.
    pub fn scaled(&self, size: Size, policy: ScalingPolicy) -> Result<RasterSurface> {
        let mut result = RasterSurface::new(pixel_extent(size.width), pixel_extent(size.height))?;
        trace!("scale {:?} -> {:?} ({:?})", self.size(), result.size(), policy);
        let image = self.snapshot();
        let target = result.bounds();
        result.draw_image(&image, target, policy);
        Ok(result)
    }

    /// Scale in place. On error the surface is unchanged.
    pub fn scale(&mut self, size: Size, policy: ScalingPolicy) -> Result<()> {
        let scaled = self.scaled(size, policy)?;
        self.assign_surface(scaled)
    }

    /// Blocky upscale: every pixel becomes a `multiplier x multiplier`
    /// square, with no interpolation.
    pub fn scaled_by_multiplier(&self, multiplier: usize) -> Result<RasterSurface> {
        let (w, h) = (self.width(), self.height());
        let (dw, dh) = match (w.checked_mul(multiplier), h.checked_mul(multiplier)) {
            (Some(dw), Some(dh)) if dw <= MAX_DIMENSION && dh <= MAX_DIMENSION => (dw, dh),
            _ => {
                return Err(BitmapError::InvalidContext {
                    width: w.saturating_mul(multiplier),
                    height: h.saturating_mul(multiplier),
                })
            }
        };
        let mut dest = PixelBuffer::new(dw, dh)?;
        trace!("scale by multiplier {} -> {}x{}", multiplier, dest.width(), dest.height());
        let src = self.rgba_bytes();
        let dest_stride = dest.stride();
        for (row, line) in dest.as_bytes_mut().chunks_exact_mut(dest_stride).enumerate() {
            let src_row = &src[(row / multiplier) * w * BPP..][..w * BPP];
            for (x, px) in line.chunks_exact_mut(BPP).enumerate() {
                let sx = x / multiplier * BPP;
                px.copy_from_slice(&src_row[sx..sx + BPP]);
            }
        }
        RasterSurface::from_buffer(dest)
    }

    pub fn scale_by_multiplier(&mut self, multiplier: usize) -> Result<()> {
        let scaled = self.scaled_by_multiplier(multiplier)?;
        self.assign_surface(scaled)
    }
}
