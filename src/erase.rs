//! Erasing, extracting and punching holes.

use crate::basics::{FillingRule, Rect};
use crate::color::Rgba;
use crate::error::{BitmapError, Result};
use crate::path_storage::Path;
use crate::surface::RasterSurface;
use crate::trans_affine::TransAffine;

impl RasterSurface {
    /// Clear the inside of `path`, then optionally fill it with
    /// `background`.
    pub fn erase(&mut self, path: &Path, background: Option<Rgba>) {
        let image = self.snapshot();
        let bounds = self.bounds();
        let mut outside = Path::rect(bounds);
        outside.add_path(path, &TransAffine::new());
        self.erase_all();
        self.draw(|ctx| {
            ctx.clip_to_path(&outside, FillingRule::EvenOdd);
            ctx.draw_image(&image, bounds);
        });
        if let Some(bg) = background {
            self.fill_path(path, bg);
        }
    }

    pub fn erasing(&self, path: &Path, background: Option<Rgba>) -> RasterSurface {
        let mut copy = self.clone();
        copy.erase(path, background);
        copy
    }

    pub fn erase_rect(&mut self, rect: Rect, background: Option<Rgba>) {
        self.erase(&Path::rect(rect), background);
    }

    /// Make the inside of `path` fully transparent.
    pub fn punch_transparent_hole(&mut self, path: &Path) {
        self.erase(path, None);
    }

    pub fn punching_transparent_hole(&self, path: &Path) -> RasterSurface {
        self.erasing(path, None)
    }

    /// Keep only the inside of `path`. With `clip_to_path` the result is
    /// also cropped to the path's bounding box.
    pub fn extracted(&self, path: &Path, clip_to_path: bool) -> Result<RasterSurface> {
        let mut result = self.masked_by_path(path);
        if clip_to_path {
            let bbox = path.bounding_box().ok_or(BitmapError::CannotCreateImage)?;
            result.crop(bbox)?;
        }
        Ok(result)
    }

    pub fn extract(&mut self, path: &Path, clip_to_path: bool) -> Result<()> {
        let extracted = self.extracted(path, clip_to_path)?;
        self.assign_surface(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_rect_with_background() {
        let mut s = RasterSurface::with_background(4, 4, Rgba::RED).unwrap();
        s.erase_rect(Rect::new(1.0, 1.0, 2.0, 2.0), None);
        assert_eq!(s.pixel(1, 1).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(2, 2).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(0, 0).unwrap(), Rgba::RED);
        assert_eq!(s.pixel(3, 1).unwrap(), Rgba::RED);

        let t = s.erasing(&Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0)), Some(Rgba::BLUE));
        assert_eq!(t.pixel(0, 0).unwrap(), Rgba::BLUE);
        assert_eq!(t.pixel(1, 1).unwrap(), Rgba::CLEAR);
    }

    #[test]
    fn test_punch_hole() {
        let s = RasterSurface::with_background(3, 3, Rgba::GREEN).unwrap();
        let p = s.punching_transparent_hole(&Path::rect(Rect::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(p.pixel(1, 1).unwrap(), Rgba::CLEAR);
        assert_eq!(p.coordinates_matching(Rgba::GREEN).len(), 8);
    }

    #[test]
    fn test_extract() {
        let mut s = RasterSurface::with_background(6, 6, Rgba::GREEN).unwrap();
        s.set_pixel(2, 3, Rgba::RED).unwrap();
        let path = Path::rect(Rect::new(2.0, 2.0, 3.0, 2.0));

        let same = s.extracted(&path, false).unwrap();
        assert_eq!((same.width(), same.height()), (6, 6));
        assert_eq!(same.pixel(0, 0).unwrap(), Rgba::CLEAR);
        assert_eq!(same.pixel(2, 3).unwrap(), Rgba::RED);

        s.extract(&path, true).unwrap();
        assert_eq!((s.width(), s.height()), (3, 2));
        assert_eq!(s.pixel(0, 1).unwrap(), Rgba::RED);
        assert_eq!(s.pixel(2, 0).unwrap(), Rgba::GREEN);
    }
}
