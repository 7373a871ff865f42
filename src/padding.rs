//! Padding, insetting and canvas resizing.

use log::trace;

use crate::basics::{pixel_extent, Insets, Point, Rect, Size};
use crate::color::Rgba;
use crate::error::{BitmapError, Result};
use crate::surface::RasterSurface;

impl RasterSurface {
    /// A larger surface with `insets` of border around this image. The
    /// border is `background`, or transparent.
    pub fn padded(&self, insets: Insets, background: Option<Rgba>) -> Result<RasterSurface> {
        if !insets.is_non_negative() {
            return Err(BitmapError::InvalidInset);
        }
        let w = pixel_extent(self.width() as f64 + insets.left + insets.right);
        let h = pixel_extent(self.height() as f64 + insets.top + insets.bottom);
        trace!("pad {}x{} -> {}x{}", self.width(), self.height(), w, h);

        let mut result = RasterSurface::new(w, h)?;
        if let Some(bg) = background {
            result.fill(bg);
        }
        let image = self.snapshot();
        let dest = Rect::from_origin_size(Point::new(insets.left, insets.bottom), self.size());
        result.draw(|ctx| ctx.draw_image(&image, dest));
        Ok(result)
    }

    pub fn pad(&mut self, insets: Insets, background: Option<Rgba>) -> Result<()> {
        let padded = self.padded(insets, background)?;
        self.assign_surface(padded)
    }

    /// Same-sized surface with this image squeezed into the interior left
    /// after removing `insets`. The freed border is `background`, or
    /// transparent.
    pub fn inset(&self, insets: Insets, background: Option<Rgba>) -> Result<RasterSurface> {
        if !insets.is_non_negative() {
            return Err(BitmapError::InvalidInset);
        }
        let mut result = RasterSurface::new(self.width(), self.height())?;
        if let Some(bg) = background {
            result.fill(bg);
        }
        let interior = Rect::new(
            insets.left,
            insets.bottom,
            self.width() as f64 - insets.left - insets.right,
            self.height() as f64 - insets.top - insets.bottom,
        );
        trace!("inset into {:?}", interior);
        if interior.width() > 0.0 && interior.height() > 0.0 {
            let image = self.snapshot();
            result.draw(|ctx| ctx.draw_image(&image, interior));
        }
        Ok(result)
    }

    pub fn apply_inset(&mut self, insets: Insets, background: Option<Rgba>) -> Result<()> {
        let inset = self.inset(insets, background)?;
        self.assign(inset.into_buffer())
    }

    /// A surface of `size` with this image centered in it. Content that
    /// does not fit is clipped; extra space is transparent.
    pub fn resized_canvas(&self, size: Size) -> Result<RasterSurface> {
        let mut result = RasterSurface::from_size(size)?;
        // Whole-pixel offsets keep the content unresampled.
        let dx = (result.width() as i64 - self.width() as i64).div_euclid(2);
        let dy = (result.height() as i64 - self.height() as i64).div_euclid(2);
        trace!("resize canvas to {:?}, content offset ({}, {})", result.size(), dx, dy);
        let image = self.snapshot();
        result.draw_image_at(&image, Point::new(dx as f64, dy as f64));
        Ok(result)
    }

    pub fn resize_canvas(&mut self, size: Size) -> Result<()> {
        let resized = self.resized_canvas(size)?;
        self.assign_surface(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_size_and_placement() {
        let s = RasterSurface::with_background(2, 3, Rgba::RED).unwrap();
        let p = s.padded(Insets::new(1.0, 2.0, 3.0, 4.0), None).unwrap();
        assert_eq!((p.width(), p.height()), (8, 7));
        assert_eq!(p.pixel(2, 3).unwrap(), Rgba::RED);
        assert_eq!(p.pixel(3, 5).unwrap(), Rgba::RED);
        assert_eq!(p.pixel(1, 3).unwrap(), Rgba::CLEAR);
        assert_eq!(p.pixel(2, 2).unwrap(), Rgba::CLEAR);
        assert_eq!(p.pixel(2, 6).unwrap(), Rgba::CLEAR);
    }

    #[test]
    fn test_padded_background() {
        let s = RasterSurface::with_background(1, 1, Rgba::RED).unwrap();
        let p = s.padded(Insets::uniform(1.0), Some(Rgba::BLUE)).unwrap();
        assert_eq!(p.pixel(0, 0).unwrap(), Rgba::BLUE);
        assert_eq!(p.pixel(1, 1).unwrap(), Rgba::RED);
    }

    #[test]
    fn test_negative_insets_rejected_without_change() {
        let mut s = RasterSurface::with_background(2, 2, Rgba::RED).unwrap();
        let before = s.clone();
        assert_eq!(
            s.pad(Insets::new(0.0, -1.0, 0.0, 0.0), None),
            Err(BitmapError::InvalidInset)
        );
        assert_eq!(s.inset(Insets::uniform(-2.0), None), Err(BitmapError::InvalidInset));
        assert_eq!(s, before);
    }

    #[test]
    fn test_inset_keeps_size() {
        let s = RasterSurface::with_background(6, 6, Rgba::RED).unwrap();
        let i = s.inset(Insets::uniform(2.0), Some(Rgba::GREEN)).unwrap();
        assert_eq!((i.width(), i.height()), (6, 6));
        assert_eq!(i.pixel(0, 0).unwrap(), Rgba::GREEN);
        assert_eq!(i.pixel(5, 5).unwrap(), Rgba::GREEN);
        assert_eq!(i.pixel(2, 2).unwrap(), Rgba::RED);
        assert_eq!(i.pixel(3, 3).unwrap(), Rgba::RED);
    }

    #[test]
    fn test_resized_canvas_centers() {
        let mut s = RasterSurface::new(2, 2).unwrap();
        s.set_pixel(0, 0, Rgba::RED).unwrap();
        let big = s.resized_canvas(Size::new(6.0, 4.0)).unwrap();
        assert_eq!(big.pixel(2, 1).unwrap(), Rgba::RED);
        assert_eq!(big.coordinates_matching(Rgba::RED).len(), 1);

        let small = big.resized_canvas(Size::new(2.0, 2.0)).unwrap();
        assert_eq!(small, s);
    }

    #[test]
    fn test_resize_canvas_odd_difference_floors() {
        let mut s = RasterSurface::new(3, 3).unwrap();
        s.set_pixel(0, 0, Rgba::RED).unwrap();
        s.resize_canvas(Size::new(2.0, 2.0)).unwrap();
        // Offset is floor(-1 / 2) = -1, so the red corner is clipped away.
        assert!(s.coordinates_matching(Rgba::RED).is_empty());
    }
}
