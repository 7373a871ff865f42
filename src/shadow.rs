//! Drop shadow descriptor and shadow layer processing.

use crate::basics::Size;
use crate::blur::{box_blur_rgba32, kernel_size, BlurEdge};
use crate::color::Rgba;
use crate::rendering_buffer::RowAccessor;

/// A drop shadow: offset in pixels (y up), blur radius and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: Size,
    pub blur: f64,
    pub color: Rgba,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: Size::new(3.0, -3.0),
            blur: 5.0,
            color: Rgba::BLACK,
        }
    }
}

impl Shadow {
    pub fn new(offset: Size, blur: f64, color: Rgba) -> Self {
        Self {
            offset,
            blur,
            color,
        }
    }

    /// Whole-pixel offset applied when compositing the shadow layer.
    pub(crate) fn pixel_offset(&self) -> (i32, i32) {
        (
            crate::basics::iround(self.offset.width),
            crate::basics::iround(self.offset.height),
        )
    }

    /// Turn a layer holding the shape's coverage into the shadow itself:
    /// blur it, then replace every pixel by the shadow color scaled by the
    /// blurred alpha.
    pub(crate) fn cast(&self, layer: &mut RowAccessor) {
        box_blur_rgba32(layer, kernel_size(self.blur), BlurEdge::Transparent);
        let color = self.color.premultiplied();
        for y in 0..layer.height() {
            for px in layer.row_mut(y).chunks_exact_mut(4) {
                let a = px[3];
                Rgba::new(
                    Rgba::multiply(color.r, a),
                    Rgba::multiply(color.g, a),
                    Rgba::multiply(color.b, a),
                    Rgba::multiply(color.a, a),
                )
                .write_to(px);
            }
        }
    }
}
