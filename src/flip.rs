//! Mirroring.

use crate::pixel_buffer::BPP;
use crate::surface::RasterSurface;

/// Which axis to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipType {
    /// Mirror left to right.
    Horizontally,
    /// Mirror top to bottom.
    Vertically,
    Both,
}

impl FlipType {
    fn mirrors_x(self) -> bool {
        matches!(self, FlipType::Horizontally | FlipType::Both)
    }

    fn mirrors_y(self) -> bool {
        matches!(self, FlipType::Vertically | FlipType::Both)
    }
}

impl RasterSurface {
    /// Mirror in place by reversing pixel rows and/or row order.
    pub fn flip(&mut self, flip: FlipType) {
        let stride = self.width() * BPP;
        let bytes = self.buffer_mut().as_bytes_mut();
        if flip.mirrors_x() {
            for row in bytes.chunks_exact_mut(stride) {
                let half = row.len() / BPP / 2;
                for i in 0..half {
                    let j = row.len() / BPP - 1 - i;
                    let (left, right) = row.split_at_mut(j * BPP);
                    left[i * BPP..(i + 1) * BPP].swap_with_slice(&mut right[..BPP]);
                }
            }
        }
        if flip.mirrors_y() {
            let rows = bytes.len() / stride;
            for i in 0..rows / 2 {
                let (top, bottom) = bytes.split_at_mut((rows - 1 - i) * stride);
                top[i * stride..(i + 1) * stride].swap_with_slice(&mut bottom[..stride]);
            }
        }
    }

    pub fn flipped(&self, flip: FlipType) -> RasterSurface {
        let mut copy = self.clone();
        copy.flip(flip);
        copy
    }
}
