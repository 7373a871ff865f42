//! Box blur for RGBA32 buffers.
//!
//! A box blur replaces every pixel by the mean of the `k x k` square around
//! it. The sum is separable: rows are summed first into a 32-bit
//! accumulator, then columns of those sums, and the 2D mean is rounded once
//! at the end. Channels are blurred independently, so premultiplied input
//! stays premultiplied.

use crate::rendering_buffer::RowAccessor;

/// What to do where the kernel extends past the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurEdge {
    /// Pixels whose kernel would leave the image keep their value.
    #[default]
    CopyInPlace,
    /// Samples outside the image count as transparent black.
    Transparent,
}

/// Odd kernel size approximating a Gaussian of the given radius with one
/// box pass.
pub fn kernel_size(radius: f64) -> u32 {
    if radius.is_nan() || radius <= 0.0 || radius.is_infinite() {
        return 1;
    }
    let sigma_scale = 3.0 * (2.0 * std::f64::consts::PI).sqrt() / 4.0;
    (((radius * sigma_scale + 0.5) / 2.0).floor() as u32) | 1
}

/// Sum `k` consecutive values of `src` (stride `step`, `n` items, 4
/// channels) centered on each item. Missing neighbours count as zero.
fn window_sums(src: &[u32], n: usize, step: usize, k: usize, dst: &mut [u32]) {
    let r = k / 2;
    for ch in 0..4 {
        let at = |i: usize| src[i * step + ch];
        let mut acc: u32 = (0..=r.min(n - 1)).map(at).sum();
        for i in 0..n {
            dst[i * step + ch] = acc;
            if i + r + 1 < n {
                acc += at(i + r + 1);
            }
            if i >= r {
                acc -= at(i - r);
            }
        }
    }
}

/// Blur `rbuf` in place with a `kernel x kernel` box. Even kernels are
/// bumped to the next odd size.
pub fn box_blur_rgba32(rbuf: &mut RowAccessor, kernel: u32, edge: BlurEdge) {
    let k = (kernel | 1) as usize;
    let w = rbuf.width() as usize;
    let h = rbuf.height() as usize;
    if k <= 1 || w == 0 || h == 0 {
        return;
    }
    let r = k / 2;
    if edge == BlurEdge::CopyInPlace && (w <= 2 * r || h <= 2 * r) {
        return;
    }

    let row_len = w * 4;
    let mut values = vec![0u32; w * h * 4];
    for y in 0..h {
        for (dst, &src) in values[y * row_len..(y + 1) * row_len]
            .iter_mut()
            .zip(rbuf.row(y as u32))
        {
            *dst = src as u32;
        }
    }

    let mut rows = vec![0u32; w * h * 4];
    for y in 0..h {
        let span = y * row_len..(y + 1) * row_len;
        window_sums(&values[span.clone()], w, 4, k, &mut rows[span]);
    }
    // Columns are strided sequences of the row sums.
    for x in 0..w {
        let off = x * 4;
        window_sums(&rows[off..], h, row_len, k, &mut values[off..]);
    }

    let area = (k * k) as u32;
    let (x_range, y_range) = match edge {
        BlurEdge::CopyInPlace => (r..w - r, r..h - r),
        BlurEdge::Transparent => (0..w, 0..h),
    };
    for y in y_range {
        let row = rbuf.row_mut(y as u32);
        for x in x_range.clone() {
            for ch in 0..4 {
                let sum = values[y * row_len + x * 4 + ch];
                row[x * 4 + ch] = ((sum + area / 2) / area) as u8;
            }
        }
    }
}
