//! Image codec boundary and the PPM (P3/P6) formats.
//!
//! PPM stores RGB rows top to bottom, which is the memory order of a
//! [`PixelBuffer`], so pixel data is copied without reordering. Alpha is
//! dropped on export and every imported pixel is opaque.

use std::fmt::Write as _;

use log::trace;

use crate::error::{BitmapError, Result};
use crate::pixel_buffer::{PixelBuffer, BPP};
use crate::surface::{RasterSurface, MAX_DIMENSION};

/// Encoded image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Tiff,
    Heic,
    /// ASCII PPM.
    P3,
    /// Binary PPM.
    P6,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Tiff => "tiff",
            ExportFormat::Heic => "heic",
            ExportFormat::P3 => "p3",
            ExportFormat::P6 => "p6",
        }
    }
}

/// Encoder settings. Formats ignore the fields they have no use for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub scale: f64,
    pub dpi: Option<f64>,
    /// 0 (smallest) to 1 (best quality) for lossy formats.
    pub compression: Option<f64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            dpi: None,
            compression: None,
        }
    }
}

/// Converts between encoded bytes and pixel buffers.
pub trait ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
    fn encode(&self, buffer: &PixelBuffer, format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>>;
}

/// Reads P3 and P6, writes P3 and P6. Other formats are `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmCodec;

impl ImageCodec for PpmCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        decode_ppm(bytes)
    }

    fn encode(&self, buffer: &PixelBuffer, format: ExportFormat, _options: &ExportOptions) -> Result<Vec<u8>> {
        match format {
            ExportFormat::P3 => Ok(encode_p3(buffer)),
            ExportFormat::P6 => Ok(encode_p6(buffer)),
            other => Err(BitmapError::Unsupported(other.name())),
        }
    }
}

pub fn encode_p3(buffer: &PixelBuffer) -> Vec<u8> {
    let mut out = format!("P3\r\n{} {}\r\n255\r\n", buffer.width(), buffer.height());
    for px in buffer.as_bytes().chunks_exact(BPP) {
        // Writing to a String can not fail.
        let _ = write!(out, "{} {} {}\r\n", px[0], px[1], px[2]);
    }
    out.into_bytes()
}

pub fn encode_p6(buffer: &PixelBuffer) -> Vec<u8> {
    let mut out = format!("P6\n{} {}\n255\n", buffer.width(), buffer.height()).into_bytes();
    out.reserve(buffer.width() * buffer.height() * 3);
    for px in buffer.as_bytes().chunks_exact(BPP) {
        out.extend_from_slice(&px[..3]);
    }
    out
}

/// Header tokenizer: whitespace separated, `#` starts a comment that runs
/// to the end of the line.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip_space(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_space();
        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.data[start..self.pos])
    }

    fn next_number(&mut self, what: &str) -> Result<usize> {
        let token = self
            .next_token()
            .ok_or_else(|| BitmapError::CannotConvert(format!("missing {what}")))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| BitmapError::CannotConvert(format!("bad {what}")))
    }
}

/// Parse a P3 or P6 file into an opaque buffer.
pub fn decode_ppm(bytes: &[u8]) -> Result<PixelBuffer> {
    let mut tokens = Tokens::new(bytes);
    let magic = tokens
        .next_token()
        .ok_or_else(|| BitmapError::CannotConvert("empty data".into()))?;
    let binary = match magic {
        b"P3" => false,
        b"P6" => true,
        _ => return Err(BitmapError::CannotConvert("not a P3 or P6 file".into())),
    };
    let width = tokens.next_number("width")?;
    let height = tokens.next_number("height")?;
    let maxval = tokens.next_number("maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(BitmapError::CannotConvert(format!("unsupported maxval {maxval}")));
    }
    trace!("decode {} {}x{} maxval {}", if binary { "P6" } else { "P3" }, width, height, maxval);

    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(BitmapError::InvalidContext { width, height });
    }
    let sample_count = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(BitmapError::InvalidContext { width, height })?;

    let samples: Vec<u8> = if binary {
        // Exactly one whitespace byte separates the header from the data.
        let start = tokens.pos + 1;
        bytes
            .get(start..)
            .and_then(|rest| rest.get(..sample_count))
            .ok_or_else(|| BitmapError::CannotConvert("truncated pixel data".into()))?
            .to_vec()
    } else {
        // Not reserved from the header; it may overstate the data.
        let mut samples = Vec::new();
        for _ in 0..sample_count {
            let v = tokens.next_number("sample")?;
            if v > maxval {
                return Err(BitmapError::CannotConvert(format!("sample {v} above maxval")));
            }
            samples.push(v as u8);
        }
        samples
    };

    let mut rgba = Vec::with_capacity(samples.len() / 3 * BPP);
    for rgb in samples.chunks_exact(3) {
        for &v in rgb {
            rgba.push(if maxval == 255 { v } else { (v as usize * 255 / maxval) as u8 });
        }
        rgba.push(255);
    }
    PixelBuffer::from_bytes(width, height, rgba)
}

impl RasterSurface {
    pub fn from_encoded<C: ImageCodec>(codec: &C, bytes: &[u8]) -> Result<RasterSurface> {
        RasterSurface::from_buffer(codec.decode(bytes)?)
    }

    pub fn encoded<C: ImageCodec>(&self, codec: &C, format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>> {
        codec.encode(self.buffer(), format, options)
    }

    pub fn from_ppm(bytes: &[u8]) -> Result<RasterSurface> {
        RasterSurface::from_buffer(decode_ppm(bytes)?)
    }

    pub fn p3(&self) -> Vec<u8> {
        encode_p3(self.buffer())
    }

    pub fn p6(&self) -> Vec<u8> {
        encode_p6(self.buffer())
    }
}
