//! Error type shared by every fallible bitmap operation.

use thiserror::Error;

/// Errors surfaced by pixel buffers, raster surfaces and their operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BitmapError {
    /// A pixel coordinate (or a row/column/scroll count) lies outside the buffer.
    #[error("coordinate ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// The drawing surface could not be created for these dimensions.
    #[error("unable to create a drawing context of {width}x{height}")]
    InvalidContext { width: usize, height: usize },

    /// An image could not be produced (e.g. a crop rect outside the image).
    #[error("unable to create image")]
    CannotCreateImage,

    /// A byte array length does not match `width * height * 4`.
    #[error("rgba data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Padding or inset values must be zero or positive.
    #[error("padding or inset values must be non-negative")]
    InvalidInset,

    /// A color filter failed or was given unusable parameters.
    #[error("unable to apply filter")]
    CannotFilter,

    /// A color could not be normalized into the working color space.
    #[error("unable to convert color into the working color space")]
    CannotConvertColorSpace,

    /// The operation is not available in this build configuration.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Encoded data could not be converted (malformed PPM and similar).
    #[error("unable to convert data: {0}")]
    CannotConvert(String),

    /// Font data could not be parsed.
    #[error("unable to load font: {0}")]
    CannotLoadFont(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BitmapError>;
