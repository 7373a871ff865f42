//! # bitmap-raster
//!
//! In-memory RGBA raster surfaces with an anti-aliased drawing context.
//!
//! A [`RasterSurface`] owns a tightly packed, premultiplied RGBA8
//! [`PixelBuffer`] and exposes it two ways:
//!
//! - random pixel access in **public coordinates**, origin at the
//!   bottom-left, y growing upward;
//! - an immediate-mode [`DrawContext`] (paths, images, clips, blend modes,
//!   shadows) handed out by [`RasterSurface::draw`], whose default user space
//!   is the same public coordinate system.
//!
//! Rows are stored top row first, so pixel `(x, y)` lives at byte offset
//! `(height - 1 - y) * width * 4 + x * 4`.
//!
//! Geometric operations (crop, pad, scale, rotate, flip, scroll) and
//! compositing operations (blend, mask, tint, color adjustments, blur,
//! erase) come in two forms: a mutating verb (`crop`) and a copy-returning
//! participle (`cropped`).

// Foundation
pub mod angle;
pub mod basics;
pub mod color;
pub mod error;
pub mod pixel;
pub mod pixel_buffer;
pub mod trans_affine;

// Geometry and rasterization
pub mod path_storage;
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;
pub mod stroke;

// Pixel access and compositing
pub mod alpha_mask;
pub mod blur;
pub mod comp_op;
pub mod image_filter;
pub mod renderer_base;
pub mod rendering_buffer;
pub mod shadow;

// Drawing surface
pub mod context;
pub mod surface;

// Geometric operations
pub mod crop;
pub mod flip;
pub mod padding;
pub mod rotate;
pub mod scale;
pub mod scroll;

// Compositing and color operations
pub mod blending;
pub mod checkerboard;
pub mod color_adjust;
pub mod effects;
pub mod erase;
pub mod fill_stroke;
pub mod masking;
pub mod tint;

// Codecs and text
pub mod ppm;
#[cfg(feature = "font")]
pub mod text;

pub use angle::Angle;
pub use basics::{FillingRule, Insets, Point, Rect, Size};
pub use checkerboard::Checkerboard;
pub use color::Rgba;
pub use comp_op::BlendMode;
pub use context::DrawContext;
pub use error::{BitmapError, Result};
pub use flip::FlipType;
pub use path_storage::Path;
pub use pixel::{Coordinate, Pixel};
pub use pixel_buffer::PixelBuffer;
pub use ppm::{ExportFormat, ExportOptions, ImageCodec, PpmCodec};
pub use scale::ScalingPolicy;
pub use scroll::ScrollDirection;
pub use shadow::Shadow;
pub use stroke::StrokeStyle;
pub use surface::{Image, RasterSurface, MAX_DIMENSION};
#[cfg(feature = "font")]
pub use text::Font;
