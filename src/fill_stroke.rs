//! Fill, stroke and border helpers.

use crate::basics::{FillingRule, Rect, Size};
use crate::color::Rgba;
use crate::error::Result;
use crate::path_storage::Path;
use crate::stroke::StrokeStyle;
use crate::surface::RasterSurface;

impl RasterSurface {
    /// Paint the whole surface with `color`, blended over the existing
    /// content.
    pub fn fill(&mut self, color: Rgba) {
        let bounds = self.bounds();
        self.draw(|ctx| {
            ctx.set_fill_color(color);
            ctx.fill_rect(bounds);
        });
    }

    pub fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.draw(|ctx| {
            ctx.set_fill_color(color);
            ctx.fill_path(path, FillingRule::NonZero);
        });
    }

    pub fn stroke_path(&mut self, path: &Path, stroke: &StrokeStyle) {
        self.draw(|ctx| {
            ctx.set_stroke_style(stroke);
            ctx.stroke_path(path);
        });
    }

    /// Fill then stroke `path`.
    pub fn fill_stroke(&mut self, path: &Path, fill: Rgba, stroke: &StrokeStyle) {
        self.draw(|ctx| {
            ctx.set_fill_color(fill);
            ctx.fill_path(path, FillingRule::NonZero);
            ctx.set_stroke_style(stroke);
            ctx.stroke_path(path);
        });
    }

    /// Fill and/or stroke each of `rects`.
    pub fn draw_rects(&mut self, rects: &[Rect], fill: Option<Rgba>, stroke: Option<&StrokeStyle>) {
        self.draw(|ctx| {
            for rect in rects {
                if let Some(color) = fill {
                    ctx.set_fill_color(color);
                    ctx.fill_rect(*rect);
                }
                if let Some(style) = stroke {
                    ctx.set_stroke_style(style);
                    ctx.stroke_rect(*rect);
                }
            }
        });
    }

    pub fn draw_rect(&mut self, rect: Rect, fill: Option<Rgba>, stroke: Option<&StrokeStyle>) {
        self.draw_rects(&[rect], fill, stroke);
    }

    /// Stroke just inside the surface edge.
    pub fn draw_border(&mut self, stroke: &StrokeStyle) {
        let half = stroke.line_width / 2.0;
        let rect = self.bounds().inset_by(half, half);
        self.stroke_path(&Path::rect(rect), stroke);
    }

    /// Copy with a border. With `expanding`, the canvas first grows by the
    /// line width on every side so the border does not cover content.
    pub fn bordered(&self, stroke: &StrokeStyle, expanding: bool) -> Result<RasterSurface> {
        let mut copy = if expanding {
            let grow = stroke.line_width * 2.0;
            self.resized_canvas(Size::new(
                self.width() as f64 + grow,
                self.height() as f64 + grow,
            ))?
        } else {
            self.clone()
        };
        copy.draw_border(stroke);
        Ok(copy)
    }
}
