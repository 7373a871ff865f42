//! Immediate-mode drawing context.
//!
//! A [`DrawContext`] is attached to the bytes of a raster surface for the
//! duration of one draw block. User space starts out identical to the pixel
//! grid: origin at the bottom-left corner, `y` up, one unit per pixel. The
//! graphics state (transform, clip, blend mode, alpha, colors, stroke,
//! shadow, interpolation) can be saved and restored; anything left on the
//! state stack when the block ends is discarded with the context.

use std::rc::Rc;

use log::{trace, warn};

use crate::alpha_mask::ClipMask;
use crate::angle::Angle;
use crate::basics::{FillingRule, Point, Rect, COVER_FULL};
use crate::color::{pixels_from_bytes, Rgba};
use crate::comp_op::BlendMode;
use crate::image_filter::{ImageSampler, Interpolation};
use crate::path_storage::{Contour, Path};
use crate::pixel_buffer::PixelBuffer;
use crate::rasterizer_scanline_aa::PathRasterizer;
use crate::renderer_base::RendererBase;
use crate::rendering_buffer::RowAccessor;
use crate::scale::ScalingPolicy;
use crate::shadow::Shadow;
use crate::stroke::{stroke_polygons, DashPattern, LineCap, LineJoin, StrokeStyle};
use crate::trans_affine::TransAffine;

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: TransAffine,
    clip: Option<Rc<ClipMask>>,
    blend_mode: BlendMode,
    alpha: f64,
    fill_color: Rgba,
    stroke: StrokeStyle,
    shadow: Option<Shadow>,
    interpolation: Interpolation,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: TransAffine::new(),
            clip: None,
            blend_mode: BlendMode::Normal,
            alpha: 1.0,
            fill_color: Rgba::BLACK,
            stroke: StrokeStyle::default(),
            shadow: None,
            interpolation: Interpolation::Bilinear,
        }
    }
}

/// What a rasterized shape is filled with. Colors are premultiplied.
pub(crate) enum Paint<'s> {
    Solid(Rgba),
    Image(ImageSampler<'s>),
}

/// Drawing handle over RGBA bytes laid out top row first.
pub struct DrawContext<'a> {
    buf: &'a mut [u8],
    width: u32,
    height: u32,
    stride: i32,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
}

/// Renderer over `buf` honoring the clip, blend mode and alpha of `state`.
fn renderer<'r>(
    buf: &'r mut [u8],
    width: u32,
    height: u32,
    stride: i32,
    state: &'r GraphicsState,
) -> RendererBase<'r> {
    let mut ren = RendererBase::new(RowAccessor::new(buf, width, height, stride));
    ren.set_mask(state.clip.as_deref());
    ren.set_blend_mode(state.blend_mode);
    ren.set_alpha(state.alpha);
    ren
}

fn render_paint(ren: &mut RendererBase, ras: &mut PathRasterizer, paint: &Paint) {
    match paint {
        Paint::Solid(c) => ren.render_solid(ras, *c),
        Paint::Image(sampler) => ren.render_generated(ras, |x, y, span| sampler.generate(x, y, span)),
    }
}

impl<'a> DrawContext<'a> {
    /// Attach to `buf`, `stride` bytes per row (negative for bottom-up rows).
    pub(crate) fn new(buf: &'a mut [u8], width: u32, height: u32, stride: i32) -> Self {
        Self {
            buf,
            width,
            height,
            stride,
            state: GraphicsState::default(),
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The surface rect in device space.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    // ------------------------------------------------------------------
    // State stack
    // ------------------------------------------------------------------

    pub fn save_state(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved state. Returns `false` if nothing was saved.
    pub fn restore_state(&mut self) -> bool {
        match self.stack.pop() {
            Some(state) => {
                self.state = state;
                true
            }
            None => {
                warn!("restore_state called without a matching save_state");
                false
            }
        }
    }

    /// Run `block` between `save_state` and `restore_state`.
    pub fn with_saved_state<R>(&mut self, block: impl FnOnce(&mut Self) -> R) -> R {
        self.save_state();
        let depth = self.stack.len();
        let r = block(self);
        if self.stack.len() != depth {
            warn!(
                "nested block left {} unbalanced saved states",
                self.stack.len() as isize - depth as isize
            );
            self.stack.truncate(depth);
        }
        self.restore_state();
        r
    }

    pub fn saved_states(&self) -> usize {
        self.stack.len()
    }

    // ------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------

    pub fn ctm(&self) -> TransAffine {
        self.state.ctm
    }

    /// Prepend `m` to the current transform.
    pub fn concat_ctm(&mut self, m: &TransAffine) {
        self.state.ctm.premultiply(m);
    }

    pub fn translate_by(&mut self, tx: f64, ty: f64) {
        self.concat_ctm(&TransAffine::new_translation(tx, ty));
    }

    pub fn scale_by(&mut self, sx: f64, sy: f64) {
        self.concat_ctm(&TransAffine::new_scaling(sx, sy));
    }

    /// Rotate user space counter-clockwise by `angle`.
    pub fn rotate_by(&mut self, angle: Angle) {
        self.concat_ctm(&TransAffine::new_rotation(angle.as_radians()));
    }

    // ------------------------------------------------------------------
    // State setters
    // ------------------------------------------------------------------

    pub fn set_fill_color(&mut self, color: Rgba) {
        self.state.fill_color = color;
    }

    pub fn fill_color(&self) -> Rgba {
        self.state.fill_color
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        self.state.stroke.color = color;
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.state.stroke.line_width = width;
    }

    pub fn set_line_dash(&mut self, dash: Option<DashPattern>) {
        self.state.stroke.dash = dash;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.stroke.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.stroke.line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f64) {
        self.state.stroke.miter_limit = limit;
    }

    /// Replace color, width, dash, cap, join and miter limit at once.
    pub fn set_stroke_style(&mut self, style: &StrokeStyle) {
        self.state.stroke = style.clone();
    }

    pub fn stroke_style(&self) -> &StrokeStyle {
        &self.state.stroke
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.state.blend_mode
    }

    /// Global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.shadow = shadow;
    }

    pub fn shadow(&self) -> Option<Shadow> {
        self.state.shadow
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.state.interpolation = interpolation;
    }

    pub fn interpolation(&self) -> Interpolation {
        self.state.interpolation
    }

    // ------------------------------------------------------------------
    // Clipping
    // ------------------------------------------------------------------

    fn intersect_clip(&mut self, mask: ClipMask) {
        match self.state.clip.as_mut() {
            Some(current) => Rc::make_mut(current).intersect(&mask),
            None => self.state.clip = Some(Rc::new(mask)),
        }
    }

    /// Restrict drawing to the inside of `path`.
    pub fn clip_to_path(&mut self, path: &Path, rule: FillingRule) {
        let mut ras = self.rasterizer(rule);
        ras.add_path(path, &self.state.ctm);
        let mask = ClipMask::from_rasterizer(self.width as usize, self.height as usize, &mut ras);
        self.intersect_clip(mask);
    }

    pub fn clip_to_rect(&mut self, rect: Rect) {
        self.clip_to_rects(&[rect]);
    }

    /// Restrict drawing to the union of `rects`.
    pub fn clip_to_rects(&mut self, rects: &[Rect]) {
        let mut path = Path::new();
        for r in rects {
            path.add_rect(*r);
        }
        self.clip_to_path(&path, FillingRule::NonZero);
    }

    /// Restrict drawing by the alpha of `image` stretched over `rect`.
    /// Everything outside `rect` is clipped away.
    pub fn clip_to_mask<I: AsRef<PixelBuffer>>(&mut self, rect: Rect, image: &I) {
        let image = image.as_ref();
        let mut layer = vec![0u8; self.buf.len()];
        let mtx = ImageSampler::placement(
            image.width(),
            image.height(),
            rect.min_x(),
            rect.min_y(),
            rect.width(),
            rect.height(),
            &self.state.ctm,
        );
        if let Some(sampler) = ImageSampler::new(image, &mtx, self.state.interpolation) {
            let mut ras = self.rasterizer(FillingRule::NonZero);
            ras.add_path(&Path::rect(rect), &self.state.ctm);
            let mut ren = RendererBase::new(RowAccessor::new(&mut layer, self.width, self.height, self.stride));
            ren.set_blend_mode(BlendMode::Copy);
            render_paint(&mut ren, &mut ras, &Paint::Image(sampler));
        }
        let mask = ClipMask::from_alpha(&RowAccessor::new(&mut layer, self.width, self.height, self.stride));
        self.intersect_clip(mask);
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    /// Rasterizer clipped to the surface.
    pub(crate) fn rasterizer(&self, rule: FillingRule) -> PathRasterizer {
        let mut ras = PathRasterizer::new();
        ras.set_clip_box(0.0, 0.0, self.width as f64, self.height as f64);
        ras.set_filling_rule(rule);
        ras
    }

    /// Blend `paint` through the coverage of `ras`, shadow first.
    pub(crate) fn paint(&mut self, ras: &mut PathRasterizer, paint: &Paint) {
        if let Some(shadow) = self.state.shadow {
            self.paint_shadow(ras, paint, &shadow);
        }
        let mut ren = renderer(self.buf, self.width, self.height, self.stride, &self.state);
        render_paint(&mut ren, ras, paint);
    }

    fn paint_shadow(&mut self, ras: &mut PathRasterizer, paint: &Paint, shadow: &Shadow) {
        let mut layer = vec![0u8; self.buf.len()];
        let mut ren = RendererBase::new(RowAccessor::new(&mut layer, self.width, self.height, self.stride));
        render_paint(&mut ren, ras, paint);
        drop(ren);

        let mut acc = RowAccessor::new(&mut layer, self.width, self.height, self.stride);
        shadow.cast(&mut acc);
        let (dx, dy) = shadow.pixel_offset();
        trace!("shadow offset ({dx}, {dy}) blur {}", shadow.blur);

        let mut ren = renderer(self.buf, self.width, self.height, self.stride, &self.state);
        for y in 0..self.height {
            let row = pixels_from_bytes(acc.row(y));
            ren.blend_color_hspan(dx, y as i32 + dy, &row, COVER_FULL);
        }
    }

    pub fn fill_path(&mut self, path: &Path, rule: FillingRule) {
        let mut ras = self.rasterizer(rule);
        ras.add_path(path, &self.state.ctm);
        let color = self.state.fill_color.premultiplied();
        self.paint(&mut ras, &Paint::Solid(color));
    }

    pub fn fill_rect(&mut self, rect: Rect) {
        self.fill_path(&Path::rect(rect), FillingRule::NonZero);
    }

    pub fn fill_rects(&mut self, rects: &[Rect]) {
        let mut path = Path::new();
        for r in rects {
            path.add_rect(*r);
        }
        self.fill_path(&path, FillingRule::NonZero);
    }

    pub fn fill_ellipse(&mut self, rect: Rect) {
        self.fill_path(&Path::ellipse(rect), FillingRule::NonZero);
    }

    /// Outline `path` with the current stroke style. Widths and dashes are
    /// measured in user space.
    pub fn stroke_path(&mut self, path: &Path) {
        let ctm = self.state.ctm;
        let Some(inverse) = ctm.inverted() else {
            return;
        };
        // Flatten in device space for the right curve precision, then stroke
        // in user space.
        let contours: Vec<Contour> = path
            .flatten(&ctm)
            .into_iter()
            .map(|c| map_contour(c, &inverse))
            .collect();
        let polygons = stroke_polygons(&contours, &self.state.stroke, ctm.scale_factor());
        let device: Vec<Contour> = polygons.into_iter().map(|c| map_contour(c, &ctm)).collect();

        let mut ras = self.rasterizer(FillingRule::NonZero);
        ras.add_contours(&device);
        let color = self.state.stroke.color.premultiplied();
        self.paint(&mut ras, &Paint::Solid(color));
    }

    pub fn stroke_rect(&mut self, rect: Rect) {
        self.stroke_path(&Path::rect(rect));
    }

    pub fn stroke_ellipse(&mut self, rect: Rect) {
        self.stroke_path(&Path::ellipse(rect));
    }

    pub fn stroke_line(&mut self, from: Point, to: Point) {
        self.stroke_path(&Path::line(from, to));
    }

    /// Make the pixels under `rect` fully transparent, inside the clip.
    pub fn clear_rect(&mut self, rect: Rect) {
        let mut ras = self.rasterizer(FillingRule::NonZero);
        ras.add_path(&Path::rect(rect), &self.state.ctm);
        let mut ren = renderer(self.buf, self.width, self.height, self.stride, &self.state);
        ren.set_blend_mode(BlendMode::Clear);
        ren.set_alpha(1.0);
        ren.render_solid(&mut ras, Rgba::CLEAR);
    }

    /// Draw `image` stretched into `rect`.
    pub fn draw_image<I: AsRef<PixelBuffer>>(&mut self, image: &I, rect: Rect) {
        let image = image.as_ref();
        if rect.is_empty() {
            return;
        }
        let mtx = ImageSampler::placement(
            image.width(),
            image.height(),
            rect.min_x(),
            rect.min_y(),
            rect.width(),
            rect.height(),
            &self.state.ctm,
        );
        let Some(sampler) = ImageSampler::new(image, &mtx, self.state.interpolation) else {
            return;
        };
        let mut ras = self.rasterizer(FillingRule::NonZero);
        ras.add_path(&Path::rect(rect), &self.state.ctm);
        self.paint(&mut ras, &Paint::Image(sampler));
    }

    /// Draw `image` into `rect` following `policy`. Aspect fill is clipped
    /// to `rect`.
    pub fn draw_image_scaled<I: AsRef<PixelBuffer>>(&mut self, image: &I, rect: Rect, policy: ScalingPolicy) {
        let buffer = image.as_ref();
        let dest = policy.placement(buffer.size(), rect);
        trace!("draw image {:?} into {:?} as {:?}", buffer.size(), dest, policy);
        match policy {
            ScalingPolicy::AspectFill => self.with_saved_state(|ctx| {
                ctx.clip_to_rect(rect);
                ctx.draw_image(image, dest);
            }),
            _ => self.draw_image(image, dest),
        }
    }
}

impl Drop for DrawContext<'_> {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            warn!("draw block ended with {} unbalanced saved states", self.stack.len());
        }
    }
}

fn map_contour(mut c: Contour, mtx: &TransAffine) -> Contour {
    for p in &mut c.points {
        *p = mtx.transform_point(*p);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canvas {
        w: u32,
        h: u32,
        data: Vec<u8>,
    }

    impl Canvas {
        fn new(w: u32, h: u32) -> Self {
            Self {
                w,
                h,
                data: vec![0u8; (w * h * 4) as usize],
            }
        }

        fn ctx(&mut self) -> DrawContext<'_> {
            DrawContext::new(&mut self.data, self.w, self.h, -(self.w as i32 * 4))
        }

        /// Pixel at bottom-left coordinates.
        fn px(&self, x: u32, y: u32) -> Rgba {
            let off = (((self.h - 1 - y) * self.w + x) * 4) as usize;
            Rgba::from_slice(&self.data[off..off + 4])
        }
    }

    #[test]
    fn test_fill_rect_exact() {
        let mut c = Canvas::new(6, 6);
        {
            let mut ctx = c.ctx();
            ctx.set_fill_color(Rgba::RED);
            ctx.fill_rect(Rect::new(1.0, 2.0, 2.0, 3.0));
        }
        assert_eq!(c.px(1, 2), Rgba::RED);
        assert_eq!(c.px(2, 4), Rgba::RED);
        assert_eq!(c.px(0, 2), Rgba::CLEAR);
        assert_eq!(c.px(1, 5), Rgba::CLEAR);
        assert_eq!(c.px(3, 3), Rgba::CLEAR);
    }

    #[test]
    fn test_translate_and_scale_prepend() {
        let mut c = Canvas::new(8, 8);
        {
            let mut ctx = c.ctx();
            ctx.translate_by(4.0, 4.0);
            ctx.scale_by(2.0, 2.0);
            ctx.set_fill_color(Rgba::BLUE);
            ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
        assert_eq!(c.px(4, 4), Rgba::BLUE);
        assert_eq!(c.px(5, 5), Rgba::BLUE);
        assert_eq!(c.px(6, 6), Rgba::CLEAR);
        assert_eq!(c.px(3, 3), Rgba::CLEAR);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.translate_by(2.0, 2.0);
            ctx.rotate_by(Angle::degrees(90.0));
            ctx.set_fill_color(Rgba::GREEN);
            // Right of the center before rotation, above it after.
            ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 1.0));
        }
        assert_eq!(c.px(1, 2), Rgba::GREEN);
        assert_eq!(c.px(1, 3), Rgba::GREEN);
        assert_eq!(c.px(2, 2), Rgba::CLEAR);
    }

    #[test]
    fn test_save_restore() {
        let mut c = Canvas::new(4, 4);
        let mut ctx = c.ctx();
        ctx.save_state();
        ctx.set_fill_color(Rgba::RED);
        ctx.translate_by(1.0, 1.0);
        assert!(ctx.restore_state());
        assert_eq!(ctx.fill_color(), Rgba::BLACK);
        assert!(ctx.ctm().is_identity());
        assert!(!ctx.restore_state());
    }

    #[test]
    fn test_clip_to_rects() {
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.clip_to_rects(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(3.0, 3.0, 1.0, 1.0)]);
            ctx.set_fill_color(Rgba::WHITE);
            ctx.fill_rect(ctx.bounds());
        }
        assert_eq!(c.px(0, 0), Rgba::WHITE);
        assert_eq!(c.px(3, 3), Rgba::WHITE);
        assert_eq!(c.px(1, 1), Rgba::CLEAR);
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.clip_to_rect(Rect::new(0.0, 0.0, 2.0, 4.0));
            ctx.clip_to_rect(Rect::new(0.0, 0.0, 4.0, 2.0));
            ctx.fill_rect(ctx.bounds());
        }
        assert_eq!(c.px(1, 1), Rgba::BLACK);
        assert_eq!(c.px(1, 3), Rgba::CLEAR);
        assert_eq!(c.px(3, 1), Rgba::CLEAR);
    }

    #[test]
    fn test_even_odd_clip_excludes_inner() {
        let mut c = Canvas::new(6, 6);
        {
            let mut ctx = c.ctx();
            let mut path = Path::rect(ctx.bounds());
            path.add_rect(Rect::new(2.0, 2.0, 2.0, 2.0));
            ctx.clip_to_path(&path, FillingRule::EvenOdd);
            ctx.fill_rect(ctx.bounds());
        }
        assert_eq!(c.px(0, 0), Rgba::BLACK);
        assert_eq!(c.px(2, 2), Rgba::CLEAR);
        assert_eq!(c.px(3, 3), Rgba::CLEAR);
    }

    #[test]
    fn test_clear_rect() {
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.fill_rect(ctx.bounds());
            ctx.clear_rect(Rect::new(1.0, 1.0, 2.0, 2.0));
        }
        assert_eq!(c.px(0, 0), Rgba::BLACK);
        assert_eq!(c.px(1, 1), Rgba::CLEAR);
        assert_eq!(c.px(2, 2), Rgba::CLEAR);
    }

    #[test]
    fn test_alpha_and_blend_mode() {
        let mut c = Canvas::new(2, 1);
        {
            let mut ctx = c.ctx();
            ctx.set_fill_color(Rgba::WHITE);
            ctx.fill_rect(ctx.bounds());
            ctx.set_blend_mode(BlendMode::Multiply);
            ctx.set_fill_color(Rgba::rgb(255, 0, 0));
            ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
            ctx.set_blend_mode(BlendMode::Normal);
            ctx.set_alpha(0.0);
            ctx.fill_rect(Rect::new(1.0, 0.0, 1.0, 1.0));
        }
        assert_eq!(c.px(0, 0), Rgba::RED);
        assert_eq!(c.px(1, 0), Rgba::WHITE);
    }

    #[test]
    fn test_draw_image_unit_scale() {
        let mut img = PixelBuffer::new(2, 2).unwrap();
        img.set(0, 0, Rgba::RED).unwrap();
        img.set(1, 1, Rgba::BLUE).unwrap();
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.draw_image(&img, Rect::new(1.0, 1.0, 2.0, 2.0));
        }
        assert_eq!(c.px(1, 1), Rgba::RED);
        assert_eq!(c.px(2, 2), Rgba::BLUE);
        assert_eq!(c.px(2, 1), Rgba::CLEAR);
        assert_eq!(c.px(0, 0), Rgba::CLEAR);
    }

    #[test]
    fn test_draw_image_aspect_fill_is_clipped() {
        let mut img = PixelBuffer::new(2, 1).unwrap();
        img.set(0, 0, Rgba::RED).unwrap();
        img.set(1, 0, Rgba::RED).unwrap();
        let mut c = Canvas::new(4, 4);
        {
            let mut ctx = c.ctx();
            ctx.draw_image_scaled(&img, Rect::new(1.0, 1.0, 2.0, 2.0), ScalingPolicy::AspectFill);
            assert_eq!(ctx.saved_states(), 0);
        }
        assert_eq!(c.px(1, 1), Rgba::RED);
        assert_eq!(c.px(2, 2), Rgba::RED);
        assert_eq!(c.px(0, 1), Rgba::CLEAR);
        assert_eq!(c.px(3, 2), Rgba::CLEAR);
    }

    #[test]
    fn test_clip_to_mask_uses_alpha() {
        let mut mask = PixelBuffer::new(2, 1).unwrap();
        mask.set(0, 0, Rgba::WHITE).unwrap();
        let mut c = Canvas::new(2, 1);
        {
            let mut ctx = c.ctx();
            ctx.clip_to_mask(ctx.bounds(), &mask);
            ctx.fill_rect(ctx.bounds());
        }
        assert_eq!(c.px(0, 0), Rgba::BLACK);
        assert_eq!(c.px(1, 0), Rgba::CLEAR);
    }

    #[test]
    fn test_stroke_rect_hits_edges() {
        let mut c = Canvas::new(6, 6);
        {
            let mut ctx = c.ctx();
            ctx.set_line_width(2.0);
            ctx.stroke_rect(Rect::new(1.0, 1.0, 4.0, 4.0));
        }
        assert_eq!(c.px(0, 0), Rgba::BLACK);
        assert_eq!(c.px(1, 3), Rgba::BLACK);
        assert_eq!(c.px(5, 5), Rgba::BLACK);
        assert_eq!(c.px(2, 2), Rgba::CLEAR);
        assert_eq!(c.px(3, 3), Rgba::CLEAR);
    }

    #[test]
    fn test_shadow_is_offset() {
        let mut c = Canvas::new(8, 8);
        {
            let mut ctx = c.ctx();
            ctx.set_shadow(Some(Shadow::new(crate::basics::Size::new(3.0, -3.0), 0.0, Rgba::BLUE)));
            ctx.set_fill_color(Rgba::RED);
            ctx.fill_rect(Rect::new(1.0, 4.0, 2.0, 2.0));
        }
        assert_eq!(c.px(1, 4), Rgba::RED);
        assert_eq!(c.px(4, 1), Rgba::BLUE);
        assert_eq!(c.px(5, 2), Rgba::BLUE);
        assert_eq!(c.px(6, 3), Rgba::CLEAR);
    }
}
