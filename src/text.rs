//! Text drawing from TrueType/OpenType outlines using `ttf-parser`.
//!
//! Glyphs are laid out left to right along a baseline using horizontal
//! advances and `kern` table pairs, converted to [`Path`]s and filled with
//! the context's fill color. Font units are y-up like public coordinates,
//! so outlines only need scaling and translation.

use log::trace;

use crate::basics::{FillingRule, Point};
use crate::color::Rgba;
use crate::context::DrawContext;
use crate::error::{BitmapError, Result};
use crate::path_storage::Path;
use crate::surface::RasterSurface;

/// A parsed font face owning its data.
#[derive(Clone)]
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.data.len())
            .field("face_index", &self.face_index)
            .finish()
    }
}

impl Font {
    /// Load a face from TTF/OTF data. `face_index` selects the face in a
    /// collection (0 for single fonts).
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
        ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| BitmapError::CannotLoadFont(e.to_string()))?;
        Ok(Self { data, face_index })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    pub fn units_per_em(&self) -> u16 {
        self.face().map_or(0, |f| f.units_per_em())
    }

    /// Ascender at `size` pixels per em.
    pub fn ascender(&self, size: f64) -> f64 {
        self.face()
            .map_or(0.0, |f| f.ascender() as f64 * size / f.units_per_em() as f64)
    }

    /// Descender at `size` pixels per em (negative below the baseline).
    pub fn descender(&self, size: f64) -> f64 {
        self.face()
            .map_or(0.0, |f| f.descender() as f64 * size / f.units_per_em() as f64)
    }

    /// Advance width of `text` at `size`, including kerning.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        self.layout(text, size, Point::new(0.0, 0.0))
            .map_or(0.0, |(_, width)| width)
    }

    /// Glyph outlines of `text` placed with the baseline starting at
    /// `origin`, plus the total advance.
    fn layout(&self, text: &str, size: f64, origin: Point) -> Option<(Path, f64)> {
        let face = self.face()?;
        let scale = size / face.units_per_em() as f64;
        let mut path = Path::new();
        let mut pen = 0.0;
        let mut previous: Option<ttf_parser::GlyphId> = None;

        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                trace!("no glyph for {:?}", ch);
                continue;
            };
            if let Some(prev) = previous {
                pen += kerning(&face, prev, glyph) * scale;
            }
            let mut builder = OutlineBuilder {
                path: &mut path,
                scale,
                dx: origin.x + pen,
                dy: origin.y,
            };
            face.outline_glyph(glyph, &mut builder);
            pen += face.glyph_hor_advance(glyph).unwrap_or(0) as f64 * scale;
            previous = Some(glyph);
        }
        Some((path, pen))
    }
}

fn kerning(face: &ttf_parser::Face<'_>, first: ttf_parser::GlyphId, second: ttf_parser::GlyphId) -> f64 {
    let Some(kern) = face.tables().kern else {
        return 0.0;
    };
    kern.subtables
        .into_iter()
        .filter(|s| s.horizontal && !s.has_cross_stream)
        .find_map(|s| s.glyphs_kerning(first, second))
        .map_or(0.0, |v| v as f64)
}

/// Appends scaled, translated glyph outlines to a [`Path`].
struct OutlineBuilder<'a> {
    path: &'a mut Path,
    scale: f64,
    dx: f64,
    dy: f64,
}

impl OutlineBuilder<'_> {
    #[inline]
    fn pt(&self, x: f32, y: f32) -> Point {
        Point::new(x as f64 * self.scale + self.dx, y as f64 * self.scale + self.dy)
    }
}

impl ttf_parser::OutlineBuilder for OutlineBuilder<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (c, p) = (self.pt(x1, y1), self.pt(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, p) = (self.pt(x1, y1), self.pt(x2, y2), self.pt(x, y));
        self.path.cubic_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

impl DrawContext<'_> {
    /// Fill `text` with the current fill color, baseline starting at
    /// `origin` in user space, `size` pixels per em. Returns the advance.
    pub fn fill_text(&mut self, font: &Font, text: &str, origin: Point, size: f64) -> f64 {
        let Some((path, advance)) = font.layout(text, size, origin) else {
            return 0.0;
        };
        if !path.is_empty() {
            self.fill_path(&path, FillingRule::NonZero);
        }
        advance
    }
}

impl RasterSurface {
    /// Draw `text` in `color` with its baseline at `origin`.
    pub fn draw_text(&mut self, font: &Font, text: &str, origin: Point, size: f64, color: Rgba) -> f64 {
        self.draw(|ctx| {
            ctx.set_fill_color(color);
            ctx.fill_text(font, text, origin, size)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::Rect;

    fn push16(out: &mut Vec<u8>, v: i32) {
        out.extend_from_slice(&(v as u16).to_be_bytes());
    }

    fn push32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_be_bytes());
    }

    /// A 1000 units-per-em TrueType font with an empty `.notdef` and one
    /// glyph, 'A', a square from (100, 0) to (900, 800) advancing 1000.
    fn make_font() -> Vec<u8> {
        let mut cmap = Vec::new();
        push16(&mut cmap, 0); // version
        push16(&mut cmap, 1); // subtables
        push16(&mut cmap, 0); // platform: Unicode
        push16(&mut cmap, 3); // encoding: BMP
        push32(&mut cmap, 12);
        // format 6: length, language, first code, count, glyph ids
        for v in [6, 12, 0, 'A' as i32, 1, 1] {
            push16(&mut cmap, v);
        }

        let mut glyf = Vec::new();
        // contours, bbox, end point, instruction length
        for v in [1, 100, 0, 900, 800, 3, 0] {
            push16(&mut glyf, v);
        }
        glyf.extend_from_slice(&[1, 1, 1, 1]); // on-curve, long deltas
        for v in [100, 800, 0, -800, 0, 0, 800, 0] {
            push16(&mut glyf, v);
        }

        let mut head = Vec::new();
        push32(&mut head, 0x0001_0000);
        push32(&mut head, 0x0001_0000);
        push32(&mut head, 0);
        push32(&mut head, 0x5F0F_3CF5);
        push16(&mut head, 0);
        push16(&mut head, 1000); // units per em
        head.extend_from_slice(&[0; 16]);
        // bbox, mac style, lowest ppem, direction, long loca, glyph format
        for v in [100, 0, 900, 800, 0, 8, 2, 1, 0] {
            push16(&mut head, v);
        }

        let mut hhea = Vec::new();
        push32(&mut hhea, 0x0001_0000);
        for v in [800, -200, 0, 1000, 0, 0, 900, 1, 0, 0, 0, 0, 0, 0, 0, 2] {
            push16(&mut hhea, v);
        }

        let mut hmtx = Vec::new();
        for v in [500, 0, 1000, 100] {
            push16(&mut hmtx, v);
        }

        let mut loca = Vec::new();
        for v in [0, 0, glyf.len() as u32] {
            push32(&mut loca, v);
        }

        let mut maxp = Vec::new();
        push32(&mut maxp, 0x0000_5000);
        push16(&mut maxp, 2);

        // Table records must be sorted by tag.
        let tables: [(&[u8; 4], Vec<u8>); 7] = [
            (b"cmap", cmap),
            (b"glyf", glyf),
            (b"head", head),
            (b"hhea", hhea),
            (b"hmtx", hmtx),
            (b"loca", loca),
            (b"maxp", maxp),
        ];
        let mut font = Vec::new();
        push32(&mut font, 0x0001_0000);
        for v in [7, 64, 2, 48] {
            push16(&mut font, v);
        }
        let mut offset = 12 + 16 * tables.len();
        for (tag, data) in &tables {
            font.extend_from_slice(*tag);
            push32(&mut font, 0);
            push32(&mut font, offset as u32);
            push32(&mut font, data.len() as u32);
            offset += (data.len() + 3) & !3;
        }
        for (_, data) in &tables {
            font.extend_from_slice(data);
            font.resize((font.len() + 3) & !3, 0);
        }
        font
    }

    #[test]
    fn test_font_metrics() {
        let font = Font::from_data(make_font(), 0).unwrap();
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(10.0), 8.0);
        assert_eq!(font.descender(10.0), -2.0);
        assert_eq!(font.text_width("AA", 10.0), 20.0);
        // Characters without a glyph are skipped.
        assert_eq!(font.text_width("AB", 10.0), 10.0);
    }

    #[test]
    fn test_fill_text_draws_glyphs() {
        let font = Font::from_data(make_font(), 0).unwrap();
        let mut s = RasterSurface::new(30, 20).unwrap();
        let advance = s.draw_text(&font, "AA", Point::new(3.0, 3.0), 10.0, Rgba::RED);
        assert_eq!(advance, 20.0);

        // First glyph covers x 4..12, y 3..11; the second starts at x 14.
        assert_eq!(s.pixel(4, 3).unwrap(), Rgba::RED);
        assert_eq!(s.pixel(11, 10).unwrap(), Rgba::RED);
        assert_eq!(s.pixel(3, 5).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(12, 5).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(11, 11).unwrap(), Rgba::CLEAR);
        assert_eq!(s.pixel(15, 5).unwrap(), Rgba::RED);
        assert_eq!(s.coordinates_matching(Rgba::RED).len(), 2 * 8 * 8);

        let mut t = RasterSurface::new(10, 10).unwrap();
        let drawn = t.draw(|ctx| {
            ctx.set_fill_color(Rgba::BLUE);
            ctx.fill_text(&font, "B", Point::new(0.0, 0.0), 10.0)
        });
        assert_eq!(drawn, 0.0);
        assert!(t.coordinates_matching(Rgba::BLUE).is_empty());
    }

    #[test]
    fn test_from_data_rejects_garbage() {
        let err = Font::from_data(vec![0, 1, 2, 3, 4, 5], 0).unwrap_err();
        assert!(matches!(err, BitmapError::CannotLoadFont(_)));
        assert!(Font::from_data(Vec::new(), 0).is_err());
    }

    #[test]
    fn test_outline_builder_scales_and_translates() {
        let mut path = Path::new();
        let mut b = OutlineBuilder {
            path: &mut path,
            scale: 0.5,
            dx: 10.0,
            dy: 20.0,
        };
        ttf_parser::OutlineBuilder::move_to(&mut b, 0.0, 0.0);
        ttf_parser::OutlineBuilder::line_to(&mut b, 8.0, 0.0);
        ttf_parser::OutlineBuilder::line_to(&mut b, 8.0, 8.0);
        ttf_parser::OutlineBuilder::line_to(&mut b, 0.0, 8.0);
        ttf_parser::OutlineBuilder::close(&mut b);
        assert_eq!(path.bounding_box(), Some(Rect::new(10.0, 20.0, 4.0, 4.0)));

        let mut s = RasterSurface::new(20, 30).unwrap();
        s.fill_path(&path, Rgba::RED);
        assert_eq!(s.pixel(11, 21).unwrap(), Rgba::RED);
        assert_eq!(s.pixel(9, 21).unwrap(), Rgba::CLEAR);
    }
}
