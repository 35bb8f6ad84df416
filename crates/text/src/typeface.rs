use crate::TextError;
use ttf_parser::{Face, OutlineBuilder};

/// A source of glyph outlines, in font units with Y up.
pub trait Typeface: Send + Sync {
    fn units_per_em(&self) -> f32;

    /// Baseline-to-baseline distance in font units.
    fn line_height(&self) -> f32;

    /// Emit the outline of `ch` into `sink` and return its horizontal
    /// advance. `None` means the typeface has no glyph for `ch`.
    fn outline(&self, ch: char, sink: &mut dyn OutlineBuilder) -> Option<f32>;
}

/// TrueType / OpenType font backed by `ttf-parser`.
pub struct Font {
    data: Vec<u8>,
    units_per_em: f32,
    line_height: f32,
}

impl Font {
    /// Parse font bytes. Collections use their first face.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TextError> {
        let face = Face::parse(&data, 0).map_err(|e| TextError::InvalidFont(e.to_string()))?;
        let units_per_em = face.units_per_em() as f32;
        let line_height =
            (face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32).max(1.0);
        Ok(Self {
            data,
            units_per_em,
            line_height,
        })
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl Typeface for Font {
    fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn outline(&self, ch: char, sink: &mut dyn OutlineBuilder) -> Option<f32> {
        // Parsing only reads table offsets; the bytes were validated in `from_bytes`.
        let face = Face::parse(&self.data, 0).ok()?;
        let gid = face.glyph_index(ch)?;
        // Whitespace has no outline but still advances.
        let _ = face.outline_glyph(gid, sink);
        Some(face.glyph_hor_advance(gid).unwrap_or(0) as f32)
    }
}

/// Draws every visible character as a solid box. Stands in for a real font
/// when none is configured, and keeps geometry tests independent of font files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTypeface;

impl PlaceholderTypeface {
    const UNITS_PER_EM: f32 = 1000.0;
    const ADVANCE: f32 = 600.0;
    const SPACE_ADVANCE: f32 = 500.0;
}

impl Typeface for PlaceholderTypeface {
    fn units_per_em(&self) -> f32 {
        Self::UNITS_PER_EM
    }

    fn line_height(&self) -> f32 {
        1200.0
    }

    fn outline(&self, ch: char, sink: &mut dyn OutlineBuilder) -> Option<f32> {
        if ch.is_control() {
            return None;
        }
        if ch.is_whitespace() {
            return Some(Self::SPACE_ADVANCE);
        }
        // Clockwise, like TrueType outer contours.
        sink.move_to(50.0, 0.0);
        sink.line_to(50.0, 700.0);
        sink.line_to(550.0, 700.0);
        sink.line_to(550.0, 0.0);
        sink.close();
        Some(Self::ADVANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        moves: usize,
        lines: usize,
        closes: usize,
    }

    impl OutlineBuilder for Recorder {
        fn move_to(&mut self, _x: f32, _y: f32) {
            self.moves += 1;
        }
        fn line_to(&mut self, _x: f32, _y: f32) {
            self.lines += 1;
        }
        fn quad_to(&mut self, _x1: f32, _y1: f32, _x: f32, _y: f32) {}
        fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x: f32, _y: f32) {}
        fn close(&mut self) {
            self.closes += 1;
        }
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let err = Font::from_bytes(b"definitely not a font".to_vec()).unwrap_err();
        assert!(matches!(err, TextError::InvalidFont(_)));
    }

    #[test]
    fn placeholder_draws_one_box_per_glyph() {
        let mut rec = Recorder::default();
        let advance = PlaceholderTypeface.outline('A', &mut rec);
        assert_eq!(advance, Some(600.0));
        assert_eq!((rec.moves, rec.lines, rec.closes), (1, 3, 1));
    }

    #[test]
    fn placeholder_whitespace_advances_without_outline() {
        let mut rec = Recorder::default();
        assert_eq!(PlaceholderTypeface.outline(' ', &mut rec), Some(500.0));
        assert_eq!(rec.moves, 0);
        assert_eq!(PlaceholderTypeface.outline('\u{7}', &mut rec), None);
    }
}
