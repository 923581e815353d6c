//! Heuristic text layout shared by bounds, hit-testing and rendering
//!
//! No font is consulted: every glyph gets a fixed advance based on whether
//! it is ASCII (narrow) or not (full width), so layout is identical with or
//! without a glyph rasterizer.

use crate::domain::{Bounds, Point, TextAlign};

/// Advance of a code point below 128, as a fraction of the font size
pub const NARROW_ADVANCE: f32 = 0.6;
/// Advance of any other code point (CJK full width)
pub const WIDE_ADVANCE: f32 = 1.0;
/// Horizontal line height as a fraction of the font size
pub const LINE_HEIGHT: f32 = 1.2;
/// Vertical column width as a fraction of the font size
pub const COLUMN_WIDTH: f32 = 1.1;
/// Per-character width used for font-name labels
pub const FONT_LABEL_ADVANCE: f32 = 0.7;
/// Offset of vertical punctuation toward the upper right of its cell
pub const PUNCTUATION_NUDGE: f32 = 0.55;

/// Glyphs turned 90° when set vertically
const ROTATED_IN_VERTICAL: &[char] = &[
    'ー', '－', '-', '—', '―', '‐', '~', '～', '〜', '…', '‥', '=', '＝', '(', ')', '（', '）',
    '[', ']', '［', '］', '{', '}', '｛', '｝', '「', '」', '『', '』', '【', '】', '〔', '〕',
    '〈', '〉', '《', '》', '<', '>', '＜', '＞', '→', '←',
];

/// Punctuation that sits in the upper-right of a vertical cell
const NUDGED_IN_VERTICAL: &[char] = &['、', '。', '，', '．', ',', '.', '！', '？'];

/// Advance width of one character
#[inline]
pub fn char_advance(ch: char, font_size: f32) -> f32 {
    if (ch as u32) < 128 {
        NARROW_ADVANCE * font_size
    } else {
        WIDE_ADVANCE * font_size
    }
}

/// Estimated width of a single line
pub fn line_width(line: &str, font_size: f32) -> f32 {
    line.chars().map(|ch| char_advance(ch, font_size)).sum()
}

/// Lines of a text block; an empty string is one empty line
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}

/// Offset from the anchor to the left edge of a line of width `width`
fn align_offset(align: TextAlign, width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -width * 0.5,
        TextAlign::Right => -width,
    }
}

/// Box occupied by a text block anchored at `anchor`
///
/// Horizontal text hangs below the anchor; the anchor is the left, centre or
/// right edge depending on `align`. Vertical text is set in columns of
/// `COLUMN_WIDTH * font_size` advancing right to left, the first column
/// centred on the anchor.
pub fn text_box(anchor: Point, text: &str, font_size: f32, align: TextAlign, vertical: bool) -> Bounds {
    let font_size = font_size.max(0.0);
    if vertical {
        let column_width = COLUMN_WIDTH * font_size;
        let mut columns = 0usize;
        let mut longest = 0usize;
        for line in lines(text) {
            columns += 1;
            longest = longest.max(line.chars().count());
        }
        let width = columns as f32 * column_width;
        let left = anchor.x + column_width * 0.5 - width;
        return Bounds::new(left, anchor.y, width, longest as f32 * font_size);
    }

    let mut widest = 0.0_f32;
    let mut count = 0usize;
    for line in lines(text) {
        count += 1;
        widest = widest.max(line_width(line, font_size));
    }
    Bounds::new(
        anchor.x + align_offset(align, widest),
        anchor.y,
        widest,
        count as f32 * LINE_HEIGHT * font_size,
    )
}

/// Box of a font-name label whose leader ends at `anchor`
///
/// Left-aligned labels extend right of the anchor, right-aligned ones left
/// of it; the label is vertically centred on the anchor.
pub fn font_label_box(anchor: Point, name: &str, font_size: f32, align: TextAlign) -> Bounds {
    let width = name.chars().count() as f32 * font_size * FONT_LABEL_ADVANCE;
    let height = LINE_HEIGHT * font_size;
    Bounds::new(
        anchor.x + align_offset(align, width),
        anchor.y - height * 0.5,
        width,
        height,
    )
}

/// Where a single glyph is placed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphCell {
    pub ch: char,
    /// Top-left of the em cell
    pub origin: Point,
    /// Cell width (the heuristic advance)
    pub advance: f32,
    /// Rotate the glyph 90° clockwise about the cell centre
    pub rotated: bool,
}

impl GlyphCell {
    pub fn center(&self, font_size: f32) -> Point {
        Point::new(self.origin.x + self.advance * 0.5, self.origin.y + font_size * 0.5)
    }
}

/// Glyph cells for a text block, using the same layout as [`text_box`]
pub fn layout_glyphs(anchor: Point, text: &str, font_size: f32, align: TextAlign, vertical: bool) -> Vec<GlyphCell> {
    let mut cells = Vec::with_capacity(text.len());
    if vertical {
        let column_width = COLUMN_WIDTH * font_size;
        for (col, line) in lines(text).enumerate() {
            let center_x = anchor.x - col as f32 * column_width;
            for (row, ch) in line.chars().enumerate() {
                let mut origin = Point::new(
                    center_x - font_size * 0.5,
                    anchor.y + row as f32 * font_size,
                );
                if NUDGED_IN_VERTICAL.contains(&ch) {
                    origin = origin.offset(
                        font_size * PUNCTUATION_NUDGE,
                        -font_size * PUNCTUATION_NUDGE,
                    );
                }
                cells.push(GlyphCell {
                    ch,
                    origin,
                    advance: font_size,
                    rotated: ROTATED_IN_VERTICAL.contains(&ch),
                });
            }
        }
        return cells;
    }

    let line_height = LINE_HEIGHT * font_size;
    for (row, line) in lines(text).enumerate() {
        let mut x = anchor.x + align_offset(align, line_width(line, font_size));
        let y = anchor.y + row as f32 * line_height;
        for ch in line.chars() {
            let advance = char_advance(ch, font_size);
            cells.push(GlyphCell {
                ch,
                origin: Point::new(x, y),
                advance,
                rotated: false,
            });
            x += advance;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_width_line() {
        // Two ASCII (0.6 each) plus one CJK (1.0)
        assert!((line_width("ab漢", 10.0) - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_box_alignment() {
        let anchor = Point::new(100.0, 50.0);
        let left = text_box(anchor, "abcde", 10.0, TextAlign::Left, false);
        assert_eq!(left, Bounds::new(100.0, 50.0, 30.0, 12.0));
        let right = text_box(anchor, "abcde", 10.0, TextAlign::Right, false);
        assert_eq!(right.x, 70.0);
        assert_eq!(right.right(), 100.0);
    }

    #[test]
    fn test_multiline_height_and_width() {
        let b = text_box(Point::default(), "a\nabc", 10.0, TextAlign::Left, false);
        assert!((b.width - 18.0).abs() < 1e-4);
        assert!((b.height - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_columns_advance_leftward() {
        let b = text_box(Point::new(100.0, 0.0), "あいう\nえ", 10.0, TextAlign::Left, true);
        assert!((b.width - 22.0).abs() < 1e-4);
        assert!((b.right() - 105.5).abs() < 1e-4);
        assert_eq!(b.height, 30.0);

        let cells = layout_glyphs(Point::new(100.0, 0.0), "あいう\nえ", 10.0, TextAlign::Left, true);
        assert_eq!(cells.len(), 4);
        assert!(cells[3].origin.x < cells[0].origin.x);
        assert_eq!(cells[1].origin.y, 10.0);
    }

    #[test]
    fn test_vertical_punctuation_rotated_and_nudged() {
        let cells = layout_glyphs(Point::new(0.0, 0.0), "あー、", 20.0, TextAlign::Left, true);
        assert!(!cells[0].rotated);
        assert!(cells[1].rotated);
        assert!(cells[2].origin.x > cells[0].origin.x);
        assert!(cells[2].origin.y < 40.0);
    }

    #[test]
    fn test_font_label_box_sides() {
        let anchor = Point::new(50.0, 50.0);
        let left = font_label_box(anchor, "Mincho", 10.0, TextAlign::Left);
        assert_eq!(left.x, 50.0);
        assert!((left.width - 42.0).abs() < 1e-4);
        let right = font_label_box(anchor, "Mincho", 10.0, TextAlign::Right);
        assert!((right.right() - 50.0).abs() < 1e-4);
    }
}
