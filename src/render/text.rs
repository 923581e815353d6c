//! Text drawing with a white halo
//!
//! Glyph placement comes from the heuristic layout in
//! `crate::geometry::text_metrics`, so text boxes used for bounds and
//! hit-testing match what is drawn. Glyph shapes come from a
//! [`GlyphPainter`]: the bundled DejaVu Sans by default, optionally fronted
//! by a configured font and backed by a system CJK font.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Once;

use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve};
use anyhow::{Context, anyhow};
use tiny_skia::{Path, PathBuilder, Transform};

use super::geometry::halo;
use super::surface::{Surface, round_stroke, solid_paint};
use crate::domain::{Color, Point, TextAlign};
use crate::geometry::text_metrics::{GlyphCell, layout_glyphs};

/// Font compiled into the binary so text always has glyphs
pub const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Font files tried, in order, as a fallback for scripts the primary font lacks
const CJK_FALLBACKS: &[&str] = &[
    "NotoSansCJK-Regular.ttc",
    "NotoSansCJKjp-Regular.otf",
    "NotoSansJP-Regular.otf",
    "NotoSansJP-Regular.ttf",
    "ipaexg.ttf",
    "ipagp.ttf",
    "Hiragino Sans GB.ttc",
    "YuGothR.ttc",
    "msgothic.ttc",
    "DroidSansFallbackFull.ttf",
];

/// How deep below a font directory to look for fallback files
const FONT_SEARCH_DEPTH: usize = 4;

/// Converts glyph outlines from a font chain into tiny-skia paths
///
/// Each character is drawn with the first font in the chain that has a
/// glyph for it; characters no font covers are skipped.
#[derive(Clone)]
pub struct GlyphPainter {
    fonts: Vec<FontArc>,
}

impl std::fmt::Debug for GlyphPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphPainter")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl GlyphPainter {
    pub fn from_bytes(data: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| anyhow!("invalid font data: {e}"))?;
        Ok(Self { fonts: vec![font] })
    }

    /// The bundled DejaVu Sans
    pub fn embedded() -> anyhow::Result<Self> {
        let font =
            FontArc::try_from_slice(EMBEDDED_FONT).map_err(|e| anyhow!("invalid bundled font: {e}"))?;
        Ok(Self { fonts: vec![font] })
    }

    /// Glyphs for page rendering: `preferred` if it loads, else the bundled
    /// font, with a system CJK font appended when one is installed
    pub fn resolve(preferred: Option<&FsPath>) -> Option<Self> {
        let primary = preferred.and_then(|path| match Self::from_file(path) {
            Ok(painter) => Some(painter),
            Err(e) => {
                log::warn!("{e:#}; falling back to the bundled font");
                None
            }
        });
        let mut painter = match primary.map_or_else(Self::embedded, Ok) {
            Ok(painter) => painter,
            Err(e) => {
                log::warn!("No usable font, text will not be drawn: {e:#}");
                return None;
            }
        };
        if let Some(path) = find_system_font(CJK_FALLBACKS) {
            match Self::from_file(&path) {
                Ok(fallback) => {
                    log::debug!("Using {} for glyphs the primary font lacks", path.display());
                    painter = painter.with_fallback(fallback);
                }
                Err(e) => log::debug!("Ignoring fallback font: {e:#}"),
            }
        }
        Some(painter)
    }

    /// Append `other`'s fonts after this painter's own
    pub fn with_fallback(mut self, other: GlyphPainter) -> Self {
        self.fonts.extend(other.fonts);
        self
    }

    /// First font in the chain that has a glyph for `ch`
    fn font_for(&self, ch: char) -> Option<(&FontArc, GlyphId)> {
        self.fonts.iter().find_map(|font| {
            let id = font.glyph_id(ch);
            // Glyph 0 is the missing-glyph box
            (id.0 != 0).then_some((font, id))
        })
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.font_for(ch).is_some()
    }

    /// Load a TrueType/OpenType font file
    pub fn from_file(path: impl AsRef<FsPath>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        Self::from_bytes(data).with_context(|| format!("failed to parse font {}", path.display()))
    }

    /// Outline of one laid-out glyph, centred in its cell
    pub fn glyph_path(&self, cell: &GlyphCell, font_size: f32) -> Option<Path> {
        let (font, id) = self.font_for(cell.ch)?;
        let outline = font.outline(id)?;
        let units = font.units_per_em().unwrap_or(1000.0);
        let scale = font_size / units;

        let advance = font.h_advance_unscaled(id) * scale;
        let left = cell.origin.x + (cell.advance - advance) * 0.5;
        let ascent = font.ascent_unscaled();
        let descent = font.descent_unscaled();
        // Centre the ascent..descent band in the em cell
        let baseline = cell.origin.y + font_size * 0.5 + (ascent + descent) * 0.5 * scale;
        let map = |p: ab_glyph::Point| (left + p.x * scale, baseline - p.y * scale);

        let mut pb = PathBuilder::new();
        let mut pen: Option<(f32, f32)> = None;
        for curve in &outline.curves {
            let start = match curve {
                OutlineCurve::Line(p0, _)
                | OutlineCurve::Quad(p0, _, _)
                | OutlineCurve::Cubic(p0, _, _, _) => map(*p0),
            };
            if pen != Some(start) {
                if pen.is_some() {
                    pb.close();
                }
                pb.move_to(start.0, start.1);
            }
            let end = match curve {
                OutlineCurve::Line(_, p1) => {
                    let p1 = map(*p1);
                    pb.line_to(p1.0, p1.1);
                    p1
                }
                OutlineCurve::Quad(_, c, p2) => {
                    let (c, p2) = (map(*c), map(*p2));
                    pb.quad_to(c.0, c.1, p2.0, p2.1);
                    p2
                }
                OutlineCurve::Cubic(_, c1, c2, p3) => {
                    let (c1, c2, p3) = (map(*c1), map(*c2), map(*p3));
                    pb.cubic_to(c1.0, c1.1, c2.0, c2.1, p3.0, p3.1);
                    p3
                }
            };
            pen = Some(end);
        }
        if pen.is_some() {
            pb.close();
        }
        let path = pb.finish()?;

        if cell.rotated {
            let c = cell.center(font_size);
            return path.transform(Transform::from_rotate_at(90.0, c.x, c.y));
        }
        Some(path)
    }
}

/// Directories searched for fallback fonts, user fonts first
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = dirs::font_dir().into_iter().collect();
    dirs.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
            "C:\\Windows\\Fonts",
        ]
        .iter()
        .map(PathBuf::from),
    );
    dirs
}

/// First of `names` found under the font directories, in `names` order
fn find_system_font(names: &[&str]) -> Option<PathBuf> {
    let dirs = font_dirs();
    names
        .iter()
        .find_map(|name| dirs.iter().find_map(|dir| find_file(dir, name, FONT_SEARCH_DEPTH)))
}

fn find_file(dir: &FsPath, name: &str, depth: usize) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name().to_str() == Some(name) {
            return Some(path);
        }
    }
    if depth == 0 {
        return None;
    }
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, name, depth - 1))
}

/// How a text run is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
    pub vertical: bool,
    /// Draw the white halo (and soft shadow) under the glyphs
    pub halo: bool,
}

impl TextStyle {
    pub fn new(font_size: f32, color: Color) -> Self {
        Self {
            font_size,
            color,
            align: TextAlign::Left,
            vertical: false,
            halo: true,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }
}

static MISSING_FONT: Once = Once::new();

/// Draw a text block anchored at `anchor` with the layout of `text_box`
///
/// Each glyph is stroked in white at decreasing widths, widest first, on
/// top of a wide translucent pass that stands in for a soft shadow; the
/// colored fill goes last.
pub fn draw_text(
    surface: &mut Surface,
    glyphs: Option<&GlyphPainter>,
    anchor: Point,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() || style.font_size <= 0.0 {
        return;
    }
    let Some(painter) = glyphs else {
        MISSING_FONT.call_once(|| log::debug!("No glyph font configured; text passes skipped"));
        return;
    };

    let fs = style.font_size;
    let paths: Vec<Path> = layout_glyphs(anchor, text, fs, style.align, style.vertical)
        .iter()
        .filter(|cell| !cell.ch.is_whitespace())
        .filter_map(|cell| painter.glyph_path(cell, fs))
        .collect();

    if style.halo {
        let shadow = solid_paint(Color::WHITE.with_alpha((halo::SHADOW_ALPHA * 255.0) as u8));
        let shadow_stroke = round_stroke(fs * halo::SHADOW_WIDTH);
        for path in &paths {
            surface.stroke_with(path, &shadow, &shadow_stroke);
        }
        for width in halo::PASSES {
            for path in &paths {
                surface.stroke(path, Color::WHITE, fs * width);
            }
        }
    }
    for path in &paths {
        surface.fill(path, style.color);
    }
}
