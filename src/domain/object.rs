//! Drawing object model
//!
//! All geometry is stored in page-local coordinates. Two-corner shapes keep
//! their corners unordered; every consumer normalizes via min/max.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::geometry::Point;

/// Stroke width used when an object carries none
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;
/// Font size used when a text-bearing record carries none
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Stamp size used when a stamp carries none
pub const DEFAULT_STAMP_SIZE: f32 = 24.0;

/// Identifier assigned by the object store at commit time
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal anchoring of a text box relative to its anchor point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Which variant of an orientable shape is drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

/// Straight leader line from an anchor on the markup to a label
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    #[serde(default)]
    pub start: Point,
    #[serde(default)]
    pub end: Point,
}

impl LeaderLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Caption text attached to a rect, ellipse or line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub is_vertical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_line: Option<LeaderLine>,
}

impl Annotation {
    /// Horizontal caption anchored at `at`
    pub fn new(text: impl Into<String>, at: Point, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x: at.x,
            y: at.y,
            font_size,
            align: TextAlign::Left,
            is_vertical: false,
            color: None,
            leader_line: None,
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_stamp_size() -> f32 {
    DEFAULT_STAMP_SIZE
}

// ============================================================================
// Per-type geometry records
// ============================================================================

/// Two unordered corners
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
}

impl Corners {
    pub fn new(start_pos: Point, end_pos: Point) -> Self {
        Self { start_pos, end_pos }
    }
}

/// Two corners plus the drawn variant of an orientable shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oriented {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Ordered vertex list for freehand strokes and polylines
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Eraser stroke and the objects it occludes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraserStroke {
    #[serde(default)]
    pub points: Vec<Point>,
    /// Computed once at commit from bounding-box intersection
    #[serde(default)]
    pub linked_object_ids: BTreeSet<ObjectId>,
}

/// Instruction stamp centred on `start_pos`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default = "default_stamp_size")]
    pub size: f32,
}

impl Default for Stamp {
    fn default() -> Self {
        Self {
            start_pos: Point::default(),
            size: DEFAULT_STAMP_SIZE,
        }
    }
}

/// Square box with a one-character label in its bottom-right corner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledBox {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
    #[serde(default)]
    pub label: String,
}

/// Box around set text plus a font-name label at the leader end
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontLabel {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
    #[serde(default)]
    pub font_name: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub text_align: TextAlign,
}

/// Free text anchored at `start_pos`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub is_vertical: bool,
}

/// Double-headed arrow with a centred label (e.g. a dimension)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSegment {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

/// Decoded image pixels; never serialized
#[derive(Clone)]
pub struct ImageData(pub Arc<tiny_skia::Pixmap>);

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageData({}x{})", self.0.width(), self.0.height())
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Placed raster image
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    #[serde(default)]
    pub start_pos: Point,
    #[serde(default)]
    pub end_pos: Point,
    /// Reference understood by the persistence layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip)]
    pub pixels: Option<ImageData>,
}

// ============================================================================
// Stamps
// ============================================================================

/// Fixed-glyph proofreading instruction stamps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StampKind {
    Done,
    Komoji,
    Ruby,
    Toru,
    Torutsume,
    Torumama,
    Zenkakuaki,
    Nibunaki,
    Shibunaki,
    Kaigyou,
}

/// Outline a stamp is drawn and hit-tested with
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Footprint {
    Circle { radius: f32 },
    RoundedRect { width: f32, height: f32 },
}

impl Footprint {
    /// Half extents along x and y
    pub fn half_extents(&self) -> (f32, f32) {
        match *self {
            Footprint::Circle { radius } => (radius, radius),
            Footprint::RoundedRect { width, height } => (width * 0.5, height * 0.5),
        }
    }

    /// Distance from the centre to the outline along a unit direction
    pub fn edge_distance(&self, dir_x: f32, dir_y: f32) -> f32 {
        match *self {
            Footprint::Circle { radius } => radius,
            Footprint::RoundedRect { width, height } => {
                let hw = width * 0.5;
                let hh = height * 0.5;
                let tx = if dir_x.abs() > f32::EPSILON {
                    hw / dir_x.abs()
                } else {
                    f32::INFINITY
                };
                let ty = if dir_y.abs() > f32::EPSILON {
                    hh / dir_y.abs()
                } else {
                    f32::INFINITY
                };
                let t = tx.min(ty);
                if t.is_finite() { t } else { 0.0 }
            }
        }
    }
}

/// Stamp footprints (width ratio, height ratio) relative to the stamp size
const CIRCLE_RATIO: f32 = 1.0;
const RUBY_TORU_WIDTH: f32 = 1.8;
const TSUME_MAMA_WIDTH: f32 = 2.5;
const AKI_WIDTH: f32 = 3.0;
const KAIGYOU_WIDTH: f32 = 1.5;
const BADGE_HEIGHT: f32 = 0.9;

impl StampKind {
    pub const ALL: [StampKind; 10] = [
        StampKind::Done,
        StampKind::Komoji,
        StampKind::Ruby,
        StampKind::Toru,
        StampKind::Torutsume,
        StampKind::Torumama,
        StampKind::Zenkakuaki,
        StampKind::Nibunaki,
        StampKind::Shibunaki,
        StampKind::Kaigyou,
    ];

    /// Glyphs printed inside the stamp
    pub fn glyphs(self) -> &'static str {
        match self {
            StampKind::Done => "済",
            StampKind::Komoji => "小",
            StampKind::Ruby => "ルビ",
            StampKind::Toru => "トル",
            StampKind::Torutsume => "トルツメ",
            StampKind::Torumama => "トルママ",
            StampKind::Zenkakuaki => "全角アキ",
            StampKind::Nibunaki => "2分アキ",
            StampKind::Shibunaki => "4分アキ",
            StampKind::Kaigyou => "改行",
        }
    }

    /// Outline for a stamp of the given size
    pub fn footprint(self, size: f32) -> Footprint {
        let width_ratio = match self {
            StampKind::Done | StampKind::Komoji => {
                return Footprint::Circle {
                    radius: size * CIRCLE_RATIO * 0.5,
                };
            }
            StampKind::Ruby | StampKind::Toru => RUBY_TORU_WIDTH,
            StampKind::Torutsume | StampKind::Torumama => TSUME_MAMA_WIDTH,
            StampKind::Zenkakuaki | StampKind::Nibunaki | StampKind::Shibunaki => AKI_WIDTH,
            StampKind::Kaigyou => KAIGYOU_WIDTH,
        };
        Footprint::RoundedRect {
            width: size * width_ratio,
            height: size * BADGE_HEIGHT,
        }
    }
}

// ============================================================================
// Shape union
// ============================================================================

/// Per-type geometry, tagged by the `type` discriminant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    Line(Corners),
    Arrow(Corners),
    DoubleArrow(Corners),
    DoubleArrowAnnotated(AnnotatedSegment),
    Rect(Corners),
    LabeledRect(LabeledBox),
    Ellipse(Corners),
    Semicircle(Oriented),
    Chevron(Oriented),
    #[serde(rename = "lshape")]
    LShape(Oriented),
    #[serde(rename = "zshape")]
    ZShape(Oriented),
    Bracket(Oriented),
    RectSymbolStamp(Corners),
    TriangleSymbolStamp(Corners),
    Pen(Freehand),
    Marker(Freehand),
    Eraser(EraserStroke),
    Polyline(Freehand),
    FontLabel(FontLabel),
    Text(TextBlock),
    Image(ImagePlacement),
    DoneStamp(Stamp),
    KomojiStamp(Stamp),
    RubyStamp(Stamp),
    ToruStamp(Stamp),
    TorutsumeStamp(Stamp),
    TorumamaStamp(Stamp),
    ZenkakuakiStamp(Stamp),
    NibunakiStamp(Stamp),
    ShibunakiStamp(Stamp),
    KaigyouStamp(Stamp),
    /// Discriminant this version does not know; drawn as nothing, bounded as a point
    #[serde(other)]
    Unknown,
}

impl Shape {
    /// Build the stamp variant for a kind
    pub fn stamp(kind: StampKind, stamp: Stamp) -> Shape {
        match kind {
            StampKind::Done => Shape::DoneStamp(stamp),
            StampKind::Komoji => Shape::KomojiStamp(stamp),
            StampKind::Ruby => Shape::RubyStamp(stamp),
            StampKind::Toru => Shape::ToruStamp(stamp),
            StampKind::Torutsume => Shape::TorutsumeStamp(stamp),
            StampKind::Torumama => Shape::TorumamaStamp(stamp),
            StampKind::Zenkakuaki => Shape::ZenkakuakiStamp(stamp),
            StampKind::Nibunaki => Shape::NibunakiStamp(stamp),
            StampKind::Shibunaki => Shape::ShibunakiStamp(stamp),
            StampKind::Kaigyou => Shape::KaigyouStamp(stamp),
        }
    }

    /// Stamp kind and geometry for instruction stamps
    pub fn as_stamp(&self) -> Option<(StampKind, &Stamp)> {
        let pair = match self {
            Shape::DoneStamp(s) => (StampKind::Done, s),
            Shape::KomojiStamp(s) => (StampKind::Komoji, s),
            Shape::RubyStamp(s) => (StampKind::Ruby, s),
            Shape::ToruStamp(s) => (StampKind::Toru, s),
            Shape::TorutsumeStamp(s) => (StampKind::Torutsume, s),
            Shape::TorumamaStamp(s) => (StampKind::Torumama, s),
            Shape::ZenkakuakiStamp(s) => (StampKind::Zenkakuaki, s),
            Shape::NibunakiStamp(s) => (StampKind::Nibunaki, s),
            Shape::ShibunakiStamp(s) => (StampKind::Shibunaki, s),
            Shape::KaigyouStamp(s) => (StampKind::Kaigyou, s),
            _ => return None,
        };
        Some(pair)
    }

    fn as_stamp_mut(&mut self) -> Option<&mut Stamp> {
        match self {
            Shape::DoneStamp(s)
            | Shape::KomojiStamp(s)
            | Shape::RubyStamp(s)
            | Shape::ToruStamp(s)
            | Shape::TorutsumeStamp(s)
            | Shape::TorumamaStamp(s)
            | Shape::ZenkakuakiStamp(s)
            | Shape::NibunakiStamp(s)
            | Shape::ShibunakiStamp(s)
            | Shape::KaigyouStamp(s) => Some(s),
            _ => None,
        }
    }

    /// The two corners of corner-based shapes
    pub fn corners(&self) -> Option<(Point, Point)> {
        match self {
            Shape::Line(c)
            | Shape::Arrow(c)
            | Shape::DoubleArrow(c)
            | Shape::Rect(c)
            | Shape::Ellipse(c)
            | Shape::RectSymbolStamp(c)
            | Shape::TriangleSymbolStamp(c) => Some((c.start_pos, c.end_pos)),
            Shape::Semicircle(o)
            | Shape::Chevron(o)
            | Shape::LShape(o)
            | Shape::ZShape(o)
            | Shape::Bracket(o) => Some((o.start_pos, o.end_pos)),
            Shape::DoubleArrowAnnotated(s) => Some((s.start_pos, s.end_pos)),
            Shape::LabeledRect(b) => Some((b.start_pos, b.end_pos)),
            Shape::FontLabel(f) => Some((f.start_pos, f.end_pos)),
            Shape::Image(i) => Some((i.start_pos, i.end_pos)),
            _ => None,
        }
    }

    /// Vertex list of freehand strokes and polylines
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Shape::Pen(f) | Shape::Marker(f) | Shape::Polyline(f) => Some(&f.points),
            Shape::Eraser(e) => Some(&e.points),
            _ => None,
        }
    }

    /// Reference position of the shape; the origin for malformed shapes
    pub fn start_pos(&self) -> Point {
        if let Some((start, _)) = self.corners() {
            return start;
        }
        if let Some(points) = self.points() {
            return points.first().copied().unwrap_or_default();
        }
        if let Some((_, stamp)) = self.as_stamp() {
            return stamp.start_pos;
        }
        match self {
            Shape::Text(t) => t.start_pos,
            _ => Point::default(),
        }
    }

    /// Wire name of the discriminant
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::DoubleArrow(_) => "doubleArrow",
            Shape::DoubleArrowAnnotated(_) => "doubleArrowAnnotated",
            Shape::Rect(_) => "rect",
            Shape::LabeledRect(_) => "labeledRect",
            Shape::Ellipse(_) => "ellipse",
            Shape::Semicircle(_) => "semicircle",
            Shape::Chevron(_) => "chevron",
            Shape::LShape(_) => "lshape",
            Shape::ZShape(_) => "zshape",
            Shape::Bracket(_) => "bracket",
            Shape::RectSymbolStamp(_) => "rectSymbolStamp",
            Shape::TriangleSymbolStamp(_) => "triangleSymbolStamp",
            Shape::Pen(_) => "pen",
            Shape::Marker(_) => "marker",
            Shape::Eraser(_) => "eraser",
            Shape::Polyline(_) => "polyline",
            Shape::FontLabel(_) => "fontLabel",
            Shape::Text(_) => "text",
            Shape::Image(_) => "image",
            Shape::DoneStamp(_) => "doneStamp",
            Shape::KomojiStamp(_) => "komojiStamp",
            Shape::RubyStamp(_) => "rubyStamp",
            Shape::ToruStamp(_) => "toruStamp",
            Shape::TorutsumeStamp(_) => "torutsumeStamp",
            Shape::TorumamaStamp(_) => "torumamaStamp",
            Shape::ZenkakuakiStamp(_) => "zenkakuakiStamp",
            Shape::NibunakiStamp(_) => "nibunakiStamp",
            Shape::ShibunakiStamp(_) => "shibunakiStamp",
            Shape::KaigyouStamp(_) => "kaigyouStamp",
            Shape::Unknown => "unknown",
        }
    }

    /// Apply `f` to every stored point; stamp sizes scale by `size_scale`
    fn map_points(&mut self, f: &impl Fn(Point) -> Point, size_scale: f32) {
        match self {
            Shape::Line(c)
            | Shape::Arrow(c)
            | Shape::DoubleArrow(c)
            | Shape::Rect(c)
            | Shape::Ellipse(c)
            | Shape::RectSymbolStamp(c)
            | Shape::TriangleSymbolStamp(c) => {
                c.start_pos = f(c.start_pos);
                c.end_pos = f(c.end_pos);
            }
            Shape::Semicircle(o)
            | Shape::Chevron(o)
            | Shape::LShape(o)
            | Shape::ZShape(o)
            | Shape::Bracket(o) => {
                o.start_pos = f(o.start_pos);
                o.end_pos = f(o.end_pos);
            }
            Shape::DoubleArrowAnnotated(s) => {
                s.start_pos = f(s.start_pos);
                s.end_pos = f(s.end_pos);
            }
            Shape::LabeledRect(b) => {
                b.start_pos = f(b.start_pos);
                b.end_pos = f(b.end_pos);
            }
            Shape::FontLabel(l) => {
                l.start_pos = f(l.start_pos);
                l.end_pos = f(l.end_pos);
            }
            Shape::Image(i) => {
                i.start_pos = f(i.start_pos);
                i.end_pos = f(i.end_pos);
            }
            Shape::Pen(fh) | Shape::Marker(fh) | Shape::Polyline(fh) => {
                for p in &mut fh.points {
                    *p = f(*p);
                }
            }
            Shape::Eraser(e) => {
                for p in &mut e.points {
                    *p = f(*p);
                }
            }
            Shape::Text(t) => t.start_pos = f(t.start_pos),
            Shape::Unknown => {}
            stamp => {
                if let Some(s) = stamp.as_stamp_mut() {
                    s.start_pos = f(s.start_pos);
                    s.size *= size_scale;
                }
            }
        }
    }
}

// ============================================================================
// Drawing object
// ============================================================================

/// One piece of vector markup on a page
///
/// Drafts (uncommitted geometry) have no `id`; the object store assigns it
/// exactly once when the draft is added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(default)]
    pub z_index: i32,
    /// Radians about the shape-only bounds centre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_line: Option<LeaderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl DrawingObject {
    /// New draft with default styling
    pub fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            color: None,
            line_width: None,
            z_index: 0,
            rotation: None,
            leader_line: None,
            annotation: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = Some(radians);
        self
    }

    pub fn with_leader_line(mut self, leader: LeaderLine) -> Self {
        self.leader_line = Some(leader);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Stroke color, falling back to black
    pub fn color(&self) -> Color {
        self.color.unwrap_or_default()
    }

    /// Stroke width, falling back to [`DEFAULT_LINE_WIDTH`]
    pub fn line_width(&self) -> f32 {
        match self.line_width {
            Some(w) if w.is_finite() && w >= 0.0 => w,
            _ => DEFAULT_LINE_WIDTH,
        }
    }

    /// Rotation in radians; zero when unset
    pub fn rotation(&self) -> f32 {
        match self.rotation {
            Some(r) if r.is_finite() => r,
            _ => 0.0,
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation() != 0.0
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self.shape, Shape::Eraser(_))
    }

    /// Types an eraser stroke may be linked to
    pub fn is_erasable(&self) -> bool {
        matches!(
            self.shape,
            Shape::Pen(_)
                | Shape::Marker(_)
                | Shape::Rect(_)
                | Shape::Ellipse(_)
                | Shape::Line(_)
                | Shape::Arrow(_)
                | Shape::DoubleArrow(_)
                | Shape::Polyline(_)
        )
    }

    /// Types that accept a nested caption annotation
    pub fn supports_annotation(&self) -> bool {
        matches!(self.shape, Shape::Rect(_) | Shape::Ellipse(_) | Shape::Line(_))
    }

    /// Move every stored point, the leader line and the caption
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform_points(|p| p.offset(dx, dy), 1.0);
    }

    /// Apply `f` to all stored geometry including leader lines and captions
    ///
    /// Stamp sizes and font sizes are left alone except for stamps, whose
    /// size is multiplied by `size_scale`.
    pub fn transform_points(&mut self, f: impl Fn(Point) -> Point, size_scale: f32) {
        self.shape.map_points(&f, size_scale);
        if let Some(leader) = &mut self.leader_line {
            leader.start = f(leader.start);
            leader.end = f(leader.end);
        }
        if let Some(annotation) = &mut self.annotation {
            let anchor = f(annotation.anchor());
            annotation.x = anchor.x;
            annotation.y = anchor.y;
            if let Some(leader) = &mut annotation.leader_line {
                leader.start = f(leader.start);
                leader.end = f(leader.end);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_style_missing() {
        let obj = DrawingObject::new(Shape::Rect(Corners::default()));
        assert_eq!(obj.color(), Color::BLACK);
        assert_eq!(obj.line_width(), DEFAULT_LINE_WIDTH);
        assert_eq!(obj.rotation(), 0.0);
    }

    #[test]
    fn test_json_uses_type_tag_and_camel_case() {
        let obj = DrawingObject::new(Shape::Rect(Corners::new(
            Point::new(10.0, 10.0),
            Point::new(110.0, 60.0),
        )))
        .with_color(Color::rgb(255, 0, 0));
        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(value["type"], "rect");
        assert_eq!(value["startPos"]["x"], 10.0);
        assert_eq!(value["color"], "#ff0000");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_unknown_type_deserializes_gracefully() {
        let obj: DrawingObject =
            serde_json::from_str(r#"{"type":"hologram","zIndex":3}"#).unwrap();
        assert_eq!(obj.shape, Shape::Unknown);
        assert_eq!(obj.z_index, 3);
    }

    #[test]
    fn test_missing_points_default_to_origin() {
        let obj: DrawingObject = serde_json::from_str(r#"{"type":"ellipse"}"#).unwrap();
        assert_eq!(
            obj.shape,
            Shape::Ellipse(Corners::new(Point::default(), Point::default()))
        );
    }

    #[test]
    fn test_stamp_variants_round_trip_kind() {
        for kind in StampKind::ALL {
            let shape = Shape::stamp(kind, Stamp::default());
            assert_eq!(shape.as_stamp().map(|(k, _)| k), Some(kind));
            assert!(shape.type_name().ends_with("Stamp"));
        }
    }

    #[test]
    fn test_translate_moves_leader_and_caption() {
        let mut obj = DrawingObject::new(Shape::Line(Corners::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )))
        .with_annotation(Annotation {
            leader_line: Some(LeaderLine::new(Point::new(5.0, 0.0), Point::new(5.0, 20.0))),
            ..Annotation::new("note", Point::new(5.0, 20.0), 12.0)
        });
        obj.translate(3.0, 4.0);
        assert_eq!(obj.shape.start_pos(), Point::new(3.0, 4.0));
        let annotation = obj.annotation.unwrap();
        assert_eq!(annotation.anchor(), Point::new(8.0, 24.0));
        assert_eq!(
            annotation.leader_line.unwrap().start,
            Point::new(8.0, 4.0)
        );
    }

    #[test]
    fn test_wide_footprint_edge_distance() {
        let fp = StampKind::Zenkakuaki.footprint(20.0);
        assert_eq!(fp, Footprint::RoundedRect { width: 60.0, height: 18.0 });
        assert_eq!(fp.edge_distance(1.0, 0.0), 30.0);
        assert_eq!(fp.edge_distance(0.0, -1.0), 9.0);
    }
}
