//! Drawing tools and their per-session options

use crate::config::MarkupConfig;
use crate::domain::{Color, Orientation, Shape, Stamp, StampKind};

/// Active tool of the interaction machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Line,
    Arrow,
    DoubleArrow,
    /// Double arrow with a centred dimension label
    DoubleArrowAnnotated,
    Rect,
    /// Leader line, then a square with a one-character label
    LabeledRect,
    Ellipse,
    Semicircle,
    Chevron,
    LShape,
    ZShape,
    Bracket,
    RectSymbolStamp,
    TriangleSymbolStamp,
    Pen,
    Marker,
    Eraser,
    /// Click vertices, double-click or Enter to close
    Polyline,
    FontLabel,
    Text,
    Stamp(StampKind),
}

/// How a tool turns pointer input into geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Press, drag, release between two corners
    TwoCorner,
    /// Press, drag, release collecting every pointer position
    Freehand,
    /// Press places, drag distance decides on a leader line
    Stamp,
    /// One vertex per click
    Vertices,
    /// Leader phase followed by a square-drag phase
    LeaderThenBox,
    /// A single click opens a text prompt
    Click,
    /// Selection and manipulation of existing markup
    Select,
}

impl Tool {
    pub fn gesture(self) -> Gesture {
        match self {
            Tool::Select => Gesture::Select,
            Tool::Pen | Tool::Marker | Tool::Eraser => Gesture::Freehand,
            Tool::Stamp(_) => Gesture::Stamp,
            Tool::Polyline => Gesture::Vertices,
            Tool::LabeledRect => Gesture::LeaderThenBox,
            Tool::Text => Gesture::Click,
            _ => Gesture::TwoCorner,
        }
    }

    /// Tools whose shape may receive a caption through a second click
    pub fn supports_annotation(self) -> bool {
        matches!(self, Tool::Rect | Tool::Ellipse | Tool::Line)
    }

    /// Tools whose shift modifier snaps the drag to 45° steps
    pub fn snaps_angle(self) -> bool {
        matches!(
            self,
            Tool::Line
                | Tool::Arrow
                | Tool::DoubleArrow
                | Tool::DoubleArrowAnnotated
                | Tool::Polyline
        )
    }

    /// Tools drawn with an orientation that ctrl flips
    pub fn is_oriented(self) -> bool {
        matches!(
            self,
            Tool::Semicircle | Tool::Chevron | Tool::LShape | Tool::ZShape | Tool::Bracket
        )
    }

    /// Wire name of the object type the tool produces
    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Line => "line",
            Tool::Arrow => "arrow",
            Tool::DoubleArrow => "doubleArrow",
            Tool::DoubleArrowAnnotated => "doubleArrowAnnotated",
            Tool::Rect => "rect",
            Tool::LabeledRect => "labeledRect",
            Tool::Ellipse => "ellipse",
            Tool::Semicircle => "semicircle",
            Tool::Chevron => "chevron",
            Tool::LShape => "lshape",
            Tool::ZShape => "zshape",
            Tool::Bracket => "bracket",
            Tool::RectSymbolStamp => "rectSymbolStamp",
            Tool::TriangleSymbolStamp => "triangleSymbolStamp",
            Tool::Pen => "pen",
            Tool::Marker => "marker",
            Tool::Eraser => "eraser",
            Tool::Polyline => "polyline",
            Tool::FontLabel => "fontLabel",
            Tool::Text => "text",
            Tool::Stamp(kind) => Shape::stamp(kind, Stamp::default()).type_name(),
        }
    }
}

/// Styling and behavior applied to new objects
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOptions {
    pub color: Color,
    pub line_width: f32,
    pub eraser_width: f32,
    pub font_size: f32,
    pub stamp_size: f32,
    pub stamp_offset_multiplier: f32,
    pub stamp_leader_threshold: f32,
    pub labeled_rect_leader_length: f32,
    pub min_shape_size: f32,
    pub hit_tolerance: f32,
    pub handle_size: f32,
    /// Base orientation of oriented shapes; ctrl draws the other one
    pub orientation: Orientation,
    /// Rect, ellipse and line wait for a caption leader click after commit
    pub annotate: bool,
    /// Text tool writes vertical columns
    pub vertical_text: bool,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self::from(&MarkupConfig::default())
    }
}

impl From<&MarkupConfig> for ToolOptions {
    fn from(config: &MarkupConfig) -> Self {
        Self {
            color: config.color,
            line_width: config.line_width,
            eraser_width: config.eraser_width,
            font_size: config.font_size,
            stamp_size: config.stamp_size,
            stamp_offset_multiplier: config.stamp_offset_multiplier,
            stamp_leader_threshold: config.stamp_leader_threshold,
            labeled_rect_leader_length: config.labeled_rect_leader_length,
            min_shape_size: config.min_shape_size,
            hit_tolerance: config.hit_tolerance,
            handle_size: config.handle_size,
            orientation: Orientation::default(),
            annotate: false,
            vertical_text: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_classes() {
        assert_eq!(Tool::Rect.gesture(), Gesture::TwoCorner);
        assert_eq!(Tool::Eraser.gesture(), Gesture::Freehand);
        assert_eq!(Tool::Stamp(StampKind::Done).gesture(), Gesture::Stamp);
        assert_eq!(Tool::LabeledRect.gesture(), Gesture::LeaderThenBox);
    }

    #[test]
    fn test_options_follow_config() {
        let config = MarkupConfig {
            line_width: 5.0,
            ..Default::default()
        };
        let options = ToolOptions::from(&config);
        assert_eq!(options.line_width, 5.0);
        assert_eq!(options.labeled_rect_leader_length, 30.0);
        assert!(!options.annotate);
    }
}
