//! Draft geometry built from pointer input
//!
//! Pure helpers: snapping, per-tool shape construction, stamp placement,
//! caption leader anchoring and eraser linking. The state machine calls
//! these for both live previews and commits.

use std::collections::BTreeSet;

use super::events::Modifiers;
use super::tool::{Tool, ToolOptions};
use crate::domain::{
    AnnotatedSegment, Bounds, Corners, DrawingObject, EraserStroke, FontLabel, Freehand,
    LeaderLine, ObjectId, Oriented, Point, Shape, Stamp, StampKind, TextAlign,
    closest_point_on_segment,
};
use crate::geometry::bounds::rotated_bounds;
use crate::geometry::outline::ellipse_in;
use crate::render::geometry::direction;

/// Length of the fixed leader from a font-label box to its name
pub const FONT_LABEL_LEADER_LENGTH: f32 = 30.0;
/// Gap between a labeled rect's leader end and the corner its box grows from
pub const LABELED_BOX_GAP: f32 = 8.0;

// ============================================================================
// Snapping
// ============================================================================

/// Make the drag a square, keeping its direction
pub fn snap_square(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let side = dx.abs().max(dy.abs());
    Point::new(start.x + side.copysign(dx), start.y + side.copysign(dy))
}

/// Snap the drag direction to the nearest multiple of 45°
pub fn snap_angle(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return end;
    }
    let step = std::f32::consts::FRAC_PI_4;
    let angle = (dy.atan2(dx) / step).round() * step;
    Point::new(start.x + length * angle.cos(), start.y + length * angle.sin())
}

/// Corners of a two-corner drag after modifiers
///
/// Shift squares boxes and snaps segments to 45°. Ctrl draws boxes from
/// their centre; for oriented shapes it flips the orientation instead.
pub fn corners_for(tool: Tool, start: Point, end: Point, modifiers: Modifiers) -> (Point, Point) {
    if tool.snaps_angle() {
        let end = if modifiers.shift {
            snap_angle(start, end)
        } else {
            end
        };
        return (start, end);
    }
    let end = if modifiers.shift {
        snap_square(start, end)
    } else {
        end
    };
    if modifiers.ctrl && !tool.is_oriented() {
        let opposite = Point::new(2.0 * start.x - end.x, 2.0 * start.y - end.y);
        return (opposite, end);
    }
    (start, end)
}

// ============================================================================
// Shape construction
// ============================================================================

/// Shape for a two-corner tool, or `None` for tools with other gestures
pub fn two_corner_shape(
    tool: Tool,
    start: Point,
    end: Point,
    modifiers: Modifiers,
    options: &ToolOptions,
) -> Option<Shape> {
    let (a, b) = corners_for(tool, start, end, modifiers);
    let corners = Corners::new(a, b);
    let orientation = if modifiers.ctrl {
        options.orientation.flipped()
    } else {
        options.orientation
    };
    let oriented = Oriented {
        start_pos: a,
        end_pos: b,
        orientation,
    };

    let shape = match tool {
        Tool::Line => Shape::Line(corners),
        Tool::Arrow => Shape::Arrow(corners),
        Tool::DoubleArrow => Shape::DoubleArrow(corners),
        Tool::Rect => Shape::Rect(corners),
        Tool::Ellipse => Shape::Ellipse(corners),
        Tool::RectSymbolStamp => Shape::RectSymbolStamp(corners),
        Tool::TriangleSymbolStamp => Shape::TriangleSymbolStamp(corners),
        Tool::Semicircle => Shape::Semicircle(oriented),
        Tool::Chevron => Shape::Chevron(oriented),
        Tool::LShape => Shape::LShape(oriented),
        Tool::ZShape => Shape::ZShape(oriented),
        Tool::Bracket => Shape::Bracket(oriented),
        Tool::DoubleArrowAnnotated => Shape::DoubleArrowAnnotated(AnnotatedSegment {
            start_pos: a,
            end_pos: b,
            text: String::new(),
            font_size: options.font_size,
        }),
        Tool::FontLabel => Shape::FontLabel(FontLabel {
            start_pos: a,
            end_pos: b,
            font_name: String::new(),
            font_size: options.font_size,
            text_align: TextAlign::Left,
        }),
        _ => return None,
    };
    Some(shape)
}

/// Apply the tool's color and stroke width to a fresh draft
pub fn styled(shape: Shape, options: &ToolOptions) -> DrawingObject {
    let width = if matches!(shape, Shape::Eraser(_)) {
        options.eraser_width
    } else {
        options.line_width
    };
    DrawingObject::new(shape)
        .with_color(options.color)
        .with_line_width(width)
}

/// True when a two-corner drag is too small to keep
pub fn below_minimum(start: Point, end: Point, options: &ToolOptions) -> bool {
    start.distance_to(end) < options.min_shape_size
}

/// Leader from a font-label box's right edge to where its name is written
pub fn font_label_leader(start: Point, end: Point) -> LeaderLine {
    let b = Bounds::from_corners(start, end);
    let from = Point::new(b.right(), b.center().y);
    LeaderLine::new(from, from.offset(FONT_LABEL_LEADER_LENGTH, 0.0))
}

/// Leader of a labeled rect pulled from `anchor` toward `current`
///
/// `None` until the pull reaches `length`; then the leader is clipped to
/// exactly that length.
pub fn labeled_leader(anchor: Point, current: Point, length: f32) -> Option<LeaderLine> {
    if anchor.distance_to(current) < length {
        return None;
    }
    let (ux, uy) = direction(anchor, current)?;
    Some(LeaderLine::new(anchor, anchor.offset(ux * length, uy * length)))
}

/// Corner the labeled rect's square grows from, just past the leader end
pub fn labeled_box_origin(leader: &LeaderLine) -> Point {
    match direction(leader.start, leader.end) {
        Some((ux, uy)) => leader.end.offset(ux * LABELED_BOX_GAP, uy * LABELED_BOX_GAP),
        None => leader.end,
    }
}

/// Square box phase of a labeled rect, dragged from `origin`
pub fn labeled_box_corner(origin: Point, current: Point) -> Point {
    snap_square(origin, current)
}

// ============================================================================
// Stamps
// ============================================================================

/// Stamp placed by a press at `start` and release at `end`
///
/// Short drags drop a plain stamp at `start`. Longer drags put the stamp
/// past the cursor along the drag direction, with a leader line from
/// `start` to the footprint edge facing it.
pub fn place_stamp(kind: StampKind, start: Point, end: Point, options: &ToolOptions) -> DrawingObject {
    let size = options.stamp_size;
    let unit = direction(start, end)
        .filter(|_| start.distance_to(end) >= options.stamp_leader_threshold);
    let Some((ux, uy)) = unit else {
        let stamp = Stamp {
            start_pos: start,
            size,
        };
        return styled(Shape::stamp(kind, stamp), options);
    };

    let reach = size * options.stamp_offset_multiplier;
    let center = end.offset(ux * reach, uy * reach);
    let edge = kind.footprint(size).edge_distance(ux, uy);
    let leader_end = center.offset(-ux * edge, -uy * edge);

    let stamp = Stamp {
        start_pos: center,
        size,
    };
    styled(Shape::stamp(kind, stamp), options).with_leader_line(LeaderLine::new(start, leader_end))
}

// ============================================================================
// Caption leaders
// ============================================================================

/// Where a caption leader toward `target` leaves the shape
///
/// Rects and lines use the nearest outline point; ellipses use the outline
/// point in the direction of `target` from the centre.
pub fn leader_anchor(obj: &DrawingObject, target: Point) -> Point {
    match &obj.shape {
        Shape::Line(c) => closest_point_on_segment(target, c.start_pos, c.end_pos),
        Shape::Rect(c) => {
            let [a, b, c2, d] = Bounds::from_corners(c.start_pos, c.end_pos).corners();
            [(a, b), (b, c2), (c2, d), (d, a)]
                .into_iter()
                .map(|(p, q)| closest_point_on_segment(target, p, q))
                .min_by(|p, q| target.distance_to(*p).total_cmp(&target.distance_to(*q)))
                .unwrap_or(target)
        }
        Shape::Ellipse(c) => {
            let e = ellipse_in(c.start_pos, c.end_pos);
            let dx = target.x - e.cx;
            let dy = target.y - e.cy;
            if e.is_degenerate() || (dx == 0.0 && dy == 0.0) {
                return Point::new(e.cx, e.cy);
            }
            let scale = 1.0 / ((dx / e.rx).powi(2) + (dy / e.ry).powi(2)).sqrt();
            Point::new(e.cx + dx * scale, e.cy + dy * scale)
        }
        other => other.start_pos(),
    }
}

// ============================================================================
// Freehand and erasers
// ============================================================================

/// Freehand draft for pen, marker or eraser; `None` for a bare click
pub fn freehand_shape(tool: Tool, points: Vec<Point>) -> Option<Shape> {
    if points.len() < 2 {
        return None;
    }
    let shape = match tool {
        Tool::Pen => Shape::Pen(Freehand { points }),
        Tool::Marker => Shape::Marker(Freehand { points }),
        Tool::Eraser => Shape::Eraser(EraserStroke {
            points,
            linked_object_ids: BTreeSet::new(),
        }),
        _ => return None,
    };
    Some(shape)
}

/// Ids of erasable objects an eraser stroke overlaps
///
/// The stroke's bounds, padded by half its width, are intersected with each
/// erasable object's full bounds as drawn, rotation included. Runs once per
/// stroke, at commit.
pub fn eraser_links(points: &[Point], width: f32, objects: &[DrawingObject]) -> BTreeSet<ObjectId> {
    let Some(stroke) = Bounds::from_points(points) else {
        return BTreeSet::new();
    };
    let stroke = stroke.expand(width * 0.5);
    objects
        .iter()
        .filter(|obj| obj.is_erasable())
        .filter(|obj| rotated_bounds(obj).intersects(&stroke))
        .filter_map(|obj| obj.id)
        .collect()
}
