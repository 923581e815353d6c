//! Bounding boxes for drawing objects
//!
//! Two variants exist. [`bounds`] is the full box including captions and
//! leader lines, used for culling, selection and eraser linking.
//! [`shape_bounds`] covers only the shape itself and provides the rotation
//! pivot. Both are pure and total: malformed or unknown objects get a
//! point-sized box at their start position.

use crate::domain::{
    AnnotatedSegment, Bounds, DrawingObject, FontLabel, LabeledBox, Point, Shape, TextAlign,
};

use super::text_metrics::{self, LINE_HEIGHT};

/// Extra margin added beyond half the stroke width
pub const STROKE_MARGIN: f32 = 2.0;

/// Stroke padding for a line width: `line_width / 2 + 2`
#[inline]
pub fn stroke_padding(line_width: f32) -> f32 {
    line_width * 0.5 + STROKE_MARGIN
}

/// Pad a raw geometry box for its stroke
///
/// The origin moves out by half the stroke width and the extent grows by the
/// full stroke padding, so a 2px rect spanning (10,10)-(110,60) reports
/// `{9, 9, 103, 53}`.
pub fn pad_for_stroke(raw: Bounds, line_width: f32) -> Bounds {
    let half = line_width * 0.5;
    let pad = stroke_padding(line_width);
    Bounds::new(raw.x - half, raw.y - half, raw.width + pad, raw.height + pad)
}

/// Raw (unpadded) geometry box of the shape
fn raw_shape_box(shape: &Shape) -> Option<Bounds> {
    if let Some((kind, stamp)) = shape.as_stamp() {
        let (hw, hh) = kind.footprint(stamp.size).half_extents();
        let c = stamp.start_pos;
        return Some(Bounds::new(c.x - hw, c.y - hh, hw * 2.0, hh * 2.0));
    }
    if let Some((a, b)) = shape.corners() {
        return Some(Bounds::from_corners(a, b));
    }
    match shape {
        Shape::Text(t) => Some(text_metrics::text_box(
            t.start_pos,
            &t.text,
            t.font_size,
            t.align,
            t.is_vertical,
        )),
        _ => None,
    }
}

/// Shape geometry without stroke padding
pub fn geometry_bounds(obj: &DrawingObject) -> Bounds {
    match &obj.shape {
        Shape::Pen(_) | Shape::Marker(_) | Shape::Eraser(_) | Shape::Polyline(_) => {
            let points = obj.shape.points().unwrap_or_default();
            Bounds::from_points(points).unwrap_or_default()
        }
        Shape::Image(i) => Bounds::from_corners(i.start_pos, i.end_pos),
        shape => raw_shape_box(shape).unwrap_or_else(|| Bounds::point(shape.start_pos())),
    }
}

/// Shape-only bounds: excludes captions and leader lines
///
/// Freehand strokes, images and unknown shapes are not stroke-padded.
pub fn shape_bounds(obj: &DrawingObject) -> Bounds {
    let raw = geometry_bounds(obj);
    match &obj.shape {
        Shape::Pen(_)
        | Shape::Marker(_)
        | Shape::Eraser(_)
        | Shape::Polyline(_)
        | Shape::Image(_)
        | Shape::Unknown => raw,
        _ => pad_for_stroke(raw, obj.line_width()),
    }
}

/// Full bounds: shape plus leader lines, labels and caption annotation
pub fn bounds(obj: &DrawingObject) -> Bounds {
    let mut b = shape_bounds(obj);

    match &obj.shape {
        Shape::FontLabel(label) => {
            let anchor = font_label_anchor(obj, label);
            b = b.union(&text_metrics::font_label_box(
                anchor,
                &label.font_name,
                label.font_size,
                label.text_align,
            ));
        }
        Shape::DoubleArrowAnnotated(seg) if !seg.text.is_empty() => {
            b = b.union(&segment_label_box(seg));
        }
        _ => {}
    }

    if let Some(leader) = &obj.leader_line {
        b = b.include(leader.start).include(leader.end);
    }

    if let Some(annotation) = &obj.annotation {
        b = b.union(&annotation_text_box(annotation));
        if let Some(leader) = &annotation.leader_line {
            b = b.include(leader.start).include(leader.end);
        }
    }
    b
}

/// Rotation pivot: centre of the shape-only bounds
pub fn rotation_pivot(obj: &DrawingObject) -> Point {
    shape_bounds(obj).center()
}

/// Axis-aligned box around the full bounds after applying the rotation
pub fn rotated_bounds(obj: &DrawingObject) -> Bounds {
    let b = bounds(obj);
    if !obj.is_rotated() {
        return b;
    }
    b.rotated_about(rotation_pivot(obj), obj.rotation())
}

/// Text box of a caption annotation
pub fn annotation_text_box(annotation: &crate::domain::Annotation) -> Bounds {
    text_metrics::text_box(
        annotation.anchor(),
        &annotation.text,
        annotation.font_size,
        annotation.align,
        annotation.is_vertical,
    )
}

/// Where a font-name label is anchored: the leader end, else the box's right edge
pub fn font_label_anchor(obj: &DrawingObject, label: &FontLabel) -> Point {
    if let Some(leader) = &obj.leader_line {
        return leader.end;
    }
    let b = Bounds::from_corners(label.start_pos, label.end_pos);
    match label.text_align {
        TextAlign::Right => Point::new(b.x, b.center().y),
        _ => Point::new(b.right(), b.center().y),
    }
}

/// Label box centred on the midpoint of an annotated double arrow
pub fn segment_label_box(seg: &AnnotatedSegment) -> Bounds {
    let mid = Point::new(
        (seg.start_pos.x + seg.end_pos.x) * 0.5,
        (seg.start_pos.y + seg.end_pos.y) * 0.5,
    );
    let height = LINE_HEIGHT * seg.font_size;
    text_metrics::text_box(
        Point::new(mid.x, mid.y - height * 0.5),
        &seg.text,
        seg.font_size,
        TextAlign::Center,
        false,
    )
}

/// Font size and right/bottom anchor of a labeled rect's one-character label
///
/// The label sits inside the square's bottom-right corner.
pub fn labeled_rect_label(b: &LabeledBox) -> (Point, f32) {
    let square = Bounds::from_corners(b.start_pos, b.end_pos);
    let side = square.width.min(square.height);
    let font_size = (side * 0.45).max(8.0);
    let inset = side * 0.08;
    let anchor = Point::new(
        square.right() - inset,
        square.bottom() - inset - font_size * LINE_HEIGHT,
    );
    (anchor, font_size)
}
