//! Point hit-testing for drawing objects
//!
//! Rotated objects are handled by inverse-rotating the query point about the
//! shape-only bounds centre, so every per-type test below works in the
//! object's unrotated frame.

use crate::domain::{
    Annotation, Bounds, DrawingObject, Footprint, LeaderLine, Point, Shape, distance_to_segment,
};

use super::bounds::{self, annotation_text_box, font_label_anchor, segment_label_box};
use super::outline::{self, EllipseParams};
use super::text_metrics;

/// Pointer slop in page units when none is configured
pub const DEFAULT_TOLERANCE: f32 = 5.0;

/// Map a page point into the object's unrotated frame
pub fn to_object_space(point: Point, obj: &DrawingObject) -> Point {
    if !obj.is_rotated() {
        return point;
    }
    point.rotate_about(bounds::rotation_pivot(obj), -obj.rotation())
}

/// Whether `point` hits `obj` within `tolerance`
///
/// The shape is tested first; on a miss the caption annotation region and
/// the object's own leader line can each still produce a hit.
pub fn hit_test(point: Point, obj: &DrawingObject, tolerance: f32) -> bool {
    let p = to_object_space(point, obj);
    let reach = tolerance + obj.line_width() * 0.5;

    if hit_shape(p, obj, tolerance, reach) {
        return true;
    }
    if obj
        .annotation
        .as_ref()
        .is_some_and(|annotation| hit_annotation(p, annotation, reach))
    {
        return true;
    }
    obj.leader_line
        .as_ref()
        .is_some_and(|leader| near_leader(p, leader, reach))
}

fn hit_annotation(p: Point, annotation: &Annotation, reach: f32) -> bool {
    if annotation_text_box(annotation).contains(p) {
        return true;
    }
    annotation
        .leader_line
        .as_ref()
        .is_some_and(|leader| near_leader(p, leader, reach))
}

fn near_leader(p: Point, leader: &LeaderLine, reach: f32) -> bool {
    distance_to_segment(p, leader.start, leader.end) <= reach
}

/// Distance test against an open (or closed) chain of segments
fn near_polyline(p: Point, vertices: &[Point], closed: bool, reach: f32) -> bool {
    match vertices {
        [] => false,
        [only] => p.distance_to(*only) <= reach,
        _ => {
            let open_hit = vertices
                .windows(2)
                .any(|w| distance_to_segment(p, w[0], w[1]) <= reach);
            open_hit
                || (closed
                    && distance_to_segment(p, vertices[vertices.len() - 1], vertices[0]) <= reach)
        }
    }
}

/// Outline-only test against a box
fn near_box_outline(p: Point, b: &Bounds, reach: f32) -> bool {
    near_polyline(p, &b.corners(), true, reach)
}

/// Ring test on a normalized ellipse; degenerate ellipses never hit
fn near_ellipse(p: Point, e: &EllipseParams, tolerance: f32) -> bool {
    if e.is_degenerate() {
        return false;
    }
    let nx = (p.x - e.cx) / e.rx;
    let ny = (p.y - e.cy) / e.ry;
    let norm = (nx * nx + ny * ny).sqrt();
    (norm - 1.0).abs() <= tolerance / e.rx.min(e.ry)
}

fn in_footprint(p: Point, center: Point, footprint: Footprint, tolerance: f32) -> bool {
    match footprint {
        Footprint::Circle { radius } => p.distance_to(center) <= radius + tolerance,
        Footprint::RoundedRect { width, height } => {
            (p.x - center.x).abs() <= width * 0.5 + tolerance
                && (p.y - center.y).abs() <= height * 0.5 + tolerance
        }
    }
}

fn hit_shape(p: Point, obj: &DrawingObject, tolerance: f32, reach: f32) -> bool {
    if let Some((kind, stamp)) = obj.shape.as_stamp() {
        return in_footprint(p, stamp.start_pos, kind.footprint(stamp.size), tolerance);
    }

    match &obj.shape {
        Shape::Line(c) | Shape::Arrow(c) | Shape::DoubleArrow(c) => {
            distance_to_segment(p, c.start_pos, c.end_pos) <= reach
        }
        Shape::DoubleArrowAnnotated(seg) => {
            distance_to_segment(p, seg.start_pos, seg.end_pos) <= reach
                || (!seg.text.is_empty() && segment_label_box(seg).contains(p))
        }
        // Box outlines and ellipse rings take the bare tolerance; only
        // segment chains widen it by half the stroke.
        Shape::Rect(c) | Shape::RectSymbolStamp(c) => {
            near_box_outline(p, &Bounds::from_corners(c.start_pos, c.end_pos), tolerance)
        }
        Shape::LabeledRect(b) => {
            near_box_outline(p, &Bounds::from_corners(b.start_pos, b.end_pos), tolerance)
        }
        Shape::Ellipse(c) => {
            near_ellipse(p, &outline::ellipse_in(c.start_pos, c.end_pos), tolerance)
        }
        Shape::Semicircle(o) => {
            let e = outline::semicircle_in(o);
            outline::on_semicircle_half(p, &e, o.orientation) && near_ellipse(p, &e, tolerance)
        }
        Shape::Chevron(_) | Shape::LShape(_) | Shape::ZShape(_) | Shape::Bracket(_) => {
            outline::orientable_vertices(&obj.shape)
                .is_some_and(|vertices| near_polyline(p, &vertices, false, reach))
        }
        Shape::TriangleSymbolStamp(c) => {
            near_polyline(p, &outline::triangle_vertices(c.start_pos, c.end_pos), true, reach)
        }
        Shape::Pen(f) | Shape::Marker(f) | Shape::Polyline(f) => {
            near_polyline(p, &f.points, false, reach)
        }
        Shape::Eraser(e) => near_polyline(p, &e.points, false, reach),
        Shape::FontLabel(label) => {
            let anchor = font_label_anchor(obj, label);
            near_box_outline(p, &Bounds::from_corners(label.start_pos, label.end_pos), tolerance)
                || text_metrics::font_label_box(
                    anchor,
                    &label.font_name,
                    label.font_size,
                    label.text_align,
                )
                .contains(p)
        }
        Shape::Text(_) | Shape::Image(_) => bounds::bounds(obj).contains(p),
        _ => false,
    }
}

/// Indices of `objects` in paint order: ascending z-index, ties by insertion
pub fn paint_order(objects: &[DrawingObject]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..objects.len()).collect();
    // Stable sort keeps insertion order for equal z
    order.sort_by_key(|&i| objects[i].z_index);
    order
}

/// Topmost selectable object under `point`, or `None`
///
/// Objects are tested in reverse paint order; erasers are never selectable.
pub fn hit_test_all(point: Point, objects: &[DrawingObject], tolerance: f32) -> Option<usize> {
    hit_test_all_where(point, objects, tolerance, |_| true)
}

/// [`hit_test_all`] restricted to indices accepted by `eligible`
pub fn hit_test_all_where(
    point: Point,
    objects: &[DrawingObject],
    tolerance: f32,
    eligible: impl Fn(usize) -> bool,
) -> Option<usize> {
    paint_order(objects).into_iter().rev().find(|&i| {
        let obj = &objects[i];
        !obj.is_eraser() && eligible(i) && hit_test(point, obj, tolerance)
    })
}

/// Hit-test a single object by index; out-of-range indices never match
pub fn hit_test_index(point: Point, objects: &[DrawingObject], index: usize, tolerance: f32) -> bool {
    objects
        .get(index)
        .is_some_and(|obj| hit_test(point, obj, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Corners, EraserStroke, Freehand, Orientation, Oriented, Stamp, StampKind, TextAlign,
        TextBlock,
    };

    fn corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Corners {
        Corners::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_line_hit_within_tolerance() {
        let obj = DrawingObject::new(Shape::Line(corners(0.0, 0.0, 100.0, 0.0))).with_line_width(2.0);
        assert!(hit_test(Point::new(50.0, 5.9), &obj, 5.0));
        assert!(!hit_test(Point::new(50.0, 6.5), &obj, 5.0));
        assert!(!hit_test(Point::new(110.0, 0.0), &obj, 5.0));
    }

    #[test]
    fn test_rect_only_outline_hits() {
        let obj = DrawingObject::new(Shape::Rect(corners(0.0, 0.0, 100.0, 100.0)));
        assert!(hit_test(Point::new(0.0, 50.0), &obj, 5.0));
        assert!(hit_test(Point::new(98.0, 50.0), &obj, 5.0));
        assert!(!hit_test(Point::new(50.0, 50.0), &obj, 5.0));
    }

    #[test]
    fn test_ellipse_ring() {
        let obj = DrawingObject::new(Shape::Ellipse(corners(0.0, 0.0, 100.0, 50.0)));
        assert!(hit_test(Point::new(100.0, 25.0), &obj, 5.0));
        assert!(hit_test(Point::new(50.0, 0.0), &obj, 5.0));
        assert!(!hit_test(Point::new(50.0, 25.0), &obj, 5.0));
    }

    #[test]
    fn test_outlines_ignore_stroke_width() {
        let rect = DrawingObject::new(Shape::Rect(corners(0.0, 0.0, 100.0, 100.0))).with_line_width(8.0);
        assert!(hit_test(Point::new(4.5, 50.0), &rect, 5.0));
        assert!(!hit_test(Point::new(6.0, 50.0), &rect, 5.0));

        let ellipse =
            DrawingObject::new(Shape::Ellipse(corners(0.0, 0.0, 100.0, 100.0))).with_line_width(8.0);
        // Ring band is |r - 50| <= 5
        assert!(hit_test(Point::new(104.5, 50.0), &ellipse, 5.0));
        assert!(!hit_test(Point::new(106.0, 50.0), &ellipse, 5.0));
    }

    #[test]
    fn test_degenerate_ellipse_never_hits() {
        let obj = DrawingObject::new(Shape::Ellipse(corners(10.0, 10.0, 10.0, 10.0)));
        assert!(!hit_test(Point::new(10.0, 10.0), &obj, 5.0));
    }

    #[test]
    fn test_semicircle_missing_half() {
        let obj = DrawingObject::new(Shape::Semicircle(Oriented {
            start_pos: Point::new(0.0, 0.0),
            end_pos: Point::new(50.0, 100.0),
            orientation: Orientation::Vertical,
        }));
        // Rightmost point of the arc
        assert!(hit_test(Point::new(50.0, 50.0), &obj, 5.0));
        // Mirror point on the missing half
        assert!(!hit_test(Point::new(-50.0, 50.0), &obj, 5.0));
    }

    #[test]
    fn test_circle_stamp_footprint() {
        let obj = DrawingObject::new(Shape::stamp(
            StampKind::Done,
            Stamp {
                start_pos: Point::new(50.0, 50.0),
                size: 20.0,
            },
        ));
        assert!(hit_test(Point::new(50.0, 50.0), &obj, 5.0));
        assert!(hit_test(Point::new(64.0, 50.0), &obj, 5.0));
        assert!(!hit_test(Point::new(66.0, 50.0), &obj, 5.0));
    }

    #[test]
    fn test_text_full_containment() {
        let obj = DrawingObject::new(Shape::Text(TextBlock {
            start_pos: Point::new(0.0, 0.0),
            text: "hello".into(),
            font_size: 10.0,
            align: TextAlign::Left,
            is_vertical: false,
        }));
        assert!(hit_test(Point::new(15.0, 6.0), &obj, 5.0));
        assert!(!hit_test(Point::new(60.0, 6.0), &obj, 5.0));
    }

    #[test]
    fn test_rotation_moves_hit_region() {
        let flat = DrawingObject::new(Shape::Line(corners(0.0, 50.0, 100.0, 50.0)));
        let upright = flat.clone().with_rotation(std::f32::consts::FRAC_PI_2);
        // After a quarter turn about (50, 50) the line runs vertically
        assert!(hit_test(Point::new(50.0, 5.0), &upright, 5.0));
        assert!(!hit_test(Point::new(5.0, 50.0), &upright, 5.0));
        assert!(hit_test(Point::new(5.0, 50.0), &flat, 5.0));
    }

    #[test]
    fn test_rotation_invariance() {
        let base = DrawingObject::new(Shape::Rect(corners(10.0, 20.0, 90.0, 60.0)));
        let theta = 0.83_f32;
        let rotated = base.clone().with_rotation(theta);
        let pivot = bounds::rotation_pivot(&base);
        for p in [
            Point::new(10.0, 40.0),
            Point::new(50.0, 20.0),
            Point::new(50.0, 40.0),
            Point::new(91.0, 59.0),
            Point::new(200.0, 0.0),
        ] {
            let turned = p.rotate_about(pivot, theta);
            assert_eq!(hit_test(p, &base, 5.0), hit_test(turned, &rotated, 5.0));
        }
    }

    #[test]
    fn test_leader_line_hit_on_shape_miss() {
        let obj = DrawingObject::new(Shape::Rect(corners(0.0, 0.0, 10.0, 10.0)))
            .with_leader_line(LeaderLine::new(Point::new(10.0, 10.0), Point::new(100.0, 100.0)));
        assert!(hit_test(Point::new(55.0, 55.0), &obj, 5.0));
    }

    #[test]
    fn test_hit_test_all_topmost_and_skips_eraser() {
        let objects = vec![
            DrawingObject::new(Shape::Line(corners(0.0, 0.0, 100.0, 0.0))).with_z_index(5),
            DrawingObject::new(Shape::Line(corners(0.0, 0.0, 100.0, 0.0))).with_z_index(1),
            DrawingObject::new(Shape::Eraser(EraserStroke {
                points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
                ..Default::default()
            }))
            .with_z_index(9),
        ];
        assert_eq!(hit_test_all(Point::new(50.0, 0.0), &objects, 5.0), Some(0));
        assert_eq!(hit_test_all(Point::new(50.0, 80.0), &objects, 5.0), None);
    }

    #[test]
    fn test_equal_z_later_insertion_wins() {
        let pen = |y: f32| {
            DrawingObject::new(Shape::Pen(Freehand {
                points: vec![Point::new(0.0, y), Point::new(100.0, y)],
            }))
        };
        let objects = vec![pen(0.0), pen(1.0)];
        assert_eq!(hit_test_all(Point::new(50.0, 0.5), &objects, 5.0), Some(1));
    }

    #[test]
    fn test_out_of_range_index_is_no_match() {
        assert!(!hit_test_index(Point::default(), &[], 3, 5.0));
    }
}
