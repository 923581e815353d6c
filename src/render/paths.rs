//! tiny-skia path builders for each outline kind

use tiny_skia::{Path, PathBuilder};

use super::geometry::{arrow, shape};
use super::surface::{polygon_path, polyline_path};
use crate::domain::{Bounds, Orientation, Point, Shape};
use crate::geometry::outline::{self, EllipseParams};

/// Build an arrow path as stroked lines (shaft plus angled head lines)
///
/// With `double` set, a second head is drawn at `start`. Arrows too short
/// for a head still draw their shaft.
pub fn build_arrow_path(start: Point, end: Point, head_size: f32, double: bool) -> Option<Path> {
    let mut pb = PathBuilder::new();

    // Shaft line from start to end
    pb.move_to(start.x, start.y);
    pb.line_to(end.x, end.y);

    if let Some((h1, h2)) = arrow::head_points(start, end, head_size) {
        pb.move_to(h1.x, h1.y);
        pb.line_to(end.x, end.y);
        pb.line_to(h2.x, h2.y);
    }
    if double && let Some((h1, h2)) = arrow::head_points(end, start, head_size) {
        pb.move_to(h1.x, h1.y);
        pb.line_to(start.x, start.y);
        pb.line_to(h2.x, h2.y);
    }

    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
pub fn build_ellipse_path(e: &EllipseParams) -> Option<Path> {
    let EllipseParams { cx, cy, rx, ry } = *e;
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

/// Build the drawn half of a semicircle
pub fn build_semicircle_path(e: &EllipseParams, orientation: Orientation) -> Option<Path> {
    let EllipseParams { cx, cy, rx, ry } = *e;
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();
    match orientation {
        Orientation::Vertical => {
            // Top through the right extreme to the bottom
            pb.move_to(cx, cy - ry);
            pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
            pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
        }
        Orientation::Horizontal => {
            // Left through the top extreme to the right
            pb.move_to(cx - rx, cy);
            pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
            pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
        }
    }
    pb.finish()
}

/// Rounded rectangle centred on `center`
pub fn build_rounded_rect_path(center: Point, width: f32, height: f32, radius: f32) -> Option<Path> {
    let x = center.x - width * 0.5;
    let y = center.y - height * 0.5;
    let r = radius.min(width * 0.5).min(height * 0.5).max(0.0);
    let k = r * (1.0 - shape::BEZIER_K);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + width - r, y);
    pb.cubic_to(x + width - k, y, x + width, y + k, x + width, y + r);
    pb.line_to(x + width, y + height - r);
    pb.cubic_to(x + width, y + height - k, x + width - k, y + height, x + width - r, y + height);
    pb.line_to(x + r, y + height);
    pb.cubic_to(x + k, y + height, x, y + height - k, x, y + height - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + k, x + k, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Stroke outline of a plain geometric shape
///
/// Covers the shapes drawn as a single stroked path; anything needing text,
/// fills or images returns `None` and is handled by its own routine.
pub fn outline_path(shape: &Shape, line_width: f32) -> Option<Path> {
    match shape {
        Shape::Line(c) => polyline_path(&[c.start_pos, c.end_pos]),
        Shape::Arrow(c) => {
            build_arrow_path(c.start_pos, c.end_pos, arrow::head_size(line_width), false)
        }
        Shape::DoubleArrow(c) => {
            build_arrow_path(c.start_pos, c.end_pos, arrow::head_size(line_width), true)
        }
        Shape::DoubleArrowAnnotated(s) => {
            build_arrow_path(s.start_pos, s.end_pos, arrow::head_size(line_width), true)
        }
        Shape::Rect(c) | Shape::RectSymbolStamp(c) => {
            polygon_path(&Bounds::from_corners(c.start_pos, c.end_pos).corners())
        }
        Shape::LabeledRect(b) => polygon_path(&Bounds::from_corners(b.start_pos, b.end_pos).corners()),
        Shape::FontLabel(f) => polygon_path(&Bounds::from_corners(f.start_pos, f.end_pos).corners()),
        Shape::Ellipse(c) => {
            let e = outline::ellipse_in(c.start_pos, c.end_pos);
            if e.is_degenerate() {
                return None;
            }
            build_ellipse_path(&e)
        }
        Shape::Semicircle(o) => {
            let e = outline::semicircle_in(o);
            if e.is_degenerate() {
                return None;
            }
            build_semicircle_path(&e, o.orientation)
        }
        Shape::Chevron(_) | Shape::LShape(_) | Shape::ZShape(_) | Shape::Bracket(_) => {
            polyline_path(&outline::orientable_vertices(shape)?)
        }
        Shape::TriangleSymbolStamp(c) => polygon_path(&outline::triangle_vertices(c.start_pos, c.end_pos)),
        Shape::Pen(f) | Shape::Marker(f) | Shape::Polyline(f) => polyline_path(&f.points),
        Shape::Eraser(e) => polyline_path(&e.points),
        _ => None,
    }
}
