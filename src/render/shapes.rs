//! Per-type draw routines for a single drawing object
//!
//! An object is drawn in two parts. The body is the shape plus anything
//! that belongs to it (its own leader line, stamp glyphs, labels). The
//! caption is the optional annotation text and its leader. Keeping them
//! apart lets the eraser compositor erase the body while the caption stays
//! intact.

use super::chrome;
use super::geometry::shape;
use super::paths::{build_rounded_rect_path, outline_path};
use super::surface::{Surface, polyline_path, rect_path, round_stroke, solid_paint};
use super::text::{GlyphPainter, TextStyle, draw_text};
use crate::domain::{
    Annotation, Bounds, Color, DrawingObject, Footprint, LeaderLine, Point, Shape, Stamp,
    StampKind, TextAlign,
};
use crate::geometry::bounds::{
    font_label_anchor, labeled_rect_label, rotation_pivot, segment_label_box,
};
use crate::geometry::text_metrics;

/// Glyph size inside a circular stamp relative to its radius
const CIRCLE_GLYPH_SCALE: f32 = 1.1;
/// Glyph size inside a badge stamp relative to its height
const BADGE_GLYPH_SCALE: f32 = 0.7;
/// Share of a badge's width the glyph run may occupy
const BADGE_TEXT_FILL: f32 = 0.85;

/// Draw an object, and its selection chrome when `selected`
pub fn render_object(
    surface: &mut Surface,
    obj: &DrawingObject,
    selected: bool,
    glyphs: Option<&GlyphPainter>,
) {
    draw_object(surface, obj, glyphs);
    if selected {
        chrome::draw_selection(surface, obj);
    }
}

/// Body and caption, both under the object's rotation
pub fn draw_object(surface: &mut Surface, obj: &DrawingObject, glyphs: Option<&GlyphPainter>) {
    draw_body(surface, obj, glyphs);
    draw_caption(surface, obj, glyphs);
}

/// Push the object's rotation about its shape-only pivot
fn with_rotation(surface: &mut Surface, obj: &DrawingObject, f: impl FnOnce(&mut Surface)) {
    surface.save();
    if obj.is_rotated() {
        surface.rotate_about(rotation_pivot(obj), obj.rotation());
    }
    f(surface);
    surface.restore();
}

/// Draw everything but the caption annotation
pub fn draw_body(surface: &mut Surface, obj: &DrawingObject, glyphs: Option<&GlyphPainter>) {
    let color = obj.color();
    let lw = obj.line_width();

    with_rotation(surface, obj, |surface| {
        if let Some(leader) = &obj.leader_line {
            draw_leader(surface, leader, color, lw);
        }

        if let Some((kind, stamp)) = obj.shape.as_stamp() {
            draw_stamp(surface, kind, stamp, color, lw, glyphs);
            return;
        }

        match &obj.shape {
            Shape::Marker(f) => {
                if let Some(path) = polyline_path(&f.points) {
                    let paint = solid_paint(color.with_alpha(
                        (color.a as f32 * shape::MARKER_ALPHA).round() as u8,
                    ));
                    let stroke = round_stroke(lw * shape::MARKER_WIDTH_SCALE);
                    surface.stroke_with(&path, &paint, &stroke);
                }
            }
            // Erasers only ever act through compositing
            Shape::Eraser(_) => {}
            Shape::DoubleArrowAnnotated(seg) => {
                stroke_outline(surface, &obj.shape, color, lw);
                if !seg.text.is_empty() {
                    let b = segment_label_box(seg);
                    let style = TextStyle::new(seg.font_size, color).aligned(TextAlign::Center);
                    draw_text(surface, glyphs, Point::new(b.center().x, b.y), &seg.text, &style);
                }
            }
            Shape::LabeledRect(b) => {
                stroke_outline(surface, &obj.shape, color, lw);
                let (anchor, font_size) = labeled_rect_label(b);
                let style = TextStyle::new(font_size, color).aligned(TextAlign::Right);
                draw_text(surface, glyphs, anchor, &b.label, &style);
            }
            Shape::FontLabel(label) => {
                stroke_outline(surface, &obj.shape, color, lw);
                let anchor = font_label_anchor(obj, label);
                let b = text_metrics::font_label_box(
                    anchor,
                    &label.font_name,
                    label.font_size,
                    label.text_align,
                );
                let style = TextStyle::new(label.font_size, color).aligned(label.text_align);
                let x = match label.text_align {
                    TextAlign::Left => b.x,
                    TextAlign::Center => b.center().x,
                    TextAlign::Right => b.right(),
                };
                draw_text(surface, glyphs, Point::new(x, b.y), &label.font_name, &style);
            }
            Shape::Text(t) => {
                let style = TextStyle::new(t.font_size, color)
                    .aligned(t.align)
                    .vertical(t.is_vertical);
                draw_text(surface, glyphs, t.start_pos, &t.text, &style);
            }
            Shape::Image(img) => {
                let target = Bounds::from_corners(img.start_pos, img.end_pos);
                match &img.pixels {
                    Some(data) => surface.draw_image(&data.0, &target),
                    None => draw_image_placeholder(surface, &target),
                }
            }
            Shape::Unknown => log::trace!("Skipping object of unknown type"),
            other => stroke_outline(surface, other, color, lw),
        }
    });
}

/// Draw the caption annotation (leader first, then text)
pub fn draw_caption(surface: &mut Surface, obj: &DrawingObject, glyphs: Option<&GlyphPainter>) {
    let Some(annotation) = &obj.annotation else {
        return;
    };
    with_rotation(surface, obj, |surface| {
        draw_annotation(surface, annotation, obj.color(), obj.line_width(), glyphs);
    });
}

fn draw_annotation(
    surface: &mut Surface,
    annotation: &Annotation,
    fallback: Color,
    lw: f32,
    glyphs: Option<&GlyphPainter>,
) {
    let color = annotation.color.unwrap_or(fallback);
    if let Some(leader) = &annotation.leader_line {
        draw_leader(surface, leader, color, lw);
    }
    let style = TextStyle::new(annotation.font_size, color)
        .aligned(annotation.align)
        .vertical(annotation.is_vertical);
    draw_text(surface, glyphs, annotation.anchor(), &annotation.text, &style);
}

/// Leader line with a dot on its anchored start
pub fn draw_leader(surface: &mut Surface, leader: &LeaderLine, color: Color, lw: f32) {
    if let Some(path) = polyline_path(&[leader.start, leader.end]) {
        surface.stroke(&path, color, lw);
    }
    surface.fill_circle(leader.start, shape::LEADER_DOT_RADIUS.max(lw), color);
}

fn stroke_outline(surface: &mut Surface, shape: &Shape, color: Color, lw: f32) {
    if let Some(path) = outline_path(shape, lw) {
        surface.stroke(&path, color, lw);
    }
}

fn draw_stamp(
    surface: &mut Surface,
    kind: StampKind,
    stamp: &Stamp,
    color: Color,
    lw: f32,
    glyphs: Option<&GlyphPainter>,
) {
    let center = stamp.start_pos;
    let text = kind.glyphs();
    let font_size = match kind.footprint(stamp.size) {
        Footprint::Circle { radius } => {
            surface.stroke_circle(center, radius, color, lw);
            radius * CIRCLE_GLYPH_SCALE
        }
        Footprint::RoundedRect { width, height } => {
            if let Some(path) =
                build_rounded_rect_path(center, width, height, height * shape::BADGE_CORNER)
            {
                surface.stroke(&path, color, lw);
            }
            let run = text_metrics::line_width(text, 1.0).max(1.0);
            (height * BADGE_GLYPH_SCALE).min(width * BADGE_TEXT_FILL / run)
        }
    };

    // One line of glyph cells, centred on the stamp
    let anchor = Point::new(center.x, center.y - font_size * 0.5);
    let style = TextStyle::new(font_size, color).aligned(TextAlign::Center);
    draw_text(surface, glyphs, anchor, text, &style);
}

fn draw_image_placeholder(surface: &mut Surface, target: &Bounds) {
    let grey = Color::rgb(160, 160, 160);
    if let Some(path) = rect_path(target) {
        surface.stroke(&path, grey, 1.0);
    }
    let [a, b, c, d] = target.corners();
    for (from, to) in [(a, c), (b, d)] {
        if let Some(path) = polyline_path(&[from, to]) {
            surface.stroke(&path, grey, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Corners, EraserStroke, Freehand};

    fn alpha(surface: &Surface, x: u32, y: u32) -> u8 {
        surface.pixel(x, y).map(|p| p[3]).unwrap_or(0)
    }

    #[test]
    fn test_rect_outline_drawn_in_color() {
        let mut surface = Surface::new(120, 80).unwrap();
        let obj = DrawingObject::new(Shape::Rect(Corners::new(
            Point::new(10.0, 10.0),
            Point::new(110.0, 60.0),
        )))
        .with_color(Color::rgb(255, 0, 0))
        .with_line_width(4.0);
        render_object(&mut surface, &obj, false, None);
        assert_eq!(surface.pixel(60, 10), Some([255, 0, 0, 255]));
        assert_eq!(alpha(&surface, 60, 35), 0);
    }

    #[test]
    fn test_missing_style_falls_back_to_black() {
        let mut surface = Surface::new(50, 50).unwrap();
        let obj = DrawingObject::new(Shape::Line(Corners::new(
            Point::new(0.0, 25.0),
            Point::new(50.0, 25.0),
        )));
        render_object(&mut surface, &obj, false, None);
        assert_eq!(surface.pixel(25, 25).map(|p| [p[0], p[1], p[2]]), Some([0, 0, 0]));
        assert!(alpha(&surface, 25, 25) > 0);
    }

    #[test]
    fn test_unknown_and_eraser_draw_nothing() {
        let mut surface = Surface::new(30, 30).unwrap();
        render_object(&mut surface, &DrawingObject::new(Shape::Unknown), false, None);
        let eraser = DrawingObject::new(Shape::Eraser(EraserStroke {
            points: vec![Point::new(0.0, 15.0), Point::new(30.0, 15.0)],
            ..Default::default()
        }));
        render_object(&mut surface, &eraser, false, None);
        assert!(surface.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_marker_is_translucent() {
        let mut surface = Surface::new(40, 40).unwrap();
        let obj = DrawingObject::new(Shape::Marker(Freehand {
            points: vec![Point::new(0.0, 20.0), Point::new(40.0, 20.0)],
        }))
        .with_line_width(4.0);
        render_object(&mut surface, &obj, false, None);
        let a = alpha(&surface, 20, 20);
        assert!(a > 0 && a < 255);
    }

    #[test]
    fn test_rotated_line_drawn_about_pivot() {
        let mut surface = Surface::new(100, 100).unwrap();
        let obj = DrawingObject::new(Shape::Line(Corners::new(
            Point::new(10.0, 50.0),
            Point::new(90.0, 50.0),
        )))
        .with_line_width(4.0)
        .with_rotation(std::f32::consts::FRAC_PI_2);
        render_object(&mut surface, &obj, false, None);
        // Pivot is (50, 50); the line now runs vertically
        assert!(alpha(&surface, 50, 20) > 0);
        assert_eq!(alpha(&surface, 20, 50), 0);
    }

    #[test]
    fn test_stamp_leader_has_anchor_dot() {
        let mut surface = Surface::new(120, 120).unwrap();
        let obj = DrawingObject::new(Shape::stamp(
            StampKind::Done,
            Stamp {
                start_pos: Point::new(90.0, 90.0),
                size: 20.0,
            },
        ))
        .with_leader_line(LeaderLine::new(Point::new(20.0, 20.0), Point::new(83.0, 83.0)));
        render_object(&mut surface, &obj, false, None);
        assert_eq!(alpha(&surface, 20, 20), 255);
        // Circle outline at radius 10 to the right of the centre
        assert!(alpha(&surface, 100, 90) > 0);
    }
}
