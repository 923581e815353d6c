//! Selection chrome and transient overlays

use tiny_skia::PathBuilder;

use super::geometry::chrome;
use super::surface::{Surface, polyline_path, rect_path};
use crate::domain::{Bounds, Color, DrawingObject, Point, ResizeHandle};
use crate::geometry::bounds::{annotation_text_box, rotation_pivot, shape_bounds};
use crate::geometry::handles::{
    DELETE_BUTTON_RADIUS, HANDLE_SIZE, delete_button_center, has_rotate_handle, leader_handles,
    resize_handle_point, resize_handles, rotate_handle_point,
};

/// Draw handles, delete button and annotation outline for a selected object
pub fn draw_selection(surface: &mut Surface, obj: &DrawingObject) {
    let pivot = rotation_pivot(obj);
    let rotation = obj.rotation();

    // The knob's connecting line is computed in page space
    if has_rotate_handle(obj) {
        let top =
            resize_handle_point(&shape_bounds(obj), ResizeHandle::N).rotate_about(pivot, rotation);
        let knob = rotate_handle_point(obj).rotate_about(pivot, rotation);
        if let Some(path) = polyline_path(&[top, knob]) {
            surface.stroke(&path, Color::SELECTION, chrome::STROKE);
        }
        surface.fill_circle(knob, chrome::ROTATE_KNOB_RADIUS, Color::WHITE);
        surface.stroke_circle(knob, chrome::ROTATE_KNOB_RADIUS, Color::SELECTION, chrome::STROKE);
    }

    surface.save();
    surface.rotate_about(pivot, rotation);

    if let Some(path) = rect_path(&shape_bounds(obj)) {
        surface.stroke_dashed(&path, Color::SELECTION, chrome::STROKE, &chrome::DASH);
    }

    if let Some(annotation) = &obj.annotation {
        let outline = annotation_text_box(annotation).expand(chrome::ANNOTATION_PADDING);
        if let Some(path) = rect_path(&outline) {
            surface.stroke(&path, Color::ANNOTATION_OUTLINE, chrome::STROKE);
        }
    }

    for (_, at) in leader_handles(obj) {
        surface.fill_circle(at, HANDLE_SIZE * 0.5, Color::WHITE);
        surface.stroke_circle(at, HANDLE_SIZE * 0.5, Color::ANNOTATION_OUTLINE, chrome::STROKE);
    }

    let half = HANDLE_SIZE * 0.5;
    for (_, at) in resize_handles(obj) {
        let square = Bounds::new(at.x - half, at.y - half, HANDLE_SIZE, HANDLE_SIZE);
        if let Some(path) = rect_path(&square) {
            surface.fill(&path, Color::WHITE);
            surface.stroke(&path, Color::SELECTION, chrome::STROKE);
        }
    }

    draw_delete_button(surface, delete_button_center(obj));
    surface.restore();
}

fn draw_delete_button(surface: &mut Surface, center: Point) {
    surface.fill_circle(center, DELETE_BUTTON_RADIUS, Color::DELETE);
    let c = chrome::DELETE_CROSS;
    let mut pb = PathBuilder::new();
    pb.move_to(center.x - c, center.y - c);
    pb.line_to(center.x + c, center.y + c);
    pb.move_to(center.x + c, center.y - c);
    pb.line_to(center.x - c, center.y + c);
    if let Some(path) = pb.finish() {
        surface.stroke(&path, Color::WHITE, chrome::STROKE);
    }
}

/// Rubber-band selection rectangle
pub fn draw_marquee(surface: &mut Surface, area: &Bounds) {
    let Some(path) = rect_path(area) else {
        return;
    };
    surface.fill(&path, Color::SELECTION.with_alpha(40));
    surface.stroke_dashed(&path, Color::SELECTION, chrome::STROKE, &chrome::DASH);
}

/// Outline of the culling viewport, drawn in culling debug mode
pub fn draw_culling_outline(surface: &mut Surface, area: &Bounds) {
    if let Some(path) = rect_path(area) {
        surface.stroke_dashed(&path, Color::rgb(255, 0, 255), 2.0, &chrome::DASH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Corners, ImagePlacement, Shape};

    fn alpha(surface: &Surface, p: Point) -> u8 {
        surface
            .pixel(p.x as u32, p.y as u32)
            .map(|px| px[3])
            .unwrap_or(0)
    }

    #[test]
    fn test_selection_draws_handles_and_delete_button() {
        let mut surface = Surface::new(200, 200).unwrap();
        let obj = DrawingObject::new(Shape::Rect(Corners::new(
            Point::new(20.0, 20.0),
            Point::new(120.0, 100.0),
        )));
        draw_selection(&mut surface, &obj);
        let button = delete_button_center(&obj);
        assert_eq!(alpha(&surface, button.offset(-4.0, 0.0)), 255);
        let (_, nw) = resize_handles(&obj)[0];
        assert!(alpha(&surface, nw) > 0);
    }

    #[test]
    fn test_rotation_knob_only_for_images() {
        let rect = DrawingObject::new(Shape::Rect(Corners::new(
            Point::new(50.0, 60.0),
            Point::new(150.0, 160.0),
        )));
        let mut surface = Surface::new(200, 200).unwrap();
        draw_selection(&mut surface, &rect);
        assert_eq!(alpha(&surface, rotate_handle_point(&rect)), 0);

        let image = DrawingObject::new(Shape::Image(ImagePlacement {
            start_pos: Point::new(50.0, 60.0),
            end_pos: Point::new(150.0, 160.0),
            ..Default::default()
        }));
        let mut surface = Surface::new(200, 200).unwrap();
        draw_selection(&mut surface, &image);
        assert!(alpha(&surface, rotate_handle_point(&image)) > 0);
    }

    #[test]
    fn test_marquee_is_translucent_inside() {
        let mut surface = Surface::new(50, 50).unwrap();
        draw_marquee(&mut surface, &Bounds::new(5.0, 5.0, 40.0, 40.0));
        let a = alpha(&surface, Point::new(25.0, 25.0));
        assert!(a > 0 && a < 255);
    }
}
