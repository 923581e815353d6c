//! Selection affordance placement and grabbing
//!
//! Every position here is in the object's unrotated frame. The renderer
//! draws chrome inside the object's rotation transform and [`handle_at`]
//! inverse-rotates the pointer, so both stay aligned under rotation.

use crate::domain::{Bounds, DrawingObject, Handle, Point, ResizeHandle, Shape};

use super::bounds::{geometry_bounds, shape_bounds};
use super::hit_test::to_object_space;

/// Side of a square resize handle
pub const HANDLE_SIZE: f32 = 8.0;
/// Distance from the top-middle handle up to the rotation knob
pub const ROTATE_HANDLE_OFFSET: f32 = 25.0;
/// Diagonal offset of the delete button from the bottom-right corner
pub const DELETE_BUTTON_OFFSET: f32 = 14.0;
/// Radius of the circular delete button
pub const DELETE_BUTTON_RADIUS: f32 = 9.0;
/// Smallest width or height a resize may produce
pub const MIN_RESIZE_EXTENT: f32 = 4.0;

/// Only placed images get a rotation knob
pub fn has_rotate_handle(obj: &DrawingObject) -> bool {
    matches!(obj.shape, Shape::Image(_))
}

/// Point of a resize handle on a box
pub fn resize_handle_point(b: &Bounds, handle: ResizeHandle) -> Point {
    let (fx, fy) = handle.factors();
    Point::new(b.x + b.width * fx, b.y + b.height * fy)
}

/// The eight resize handles around the shape-only bounds
pub fn resize_handles(obj: &DrawingObject) -> [(ResizeHandle, Point); 8] {
    let b = shape_bounds(obj);
    ResizeHandle::ALL.map(|h| (h, resize_handle_point(&b, h)))
}

/// Rotation knob position, above the top-middle handle
pub fn rotate_handle_point(obj: &DrawingObject) -> Point {
    let top = resize_handle_point(&shape_bounds(obj), ResizeHandle::N);
    top.offset(0.0, -ROTATE_HANDLE_OFFSET)
}

/// Delete button centre, off the bottom-right corner
pub fn delete_button_center(obj: &DrawingObject) -> Point {
    let b = shape_bounds(obj);
    Point::new(b.right() + DELETE_BUTTON_OFFSET, b.bottom() + DELETE_BUTTON_OFFSET)
}

/// Endpoint handles of the leader lines an object carries
pub fn leader_handles(obj: &DrawingObject) -> Vec<(Handle, Point)> {
    let mut handles = Vec::with_capacity(3);
    if let Some(leader) = &obj.leader_line {
        handles.push((Handle::LeaderStart, leader.start));
        handles.push((Handle::LeaderEnd, leader.end));
    }
    if let Some(leader) = obj.annotation.as_ref().and_then(|a| a.leader_line.as_ref()) {
        handles.push((Handle::AnnotationLeaderEnd, leader.end));
    }
    handles
}

/// Selection affordance under a page point, if any
///
/// Order matters where affordances overlap: delete button, rotation knob,
/// leader endpoints, then resize handles.
pub fn handle_at(point: Point, obj: &DrawingObject, grab_radius: f32) -> Option<Handle> {
    let p = to_object_space(point, obj);

    if p.distance_to(delete_button_center(obj)) <= DELETE_BUTTON_RADIUS {
        return Some(Handle::Delete);
    }
    if has_rotate_handle(obj) && p.distance_to(rotate_handle_point(obj)) <= grab_radius {
        return Some(Handle::Rotate);
    }
    if let Some((handle, _)) = leader_handles(obj)
        .into_iter()
        .find(|(_, at)| p.distance_to(*at) <= grab_radius)
    {
        return Some(handle);
    }
    resize_handles(obj)
        .into_iter()
        .find(|(_, at)| (p.x - at.x).abs() <= grab_radius && (p.y - at.y).abs() <= grab_radius)
        .map(|(h, _)| Handle::Resize(h))
}

/// New box after dragging `handle` of `original` to `to` (object frame)
///
/// Edges not moved by the handle stay put; dragging past the opposite edge
/// flips the box instead of inverting it.
pub fn resize_box(original: &Bounds, handle: ResizeHandle, to: Point) -> Bounds {
    let (fx, fy) = handle.factors();
    let (moves_x, moves_y) = handle.moves_axes();

    let (mut x1, mut x2) = (original.x, original.right());
    let (mut y1, mut y2) = (original.y, original.bottom());
    if moves_x {
        if fx == 0.0 {
            x1 = to.x;
        } else {
            x2 = to.x;
        }
    }
    if moves_y {
        if fy == 0.0 {
            y1 = to.y;
        } else {
            y2 = to.y;
        }
    }

    let mut b = Bounds::from_corners(Point::new(x1, y1), Point::new(x2, y2));
    b.width = b.width.max(MIN_RESIZE_EXTENT);
    b.height = b.height.max(MIN_RESIZE_EXTENT);
    b
}

/// Resize `obj` so that its shape bounds `from` become `to`
///
/// The stroke padding between the geometry and its bounds is kept, so only
/// the geometry scales. Stamps scale their size by the smaller axis factor
/// so they keep their aspect ratio.
pub fn apply_resize(obj: &mut DrawingObject, from: &Bounds, to: &Bounds) {
    let raw = geometry_bounds(obj);
    let target = Bounds::new(
        to.x + (raw.x - from.x),
        to.y + (raw.y - from.y),
        (to.width - (from.width - raw.width)).max(0.0),
        (to.height - (from.height - raw.height)).max(0.0),
    );
    // Flat geometry (a horizontal line) only moves along its flat axis
    let sx = if raw.width > f32::EPSILON {
        target.width / raw.width
    } else {
        1.0
    };
    let sy = if raw.height > f32::EPSILON {
        target.height / raw.height
    } else {
        1.0
    };
    let (rx, ry, tx, ty) = (raw.x, raw.y, target.x, target.y);
    obj.transform_points(
        move |p| Point::new(tx + (p.x - rx) * sx, ty + (p.y - ry) * sy),
        sx.min(sy),
    );
}
