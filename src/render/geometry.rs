//! Shared drawing constants and small path math
//!
//! Shape outlines themselves come from `crate::geometry::outline` so that
//! drawn and hittable geometry never diverge; this module only holds the
//! decoration parameters that hit-testing does not care about.

use crate::domain::Point;

/// Arrow geometry constants
pub mod arrow {
    use crate::domain::Point;

    /// Arrowhead size at zero line width, in page units
    pub const HEAD_SIZE: f32 = 10.0;
    /// Extra head length per unit of line width
    pub const HEAD_PER_WIDTH: f32 = 2.0;
    /// Arrowhead angle from shaft in radians (35 degrees)
    pub const HEAD_ANGLE: f32 = 0.610_865_2; // 35.0_f32.to_radians()
    /// Minimum arrow length for heads to be drawn
    pub const MIN_LENGTH: f32 = 5.0;

    /// Head length for a given stroke width
    #[inline]
    pub fn head_size(line_width: f32) -> f32 {
        HEAD_SIZE + line_width * HEAD_PER_WIDTH
    }

    /// Calculate the two barb end points of a head at `end` pointing away from `start`
    pub fn head_points(start: Point, end: Point, head_size: f32) -> Option<(Point, Point)> {
        if start.distance_to(end) < MIN_LENGTH {
            return None;
        }
        let (nx, ny) = super::direction(start, end)?;

        let cos_a = HEAD_ANGLE.cos();
        let sin_a = HEAD_ANGLE.sin();

        // First barb (rotated clockwise from the reversed shaft)
        let head1_dx = -nx * cos_a - (-ny) * sin_a;
        let head1_dy = -nx * sin_a + (-ny) * cos_a;

        // Second barb (rotated counter-clockwise)
        let head2_dx = -nx * cos_a + (-ny) * sin_a;
        let head2_dy = -nx * (-sin_a) + (-ny) * cos_a;

        Some((
            Point::new(end.x + head1_dx * head_size, end.y + head1_dy * head_size),
            Point::new(end.x + head2_dx * head_size, end.y + head2_dy * head_size),
        ))
    }
}

/// Shape geometry constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
    /// Corner radius of badge stamps as a fraction of their height
    pub const BADGE_CORNER: f32 = 0.3;
    /// Marker strokes are drawn at this opacity
    pub const MARKER_ALPHA: f32 = 0.4;
    /// Marker strokes are this many times wider than the nominal width
    pub const MARKER_WIDTH_SCALE: f32 = 3.0;
    /// Radius of the dot at the anchored end of a leader line
    pub const LEADER_DOT_RADIUS: f32 = 2.5;
}

/// White halo passes drawn under text
pub mod halo {
    /// Stroke widths of the opaque white passes as multiples of font size,
    /// widest first
    pub const PASSES: [f32; 3] = [0.30, 0.20, 0.10];
    /// Soft shadow: a wide low-alpha pass standing in for a blur
    pub const SHADOW_WIDTH: f32 = 0.45;
    pub const SHADOW_ALPHA: f32 = 0.35;
}

/// Selection chrome appearance
pub mod chrome {
    /// Outline stroke width of handles and boxes
    pub const STROKE: f32 = 1.5;
    /// Dash pattern of the marquee and culling debug outline
    pub const DASH: [f32; 2] = [4.0, 3.0];
    /// Half-length of the cross drawn in the delete button
    pub const DELETE_CROSS: f32 = 3.5;
    /// Radius of the rotation knob
    pub const ROTATE_KNOB_RADIUS: f32 = 5.0;
    /// Padding between an annotation text box and its orange outline
    pub const ANNOTATION_PADDING: f32 = 3.0;
}

/// Offscreen eraser compositing
pub mod eraser {
    /// Extra pixels around the object bounds of the offscreen layer
    pub const LAYER_PADDING: f32 = 4.0;
}

/// Unit vector from `a` to `b`, or `None` for coincident points
#[inline]
pub fn direction(a: Point, b: Point) -> Option<(f32, f32)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return None;
    }
    Some((dx / length, dy / length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_points_symmetric() {
        let (a, b) = arrow::head_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0).unwrap();
        assert!(a.x < 100.0 && b.x < 100.0);
        assert!((a.y + b.y).abs() < 1e-4);
        assert!((a.x - b.x).abs() < 1e-4);
    }

    #[test]
    fn test_short_arrow_has_no_head() {
        assert!(arrow::head_points(Point::new(0.0, 0.0), Point::new(2.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_direction_of_coincident_points() {
        assert!(direction(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).is_none());
        assert_eq!(direction(Point::new(0.0, 0.0), Point::new(0.0, 5.0)), Some((0.0, 1.0)));
    }
}
