//! Outline geometry shared by the renderer and the hit-tester
//!
//! Keeping one source for vertex layouts guarantees that what is drawn and
//! what is hittable never diverge.

use crate::domain::{Bounds, Orientation, Oriented, Point, Shape};

/// Centre and radii of the ellipse inscribed in two corners
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseParams {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

impl EllipseParams {
    /// Radii below this are treated as degenerate
    pub const MIN_RADIUS: f32 = 1e-3;

    pub fn is_degenerate(&self) -> bool {
        self.rx < Self::MIN_RADIUS || self.ry < Self::MIN_RADIUS
    }
}

/// Calculate ellipse centre and radii from two unordered corners
pub fn ellipse_in(a: Point, b: Point) -> EllipseParams {
    let r = Bounds::from_corners(a, b);
    EllipseParams {
        cx: r.x + r.width * 0.5,
        cy: r.y + r.height * 0.5,
        rx: r.width * 0.5,
        ry: r.height * 0.5,
    }
}

/// Ellipse whose visible half fills the corner box
///
/// Vertical semicircles bulge right from the box's left edge (the `x >= cx`
/// half); horizontal ones bulge up from the bottom edge (`y <= cy`).
pub fn semicircle_in(o: &Oriented) -> EllipseParams {
    let r = Bounds::from_corners(o.start_pos, o.end_pos);
    match o.orientation {
        Orientation::Vertical => EllipseParams {
            cx: r.x,
            cy: r.y + r.height * 0.5,
            rx: r.width,
            ry: r.height * 0.5,
        },
        Orientation::Horizontal => EllipseParams {
            cx: r.x + r.width * 0.5,
            cy: r.bottom(),
            rx: r.width * 0.5,
            ry: r.height,
        },
    }
}

/// Whether a point lies on the drawn half of a semicircle
pub fn on_semicircle_half(p: Point, e: &EllipseParams, orientation: Orientation) -> bool {
    match orientation {
        Orientation::Vertical => p.x >= e.cx,
        Orientation::Horizontal => p.y <= e.cy,
    }
}

/// Open polyline vertices of chevron, L, Z and bracket shapes
///
/// Returns `None` for shapes that are not orientable polylines.
pub fn orientable_vertices(shape: &Shape) -> Option<Vec<Point>> {
    let box_of = |o: &Oriented| Bounds::from_corners(o.start_pos, o.end_pos);
    match shape {
        Shape::Chevron(o) => Some(chevron(&box_of(o), o.orientation)),
        Shape::LShape(o) => Some(lshape(&box_of(o), o.orientation)),
        Shape::ZShape(o) => Some(zshape(&box_of(o), o.orientation)),
        Shape::Bracket(o) => Some(bracket(&box_of(o), o.orientation)),
        _ => None,
    }
}

fn chevron(r: &Bounds, orientation: Orientation) -> Vec<Point> {
    let c = r.center();
    match orientation {
        // ">" pointing right
        Orientation::Horizontal => vec![
            Point::new(r.x, r.y),
            Point::new(r.right(), c.y),
            Point::new(r.x, r.bottom()),
        ],
        // "v" pointing down
        Orientation::Vertical => vec![
            Point::new(r.x, r.y),
            Point::new(c.x, r.bottom()),
            Point::new(r.right(), r.y),
        ],
    }
}

fn lshape(r: &Bounds, orientation: Orientation) -> Vec<Point> {
    match orientation {
        Orientation::Vertical => vec![
            Point::new(r.x, r.y),
            Point::new(r.x, r.bottom()),
            Point::new(r.right(), r.bottom()),
        ],
        Orientation::Horizontal => vec![
            Point::new(r.x, r.y),
            Point::new(r.right(), r.y),
            Point::new(r.right(), r.bottom()),
        ],
    }
}

fn zshape(r: &Bounds, orientation: Orientation) -> Vec<Point> {
    match orientation {
        Orientation::Horizontal => vec![
            Point::new(r.x, r.y),
            Point::new(r.right(), r.y),
            Point::new(r.x, r.bottom()),
            Point::new(r.right(), r.bottom()),
        ],
        Orientation::Vertical => vec![
            Point::new(r.x, r.y),
            Point::new(r.x, r.bottom()),
            Point::new(r.right(), r.y),
            Point::new(r.right(), r.bottom()),
        ],
    }
}

fn bracket(r: &Bounds, orientation: Orientation) -> Vec<Point> {
    match orientation {
        // "[" opening right
        Orientation::Vertical => vec![
            Point::new(r.right(), r.y),
            Point::new(r.x, r.y),
            Point::new(r.x, r.bottom()),
            Point::new(r.right(), r.bottom()),
        ],
        // opening downward
        Orientation::Horizontal => vec![
            Point::new(r.x, r.bottom()),
            Point::new(r.x, r.y),
            Point::new(r.right(), r.y),
            Point::new(r.right(), r.bottom()),
        ],
    }
}

/// Closed triangle inscribed in the corner box, apex at top centre
pub fn triangle_vertices(a: Point, b: Point) -> [Point; 3] {
    let r = Bounds::from_corners(a, b);
    [
        Point::new(r.x + r.width * 0.5, r.y),
        Point::new(r.right(), r.bottom()),
        Point::new(r.x, r.bottom()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oriented(orientation: Orientation) -> Oriented {
        Oriented {
            start_pos: Point::new(0.0, 0.0),
            end_pos: Point::new(20.0, 10.0),
            orientation,
        }
    }

    #[test]
    fn test_vertex_counts() {
        let o = oriented(Orientation::Vertical);
        assert_eq!(orientable_vertices(&Shape::Chevron(o)).unwrap().len(), 3);
        assert_eq!(orientable_vertices(&Shape::LShape(o)).unwrap().len(), 3);
        assert_eq!(orientable_vertices(&Shape::ZShape(o)).unwrap().len(), 4);
        assert_eq!(orientable_vertices(&Shape::Bracket(o)).unwrap().len(), 4);
        assert!(orientable_vertices(&Shape::Unknown).is_none());
    }

    #[test]
    fn test_semicircle_fills_box() {
        let v = semicircle_in(&oriented(Orientation::Vertical));
        assert_eq!((v.cx, v.cy, v.rx, v.ry), (0.0, 5.0, 20.0, 5.0));
        let h = semicircle_in(&oriented(Orientation::Horizontal));
        assert_eq!((h.cx, h.cy, h.rx, h.ry), (10.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_degenerate_ellipse() {
        let e = ellipse_in(Point::new(5.0, 5.0), Point::new(5.0, 30.0));
        assert!(e.is_degenerate());
    }
}
