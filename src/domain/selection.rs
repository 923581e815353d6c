//! Selection handle types

/// Resize handle on the shape-only bounds
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// North-West corner
    NW,
    /// North edge
    N,
    /// North-East corner
    NE,
    /// East edge
    E,
    /// South-East corner
    SE,
    /// South edge
    S,
    /// South-West corner
    SW,
    /// West edge
    W,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    /// Position within the box as fractions of width and height
    pub fn factors(self) -> (f32, f32) {
        match self {
            ResizeHandle::NW => (0.0, 0.0),
            ResizeHandle::N => (0.5, 0.0),
            ResizeHandle::NE => (1.0, 0.0),
            ResizeHandle::E => (1.0, 0.5),
            ResizeHandle::SE => (1.0, 1.0),
            ResizeHandle::S => (0.5, 1.0),
            ResizeHandle::SW => (0.0, 1.0),
            ResizeHandle::W => (0.0, 0.5),
        }
    }

    /// Whether dragging this handle changes the width / height
    pub fn moves_axes(self) -> (bool, bool) {
        match self {
            ResizeHandle::N | ResizeHandle::S => (false, true),
            ResizeHandle::E | ResizeHandle::W => (true, false),
            _ => (true, true),
        }
    }
}

/// Any selection affordance the pointer can grab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Resize(ResizeHandle),
    /// Rotation knob above the top-middle handle (images only)
    Rotate,
    /// Circular delete button off the bottom-right corner
    Delete,
    /// Start point of the object's own leader line
    LeaderStart,
    /// End point of the object's own leader line
    LeaderEnd,
    /// End point of the caption annotation's leader line
    AnnotationLeaderEnd,
}
