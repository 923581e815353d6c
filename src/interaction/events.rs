//! Input event types consumed by the interaction machine

use crate::domain::Point;

/// Keyboard modifier state at the time of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Pointer press, motion or release
///
/// `local` is in page (storage) coordinates; `surface` is where the same
/// point lands on the drawing surface. They differ when a split view draws
/// the page at an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub local: Point,
    pub surface: Point,
    /// 1 for a single click, 2 for a double click
    pub click_count: u8,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Event whose local and surface coordinates coincide
    pub fn at(x: f32, y: f32) -> Self {
        let p = Point::new(x, y);
        Self {
            local: p,
            surface: p,
            click_count: 1,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shift the surface coordinates by a split-view offset
    pub fn with_surface_offset(mut self, dx: f32, dy: f32) -> Self {
        self.surface = self.local.offset(dx, dy);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn double_click(mut self) -> Self {
        self.click_count = 2;
        self
    }

    /// Offset from page to surface coordinates
    pub fn surface_offset(&self) -> (f32, f32) {
        (self.surface.x - self.local.x, self.surface.y - self.local.y)
    }
}

/// Keys the interaction machine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Delete,
    Backspace,
}

/// What an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not relevant in the current state
    Ignored,
    /// Consumed; gesture state or preview changed
    Handled,
    /// An object was added to the store
    Committed(crate::domain::ObjectId),
    /// The gesture was abandoned and the surface restored
    Cancelled,
}

impl Outcome {
    pub fn committed(self) -> Option<crate::domain::ObjectId> {
        match self {
            Outcome::Committed(id) => Some(id),
            _ => None,
        }
    }
}
