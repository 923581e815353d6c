//! Pointer and keyboard interaction
//!
//! This module contains:
//! - The tool palette and the options new objects are styled with
//! - Input event types and event outcomes
//! - Pure helpers turning pointer positions into draft objects
//! - The interaction state machine and the select tool gestures

pub mod draft;
pub mod events;
pub mod select;
pub mod state;
pub mod tool;

pub use events::{Key, Modifiers, Outcome, PointerEvent};
pub use select::SelectGesture;
pub use state::{Context, InteractionMachine, Prompt, PromptKind, State};
pub use tool::{Gesture, Tool, ToolOptions};
