//! Markup rendering module
//!
//! This module contains:
//! - Decoration constants and arrow math shared by the draw routines
//! - The tiny-skia drawing surface with transforms, snapshots and layers
//! - Per-type draw routines, halo text and selection chrome
//! - Whole-page rendering with culling and eraser compositing

pub mod chrome;
pub mod geometry;
pub mod page;
pub mod paths;
pub mod shapes;
pub mod surface;
pub mod text;

pub use page::{CullingConfig, PageRenderer, RenderStats};
pub use shapes::render_object;
pub use surface::{Snapshot, Surface};
pub use text::GlyphPainter;
