//! Pure domain types with minimal dependencies
//!
//! This module contains the markup object model used throughout the crate.
//! Nothing here draws or handles input.

pub mod color;
pub mod geometry;
pub mod object;
pub mod selection;

pub use color::*;
pub use geometry::*;
pub use object::*;
pub use selection::*;
