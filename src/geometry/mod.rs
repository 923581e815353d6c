//! Pure geometry over drawing objects
//!
//! Bounds, hit-testing, outline vertices and selection handle placement.
//! Nothing here mutates a stored object except the explicit resize helper.

pub mod bounds;
pub mod handles;
pub mod hit_test;
pub mod outline;
pub mod text_metrics;

pub use bounds::{bounds, rotated_bounds, rotation_pivot, shape_bounds};
pub use hit_test::{DEFAULT_TOLERANCE, hit_test, hit_test_all, hit_test_index, paint_order};
