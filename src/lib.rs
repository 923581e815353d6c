//! Vector markup over paginated page images
//!
//! Objects live per page in an [`store::ObjectStore`], are drawn onto a
//! [`render::Surface`] by [`render::PageRenderer`] and are created or edited
//! through [`interaction::InteractionMachine`].

pub mod config;
pub mod domain;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod store;
