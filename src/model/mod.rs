//! Data models for loaded images.
//!
//! An [`Image`] is a named, ordered collection of [`Layer`]s. Layers are
//! passive references to stored data; calling [`Layer::load`] produces a
//! [`ViewerLayer`] the host viewer can display.

mod array;
mod image;
mod layer;

pub use array::{ArraySource, InMemoryArray};
pub use image::Image;
pub use layer::{Layer, ViewerLayer};
