//! bioimage - read and write bio-imaging file formats in image viewers.
//!
//! A [`BioImageController`] dispatches read and write requests to format
//! adapters registered with its [`PluginManager`](hooks::PluginManager),
//! keeps the images it has read in an observable [`ImageList`], and hands
//! their layers to a host [`Viewer`].

pub mod config;
pub mod constants;
pub mod contrib;
mod controller;
mod error;
pub mod hooks;
mod images;
pub mod model;
mod viewer;

pub use controller::BioImageController;
pub use error::{AdapterError, BioImageError, LayerError};
pub use images::{ImageList, ImageListEvent, SubscriptionId};
pub use model::{ArraySource, Image, InMemoryArray, Layer, ViewerLayer};
pub use viewer::{Viewer, Widget};
