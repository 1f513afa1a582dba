//! Plugin hooks for format adapters.
//!
//! Adapters implement [`BioImageHooks`] and are registered with a
//! [`PluginManager`], either directly or through the built-in entry points
//! discovered by [`PluginManager::load_entrypoints`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bioimage::hooks::PluginManager;
//!
//! let mut pm = PluginManager::new("bioimage");
//! pm.load_entrypoints("bioimage");
//!
//! if let Some(reader) = pm.hook_get_reader(path) {
//!     let image = reader(path)?;
//! }
//! ```

mod entry_points;
mod manager;
mod spec;

pub use entry_points::{BUILTIN_ENTRY_POINTS, EntryPoint};
pub use manager::{PluginError, PluginManager};
pub use spec::{BioImageHooks, ReaderFunction, WriterFunction, extension_matches};
