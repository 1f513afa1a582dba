//! Hook specification implemented by format adapters.

use std::path::Path;

use crate::error::AdapterError;
use crate::model::Image;

/// Function reading the file at a path into an [`Image`].
pub type ReaderFunction = Box<dyn Fn(&Path) -> Result<Image, AdapterError> + Send + Sync>;

/// Function writing an [`Image`] to a path.
pub type WriterFunction = Box<dyn Fn(&Path, &Image) -> Result<(), AdapterError> + Send + Sync>;

/// Extension points an adapter may implement.
///
/// Both hooks default to "not applicable", so an adapter only overrides the
/// ones it supports. Returning `Some` claims the request; the plugin manager
/// stops at the first adapter that does.
pub trait BioImageHooks: Send + Sync {
    /// Return a reader able to read `path`, if this adapter supports it.
    fn get_reader(&self, _path: &Path) -> Option<ReaderFunction> {
        None
    }

    /// Return a writer able to write `image` to `path`, if this adapter supports it.
    fn get_writer(&self, _path: &Path, _image: &Image) -> Option<WriterFunction> {
        None
    }
}

/// Check whether `path` has one of `extensions` (case-insensitive, without dots).
pub fn extension_matches(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
