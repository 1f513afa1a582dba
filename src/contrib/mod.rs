//! Built-in format adapters.
//!
//! Each submodule provides a layer type and an adapter implementing
//! [`BioImageHooks`](crate::hooks::BioImageHooks), advertised through
//! [`BUILTIN_ENTRY_POINTS`](crate::hooks::BUILTIN_ENTRY_POINTS).
//!
//! ## Supported Formats
//!
//! - **NumPy** (`.npy`): read and write, any dimensionality
//! - **Raster** (PNG, TIFF, JPEG, BMP): read; PNG and TIFF write
//! - **HDF5** (`.h5`, `.hdf5`): read, behind the `hdf5` feature

#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod npy;
pub mod raster;

use std::path::Path;

/// Image name derived from a file path (the file stem).
pub(crate) fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
