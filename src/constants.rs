//! Global constants for the bioimage crate

/// Project name the plugin manager is created with
pub const PROJECT_NAME: &str = "bioimage";

/// Entry-point group adapters are discovered under
pub const ENTRY_POINT_GROUP: &str = "bioimage";

/// File extensions handled by the NumPy adapter
pub const NPY_EXTENSIONS: &[&str] = &["npy"];

/// File extensions the raster adapter can read
pub const RASTER_READ_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

/// File extensions the raster adapter can write
pub const RASTER_WRITE_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// File extensions handled by the HDF5 adapter
#[cfg(feature = "hdf5")]
pub const HDF5_EXTENSIONS: &[&str] = &["h5", "hdf5", "he5"];
