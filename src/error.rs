//! Error types for the controller and its format adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by reader and writer functions supplied by adapters.
///
/// Adapters are free to fail with any error type; the controller only needs to
/// wrap it and keep it reachable through [`std::error::Error::source`].
pub type AdapterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`BioImageController`](crate::BioImageController).
#[derive(Error, Debug)]
pub enum BioImageError {
    /// No registered adapter claimed a reader for the path
    #[error("No reader found for {}", .path.display())]
    NoReader {
        /// Path that was requested
        path: PathBuf,
    },

    /// No registered adapter claimed a writer for the path
    #[error("No writer found for {}", .path.display())]
    NoWriter {
        /// Path that was requested
        path: PathBuf,
    },

    /// The claimed adapter failed while reading or writing
    #[error("Adapter failed for {}: {source}", .path.display())]
    Adapter {
        /// Path the adapter was invoked with
        path: PathBuf,
        /// Error raised by the adapter
        #[source]
        source: AdapterError,
    },

    /// A viewer or widget was registered a second time
    #[error("{what} is already registered")]
    AlreadyRegistered {
        /// Which registration slot was already filled
        what: &'static str,
    },

    /// An image with the same name is already in the collection
    #[error("An image named '{name}' is already loaded")]
    DuplicateImage {
        /// Conflicting image name
        name: String,
    },

    /// No image with this name is in the collection
    #[error("No image named '{name}' is loaded")]
    UnknownImage {
        /// Requested image name
        name: String,
    },

    /// An operation needed the viewer before one was registered
    #[error("No viewer is registered")]
    NoViewer,

    /// A layer failed while being loaded for display
    #[error(transparent)]
    Layer(#[from] LayerError),
}

impl BioImageError {
    /// Wrap an adapter failure for `path`.
    pub fn adapter(path: impl Into<PathBuf>, source: AdapterError) -> Self {
        Self::Adapter {
            path: path.into(),
            source,
        }
    }

    /// Whether this error signals a misuse of the API rather than a runtime failure.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }
}

/// Errors raised by layers and the adapters that build them.
#[derive(Error, Debug)]
pub enum LayerError {
    /// The operation exists in the interface but this layer kind does not support it yet
    #[error("{operation} is not implemented for {kind} layers")]
    NotImplemented {
        /// Operation that was attempted (e.g. "save")
        operation: &'static str,
        /// Layer kind identifier
        kind: &'static str,
    },

    /// I/O error while touching the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// NumPy array could not be read
    #[error("Failed to read npy data: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    /// NumPy array could not be written
    #[error("Failed to write npy data: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    /// Raster image could not be decoded or encoded
    #[error("Raster image error: {0}")]
    Raster(#[from] image::ImageError),

    /// HDF5 container access failed
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Array data does not have a shape this layer can handle
    #[error("Invalid shape {shape:?}: {message}")]
    Shape {
        /// Offending shape
        shape: Vec<usize>,
        /// What was expected
        message: String,
    },

    /// Element type of the stored data is not supported
    #[error("Unsupported data type in {}", .path.display())]
    UnsupportedDataType {
        /// File containing the data
        path: PathBuf,
    },
}

impl LayerError {
    /// Create a not-implemented error for `operation` on `kind` layers.
    pub fn not_implemented(operation: &'static str, kind: &'static str) -> Self {
        Self::NotImplemented { operation, kind }
    }

    /// Create a shape error.
    pub fn shape(shape: &[usize], message: impl Into<String>) -> Self {
        Self::Shape {
            shape: shape.to_vec(),
            message: message.into(),
        }
    }
}
