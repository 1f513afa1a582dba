//! Layer abstraction and the viewer-native layer it produces.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayD;

use super::array::{ArraySource, InMemoryArray};
use crate::error::LayerError;

/// A single displayable unit within an [`Image`](super::Image).
///
/// Implementations reference data stored elsewhere (a file, a dataset inside
/// a container) and only produce display data when asked.
pub trait Layer: fmt::Debug + Send + Sync {
    /// Layer name, shown by the viewer.
    fn name(&self) -> &str;

    /// Short identifier of the layer kind (e.g. "npy", "hdf5").
    fn kind(&self) -> &'static str;

    /// Produce a viewer layer for this layer's data.
    fn load(&self) -> Result<ViewerLayer, LayerError>;

    /// Persist this layer back to its storage.
    fn save(&self) -> Result<(), LayerError>;
}

/// Viewer-native image layer: a name tagged onto array data.
#[derive(Debug, Clone)]
pub struct ViewerLayer {
    name: String,
    data: Arc<dyn ArraySource>,
}

impl ViewerLayer {
    /// Create a viewer layer over any array source.
    pub fn new(name: impl Into<String>, data: Arc<dyn ArraySource>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a viewer layer from an in-memory array.
    pub fn from_array(name: impl Into<String>, data: ArrayD<f32>) -> Self {
        Self::new(name, Arc::new(InMemoryArray::new(data)))
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Array source backing the layer.
    pub fn data(&self) -> &Arc<dyn ArraySource> {
        &self.data
    }

    /// Shape of the layer data.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}
