//! Array data backing a viewer layer.

use std::fmt;

use ndarray::ArrayD;

use crate::error::LayerError;

/// Source of n-dimensional pixel data for a [`ViewerLayer`](super::ViewerLayer).
///
/// Sources may be eager (data already in memory) or lazy (data is fetched
/// from the backing container each time [`ArraySource::read`] is called).
pub trait ArraySource: fmt::Debug + Send + Sync {
    /// Shape of the array, slowest-varying axis first.
    fn shape(&self) -> &[usize];

    /// Materialize the array as `f32` values.
    fn read(&self) -> Result<ArrayD<f32>, LayerError>;

    /// Number of dimensions.
    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Whether reading touches storage again.
    fn is_lazy(&self) -> bool {
        false
    }
}

/// Array that is already resident in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryArray {
    data: ArrayD<f32>,
}

impl InMemoryArray {
    /// Wrap an existing array.
    pub fn new(data: ArrayD<f32>) -> Self {
        Self { data }
    }

    /// Borrow the wrapped array.
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Take ownership of the wrapped array.
    pub fn into_inner(self) -> ArrayD<f32> {
        self.data
    }
}

impl From<ArrayD<f32>> for InMemoryArray {
    fn from(data: ArrayD<f32>) -> Self {
        Self::new(data)
    }
}

impl ArraySource for InMemoryArray {
    fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    fn read(&self) -> Result<ArrayD<f32>, LayerError> {
        Ok(self.data.clone())
    }
}
