//! HDF5 adapter.
//!
//! Every dataset in a file becomes one [`Hdf5Layer`] referencing the file
//! path and the dataset's internal path. Loading a layer only inspects the
//! dataset; its values are read lazily through [`Hdf5Dataset`], which
//! re-opens the file on each read so no file handle outlives a call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};

use super::image_name;
use crate::constants::HDF5_EXTENSIONS;
use crate::error::{AdapterError, LayerError};
use crate::hooks::{BioImageHooks, ReaderFunction, extension_matches};
use crate::model::{ArraySource, Image, Layer, ViewerLayer};

/// Layer referencing a dataset inside an HDF5 file.
#[derive(Debug, Clone)]
pub struct Hdf5Layer {
    name: String,
    hdf5_file: PathBuf,
    path: String,
}

impl Hdf5Layer {
    /// Reference dataset `path` inside `hdf5_file`.
    pub fn new(
        name: impl Into<String>,
        hdf5_file: impl Into<PathBuf>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hdf5_file: hdf5_file.into(),
            path: path.into(),
        }
    }

    /// Path of the container file.
    pub fn hdf5_file(&self) -> &Path {
        &self.hdf5_file
    }

    /// Internal path of the dataset.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Layer for Hdf5Layer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "hdf5"
    }

    fn load(&self) -> Result<ViewerLayer, LayerError> {
        // The file handle is dropped at the end of this call on every path
        let file = hdf5::File::open(&self.hdf5_file)?;
        let dataset = file.dataset(&self.path)?;
        let source = Hdf5Dataset {
            hdf5_file: self.hdf5_file.clone(),
            path: self.path.clone(),
            shape: dataset.shape(),
        };

        log::debug!(
            "Hdf5Layer '{}': {}:{} has shape {:?}",
            self.name,
            self.hdf5_file.display(),
            self.path,
            source.shape
        );
        Ok(ViewerLayer::new(self.name.clone(), Arc::new(source)))
    }

    fn save(&self) -> Result<(), LayerError> {
        Err(LayerError::not_implemented("save", self.kind()))
    }
}

/// Lazily read HDF5 dataset.
#[derive(Debug, Clone)]
pub struct Hdf5Dataset {
    hdf5_file: PathBuf,
    path: String,
    shape: Vec<usize>,
}

impl ArraySource for Hdf5Dataset {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn read(&self) -> Result<ArrayD<f32>, LayerError> {
        let file = hdf5::File::open(&self.hdf5_file)?;
        let raw: Vec<f32> = file.dataset(&self.path)?.read_raw()?;
        log::trace!("Read {} values from {}", raw.len(), self.path);

        ArrayD::from_shape_vec(IxDyn(&self.shape), raw)
            .map_err(|e| LayerError::shape(&self.shape, e.to_string()))
    }

    fn is_lazy(&self) -> bool {
        true
    }
}

/// Collect the internal paths of every dataset below `group`.
fn collect_datasets(group: &hdf5::Group, out: &mut Vec<String>) -> hdf5::Result<()> {
    for dataset in group.datasets()? {
        out.push(dataset.name());
    }
    for child in group.groups()? {
        collect_datasets(&child, out)?;
    }
    Ok(())
}

fn leaf_name(dataset: &str) -> &str {
    dataset.rsplit('/').next().unwrap_or(dataset)
}

/// Layer names for `datasets`: the leaf name, or the full internal path
/// (without the leading `/`) when several datasets share a leaf name.
fn layer_names(datasets: &[String]) -> Vec<String> {
    let mut leaf_counts: HashMap<&str, usize> = HashMap::new();
    for dataset in datasets {
        *leaf_counts.entry(leaf_name(dataset)).or_default() += 1;
    }

    datasets
        .iter()
        .map(|dataset| {
            let leaf = leaf_name(dataset);
            if leaf_counts[leaf] > 1 {
                dataset.trim_start_matches('/').to_string()
            } else {
                leaf.to_string()
            }
        })
        .collect()
}

fn read_image(path: &Path) -> Result<Image, AdapterError> {
    let file = hdf5::File::open(path)?;
    let mut datasets = Vec::new();
    collect_datasets(&file, &mut datasets)?;

    let mut image = Image::new(image_name(path));
    for (name, dataset) in layer_names(&datasets).into_iter().zip(datasets) {
        image.push_layer(Box::new(Hdf5Layer::new(name, path, dataset)));
    }

    log::info!("Found {} datasets in {}", image.len(), path.display());
    Ok(image)
}

/// Adapter reading HDF5 files. Writing is not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Adapter;

impl BioImageHooks for Hdf5Adapter {
    fn get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        extension_matches(path, HDF5_EXTENSIONS).then(|| Box::new(read_image) as ReaderFunction)
    }
}

pub(crate) fn load() -> Box<dyn BioImageHooks> {
    Box::new(Hdf5Adapter)
}
