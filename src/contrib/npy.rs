//! NumPy `.npy` adapter.
//!
//! Arrays of any dimensionality are supported. Element types `f32`, `f64`,
//! `u8`, `u16`, `i16` and `i32` are read and converted to `f32` without
//! rescaling; arrays are always written as `f32`.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement};

use super::image_name;
use crate::constants::NPY_EXTENSIONS;
use crate::error::{AdapterError, LayerError};
use crate::hooks::{BioImageHooks, ReaderFunction, WriterFunction, extension_matches};
use crate::model::{ArraySource, Image, Layer, ViewerLayer};

/// Layer backed by a `.npy` file.
///
/// A layer may carry pending data; [`Layer::load`] then shows the pending
/// data and [`Layer::save`] writes it to the file.
#[derive(Debug, Clone)]
pub struct NpyLayer {
    name: String,
    npy_file: PathBuf,
    pending: Option<ArrayD<f32>>,
}

impl NpyLayer {
    /// Reference the array stored in `npy_file`.
    pub fn new(name: impl Into<String>, npy_file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            npy_file: npy_file.into(),
            pending: None,
        }
    }

    /// Attach data that has not been written to the file yet.
    pub fn with_data(mut self, data: ArrayD<f32>) -> Self {
        self.pending = Some(data);
        self
    }

    /// Path of the backing file.
    pub fn npy_file(&self) -> &Path {
        &self.npy_file
    }

    /// Whether the layer holds data not yet saved.
    pub fn has_pending_data(&self) -> bool {
        self.pending.is_some()
    }
}

impl Layer for NpyLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "npy"
    }

    fn load(&self) -> Result<ViewerLayer, LayerError> {
        let data = match &self.pending {
            Some(data) => data.clone(),
            None => read_npy_f32(&self.npy_file)?,
        };
        log::debug!("NpyLayer '{}': loaded shape {:?}", self.name, data.shape());
        Ok(ViewerLayer::from_array(self.name.clone(), data))
    }

    fn save(&self) -> Result<(), LayerError> {
        match &self.pending {
            Some(data) => {
                ndarray_npy::write_npy(&self.npy_file, data)?;
                log::info!("Saved layer '{}' to {:?}", self.name, self.npy_file);
            }
            None => log::debug!("NpyLayer '{}': nothing to save", self.name),
        }
        Ok(())
    }
}

/// Element types accepted when reading, converted to `f32`.
trait ToF32: ReadableElement + Copy {
    fn to_f32(self) -> f32;
}

macro_rules! impl_to_f32 {
    ($($t:ty),*) => {
        $(impl ToF32 for $t {
            fn to_f32(self) -> f32 {
                self as f32
            }
        })*
    };
}

impl_to_f32!(f64, u8, u16, i16, i32);

impl ToF32 for f32 {
    fn to_f32(self) -> f32 {
        self
    }
}

/// Read with element type `T`; `Ok(None)` if the file stores another type.
fn try_read<T: ToF32>(path: &Path) -> Result<Option<ArrayD<f32>>, LayerError> {
    let file = File::open(path)?;
    match ArrayD::<T>::read_npy(file) {
        Ok(array) => Ok(Some(array.mapv(T::to_f32))),
        Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read a `.npy` file of any supported element type as `f32`.
pub fn read_npy_f32(path: &Path) -> Result<ArrayD<f32>, LayerError> {
    let readers: [fn(&Path) -> Result<Option<ArrayD<f32>>, LayerError>; 6] = [
        try_read::<f32>,
        try_read::<f64>,
        try_read::<u8>,
        try_read::<u16>,
        try_read::<i16>,
        try_read::<i32>,
    ];

    for read in readers {
        if let Some(array) = read(path)? {
            return Ok(array);
        }
    }

    Err(LayerError::UnsupportedDataType {
        path: path.to_path_buf(),
    })
}

fn read_image(path: &Path) -> Result<Image, AdapterError> {
    // Parse once so corrupt files fail here; the layer re-reads on load
    let data = read_npy_f32(path)?;
    log::debug!("Npy file {:?} holds shape {:?}", path, data.shape());

    let name = image_name(path);
    Ok(Image::new(name.clone()).with_layer(NpyLayer::new(name, path)))
}

fn write_image(path: &Path, image: &Image) -> Result<(), AdapterError> {
    let [layer] = image.layers() else {
        return Err(format!(
            "npy files hold a single layer, image '{}' has {}",
            image.name(),
            image.len()
        )
        .into());
    };

    let data = layer.load()?.data().read()?;
    ndarray_npy::write_npy(path, &data)?;
    log::info!("Wrote image '{}' to {:?}", image.name(), path);
    Ok(())
}

/// Adapter reading and writing NumPy `.npy` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpyAdapter;

impl BioImageHooks for NpyAdapter {
    fn get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        extension_matches(path, NPY_EXTENSIONS).then(|| Box::new(read_image) as ReaderFunction)
    }

    fn get_writer(&self, path: &Path, image: &Image) -> Option<WriterFunction> {
        (extension_matches(path, NPY_EXTENSIONS) && image.len() == 1)
            .then(|| Box::new(write_image) as WriterFunction)
    }
}

pub(crate) fn load() -> Box<dyn BioImageHooks> {
    Box::new(NpyAdapter)
}
