//! Raster image adapter (PNG, TIFF, JPEG, BMP) backed by the `image` crate.
//!
//! Grayscale images load as `(height, width)` arrays, everything else as
//! `(height, width, channels)`. Values are normalized to the 0.0-1.0 range.
//! Writing expects the same layout and quantizes to 8 bits per channel.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{ArrayD, IxDyn};

use super::image_name;
use crate::constants::{RASTER_READ_EXTENSIONS, RASTER_WRITE_EXTENSIONS};
use crate::error::{AdapterError, LayerError};
use crate::hooks::{BioImageHooks, ReaderFunction, WriterFunction, extension_matches};
use crate::model::{ArraySource, Image, Layer, ViewerLayer};

/// Layer backed by a raster image file.
#[derive(Debug, Clone)]
pub struct RasterLayer {
    name: String,
    file: PathBuf,
}

impl RasterLayer {
    /// Reference the image stored in `file`.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Path of the backing file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl Layer for RasterLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "raster"
    }

    fn load(&self) -> Result<ViewerLayer, LayerError> {
        let decoded = image::open(&self.file)?;
        let data = to_array(decoded)?;
        log::debug!("RasterLayer '{}': loaded shape {:?}", self.name, data.shape());
        Ok(ViewerLayer::from_array(self.name.clone(), data))
    }

    fn save(&self) -> Result<(), LayerError> {
        Err(LayerError::not_implemented("save", self.kind()))
    }
}

/// Convert a decoded image into a normalized `f32` array.
fn to_array(decoded: DynamicImage) -> Result<ArrayD<f32>, LayerError> {
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let color = decoded.color();

    let (shape, raw) = match (color.has_color(), color.has_alpha()) {
        (false, false) => (vec![height, width], decoded.to_luma32f().into_raw()),
        (false, true) => (vec![height, width, 2], decoded.to_luma_alpha32f().into_raw()),
        (true, false) => (vec![height, width, 3], decoded.to_rgb32f().into_raw()),
        (true, true) => (vec![height, width, 4], decoded.to_rgba32f().into_raw()),
    };

    ArrayD::from_shape_vec(IxDyn(&shape), raw).map_err(|e| LayerError::shape(&shape, e.to_string()))
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Whether an array of `shape` can be encoded: `(height, width)` or
/// `(height, width, channels)` with 1, 3 or 4 channels.
fn writable_shape(shape: &[usize]) -> bool {
    matches!(*shape, [_, _] | [_, _, 1 | 3 | 4])
}

/// Encode a `(height, width)` or `(height, width, channels)` array and save it.
fn save_array(data: &ArrayD<f32>, path: &Path) -> Result<(), LayerError> {
    let shape = data.shape();
    let (height, width, channels) = match *shape {
        [h, w] => (h, w, 1),
        [h, w, c] => (h, w, c),
        _ => return Err(LayerError::shape(shape, "expected 2 or 3 dimensions")),
    };

    let size_error = || LayerError::shape(shape, "image dimensions exceed u32");
    let width = u32::try_from(width).map_err(|_| size_error())?;
    let height = u32::try_from(height).map_err(|_| size_error())?;
    let raw: Vec<u8> = data.iter().copied().map(quantize).collect();
    let buffer_error = || LayerError::shape(shape, "buffer does not match dimensions");

    match channels {
        1 => GrayImage::from_raw(width, height, raw)
            .ok_or_else(buffer_error)?
            .save(path)?,
        3 => RgbImage::from_raw(width, height, raw)
            .ok_or_else(buffer_error)?
            .save(path)?,
        4 => RgbaImage::from_raw(width, height, raw)
            .ok_or_else(buffer_error)?
            .save(path)?,
        _ => return Err(LayerError::shape(shape, "expected 1, 3 or 4 channels")),
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<Image, AdapterError> {
    // Decode only the header; pixels are read when the layer is loaded
    let (width, height) = image::image_dimensions(path)?;
    log::debug!("Raster image {:?} is {}x{}", path, width, height);

    let name = image_name(path);
    Ok(Image::new(name.clone()).with_layer(RasterLayer::new(name, path)))
}

fn write_image(path: &Path, image: &Image) -> Result<(), AdapterError> {
    let [layer] = image.layers() else {
        return Err(format!(
            "raster files hold a single layer, image '{}' has {}",
            image.name(),
            image.len()
        )
        .into());
    };

    let data = layer.load()?.data().read()?;
    save_array(&data, path)?;
    log::info!("Wrote image '{}' to {:?}", image.name(), path);
    Ok(())
}

/// Adapter for common raster image formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterAdapter;

impl BioImageHooks for RasterAdapter {
    fn get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        extension_matches(path, RASTER_READ_EXTENSIONS)
            .then(|| Box::new(read_image) as ReaderFunction)
    }

    fn get_writer(&self, path: &Path, image: &Image) -> Option<WriterFunction> {
        if !extension_matches(path, RASTER_WRITE_EXTENSIONS) {
            return None;
        }
        let [layer] = image.layers() else {
            return None;
        };

        // A layer that cannot be loaded or has an unencodable shape is not claimed
        let layer = layer.load().ok()?;
        writable_shape(layer.shape()).then(|| Box::new(write_image) as WriterFunction)
    }
}

pub(crate) fn load() -> Box<dyn BioImageHooks> {
    Box::new(RasterAdapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrib::npy::NpyLayer;

    fn write_gradient(path: &Path) {
        let img = GrayImage::from_fn(4, 2, |x, y| image::Luma([(x * 60 + y * 10) as u8]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_read_grayscale_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        write_gradient(&path);

        let reader = RasterAdapter.get_reader(&path).unwrap();
        let image = reader(&path).unwrap();
        assert_eq!(image.name(), "gradient");

        let layer = image.layers()[0].load().unwrap();
        assert_eq!(layer.shape(), &[2, 4]);

        let data = layer.data().read().unwrap();
        assert_eq!(data[[0, 0]], 0.0);
        assert!((data[[1, 3]] - 190.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_read_rgb_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]))
            .save(&path)
            .unwrap();

        let layer = RasterLayer::new("rgb", &path).load().unwrap();
        assert_eq!(layer.shape(), &[2, 3, 3]);

        let data = layer.data().read().unwrap();
        assert_eq!(data[[1, 2, 0]], 1.0);
        assert_eq!(data[[1, 2, 1]], 0.0);
    }

    #[test]
    fn test_write_grayscale_from_npy_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let data = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![0.0, 0.5, 1.0, 2.0]).unwrap();
        let image = Image::new("out").with_layer(NpyLayer::new("out", "unused.npy").with_data(data));

        let writer = RasterAdapter.get_writer(&path, &image).unwrap();
        writer(&path, &image).unwrap();

        let written = image::open(&path).unwrap().to_luma8();
        assert_eq!(written.dimensions(), (2, 2));
        assert_eq!(written.get_pixel(0, 0)[0], 0);
        assert_eq!(written.get_pixel(1, 0)[0], 128);
        assert_eq!(written.get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn test_write_rejects_unsupported_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let data = ArrayD::zeros(IxDyn(&[2, 2, 2, 2]));

        let err = save_array(&data, &path).unwrap_err();
        assert!(matches!(err, LayerError::Shape { .. }));
    }

    #[test]
    fn test_writable_shapes() {
        assert!(writable_shape(&[4, 5]));
        assert!(writable_shape(&[4, 5, 1]));
        assert!(writable_shape(&[4, 5, 3]));
        assert!(writable_shape(&[4, 5, 4]));
        assert!(!writable_shape(&[4, 5, 2]));
        assert!(!writable_shape(&[20]));
        assert!(!writable_shape(&[2, 2, 2, 2]));
    }

    #[test]
    fn test_writer_declines_unencodable_shapes() {
        let path = Path::new("x.png");
        let stack = Image::new("stack")
            .with_layer(NpyLayer::new("stack", "unused.npy").with_data(ArrayD::zeros(IxDyn(&[2, 2, 2, 2]))));
        let gray_alpha = Image::new("la")
            .with_layer(NpyLayer::new("la", "unused.npy").with_data(ArrayD::zeros(IxDyn(&[2, 2, 2]))));
        let rgb = Image::new("rgb")
            .with_layer(NpyLayer::new("rgb", "unused.npy").with_data(ArrayD::zeros(IxDyn(&[2, 2, 3]))));

        assert!(RasterAdapter.get_writer(path, &stack).is_none());
        assert!(RasterAdapter.get_writer(path, &gray_alpha).is_none());
        assert!(RasterAdapter.get_writer(path, &rgb).is_some());
    }

    #[test]
    fn test_save_not_implemented() {
        let err = RasterLayer::new("a", "a.png").save().unwrap_err();
        assert!(matches!(err, LayerError::NotImplemented { operation: "save", kind: "raster" }));
    }

    #[test]
    fn test_claims() {
        assert!(RasterAdapter.get_reader(Path::new("a.tif")).is_some());
        assert!(RasterAdapter.get_reader(Path::new("a.JPG")).is_some());
        assert!(RasterAdapter.get_reader(Path::new("a.npy")).is_none());

        let single = Image::new("a")
            .with_layer(NpyLayer::new("a", "a.npy").with_data(ArrayD::zeros(IxDyn(&[2, 2]))));
        assert!(RasterAdapter.get_writer(Path::new("a.png"), &single).is_some());
        assert!(RasterAdapter.get_writer(Path::new("a.jpg"), &single).is_none());
        assert!(RasterAdapter.get_writer(Path::new("a.png"), &Image::new("empty")).is_none());
    }
}
