//! Image model.

use super::layer::{Layer, ViewerLayer};
use crate::error::LayerError;

/// One loaded dataset, composed of an ordered list of layers.
///
/// The name identifies the image inside the controller's collection.
#[derive(Debug)]
pub struct Image {
    name: String,
    layers: Vec<Box<dyn Layer>>,
}

impl Image {
    /// Create an image without layers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Add a layer (builder style).
    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Self {
        self.push_layer(Box::new(layer));
        self
    }

    /// Append a layer.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    /// Image name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layers in display order.
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|l| l.name() == name)
            .map(|l| l.as_ref())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the image has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Load every layer, stopping at the first failure.
    pub fn load_layers(&self) -> Result<Vec<ViewerLayer>, LayerError> {
        self.layers
            .iter()
            .map(|layer| {
                log::trace!("Loading layer '{}' of image '{}'", layer.name(), self.name);
                layer.load()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArraySource;
    use ndarray::{ArrayD, IxDyn};

    #[derive(Debug)]
    struct ConstantLayer {
        name: String,
        value: f32,
    }

    impl Layer for ConstantLayer {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> &'static str {
            "constant"
        }

        fn load(&self) -> Result<ViewerLayer, LayerError> {
            Ok(ViewerLayer::from_array(
                self.name.clone(),
                ArrayD::from_elem(IxDyn(&[2, 2]), self.value),
            ))
        }

        fn save(&self) -> Result<(), LayerError> {
            Err(LayerError::not_implemented("save", self.kind()))
        }
    }

    fn constant(name: &str, value: f32) -> ConstantLayer {
        ConstantLayer {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_layers_keep_order() {
        let image = Image::new("cells")
            .with_layer(constant("nuclei", 1.0))
            .with_layer(constant("membrane", 2.0));

        let names: Vec<_> = image.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["nuclei", "membrane"]);
        assert_eq!(image.len(), 2);
        assert!(image.layer("membrane").is_some());
        assert!(image.layer("missing").is_none());
    }

    #[test]
    fn test_load_layers() {
        let image = Image::new("cells").with_layer(constant("nuclei", 3.0));
        let loaded = image.load_layers().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "nuclei");
        assert_eq!(loaded[0].shape(), &[2, 2]);
        assert!(loaded[0].data().read().unwrap().iter().all(|&v| v == 3.0));
    }
}
