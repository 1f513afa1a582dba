//! Controller mediating between the host viewer, loaded images and adapters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bioimage::BioImageController;
//!
//! let mut controller = BioImageController::new();
//! if controller.can_read(path) {
//!     let image = controller.read(path)?;
//!     controller.show_image(image.name())?;
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::constants::PROJECT_NAME;
use crate::error::BioImageError;
use crate::hooks::{PluginManager, ReaderFunction, WriterFunction};
use crate::images::{ImageList, ImageListEvent, SubscriptionId};
use crate::model::Image;
use crate::viewer::{Registration, Viewer, Widget};

/// Dispatches read and write requests to the adapters registered with its
/// plugin manager and keeps the images that were read.
pub struct BioImageController {
    pm: PluginManager,
    viewer: Registration<Arc<dyn Viewer>>,
    widget: Registration<Arc<dyn Widget>>,
    images: ImageList,
}

impl BioImageController {
    /// Create a controller with default settings and the built-in adapters.
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Create a controller, loading adapters as configured by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut pm = PluginManager::new(PROJECT_NAME);
        for name in &settings.plugins.blocked {
            pm.set_blocked(name.clone());
        }
        pm.load_entrypoints(&settings.plugins.entry_point_group);
        Self::with_plugin_manager(pm)
    }

    /// Create a controller around an existing plugin manager.
    pub fn with_plugin_manager(pm: PluginManager) -> Self {
        Self {
            pm,
            viewer: Registration::default(),
            widget: Registration::default(),
            images: ImageList::new(),
        }
    }

    fn get_reader_function(&self, path: &Path) -> Option<ReaderFunction> {
        self.pm.hook_get_reader(path)
    }

    fn get_writer_function(&self, path: &Path, image: &Image) -> Option<WriterFunction> {
        self.pm.hook_get_writer(path, image)
    }

    /// Whether some adapter can read `path`.
    pub fn can_read(&self, path: impl AsRef<Path>) -> bool {
        self.get_reader_function(path.as_ref()).is_some()
    }

    /// Whether some adapter can write `image` to `path`.
    pub fn can_write(&self, path: impl AsRef<Path>, image: &Image) -> bool {
        self.get_writer_function(path.as_ref(), image).is_some()
    }

    /// Read `path` and append the resulting image to [`images`](Self::images).
    ///
    /// Nothing is appended unless the reader succeeds.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<Arc<Image>, BioImageError> {
        let path = path.as_ref();
        let reader_function = self
            .get_reader_function(path)
            .ok_or_else(|| BioImageError::NoReader {
                path: path.to_path_buf(),
            })?;

        let image = Arc::new(
            reader_function(path).map_err(|source| BioImageError::adapter(path, source))?,
        );
        self.images.append(Arc::clone(&image))?;

        log::info!(
            "Read image '{}' with {} layers from {:?}",
            image.name(),
            image.len(),
            path
        );
        Ok(image)
    }

    /// Write `image` to `path`. The image list is not modified.
    pub fn write(&self, path: impl AsRef<Path>, image: &Image) -> Result<(), BioImageError> {
        let path = path.as_ref();
        let writer_function =
            self.get_writer_function(path, image)
                .ok_or_else(|| BioImageError::NoWriter {
                    path: path.to_path_buf(),
                })?;

        writer_function(path, image).map_err(|source| BioImageError::adapter(path, source))?;
        log::info!("Wrote image '{}' to {:?}", image.name(), path);
        Ok(())
    }

    /// Register the host viewer. May only be called once.
    pub fn register_viewer(&mut self, viewer: Arc<dyn Viewer>) -> Result<(), BioImageError> {
        self.viewer.set(viewer, "viewer")?;
        log::debug!("Viewer registered");
        Ok(())
    }

    /// Register the host widget. May only be called once.
    ///
    /// The widget is notified of every later change to the image list.
    pub fn register_widget(&mut self, widget: Arc<dyn Widget>) -> Result<(), BioImageError> {
        self.widget.set(Arc::clone(&widget), "widget")?;
        self.images
            .subscribe(move |event: &ImageListEvent| widget.images_changed(event));
        log::debug!("Widget registered");
        Ok(())
    }

    /// Remove an image from the list, returning it.
    pub fn remove_image(&mut self, name: &str) -> Option<Arc<Image>> {
        self.images.remove(name)
    }

    /// Observe changes to the image list.
    pub fn subscribe_images<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&ImageListEvent) + Send + Sync + 'static,
    {
        self.images.subscribe(observer)
    }

    /// Load every layer of the named image and add it to the viewer.
    ///
    /// Layers are loaded before any is handed to the viewer, so a failing
    /// layer leaves the viewer untouched.
    pub fn show_image(&self, name: &str) -> Result<usize, BioImageError> {
        let viewer = self.viewer.get().ok_or(BioImageError::NoViewer)?;
        let image = self
            .images
            .get(name)
            .ok_or_else(|| BioImageError::UnknownImage {
                name: name.to_string(),
            })?;

        let layers = image.load_layers()?;
        let count = layers.len();
        for layer in layers {
            viewer.add_layer(layer);
        }

        log::debug!("Showing {} layers of image '{}'", count, name);
        Ok(count)
    }

    /// The plugin manager holding the adapters.
    pub fn pm(&self) -> &PluginManager {
        &self.pm
    }

    /// Mutable access to the plugin manager, to register extra adapters.
    pub fn pm_mut(&mut self) -> &mut PluginManager {
        &mut self.pm
    }

    /// The registered viewer, if any.
    pub fn viewer(&self) -> Option<&Arc<dyn Viewer>> {
        self.viewer.get()
    }

    /// The registered widget, if any.
    pub fn widget(&self) -> Option<&Arc<dyn Widget>> {
        self.widget.get()
    }

    /// Images read so far, in order.
    pub fn images(&self) -> &ImageList {
        &self.images
    }
}

impl Default for BioImageController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BioImageController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BioImageController")
            .field("pm", &self.pm)
            .field("viewer", &self.viewer.get().is_some())
            .field("widget", &self.widget.get().is_some())
            .field("images", &self.images)
            .finish()
    }
}
