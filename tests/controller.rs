//! Controller tests through the public API.
//!
//! Adapters here are in-memory fakes registered with a fresh plugin manager,
//! so no built-in format is involved.

use std::path::Path;
use std::sync::{Arc, Mutex};

use bioimage::hooks::{BioImageHooks, PluginManager, ReaderFunction, WriterFunction, extension_matches};
use bioimage::{AdapterError, BioImageController, BioImageError, Image, Viewer, ViewerLayer};

/// Reads `.h5` paths into an image named after the file stem.
struct FakeH5Reader;

impl BioImageHooks for FakeH5Reader {
    fn get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        if !extension_matches(path, &["h5"]) {
            return None;
        }
        Some(Box::new(|path: &Path| -> Result<Image, AdapterError> {
            let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
            Ok(Image::new(stem))
        }))
    }
}

/// Claims `.bad` paths and always fails.
struct FailingReader;

impl BioImageHooks for FailingReader {
    fn get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        if !extension_matches(path, &["bad"]) {
            return None;
        }
        Some(Box::new(|_: &Path| -> Result<Image, AdapterError> {
            Err("corrupt container".into())
        }))
    }
}

/// Writes `.out` paths by recording the image name.
struct RecordingWriter {
    written: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl BioImageHooks for RecordingWriter {
    fn get_writer(&self, path: &Path, _image: &Image) -> Option<WriterFunction> {
        if !extension_matches(path, &["out"]) {
            return None;
        }
        let written = Arc::clone(&self.written);
        let fail = self.fail;
        Some(Box::new(move |_: &Path, image: &Image| -> Result<(), AdapterError> {
            if fail {
                return Err("disk full".into());
            }
            written.lock().unwrap().push(image.name().to_string());
            Ok(())
        }))
    }
}

struct NullViewer;

impl Viewer for NullViewer {
    fn add_layer(&self, _layer: ViewerLayer) {}
}

fn plugin(hooks: impl BioImageHooks + 'static) -> Box<dyn BioImageHooks> {
    Box::new(hooks)
}

fn controller_with(plugins: Vec<(&str, Box<dyn BioImageHooks>)>) -> BioImageController {
    let mut pm = PluginManager::new("test");
    for (name, plugin) in plugins {
        pm.register(name, plugin).unwrap();
    }
    BioImageController::with_plugin_manager(pm)
}

fn empty_controller() -> BioImageController {
    controller_with(Vec::new())
}

// === No adapter ===

#[test]
fn test_no_adapter_cannot_read_or_write() {
    let mut controller = empty_controller();
    let image = Image::new("sample");

    for path in ["sample.h5", "data/cells.tif", "noext"] {
        assert!(!controller.can_read(path));
        assert!(!controller.can_write(path, &image));

        match controller.read(path) {
            Err(BioImageError::NoReader { path: p }) => assert_eq!(p, Path::new(path)),
            other => panic!("expected NoReader, got {:?}", other.map(|i| i.name().to_string())),
        }
        match controller.write(path, &image) {
            Err(BioImageError::NoWriter { path: p }) => assert_eq!(p, Path::new(path)),
            other => panic!("expected NoWriter, got {:?}", other),
        }
    }
    assert!(controller.images().is_empty());
}

#[test]
fn test_write_without_writer_mentions_path() {
    let mut controller = controller_with(vec![("h5", plugin(FakeH5Reader))]);
    controller.read("sample.h5").unwrap();
    let image = Arc::clone(controller.images().get("sample").unwrap());

    let err = controller.write("sample.h5", &image).unwrap_err();
    assert!(matches!(err, BioImageError::NoWriter { .. }));
    assert!(err.to_string().contains("sample.h5"));
    assert_eq!(controller.images().names(), vec!["sample"]);
}

// === Reading ===

#[test]
fn test_read_sample_h5() {
    let mut controller = controller_with(vec![("h5", plugin(FakeH5Reader))]);

    assert!(controller.can_read("sample.h5"));
    let image = controller.read("sample.h5").unwrap();

    assert_eq!(image.name(), "sample");
    assert_eq!(controller.images().len(), 1);
    assert_eq!(controller.images().names(), vec!["sample"]);
}

#[test]
fn test_read_is_append_only() {
    let mut controller = controller_with(vec![("h5", plugin(FakeH5Reader))]);
    controller.read("a.h5").unwrap();
    controller.read("b.h5").unwrap();

    let image = controller.read("c.h5").unwrap();

    assert_eq!(controller.images().names(), vec!["a", "b", "c"]);
    let occurrences = controller
        .images()
        .iter()
        .filter(|i| i.name() == image.name())
        .count();
    assert_eq!(occurrences, 1);
}

#[test]
fn test_failing_reader_leaves_images_unchanged() {
    let mut controller = controller_with(vec![
        ("h5", plugin(FakeH5Reader)),
        ("bad", plugin(FailingReader)),
    ]);
    controller.read("a.h5").unwrap();

    assert!(controller.can_read("broken.bad"));
    let err = controller.read("broken.bad").unwrap_err();

    match &err {
        BioImageError::Adapter { path, source } => {
            assert_eq!(path, Path::new("broken.bad"));
            assert_eq!(source.to_string(), "corrupt container");
        }
        other => panic!("expected Adapter error, got {:?}", other),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(controller.images().names(), vec!["a"]);
}

// === Writing ===

#[test]
fn test_write_dispatches_without_touching_images() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = RecordingWriter {
        written: Arc::clone(&written),
        fail: false,
    };
    let controller = controller_with(vec![("out", plugin(writer))]);
    let image = Image::new("export");

    assert!(controller.can_write("x.out", &image));
    controller.write("x.out", &image).unwrap();

    assert_eq!(*written.lock().unwrap(), vec!["export".to_string()]);
    assert!(controller.images().is_empty());
}

#[test]
fn test_failing_writer_is_wrapped() {
    let writer = RecordingWriter {
        written: Arc::new(Mutex::new(Vec::new())),
        fail: true,
    };
    let controller = controller_with(vec![("out", plugin(writer))]);

    let err = controller.write("x.out", &Image::new("export")).unwrap_err();
    assert!(matches!(err, BioImageError::Adapter { .. }));
    assert!(err.to_string().contains("disk full"));
}

// === Registration ===

#[test]
fn test_register_viewer_twice() {
    let mut controller = empty_controller();
    assert!(controller.viewer().is_none());

    let first: Arc<dyn Viewer> = Arc::new(NullViewer);
    controller.register_viewer(Arc::clone(&first)).unwrap();

    let err = controller.register_viewer(Arc::new(NullViewer)).unwrap_err();
    assert!(matches!(err, BioImageError::AlreadyRegistered { what: "viewer" }));
    assert!(err.is_usage_error());
    assert!(Arc::ptr_eq(controller.viewer().unwrap(), &first));
}

#[test]
fn test_viewer_and_widget_are_independent() {
    let mut controller = empty_controller();
    controller.register_viewer(Arc::new(NullViewer)).unwrap();

    assert!(controller.widget().is_none());
    assert!(controller.viewer().is_some());
}

// === Observers ===

#[test]
fn test_subscribers_see_reads() {
    let mut controller = controller_with(vec![("h5", plugin(FakeH5Reader))]);
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    controller.subscribe_images(move |event| {
        if let bioimage::ImageListEvent::Inserted { name, .. } = event {
            sink.lock().unwrap().push(name.clone());
        }
    });

    controller.read("a.h5").unwrap();
    assert!(matches!(
        controller.read("broken.xyz"),
        Err(BioImageError::NoReader { .. })
    ));

    assert_eq!(*names.lock().unwrap(), vec!["a".to_string()]);
}
