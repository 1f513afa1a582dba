//! Ordered, name-unique image collection with change notifications.
//!
//! Images are kept in insertion order alongside a name index. Observers (for
//! example a GUI widget listing the loaded images) subscribe with a callback
//! and are notified after every insertion or removal.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BioImageError;
use crate::model::Image;

/// Change notification emitted by [`ImageList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageListEvent {
    /// An image was inserted at `index`
    Inserted {
        /// Position of the new image
        index: usize,
        /// Name of the new image
        name: String,
    },
    /// An image was removed from `index`
    Removed {
        /// Position the image occupied
        index: usize,
        /// Name of the removed image
        name: String,
    },
}

/// Handle returned by [`ImageList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&ImageListEvent) + Send + Sync>;

/// Ordered collection of images, unique by name.
#[derive(Default)]
pub struct ImageList {
    images: Vec<Arc<Image>>,
    index: HashMap<String, usize>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl ImageList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image.
    ///
    /// Fails with [`BioImageError::DuplicateImage`] if an image with the same
    /// name is already present; the list is left untouched in that case.
    pub fn append(&mut self, image: Arc<Image>) -> Result<usize, BioImageError> {
        let name = image.name().to_string();
        if self.index.contains_key(&name) {
            return Err(BioImageError::DuplicateImage { name });
        }

        let index = self.images.len();
        self.images.push(image);
        self.index.insert(name.clone(), index);
        self.emit(&ImageListEvent::Inserted { index, name });
        Ok(index)
    }

    /// Remove an image by name, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Image>> {
        let index = self.index.remove(name)?;
        let image = self.images.remove(index);

        // Positions after the removed one shift down by one
        for position in self.index.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }

        self.emit(&ImageListEvent::Removed {
            index,
            name: name.to_string(),
        });
        Some(image)
    }

    /// Look up an image by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Image>> {
        self.index.get(name).map(|&i| &self.images[i])
    }

    /// Look up an image by position.
    pub fn get_index(&self, index: usize) -> Option<&Arc<Image>> {
        self.images.get(index)
    }

    /// Position of the image with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether an image with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterate over images in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Image>> {
        self.images.iter()
    }

    /// Image names in order.
    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.name()).collect()
    }

    /// Register an observer called after every change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&ImageListEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn emit(&self, event: &ImageListEvent) {
        log::trace!("Image list event: {:?}", event);
        for (_, observer) in &self.observers {
            observer(event);
        }
    }
}

impl fmt::Debug for ImageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageList")
            .field("images", &self.names())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ImageList {
    type Item = &'a Arc<Image>;
    type IntoIter = std::slice::Iter<'a, Arc<Image>>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
