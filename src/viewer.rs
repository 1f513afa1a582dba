//! Host collaborators registered with the controller.
//!
//! The controller never renders anything itself. A host application hands
//! it a [`Viewer`] that can display layers and, optionally, a [`Widget`]
//! that wants to follow changes to the loaded image list.

use crate::error::BioImageError;
use crate::images::ImageListEvent;
use crate::model::ViewerLayer;

/// Image viewer owned by the host application.
pub trait Viewer: Send + Sync {
    /// Display a layer.
    fn add_layer(&self, layer: ViewerLayer);
}

/// Host-side widget presenting the controller's state.
pub trait Widget: Send + Sync {
    /// Called after the controller's image list changed.
    fn images_changed(&self, _event: &ImageListEvent) {}
}

/// Single-assignment slot for a registered collaborator.
#[derive(Debug)]
pub(crate) enum Registration<T> {
    Unset,
    Set(T),
}

impl<T> Default for Registration<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Registration<T> {
    /// Fill the slot, rejecting a second assignment.
    pub(crate) fn set(&mut self, value: T, what: &'static str) -> Result<(), BioImageError> {
        match self {
            Self::Set(_) => Err(BioImageError::AlreadyRegistered { what }),
            Self::Unset => {
                *self = Self::Set(value);
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }
}
