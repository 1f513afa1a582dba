//! Built-in adapter entry points.

use std::fmt;

use super::spec::BioImageHooks;
use crate::constants::ENTRY_POINT_GROUP;
use crate::contrib;

/// Named factory for an adapter, advertised under an entry-point group.
#[derive(Clone, Copy)]
pub struct EntryPoint {
    /// Group the entry point is advertised under
    pub group: &'static str,
    /// Plugin name the adapter is registered as
    pub name: &'static str,
    /// Adapter constructor
    pub load: fn() -> Box<dyn BioImageHooks>,
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Adapters shipped with this crate.
///
/// Order matters: later entries are consulted first by the plugin manager.
pub static BUILTIN_ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint {
        group: ENTRY_POINT_GROUP,
        name: "raster",
        load: contrib::raster::load,
    },
    EntryPoint {
        group: ENTRY_POINT_GROUP,
        name: "npy",
        load: contrib::npy::load,
    },
    #[cfg(feature = "hdf5")]
    EntryPoint {
        group: ENTRY_POINT_GROUP,
        name: "hdf5",
        load: contrib::hdf5::load,
    },
];
