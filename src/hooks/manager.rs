//! Registry of adapters and hook dispatch.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use super::entry_points::BUILTIN_ENTRY_POINTS;
use super::spec::{BioImageHooks, ReaderFunction, WriterFunction};
use crate::model::Image;

/// Errors raised while registering adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// A plugin with this name is already registered
    #[error("Plugin '{0}' is already registered")]
    DuplicatePlugin(String),

    /// The plugin name has been blocked
    #[error("Plugin '{0}' is blocked")]
    Blocked(String),
}

/// Registry of adapters implementing [`BioImageHooks`].
///
/// Hooks are dispatched with first-result semantics: adapters are asked in
/// reverse registration order and the first one that claims a request wins.
pub struct PluginManager {
    project_name: String,
    plugins: Vec<(String, Box<dyn BioImageHooks>)>,
    blocked: HashSet<String>,
}

impl PluginManager {
    /// Create an empty manager for `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            plugins: Vec::new(),
            blocked: HashSet::new(),
        }
    }

    /// Project name this manager was created for.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Register an adapter under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        plugin: Box<dyn BioImageHooks>,
    ) -> Result<(), PluginError> {
        let name = name.into();
        if self.blocked.contains(&name) {
            return Err(PluginError::Blocked(name));
        }
        if self.is_registered(&name) {
            return Err(PluginError::DuplicatePlugin(name));
        }

        log::debug!("Registered plugin '{}'", name);
        self.plugins.push((name, plugin));
        Ok(())
    }

    /// Unregister the adapter called `name`, returning it.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn BioImageHooks>> {
        let position = self.plugins.iter().position(|(n, _)| n == name)?;
        log::debug!("Unregistered plugin '{}'", name);
        Some(self.plugins.remove(position).1)
    }

    /// Block `name` from being registered, unregistering it if present.
    pub fn set_blocked(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.unregister(&name);
        self.blocked.insert(name);
    }

    /// Whether `name` is blocked.
    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked.contains(name)
    }

    /// Whether an adapter called `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.plugins.iter().any(|(n, _)| n == name)
    }

    /// Names of registered adapters, in registration order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Register every built-in entry point advertised under `group`.
    ///
    /// Blocked and already registered names are skipped. Returns the number
    /// of adapters newly registered.
    pub fn load_entrypoints(&mut self, group: &str) -> usize {
        let mut loaded = 0;
        for entry_point in BUILTIN_ENTRY_POINTS.iter().filter(|ep| ep.group == group) {
            if self.is_blocked(entry_point.name) {
                log::warn!("Skipping blocked plugin '{}'", entry_point.name);
                continue;
            }
            if self.is_registered(entry_point.name) {
                continue;
            }

            match self.register(entry_point.name, (entry_point.load)()) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("Failed to load plugin '{}': {}", entry_point.name, e),
            }
        }

        log::info!("Loaded {} plugins from entry point group '{}'", loaded, group);
        loaded
    }

    /// Ask adapters for a reader for `path`; the first claim wins.
    pub fn hook_get_reader(&self, path: &Path) -> Option<ReaderFunction> {
        self.plugins.iter().rev().find_map(|(name, plugin)| {
            let reader = plugin.get_reader(path)?;
            log::debug!("Plugin '{}' claimed reading {:?}", name, path);
            Some(reader)
        })
    }

    /// Ask adapters for a writer for `image` at `path`; the first claim wins.
    pub fn hook_get_writer(&self, path: &Path, image: &Image) -> Option<WriterFunction> {
        self.plugins.iter().rev().find_map(|(name, plugin)| {
            let writer = plugin.get_writer(path, image)?;
            log::debug!(
                "Plugin '{}' claimed writing image '{}' to {:?}",
                name,
                image.name(),
                path
            );
            Some(writer)
        })
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManager")
            .field("project_name", &self.project_name)
            .field("plugins", &self.plugin_names())
            .field("blocked", &self.blocked)
            .finish()
    }
}
