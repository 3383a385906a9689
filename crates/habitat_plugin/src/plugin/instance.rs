//! Live plugin instances.

use super::{FeaturePlugin, PluginId};
use crate::capability::{DataPlugin, ViewPlugin};
use core::fmt;
use std::sync::Arc;

/// A constructed plugin with its capabilities resolved.
///
/// Cloning shares the underlying plugin.
#[derive(Clone)]
pub struct PluginInstance {
    id: PluginId,
    plugin: Arc<dyn FeaturePlugin>,
    data: Option<Arc<dyn DataPlugin>>,
    view: Option<Arc<dyn ViewPlugin>>,
}

impl PluginInstance {
    pub(crate) fn new(
        id: PluginId,
        plugin: Arc<dyn FeaturePlugin>,
        data: Option<Arc<dyn DataPlugin>>,
        view: Option<Arc<dyn ViewPlugin>>,
    ) -> Self {
        Self {
            id,
            plugin,
            data,
            view,
        }
    }

    /// Returns the plugin's id.
    #[must_use]
    pub fn id(&self) -> PluginId {
        self.id
    }

    /// Returns the plugin's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    /// Returns `true` if the plugin is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.plugin.is_enabled()
    }

    /// Returns the base capability.
    #[must_use]
    pub fn feature(&self) -> &Arc<dyn FeaturePlugin> {
        &self.plugin
    }

    /// Returns the data capability, if the plugin has one.
    #[must_use]
    pub fn as_data(&self) -> Option<&Arc<dyn DataPlugin>> {
        self.data.as_ref()
    }

    /// Returns the view capability, if the plugin has one.
    #[must_use]
    pub fn as_view(&self) -> Option<&Arc<dyn ViewPlugin>> {
        self.view.as_ref()
    }

    /// Returns the concrete plugin if it is a `P`.
    #[must_use]
    pub fn downcast<P: FeaturePlugin>(&self) -> Option<Arc<P>> {
        Arc::clone(&self.plugin).downcast_arc::<P>().ok()
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInstance")
            .field("name", &self.name())
            .field("enabled", &self.is_enabled())
            .field("data", &self.data.is_some())
            .field("view", &self.view.is_some())
            .finish()
    }
}
