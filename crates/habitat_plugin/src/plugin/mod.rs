//! Plugin identity and the base capability.
//!
//! Every optional feature module is a plugin. A plugin type implements
//! [`FeaturePlugin`] and, optionally, [`DataPlugin`](crate::capability::DataPlugin)
//! and/or [`ViewPlugin`](crate::capability::ViewPlugin). Which extended
//! capabilities it offers is recorded once, in its [`PluginDescriptor`].
//!
//! # Example
//!
//! ```
//! use habitat_plugin::config::Configuration;
//! use habitat_plugin::error::PluginError;
//! use habitat_plugin::plugin::{FeaturePlugin, PluginDescriptor, PluginId};
//!
//! struct QuietHours {
//!     config: Configuration,
//! }
//!
//! impl FeaturePlugin for QuietHours {
//!     fn from_config(config: &Configuration) -> Result<Self, PluginError> {
//!         Ok(Self { config: config.clone() })
//!     }
//!
//!     fn is_enabled(&self) -> bool {
//!         self.config.flag("enable_quiet_hours")
//!     }
//! }
//!
//! let descriptor = PluginDescriptor::of::<QuietHours>().build();
//! assert_eq!(descriptor.id(), PluginId::of::<QuietHours>());
//! assert!(!descriptor.is_data());
//! ```

mod descriptor;
mod instance;
mod set;

pub use descriptor::{DescriptorBuilder, PluginDescriptor, PluginFactory};
pub use instance::PluginInstance;
pub use set::{PluginBundle, PluginSet};

use crate::config::Configuration;
use crate::error::PluginError;
use core::any::TypeId;
use core::fmt;
use downcast_rs::{DowncastSync, impl_downcast};

// ─────────────────────────────────────────────────────────────────────────────
// PluginId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a plugin type.
///
/// Used as the registry key and for duplicate detection. Based on [`TypeId`],
/// so each plugin type has exactly one `PluginId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginId {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginId {
    /// Creates a `PluginId` for the given plugin type.
    #[must_use]
    pub fn of<P: FeaturePlugin>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: core::any::type_name::<P>(),
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FeaturePlugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Base capability of every plugin.
///
/// A plugin is constructed from the shared [`Configuration`] and decides from
/// it whether it is currently enabled. [`is_enabled`](Self::is_enabled) must be
/// a pure function of the configuration: the registry asks again on every
/// dispatch, so toggling a flag takes effect on the next event.
pub trait FeaturePlugin: DowncastSync {
    /// Builds the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Construction`] if the plugin cannot run with
    /// this configuration. The registry drops the plugin and continues.
    fn from_config(config: &Configuration) -> Result<Self, PluginError>
    where
        Self: Sized;

    /// Returns `true` if the plugin should currently participate.
    fn is_enabled(&self) -> bool;

    /// Returns the plugin's name for logs and views.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

impl_downcast!(sync FeaturePlugin);
