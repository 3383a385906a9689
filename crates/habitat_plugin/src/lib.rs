//! Plugin runtime for Habitat (Layer 2).
//!
//! `habitat_plugin` discovers optional feature modules, gates them through
//! configuration flags, composes their models into the storage schema and fans
//! habit lifecycle events out to them concurrently:
//!
//! - [`plugin`] - Plugin identity, the base [`FeaturePlugin`](plugin::FeaturePlugin) capability, descriptors and sets
//! - [`capability`] - [`DataPlugin`](capability::DataPlugin) and [`ViewPlugin`](capability::ViewPlugin)
//! - [`config`] - Shared feature flags and build mode
//! - [`discovery`] - Link-time registration via [`submit_plugin!`]
//! - [`registry`] - [`PluginRegistry`](registry::PluginRegistry)
//! - [`lifecycle`] - Lifecycle events and dispatch summaries
//! - [`view`] - Presentation objects contributed by view plugins
//! - [`error`] - Error types
//!
//! # Architecture
//!
//! - **Layer 1** (`habitat_model`): Primary entity, model metadata, storage contract
//! - **Layer 2** (`habitat_plugin`): Plugin runtime (this crate)
//! - **Layer 3** (`habitat_features`, `habitat_app`): Concrete plugins and the composition root
//!
//! # Example
//!
//! ```
//! use habitat_model::{Habit, HabitFrequency};
//! use habitat_plugin::prelude::*;
//!
//! struct Counter {
//!     config: Configuration,
//! }
//!
//! impl FeaturePlugin for Counter {
//!     fn from_config(config: &Configuration) -> Result<Self, PluginError> {
//!         Ok(Self { config: config.clone() })
//!     }
//!
//!     fn is_enabled(&self) -> bool {
//!         self.config.flag("enable_counter")
//!     }
//! }
//!
//! impl DataPlugin for Counter {
//!     fn models(&self) -> Vec<habitat_model::ModelDescriptor> {
//!         Vec::new()
//!     }
//! }
//!
//! let config = Configuration::new().with_flag("enable_counter", true);
//! let registry = PluginRegistry::new();
//! registry.register(PluginDescriptor::of::<Counter>().with_data());
//! registry.instantiate_all(&config);
//!
//! let habit = Habit::new("Journal", HabitFrequency::Daily);
//! let summary = futures::executor::block_on(registry.notify_will_delete(&habit));
//! assert_eq!(summary.recipients, 1);
//! ```

/// Extended plugin capabilities.
pub mod capability;

/// Feature flags and build mode.
pub mod config;

/// Link-time plugin discovery.
pub mod discovery;

/// Error types.
pub mod error;

/// Lifecycle events and dispatch.
pub mod lifecycle;

/// Plugin identity, descriptors, instances and sets.
pub mod plugin;

/// Plugin registry.
pub mod registry;

/// View contributions.
pub mod view;

/// Re-export `async_trait` for plugin implementations.
pub use async_trait::async_trait;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::async_trait;
    pub use crate::capability::*;
    pub use crate::config::*;
    pub use crate::discovery::{PluginDiscovery, discover_plugins};
    pub use crate::error::*;
    pub use crate::lifecycle::*;
    pub use crate::plugin::*;
    pub use crate::registry::*;
    pub use crate::submit_plugin;
    pub use crate::view::*;
}
