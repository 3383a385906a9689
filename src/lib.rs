//! An extension-host runtime for habit tracking.
//!
//! Optional feature plugins are discovered at link time, gated by
//! configuration flags, composed into one storage schema and notified
//! concurrently of habit lifecycle events.

/// Layer 1: Primary entity, model metadata and storage contract.
pub use habitat_model;

/// Layer 2: Plugin runtime.
pub use habitat_plugin;

/// Layer 3: Feature plugins.
pub use habitat_features;

/// Layer 3: Composition root.
pub use habitat_app;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use habitat_app::{App, AppError, HabitList, StoreBootstrap};
    pub use habitat_features::{DefaultFeatures, flags};
    pub use habitat_model::{
        Habit, HabitFrequency, HabitId, MemoryStorage, Model, ModelDescriptor, Schema,
        StorageError, StorageProvider,
    };
    pub use habitat_plugin::prelude::*;
}
