//! Opening storage against the composed schema.

use habitat_model::{Schema, StorageError, StorageProvider};
use habitat_plugin::plugin::PluginInstance;
use habitat_plugin::registry::PluginRegistry;
use std::sync::Arc;

/// Composes the schema from a batch of plugin instances and opens storage
/// against it.
///
/// Opening is one-shot. Once the store is open its schema is fixed: enabling
/// a data plugin afterwards takes effect at the next bootstrap.
pub struct StoreBootstrap<S> {
    storage: Arc<S>,
}

impl<S: StorageProvider> StoreBootstrap<S> {
    /// Wraps `storage`.
    #[must_use]
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Composes the schema and opens the store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyOpen`] if the store was opened before.
    pub fn open(
        &self,
        registry: &PluginRegistry,
        instances: &[PluginInstance],
    ) -> Result<Schema, StorageError> {
        if self.storage.is_open() {
            return Err(StorageError::AlreadyOpen);
        }

        let schema = registry.composed_models(instances);
        self.storage.open(schema.clone())?;
        tracing::info!(models = ?schema.names(), "store opened");
        Ok(schema)
    }

    /// Returns the schema the store was opened with.
    #[must_use]
    pub fn schema(&self) -> Option<Schema> {
        self.storage.schema()
    }
}
