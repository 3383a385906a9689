//! Error types for plugin construction and lifecycle hooks.

use habitat_model::StorageError;

/// Errors raised while building a plugin from configuration.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin refused to construct.
    #[error("plugin `{plugin}` could not be constructed: {reason}")]
    Construction {
        /// Name of the plugin type.
        plugin: &'static str,
        /// Human-readable cause.
        reason: String,
    },
}

impl PluginError {
    /// Creates a [`PluginError::Construction`] for plugin type `P`.
    #[must_use]
    pub fn construction<P: ?Sized>(reason: impl Into<String>) -> Self {
        Self::Construction {
            plugin: core::any::type_name::<P>(),
            reason: reason.into(),
        }
    }
}

/// Errors a lifecycle hook may report.
///
/// Hook errors never reach the caller of a `notify_*` method; they are logged
/// and counted in the [`DispatchSummary`](crate::lifecycle::DispatchSummary).
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The plugin's own storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Any other failure.
    #[error("{0}")]
    Failed(String),
}

impl HookError {
    /// Creates a [`HookError::Failed`].
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
