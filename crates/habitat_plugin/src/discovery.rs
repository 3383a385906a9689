//! Link-time plugin discovery.
//!
//! A plugin crate registers its plugins with [`submit_plugin!`](crate::submit_plugin)
//! at module level. Registrations are collected by the linker into one table
//! (via `inventory`) and read back by [`discover_plugins`] or a filtered
//! [`PluginDiscovery`].
//!
//! ```ignore
//! use habitat_plugin::submit_plugin;
//! use habitat_plugin::plugin::PluginDescriptor;
//!
//! submit_plugin!(PluginDescriptor::of::<StreakPlugin>().with_data().with_view());
//! ```

use crate::plugin::PluginDescriptor;
use hashbrown::HashSet;

// Re-export for `submit_plugin!`.
#[doc(hidden)]
pub use inventory;

/// Entry in the link-time registration table.
///
/// Created by [`submit_plugin!`](crate::submit_plugin); not usually built by hand.
pub struct PluginRegistration {
    origin: &'static str,
    descriptor: fn() -> PluginDescriptor,
}

impl PluginRegistration {
    /// Creates a registration submitted from module `origin`.
    #[must_use]
    pub const fn new(origin: &'static str, descriptor: fn() -> PluginDescriptor) -> Self {
        Self { origin, descriptor }
    }

    /// Returns the submitting module path.
    #[must_use]
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    /// Builds the registered descriptor, stamped with the submitting module.
    #[must_use]
    pub fn descriptor(&self) -> PluginDescriptor {
        (self.descriptor)().with_origin(self.origin)
    }
}

inventory::collect!(PluginRegistration);

/// Registers a plugin for link-time discovery.
///
/// Accepts anything convertible into a
/// [`PluginDescriptor`](crate::plugin::PluginDescriptor), typically the
/// builder returned by `PluginDescriptor::of::<P>()`. The submitting module
/// path becomes the descriptor's origin.
#[macro_export]
macro_rules! submit_plugin {
    ($descriptor:expr $(,)?) => {
        $crate::discovery::inventory::submit! {
            $crate::discovery::PluginRegistration::new(module_path!(), || {
                $crate::plugin::PluginDescriptor::from($descriptor)
            })
        }
    };
}

/// Returns every plugin registered anywhere in the linked program.
///
/// Duplicate submissions of one plugin type are collapsed. Order follows the
/// registration table and carries no meaning.
#[must_use]
pub fn discover_plugins() -> Vec<PluginDescriptor> {
    PluginDiscovery::new().discover()
}

/// Filtered view over the registration table.
///
/// # Example
///
/// ```ignore
/// let ours = PluginDiscovery::new().within("habitat_features").discover();
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginDiscovery {
    prefixes: Vec<String>,
}

impl PluginDiscovery {
    /// Creates an unfiltered discovery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to registrations submitted from `prefix` or one of
    /// its submodules. Repeated calls widen the filter.
    #[must_use]
    pub fn within(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Returns `true` if `origin` passes the filter.
    #[must_use]
    pub fn accepts(&self, origin: &str) -> bool {
        self.prefixes.is_empty()
            || self.prefixes.iter().any(|prefix| {
                origin == prefix
                    || origin
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
    }

    /// Reads the registration table.
    #[must_use]
    pub fn discover(&self) -> Vec<PluginDescriptor> {
        let mut seen = HashSet::new();
        let mut total = 0_usize;
        let mut found = Vec::new();

        for registration in inventory::iter::<PluginRegistration> {
            total += 1;
            if !self.accepts(registration.origin()) {
                continue;
            }
            let descriptor = registration.descriptor();
            if seen.insert(descriptor.id()) {
                found.push(descriptor);
            } else {
                tracing::debug!(
                    plugin = %descriptor.id(),
                    origin = registration.origin(),
                    "duplicate plugin submission ignored"
                );
            }
        }

        if total == 0 {
            tracing::warn!("no plugin registrations found; continuing without plugins");
        }
        tracing::debug!(
            registered = total,
            accepted = found.len(),
            filter = ?self.prefixes,
            "plugin discovery finished"
        );

        found
    }
}
