//! Ordered plugin sets for explicit composition.

use super::{FeaturePlugin, PluginDescriptor, PluginId};

// ─────────────────────────────────────────────────────────────────────────────
// PluginBundle Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A named collection of plugins that can be registered together.
///
/// # Example
///
/// ```ignore
/// pub struct DefaultFeatures;
///
/// impl PluginBundle for DefaultFeatures {
///     fn build(self) -> PluginSet {
///         PluginSet::new()
///             .add(PluginDescriptor::of::<StreakPlugin>().with_data())
///             .add(PluginDescriptor::of::<StatsPlugin>().with_view())
///     }
/// }
///
/// registry.register_set(DefaultFeatures.build().disable::<StatsPlugin>());
/// ```
pub trait PluginBundle {
    /// Returns the plugins in this bundle.
    fn build(self) -> PluginSet;
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginSet
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered builder of plugin descriptors.
///
/// The explicit alternative to link-time discovery. Order is preserved into
/// the registry, and from there into instances, schema and views.
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor to the end of the set.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add(mut self, descriptor: impl Into<PluginDescriptor>) -> Self {
        self.descriptors.push(descriptor.into());
        self
    }

    /// Adds a descriptor before `Target`.
    ///
    /// If `Target` is not found, the descriptor is added at the beginning.
    #[must_use]
    pub fn add_before<Target: FeaturePlugin>(
        mut self,
        descriptor: impl Into<PluginDescriptor>,
    ) -> Self {
        let position = self.position_of::<Target>().unwrap_or(0);
        self.descriptors.insert(position, descriptor.into());
        self
    }

    /// Adds a descriptor after `Target`.
    ///
    /// If `Target` is not found, the descriptor is added at the end.
    #[must_use]
    pub fn add_after<Target: FeaturePlugin>(
        mut self,
        descriptor: impl Into<PluginDescriptor>,
    ) -> Self {
        let position = self
            .position_of::<Target>()
            .map_or(self.descriptors.len(), |i| i + 1);
        self.descriptors.insert(position, descriptor.into());
        self
    }

    /// Removes plugin `P` from the set. No-op if absent.
    #[must_use]
    pub fn disable<P: FeaturePlugin>(mut self) -> Self {
        let id = PluginId::of::<P>();
        self.descriptors.retain(|d| d.id() != id);
        self
    }

    /// Returns `true` if the set contains plugin `P`.
    #[must_use]
    pub fn contains<P: FeaturePlugin>(&self) -> bool {
        self.position_of::<P>().is_some()
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the set contains no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    fn position_of<P: FeaturePlugin>(&self) -> Option<usize> {
        let id = PluginId::of::<P>();
        self.descriptors.iter().position(|d| d.id() == id)
    }
}

impl IntoIterator for PluginSet {
    type Item = PluginDescriptor;
    type IntoIter = std::vec::IntoIter<PluginDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}

impl FromIterator<PluginDescriptor> for PluginSet {
    fn from_iter<I: IntoIterator<Item = PluginDescriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}
