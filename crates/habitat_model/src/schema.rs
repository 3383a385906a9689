//! Composition of model descriptors into a single storage schema.

use crate::model::{Model, ModelDescriptor};
use indexmap::IndexSet;

/// Ordered, identity-deduplicated set of [`ModelDescriptor`]s.
///
/// The first descriptor is the primary entity. Descriptors appended later keep
/// their first-insertion position; re-inserting a model that is already
/// present is a no-op.
///
/// # Example
///
/// ```
/// use habitat_model::{Habit, Model, Schema};
///
/// let mut schema = Schema::primary::<Habit>();
/// schema.extend([Habit::descriptor()]);
///
/// assert_eq!(schema.len(), 1);
/// assert!(schema.contains::<Habit>());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    models: IndexSet<ModelDescriptor>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema whose primary entity is `M`.
    #[must_use]
    pub fn primary<M: Model>() -> Self {
        let mut schema = Self::new();
        schema.insert(ModelDescriptor::of::<M>());
        schema
    }

    /// Returns the primary entity's descriptor, if any.
    #[must_use]
    pub fn primary_model(&self) -> Option<&ModelDescriptor> {
        self.models.first()
    }

    /// Appends a descriptor. Returns `false` if it was already present.
    pub fn insert(&mut self, descriptor: ModelDescriptor) -> bool {
        self.models.insert(descriptor)
    }

    /// Returns `true` if the schema contains model `M`.
    #[must_use]
    pub fn contains<M: Model>(&self) -> bool {
        self.models.contains(&ModelDescriptor::of::<M>())
    }

    /// Returns `true` if the schema contains the given descriptor.
    #[must_use]
    pub fn contains_descriptor(&self, descriptor: &ModelDescriptor) -> bool {
        self.models.contains(descriptor)
    }

    /// Returns the number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the schema has no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates descriptors in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    /// Returns model names in schema order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.models.iter().map(ModelDescriptor::name).collect()
    }
}

impl Extend<ModelDescriptor> for Schema {
    fn extend<I: IntoIterator<Item = ModelDescriptor>>(&mut self, iter: I) {
        self.models.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ModelDescriptor;
    type IntoIter = indexmap::set::Iter<'a, ModelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
