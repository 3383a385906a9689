//! Metadata for persisted model types.
//!
//! A [`Model`] is any type a plugin wants stored alongside the primary entity.
//! The runtime never touches model values; it only collects their
//! [`ModelDescriptor`]s so storage can be opened against the union of them.

use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// Re-export the derive macro.
pub use model_macros::Model;

/// Metadata for a type eligible for persistence.
///
/// Can be derived via `#[derive(Model)]`:
///
/// ```
/// use habitat_model::Model;
///
/// #[derive(Model)]
/// #[model(name = "HabitStreak", schema_version = "2.0.0")]
/// struct HabitStreak {
///     current: u32,
/// }
///
/// assert_eq!(HabitStreak::model_name(), "HabitStreak");
/// assert_eq!(HabitStreak::schema_version(), "2.0.0");
/// ```
pub trait Model: Send + Sync + 'static {
    /// Stable name of the model. Must be unique within a schema.
    fn model_name() -> &'static str;

    /// Semantic version for the schema. Defaults to `"1.0.0"`.
    fn schema_version() -> &'static str {
        "1.0.0"
    }

    /// Returns the descriptor for this model type.
    fn descriptor() -> ModelDescriptor
    where
        Self: Sized,
    {
        ModelDescriptor::of::<Self>()
    }
}

/// Type-level declaration of a persisted model.
///
/// Equality and hashing use the type identity only, so two descriptors for
/// the same type always collapse in a [`Schema`](crate::Schema) even if they
/// were produced by different plugins.
#[derive(Clone, Copy)]
pub struct ModelDescriptor {
    type_id: TypeId,
    name: &'static str,
    schema_version: &'static str,
}

impl ModelDescriptor {
    /// Creates the descriptor for model type `M`.
    #[must_use]
    pub fn of<M: Model>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            name: M::model_name(),
            schema_version: M::schema_version(),
        }
    }

    /// Returns the [`TypeId`] of the described model.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the model name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the model's schema version.
    #[must_use]
    pub fn schema_version(&self) -> &'static str {
        self.schema_version
    }

    /// Returns `true` if this descriptor describes `M`.
    #[must_use]
    pub fn is<M: Model>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }
}

impl PartialEq for ModelDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelDescriptor {}

impl Hash for ModelDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("name", &self.name)
            .field("schema_version", &self.schema_version)
            .finish()
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.schema_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Model for Plain {
        fn model_name() -> &'static str {
            "Plain"
        }
    }

    struct Impostor;

    impl Model for Impostor {
        fn model_name() -> &'static str {
            "Plain"
        }
    }

    #[test]
    fn default_schema_version() {
        assert_eq!(Plain::schema_version(), "1.0.0");
        assert_eq!(Plain::descriptor().to_string(), "Plain@1.0.0");
    }

    #[test]
    fn identity_is_the_type_not_the_name() {
        assert_eq!(ModelDescriptor::of::<Plain>(), Plain::descriptor());
        assert_ne!(ModelDescriptor::of::<Plain>(), ModelDescriptor::of::<Impostor>());
        assert!(Plain::descriptor().is::<Plain>());
        assert!(!Plain::descriptor().is::<Impostor>());
    }
}
