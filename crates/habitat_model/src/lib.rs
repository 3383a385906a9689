//! Primary entity and persistence metadata for Habitat (Layer 1).
//!
//! `habitat_model` holds everything the plugin runtime needs to know about
//! persisted data without knowing how it is stored:
//!
//! - [`Habit`] - The primary entity, with [`HabitId`] and [`HabitFrequency`]
//! - [`Model`] - Metadata trait for persisted model types, derivable with `#[derive(Model)]`
//! - [`ModelDescriptor`] - Type-level declaration of a model, used for schema composition
//! - [`Schema`] - Ordered, identity-deduplicated set of model descriptors
//! - [`StorageProvider`] - Contract for loading and saving the habit collection
//! - [`MemoryStorage`] - In-memory [`StorageProvider`] for tests and demos
//!
//! # Example
//!
//! ```
//! use habitat_model::{Habit, Model, Schema};
//!
//! #[derive(Model)]
//! #[model(name = "HabitNote")]
//! struct HabitNote {
//!     text: String,
//! }
//!
//! let mut schema = Schema::primary::<Habit>();
//! schema.insert(HabitNote::descriptor());
//!
//! assert_eq!(schema.names(), vec!["Habit", "HabitNote"]);
//! ```

// Self-reference so `#[derive(Model)]` output can use `habitat_model::` paths
// within this crate.
extern crate self as habitat_model;

/// The primary entity.
pub mod habit;

/// Model metadata and descriptors.
pub mod model;

/// Schema composition.
pub mod schema;

/// Storage provider contract.
pub mod storage;

pub use habit::{Habit, HabitFrequency, HabitId};
pub use model::{Model, ModelDescriptor};
pub use schema::Schema;
pub use storage::{MemoryStorage, StorageError, StorageProvider};
