//! Storage provider contract.
//!
//! A [`StorageProvider`] persists the habit collection. It is opened once
//! against a composed [`Schema`]; the schema is frozen from then on.

use crate::habit::Habit;
use crate::schema::Schema;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store was already opened; its schema can no longer change.
    #[error("storage is already open; schema composition must happen before open")]
    AlreadyOpen,

    /// The store was used before it was opened.
    #[error("storage has not been opened")]
    NotOpen,

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Loads and saves the habit collection.
#[async_trait]
pub trait StorageProvider: Send + Sync + 'static {
    /// Opens the store against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyOpen`] if the store is already open.
    fn open(&self, schema: Schema) -> Result<(), StorageError>;

    /// Returns the schema the store was opened with.
    fn schema(&self) -> Option<Schema>;

    /// Returns `true` once [`open`](Self::open) succeeded.
    fn is_open(&self) -> bool {
        self.schema().is_some()
    }

    /// Loads every stored habit.
    async fn load_all(&self) -> Result<Vec<Habit>, StorageError>;

    /// Replaces the stored collection with `habits`.
    async fn save_all(&self, habits: &[Habit]) -> Result<(), StorageError>;
}

/// In-memory [`StorageProvider`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    schema: RwLock<Option<Schema>>,
    habits: RwLock<Vec<Habit>>,
}

impl MemoryStorage {
    /// Creates an empty, unopened store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unopened store pre-populated with `habits`.
    #[must_use]
    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self {
            schema: RwLock::new(None),
            habits: RwLock::new(habits),
        }
    }

    /// Restores an unopened store from a JSON array of habits.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if `json` is not a habit array.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let habits: Vec<Habit> = serde_json::from_str(json)?;
        Ok(Self::with_habits(habits))
    }

    /// Serializes the stored habits as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&*self.habits.read())?)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.schema.read().is_some() {
            Ok(())
        } else {
            Err(StorageError::NotOpen)
        }
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    fn open(&self, schema: Schema) -> Result<(), StorageError> {
        let mut slot = self.schema.write();
        if slot.is_some() {
            return Err(StorageError::AlreadyOpen);
        }
        tracing::debug!(models = ?schema.names(), "opening memory storage");
        *slot = Some(schema);
        Ok(())
    }

    fn schema(&self) -> Option<Schema> {
        self.schema.read().clone()
    }

    async fn load_all(&self) -> Result<Vec<Habit>, StorageError> {
        self.ensure_open()?;
        Ok(self.habits.read().clone())
    }

    async fn save_all(&self, habits: &[Habit]) -> Result<(), StorageError> {
        self.ensure_open()?;
        *self.habits.write() = habits.to_vec();
        Ok(())
    }
}
