//! Application errors.

use crate::settings::SettingsError;
use habitat_model::{HabitId, StorageError};
use thiserror::Error;

/// Errors surfaced by the composition root and the habit list.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// No habit with this id exists.
    #[error("no habit with id {0}")]
    UnknownHabit(HabitId),
}
