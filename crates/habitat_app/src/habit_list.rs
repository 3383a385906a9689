//! The habit list service.
//!
//! Owns the in-memory habit collection, writes it through to storage and
//! announces deletions and completion changes to the plugin registry.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use habitat_model::{Habit, HabitId, StorageProvider};
use habitat_plugin::registry::PluginRegistry;
use parking_lot::RwLock;
use std::sync::Arc;

type Observer = Box<dyn Fn(&[Habit]) + Send + Sync>;

/// Habit collection backed by a [`StorageProvider`].
///
/// Every mutation is saved before the matching lifecycle event is sent, and
/// each call returns only after all plugin hooks finished. A mutation whose
/// save fails leaves the list as it was.
pub struct HabitList<S> {
    registry: Arc<PluginRegistry>,
    storage: Arc<S>,
    habits: RwLock<Vec<Habit>>,
    observers: Vec<Observer>,
}

impl<S: StorageProvider> HabitList<S> {
    /// Creates an empty list. Call [`load`](Self::load) to read storage.
    #[must_use]
    pub fn new(registry: Arc<PluginRegistry>, storage: Arc<S>) -> Self {
        Self {
            registry,
            storage,
            habits: RwLock::new(Vec::new()),
            observers: Vec::new(),
        }
    }

    /// Calls `observer` with every batch of habits loaded or added.
    #[must_use]
    pub fn observe(mut self, observer: impl Fn(&[Habit]) + Send + Sync + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Replaces the list with the stored habits and returns how many were read.
    pub async fn load(&self) -> Result<usize, AppError> {
        let habits = self.storage.load_all().await?;
        self.announce(&habits);
        let count = habits.len();
        *self.habits.write() = habits;
        tracing::debug!(count, "habits loaded");
        Ok(count)
    }

    /// Returns a snapshot of the list.
    #[must_use]
    pub fn habits(&self) -> Vec<Habit> {
        self.habits.read().clone()
    }

    /// Returns the habit with `id`.
    #[must_use]
    pub fn get(&self, id: HabitId) -> Option<Habit> {
        self.habits.read().iter().find(|habit| habit.id == id).cloned()
    }

    /// Appends `habit` and saves.
    pub async fn add(&self, habit: Habit) -> Result<HabitId, AppError> {
        let id = habit.id;
        let mut snapshot = self.habits();
        snapshot.push(habit.clone());
        self.storage.save_all(&snapshot).await?;

        self.announce(std::slice::from_ref(&habit));
        self.habits.write().push(habit);
        tracing::info!(habit_id = %id, "habit added");
        Ok(id)
    }

    /// Deletes the habits in `ids` and returns how many were removed.
    ///
    /// Plugins see will-delete while the habits are still stored and
    /// did-delete after the removal was saved. Unknown ids are skipped.
    pub async fn delete(&self, ids: &[HabitId]) -> Result<usize, AppError> {
        let targets: Vec<Habit> = self
            .habits
            .read()
            .iter()
            .filter(|habit| ids.contains(&habit.id))
            .cloned()
            .collect();
        if targets.is_empty() {
            return Ok(0);
        }

        for habit in &targets {
            self.registry.notify_will_delete(habit).await;
        }

        let is_target = |habit: &Habit| targets.iter().any(|target| target.id == habit.id);
        let mut snapshot = self.habits();
        snapshot.retain(|habit| !is_target(habit));
        self.storage.save_all(&snapshot).await?;
        self.habits.write().retain(|habit| !is_target(habit));

        for habit in &targets {
            self.registry.notify_did_delete(habit.id).await;
        }

        tracing::info!(count = targets.len(), "habits deleted");
        Ok(targets.len())
    }

    /// Toggles completion of `id` for its current period, as of now.
    pub async fn toggle_completion(&self, id: HabitId) -> Result<bool, AppError> {
        self.toggle_completion_at(id, Utc::now()).await
    }

    /// Toggles completion of `id` as of `now` and returns the new state.
    pub async fn toggle_completion_at(
        &self,
        id: HabitId,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut snapshot = self.habits();
        let habit = snapshot
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or(AppError::UnknownHabit(id))?;
        let is_completed = habit.toggle_completion(now);
        let updated = habit.clone();

        self.storage.save_all(&snapshot).await?;
        if let Some(habit) = self.habits.write().iter_mut().find(|habit| habit.id == id) {
            *habit = updated.clone();
        }

        let summary = self
            .registry
            .notify_completion_changed(id, is_completed, updated.last_completed_at)
            .await;
        tracing::debug!(
            habit_id = %id,
            is_completed,
            recipients = summary.recipients,
            "completion toggled"
        );
        Ok(is_completed)
    }

    fn announce(&self, habits: &[Habit]) {
        for observer in &self.observers {
            observer(habits);
        }
    }
}
