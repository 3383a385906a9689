//! Extended plugin capabilities.
//!
//! - [`DataPlugin`] - Declares persisted models and reacts to habit lifecycle events
//! - [`ViewPlugin`] - Contributes presentation objects to row, detail and settings slots
//!
//! Both extend [`FeaturePlugin`]. A plugin may implement either, both or
//! neither; the descriptor built with
//! [`DescriptorBuilder::with_data`](crate::plugin::DescriptorBuilder::with_data)
//! and [`DescriptorBuilder::with_view`](crate::plugin::DescriptorBuilder::with_view)
//! records the choice.

use crate::error::HookError;
use crate::plugin::FeaturePlugin;
use crate::view::PluginView;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habitat_model::{Habit, HabitId, ModelDescriptor};

/// A plugin that owns persisted models and observes the habit lifecycle.
///
/// Hooks default to no-ops. They run concurrently with the hooks of other
/// plugins; the caller of the triggering operation waits for all of them.
/// Errors and panics are contained per plugin.
#[async_trait]
pub trait DataPlugin: FeaturePlugin {
    /// Model types this plugin needs in the storage schema.
    fn models(&self) -> Vec<ModelDescriptor>;

    /// Called before `habit` is removed from storage.
    async fn will_delete_habit(&self, _habit: &Habit) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after the habit with `habit_id` was removed and storage saved.
    async fn did_delete_habit(&self, _habit_id: HabitId) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after a habit's completion state changed and storage saved.
    async fn completion_did_change(
        &self,
        _habit_id: HabitId,
        _is_completed: bool,
        _completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// A plugin that contributes presentation objects.
///
/// Each slot is optional; returning `None` leaves the slot empty.
pub trait ViewPlugin: FeaturePlugin {
    /// Content shown in a habit's list row.
    fn row_view(&self, _habit: &Habit) -> Option<PluginView> {
        None
    }

    /// Content shown on a habit's detail screen.
    fn detail_view(&self, _habit: &Habit) -> Option<PluginView> {
        None
    }

    /// Content shown on the settings screen.
    fn settings_view(&self) -> Option<PluginView> {
        None
    }
}
