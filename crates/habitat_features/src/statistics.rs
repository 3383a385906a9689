//! Read-only habit statistics.

use crate::clock::Clock;
use crate::flags::ENABLE_STATISTICS;
use habitat_model::Habit;
use habitat_plugin::prelude::*;
use serde_json::json;

/// Derived figures for one habit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HabitStats {
    /// Frequency label.
    pub frequency: &'static str,
    /// Whole days since the habit was created.
    pub days_since_creation: i64,
    /// Whether the habit is done for its current period.
    pub completed_for_period: bool,
}

/// Shows statistics on the detail screen. Enabled by `enable_statistics`.
///
/// Owns no models.
pub struct StatsPlugin {
    config: Configuration,
    clock: Clock,
}

impl StatsPlugin {
    /// Creates the plugin with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &Configuration, clock: Clock) -> Self {
        Self {
            config: config.clone(),
            clock,
        }
    }

    /// Computes statistics for `habit` as of now.
    #[must_use]
    pub fn stats(&self, habit: &Habit) -> HabitStats {
        let now = self.clock.now();
        HabitStats {
            frequency: habit.frequency.label(),
            days_since_creation: (now.date_naive() - habit.created_at.date_naive())
                .num_days()
                .max(0),
            completed_for_period: habit.is_completed_for_current_period(now),
        }
    }
}

impl FeaturePlugin for StatsPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self::with_clock(config, Clock::system()))
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(ENABLE_STATISTICS)
    }

    fn name(&self) -> &str {
        "statistics"
    }
}

impl ViewPlugin for StatsPlugin {
    fn detail_view(&self, habit: &Habit) -> Option<PluginView> {
        Some(PluginView::detail(self.name(), json!(self.stats(habit))))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            self.name(),
            json!({ "flag": ENABLE_STATISTICS, "enabled": self.is_enabled() }),
        ))
    }
}

submit_plugin!(PluginDescriptor::of::<StatsPlugin>().with_view());
