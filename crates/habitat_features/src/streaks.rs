//! Completion streaks.
//!
//! Records the days a habit was completed and derives the current and best
//! run of consecutive days.

use crate::clock::Clock;
use crate::flags::ENABLE_STREAKS;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Streak state for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitStreak")]
pub struct HabitStreak {
    /// Record id.
    pub id: Uuid,
    /// Owning habit.
    pub habit_id: HabitId,
    /// Consecutive completed days ending today or yesterday.
    pub current_streak: u32,
    /// Longest streak ever observed.
    pub best_streak: u32,
    /// Most recent completed day.
    pub last_completed: Option<NaiveDate>,
    /// Every completed day.
    pub completion_dates: BTreeSet<NaiveDate>,
}

impl HabitStreak {
    /// Creates an empty streak for `habit_id`.
    #[must_use]
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            current_streak: 0,
            best_streak: 0,
            last_completed: None,
            completion_dates: BTreeSet::new(),
        }
    }

    /// Marks `day` completed or not, then recomputes the streak as of `today`.
    pub fn apply(&mut self, is_completed: bool, day: NaiveDate, today: NaiveDate) {
        if is_completed {
            self.completion_dates.insert(day);
        } else {
            self.completion_dates.remove(&day);
        }
        self.last_completed = self.completion_dates.last().copied();

        // A streak stays alive until the end of the day after its last completion.
        let start = if self.completion_dates.contains(&today) {
            Some(today)
        } else {
            today.checked_sub_days(Days::new(1))
        };

        let mut current = 0;
        let mut cursor = start;
        while let Some(day) = cursor.filter(|day| self.completion_dates.contains(day)) {
            current += 1;
            cursor = day.checked_sub_days(Days::new(1));
        }

        self.current_streak = current;
        self.best_streak = self.best_streak.max(current);
    }
}

/// Tracks completion streaks. Enabled by `enable_streaks`.
pub struct StreakPlugin {
    config: Configuration,
    clock: Clock,
    streaks: RwLock<HashMap<HabitId, HabitStreak>>,
}

impl StreakPlugin {
    /// Creates the plugin with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &Configuration, clock: Clock) -> Self {
        Self {
            config: config.clone(),
            clock,
            streaks: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the streak for `habit_id`, if one was recorded.
    #[must_use]
    pub fn streak(&self, habit_id: HabitId) -> Option<HabitStreak> {
        self.streaks.read().get(&habit_id).cloned()
    }

    fn current_streak(&self, habit_id: HabitId) -> u32 {
        self.streaks
            .read()
            .get(&habit_id)
            .map_or(0, |streak| streak.current_streak)
    }
}

impl FeaturePlugin for StreakPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self::with_clock(config, Clock::system()))
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(ENABLE_STREAKS)
    }

    fn name(&self) -> &str {
        "streaks"
    }
}

#[async_trait]
impl DataPlugin for StreakPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![HabitStreak::descriptor()]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        if self.streaks.write().remove(&habit.id).is_some() {
            tracing::debug!(habit_id = %habit.id, "streak removed");
        }
        Ok(())
    }

    async fn completion_did_change(
        &self,
        habit_id: HabitId,
        is_completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), HookError> {
        let today = self.clock.today();
        let day = match completed_at {
            Some(at) if is_completed => at.date_naive(),
            _ => today,
        };

        let mut streaks = self.streaks.write();
        let streak = streaks
            .entry(habit_id)
            .or_insert_with(|| HabitStreak::new(habit_id));
        streak.apply(is_completed, day, today);

        tracing::debug!(
            habit_id = %habit_id,
            current = streak.current_streak,
            best = streak.best_streak,
            "streak updated"
        );
        Ok(())
    }
}

impl ViewPlugin for StreakPlugin {
    fn row_view(&self, habit: &Habit) -> Option<PluginView> {
        let current = self.current_streak(habit.id);
        (current > 0).then(|| PluginView::row(self.name(), json!({ "current_streak": current })))
    }

    fn detail_view(&self, habit: &Habit) -> Option<PluginView> {
        let streak = self
            .streak(habit.id)
            .unwrap_or_else(|| HabitStreak::new(habit.id));
        Some(PluginView::detail(
            self.name(),
            json!({
                "current_streak": streak.current_streak,
                "best_streak": streak.best_streak,
                "last_completed": streak.last_completed,
            }),
        ))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            self.name(),
            json!({ "flag": ENABLE_STREAKS, "enabled": self.is_enabled() }),
        ))
    }
}

submit_plugin!(PluginDescriptor::of::<StreakPlugin>().with_data().with_view());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn noon(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn consecutive_days_build_a_streak() {
        let mut streak = HabitStreak::new(HabitId::new());
        for d in 1..=3 {
            streak.apply(true, day(d), day(d));
        }
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.best_streak, 3);
        assert_eq!(streak.last_completed, Some(day(3)));
    }

    #[test]
    fn streak_survives_until_end_of_next_day() {
        let mut streak = HabitStreak::new(HabitId::new());
        streak.apply(true, day(1), day(1));
        streak.apply(true, day(2), day(2));

        // Today (3rd) not yet completed: yesterday's run still counts.
        streak.apply(false, day(3), day(3));
        assert_eq!(streak.current_streak, 2);

        // Two days later the run is broken, best is kept.
        streak.apply(false, day(4), day(4));
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.best_streak, 2);
    }

    #[test]
    fn uncompleting_today_shortens_streak() {
        let mut streak = HabitStreak::new(HabitId::new());
        streak.apply(true, day(9), day(10));
        streak.apply(true, day(10), day(10));
        assert_eq!(streak.current_streak, 2);

        streak.apply(false, day(10), day(10));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.last_completed, Some(day(9)));
        assert_eq!(streak.best_streak, 2);
    }

    #[tokio::test]
    async fn plugin_tracks_and_forgets() {
        let mock = Arc::new(MockClock::new(noon(5)));
        let config = Configuration::new().with_flag(ENABLE_STREAKS, true);
        let plugin = StreakPlugin::with_clock(&config, Clock::with_provider(mock.clone()));
        let habit = Habit::new("Read", habitat_model::HabitFrequency::Daily);

        plugin
            .completion_did_change(habit.id, true, Some(noon(4)))
            .await
            .unwrap();
        plugin
            .completion_did_change(habit.id, true, Some(noon(5)))
            .await
            .unwrap();
        assert_eq!(plugin.streak(habit.id).unwrap().current_streak, 2);
        assert_eq!(
            plugin.row_view(&habit).unwrap().content["current_streak"],
            2
        );

        plugin.will_delete_habit(&habit).await.unwrap();
        assert!(plugin.streak(habit.id).is_none());
        assert!(plugin.row_view(&habit).is_none());
    }
}
