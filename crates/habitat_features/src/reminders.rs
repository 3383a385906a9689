//! Per-habit reminders.
//!
//! Only the reminder records live here; delivering notifications is left to
//! the host platform.

use crate::flags::ENABLE_REMINDERS;
use async_trait::async_trait;
use chrono::{Datelike, DateTime, NaiveTime, Utc};
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A reminder for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitReminder")]
pub struct HabitReminder {
    /// Owning habit.
    pub habit_id: HabitId,
    /// Time of day, UTC.
    pub reminder_time: NaiveTime,
    /// Whether the reminder fires.
    pub is_enabled: bool,
    /// ISO weekdays (1 = Monday ... 7 = Sunday) the reminder fires on.
    pub repeat_days: Vec<u8>,
}

impl HabitReminder {
    /// Creates an enabled reminder firing every day.
    #[must_use]
    pub fn new(habit_id: HabitId, reminder_time: NaiveTime) -> Self {
        Self {
            habit_id,
            reminder_time,
            is_enabled: true,
            repeat_days: (1..=7).collect(),
        }
    }

    /// Restricts the reminder to the given weekdays. Out-of-range days are dropped.
    #[must_use]
    pub fn on_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        let mut days: Vec<u8> = days.into_iter().filter(|d| (1..=7).contains(d)).collect();
        days.sort_unstable();
        days.dedup();
        self.repeat_days = days;
        self
    }

    /// Returns `true` if the reminder is enabled and fires on `weekday`.
    #[must_use]
    pub fn fires_on(&self, weekday: u8) -> bool {
        self.is_enabled && self.repeat_days.contains(&weekday)
    }
}

/// Keeps reminder records. Enabled by `enable_reminders`.
pub struct ReminderPlugin {
    config: Configuration,
    reminders: RwLock<HashMap<HabitId, HabitReminder>>,
}

impl ReminderPlugin {
    /// Creates or replaces the reminder for its habit.
    pub fn set_reminder(&self, reminder: HabitReminder) {
        tracing::debug!(habit_id = %reminder.habit_id, time = %reminder.reminder_time, "reminder set");
        self.reminders.write().insert(reminder.habit_id, reminder);
    }

    /// Switches an existing reminder on or off. Returns `false` if none exists.
    pub fn set_enabled(&self, habit_id: HabitId, enabled: bool) -> bool {
        self.reminders
            .write()
            .get_mut(&habit_id)
            .map(|reminder| reminder.is_enabled = enabled)
            .is_some()
    }

    /// Removes the reminder for `habit_id`.
    pub fn remove_reminder(&self, habit_id: HabitId) -> Option<HabitReminder> {
        self.reminders.write().remove(&habit_id)
    }

    /// Returns the reminder for `habit_id`.
    #[must_use]
    pub fn reminder(&self, habit_id: HabitId) -> Option<HabitReminder> {
        self.reminders.read().get(&habit_id).cloned()
    }

    /// Returns `true` if `habit_id` has an enabled reminder.
    #[must_use]
    pub fn has_active_reminder(&self, habit_id: HabitId) -> bool {
        self.reminders
            .read()
            .get(&habit_id)
            .is_some_and(|reminder| reminder.is_enabled)
    }

    /// Returns the reminders firing on the weekday of `at`, earliest first.
    #[must_use]
    pub fn due_on(&self, at: DateTime<Utc>) -> Vec<HabitReminder> {
        let weekday = u8::try_from(at.weekday().number_from_monday()).unwrap_or(0);
        let mut due: Vec<_> = self
            .reminders
            .read()
            .values()
            .filter(|reminder| reminder.fires_on(weekday))
            .cloned()
            .collect();
        due.sort_by_key(|reminder| reminder.reminder_time);
        due
    }
}

impl FeaturePlugin for ReminderPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self {
            config: config.clone(),
            reminders: RwLock::new(HashMap::new()),
        })
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(ENABLE_REMINDERS)
    }

    fn name(&self) -> &str {
        "reminders"
    }
}

#[async_trait]
impl DataPlugin for ReminderPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![HabitReminder::descriptor()]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        if self.remove_reminder(habit.id).is_some() {
            tracing::debug!(habit_id = %habit.id, "reminder removed");
        }
        Ok(())
    }
}

impl ViewPlugin for ReminderPlugin {
    fn row_view(&self, habit: &Habit) -> Option<PluginView> {
        self.reminder(habit.id)
            .filter(|reminder| reminder.is_enabled)
            .map(|reminder| {
                PluginView::row(
                    self.name(),
                    json!({ "time": reminder.reminder_time.format("%H:%M").to_string() }),
                )
            })
    }

    fn detail_view(&self, habit: &Habit) -> Option<PluginView> {
        Some(PluginView::detail(
            self.name(),
            json!({ "reminder": self.reminder(habit.id) }),
        ))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            self.name(),
            json!({ "flag": ENABLE_REMINDERS, "enabled": self.is_enabled() }),
        ))
    }
}

submit_plugin!(PluginDescriptor::of::<ReminderPlugin>().with_data().with_view());

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use habitat_model::HabitFrequency;

    fn plugin() -> ReminderPlugin {
        ReminderPlugin::from_config(&Configuration::new()).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn defaults_to_every_day() {
        let reminder = HabitReminder::new(HabitId::new(), at(8, 0));
        assert!((1..=7).all(|day| reminder.fires_on(day)));
        assert_eq!(reminder.on_days([7, 0, 3, 3]).repeat_days, vec![3, 7]);
    }

    #[test]
    fn active_tracks_enabled_state() {
        let plugin = plugin();
        let habit = HabitId::new();
        assert!(!plugin.has_active_reminder(habit));
        assert!(!plugin.set_enabled(habit, true));

        plugin.set_reminder(HabitReminder::new(habit, at(7, 15)));
        assert!(plugin.has_active_reminder(habit));
        assert!(plugin.set_enabled(habit, false));
        assert!(!plugin.has_active_reminder(habit));
    }

    #[test]
    fn due_on_filters_weekday_and_sorts() {
        let plugin = plugin();
        let late = HabitId::new();
        let early = HabitId::new();
        let weekend = HabitId::new();
        plugin.set_reminder(HabitReminder::new(late, at(21, 0)));
        plugin.set_reminder(HabitReminder::new(early, at(6, 30)));
        plugin.set_reminder(HabitReminder::new(weekend, at(10, 0)).on_days([6, 7]));

        // 2024-06-05 is a Wednesday.
        let wednesday = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        let due: Vec<_> = plugin.due_on(wednesday).into_iter().map(|r| r.habit_id).collect();
        assert_eq!(due, [early, late]);
    }

    #[tokio::test]
    async fn will_delete_removes_reminder() {
        let plugin = plugin();
        let habit = Habit::new("Water plants", HabitFrequency::Weekly);
        plugin.set_reminder(HabitReminder::new(habit.id, at(18, 0)));
        assert_eq!(plugin.row_view(&habit).unwrap().content["time"], "18:00");

        plugin.will_delete_habit(&habit).await.unwrap();
        assert!(plugin.reminder(habit.id).is_none());
    }
}
