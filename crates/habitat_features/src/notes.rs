//! Daily notes attached to habits.

use crate::clock::Clock;
use crate::flags::ENABLE_DAILY_NOTES;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Number of days, today included, covered by [`NotesPlugin::recent_notes`].
pub const RECENT_DAYS: u64 = 7;

/// A note written for a habit on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitNote")]
pub struct HabitNote {
    /// Owning habit.
    pub habit_id: HabitId,
    /// Day the note belongs to.
    pub date: NaiveDate,
    /// Note body.
    pub text: String,
}

/// Stores one note per habit per day. Enabled by `enable_daily_notes`.
pub struct NotesPlugin {
    config: Configuration,
    clock: Clock,
    notes: RwLock<HashMap<HabitId, BTreeMap<NaiveDate, String>>>,
}

impl NotesPlugin {
    /// Creates the plugin with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &Configuration, clock: Clock) -> Self {
        Self {
            config: config.clone(),
            clock,
            notes: RwLock::new(HashMap::new()),
        }
    }

    /// Writes the note for `habit_id` on `date`. Blank text removes it.
    pub fn save_note(&self, habit_id: HabitId, date: NaiveDate, text: &str) {
        let text = text.trim();
        let mut notes = self.notes.write();
        if text.is_empty() {
            if let Some(days) = notes.get_mut(&habit_id) {
                days.remove(&date);
                if days.is_empty() {
                    notes.remove(&habit_id);
                }
            }
        } else {
            notes
                .entry(habit_id)
                .or_default()
                .insert(date, text.to_owned());
        }
    }

    /// Writes today's note for `habit_id`.
    pub fn save_today(&self, habit_id: HabitId, text: &str) {
        self.save_note(habit_id, self.clock.today(), text);
    }

    /// Returns the note for `habit_id` on `date`.
    #[must_use]
    pub fn note(&self, habit_id: HabitId, date: NaiveDate) -> Option<HabitNote> {
        self.notes
            .read()
            .get(&habit_id)
            .and_then(|days| days.get(&date))
            .map(|text| HabitNote {
                habit_id,
                date,
                text: text.clone(),
            })
    }

    /// Returns today's note for `habit_id`.
    #[must_use]
    pub fn today_note(&self, habit_id: HabitId) -> Option<HabitNote> {
        self.note(habit_id, self.clock.today())
    }

    /// Returns notes from the last [`RECENT_DAYS`] days, newest first.
    #[must_use]
    pub fn recent_notes(&self, habit_id: HabitId) -> Vec<HabitNote> {
        let today = self.clock.today();
        let since = today
            .checked_sub_days(Days::new(RECENT_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);

        self.notes
            .read()
            .get(&habit_id)
            .map(|days| {
                days.range(since..=today)
                    .rev()
                    .map(|(date, text)| HabitNote {
                        habit_id,
                        date: *date,
                        text: text.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FeaturePlugin for NotesPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self::with_clock(config, Clock::system()))
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(ENABLE_DAILY_NOTES)
    }

    fn name(&self) -> &str {
        "daily_notes"
    }
}

#[async_trait]
impl DataPlugin for NotesPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![HabitNote::descriptor()]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        if let Some(days) = self.notes.write().remove(&habit.id) {
            tracing::debug!(habit_id = %habit.id, count = days.len(), "notes removed");
        }
        Ok(())
    }
}

impl ViewPlugin for NotesPlugin {
    fn row_view(&self, habit: &Habit) -> Option<PluginView> {
        self.today_note(habit.id)
            .map(|note| PluginView::row(self.name(), json!({ "today": note.text })))
    }

    fn detail_view(&self, habit: &Habit) -> Option<PluginView> {
        let recent = self.recent_notes(habit.id);
        Some(PluginView::detail(self.name(), json!({ "recent": recent })))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            self.name(),
            json!({ "flag": ENABLE_DAILY_NOTES, "enabled": self.is_enabled() }),
        ))
    }
}

submit_plugin!(PluginDescriptor::of::<NotesPlugin>().with_data().with_view());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::{TimeZone, Utc};
    use habitat_model::HabitFrequency;
    use std::sync::Arc;

    fn plugin_at(day: u32) -> (NotesPlugin, Arc<MockClock>) {
        let mock = Arc::new(MockClock::new(
            Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap(),
        ));
        let config = Configuration::new().with_flag(ENABLE_DAILY_NOTES, true);
        (
            NotesPlugin::with_clock(&config, Clock::with_provider(mock.clone())),
            mock,
        )
    }

    #[test]
    fn one_note_per_day() {
        let (plugin, _) = plugin_at(10);
        let habit = HabitId::new();

        plugin.save_today(habit, "felt good");
        plugin.save_today(habit, "  felt great  ");

        let note = plugin.today_note(habit).unwrap();
        assert_eq!(note.text, "felt great");
        assert_eq!(note.date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn blank_text_removes_note() {
        let (plugin, _) = plugin_at(10);
        let habit = HabitId::new();
        plugin.save_today(habit, "draft");
        plugin.save_today(habit, "   ");
        assert!(plugin.today_note(habit).is_none());
    }

    #[test]
    fn recent_notes_cover_one_week_newest_first() {
        let (plugin, _) = plugin_at(20);
        let habit = HabitId::new();
        for day in [10, 14, 15, 20] {
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            plugin.save_note(habit, date, &format!("day {day}"));
        }

        let texts: Vec<_> = plugin
            .recent_notes(habit)
            .into_iter()
            .map(|note| note.text)
            .collect();
        assert_eq!(texts, ["day 20", "day 15", "day 14"]);
    }

    #[tokio::test]
    async fn will_delete_drops_notes() {
        let (plugin, mock) = plugin_at(1);
        let habit = Habit::new("Stretch", HabitFrequency::Daily);
        plugin.save_today(habit.id, "hamstrings");
        mock.advance(chrono::Duration::days(1));
        plugin.save_today(habit.id, "shoulders");

        plugin.will_delete_habit(&habit).await.unwrap();
        assert!(plugin.recent_notes(habit.id).is_empty());
        assert!(plugin.row_view(&habit).is_none());
    }
}
