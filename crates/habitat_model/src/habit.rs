//! The habit entity.

use crate::Model;
use chrono::{DateTime, Datelike, NaiveTime, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a [`Habit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a habit is meant to be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    /// Once per calendar day.
    Daily,
    /// Once per ISO week.
    Weekly,
    /// Once per calendar month.
    Monthly,
    /// User-defined schedule; completion is tracked per day.
    Custom,
}

impl HabitFrequency {
    /// All frequencies, in display order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Custom];

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The primary entity: a recurring activity the user wants to keep up.
///
/// All timestamps are UTC; calendar periods are evaluated in UTC as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(name = "Habit")]
pub struct Habit {
    /// Unique identifier.
    pub id: HabitId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub detail: String,
    /// Completion cadence.
    pub frequency: HabitFrequency,
    /// Inactive habits are kept but not tracked.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last time the habit was marked complete, if it currently is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Time of day for reminders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<NaiveTime>,
    /// ISO weekdays (1 = Monday ... 7 = Sunday), used by weekly habits.
    #[serde(default)]
    pub repeat_days: Vec<u8>,
    /// Day of month (1..=31), used by monthly habits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_day: Option<u8>,
    /// Symbol name shown next to the habit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl Habit {
    /// Creates an active habit with a fresh id, created now.
    #[must_use]
    pub fn new(name: impl Into<String>, frequency: HabitFrequency) -> Self {
        Self::created_at(name, frequency, Utc::now())
    }

    /// Creates an active habit with a fresh id and an explicit creation time.
    #[must_use]
    pub fn created_at(
        name: impl Into<String>,
        frequency: HabitFrequency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: HabitId::new(),
            name: name.into(),
            detail: String::new(),
            frequency,
            is_active: true,
            created_at,
            last_completed_at: None,
            reminder_time: None,
            repeat_days: Vec::new(),
            monthly_day: None,
            icon_name: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Sets the icon symbol name.
    #[must_use]
    pub fn with_icon(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    /// Sets the reminder time of day.
    #[must_use]
    pub fn with_reminder_time(mut self, time: NaiveTime) -> Self {
        self.reminder_time = Some(time);
        self
    }

    /// Sets the weekly repeat days. Values outside `1..=7` are dropped.
    #[must_use]
    pub fn with_repeat_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        let mut days: Vec<u8> = days.into_iter().filter(|d| (1..=7).contains(d)).collect();
        days.sort_unstable();
        days.dedup();
        self.repeat_days = days;
        self
    }

    /// Sets the monthly day, clamped to `1..=31`.
    #[must_use]
    pub fn with_monthly_day(mut self, day: u8) -> Self {
        self.monthly_day = Some(day.clamp(1, 31));
        self
    }

    /// Returns `true` if the last completion falls in the same period as
    /// `now` for this habit's frequency.
    #[must_use]
    pub fn is_completed_for_current_period(&self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_completed_at else {
            return false;
        };

        match self.frequency {
            HabitFrequency::Daily | HabitFrequency::Custom => last.date_naive() == now.date_naive(),
            HabitFrequency::Weekly => last.iso_week() == now.iso_week(),
            HabitFrequency::Monthly => last.year() == now.year() && last.month() == now.month(),
        }
    }

    /// Flips completion for the current period and returns the new state.
    ///
    /// Completing records `now`; un-completing clears the timestamp.
    pub fn toggle_completion(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed_for_current_period(now) {
            self.last_completed_at = None;
            false
        } else {
            self.last_completed_at = Some(now);
            true
        }
    }
}
