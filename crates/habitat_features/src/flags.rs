//! Configuration flag names read by the standard plugins.

/// Enables [`ReminderPlugin`](crate::ReminderPlugin).
pub const ENABLE_REMINDERS: &str = "enable_reminders";

/// Enables [`StreakPlugin`](crate::StreakPlugin).
pub const ENABLE_STREAKS: &str = "enable_streaks";

/// Enables [`NotesPlugin`](crate::NotesPlugin).
pub const ENABLE_DAILY_NOTES: &str = "enable_daily_notes";

/// Enables [`CategoryPlugin`](crate::CategoryPlugin).
pub const ENABLE_CATEGORIES: &str = "enable_categories";

/// Enables [`StatsPlugin`](crate::StatsPlugin).
pub const ENABLE_STATISTICS: &str = "enable_statistics";

/// Every flag, in settings-screen order.
pub const ALL: [&str; 5] = [
    ENABLE_REMINDERS,
    ENABLE_STREAKS,
    ENABLE_DAILY_NOTES,
    ENABLE_CATEGORIES,
    ENABLE_STATISTICS,
];
