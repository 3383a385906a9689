//! Feature plugins for Habitat.
//!
//! Each plugin is toggled by one configuration flag (see [`flags`]) and
//! registers itself for link-time discovery:
//!
//! - [`StreakPlugin`] - Consecutive-day completion streaks
//! - [`NotesPlugin`] - One note per habit per day
//! - [`CategoryPlugin`] - Coloured categories with a starter set
//! - [`ReminderPlugin`] - Reminder records
//! - [`StatsPlugin`] - Read-only statistics on the detail screen
//!
//! Premium plugins are only registered when the `premium` feature is on, and
//! only enabled under [`BuildMode::Premium`](habitat_plugin::prelude::BuildMode):
//!
//! - [`RewardsPlugin`] - XP and levels
//! - [`ChainsPlugin`] - Ordered habit chains
//!
//! # Feature Flags
//!
//! - `premium` - Registers the premium plugins
//! - `test-utils` - Enables [`MockClock`] for deterministic time testing
//!
//! # Example
//!
//! ```
//! use habitat_features::{DefaultFeatures, flags};
//! use habitat_plugin::prelude::*;
//!
//! let config = Configuration::new().with_flag(flags::ENABLE_STREAKS, true);
//! let registry = PluginRegistry::new();
//! registry.register_set(DefaultFeatures.build());
//!
//! let instances = registry.instantiate_all(&config);
//! let schema = registry.composed_models(&instances);
//! assert!(schema.names().contains(&"HabitStreak"));
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`habitat_model`): Primary entity, model metadata, storage contract
//! - **Layer 2** (`habitat_plugin`): Plugin runtime
//! - **Layer 3** (`habitat_features`, `habitat_app`): Concrete plugins (this crate) and the composition root

mod categories;
mod chains;
mod clock;
mod notes;
mod reminders;
mod rewards;
mod statistics;
mod streaks;

pub mod flags;

// Re-export plugins
pub use categories::CategoryPlugin;
pub use chains::ChainsPlugin;
pub use notes::NotesPlugin;
pub use reminders::ReminderPlugin;
pub use rewards::RewardsPlugin;
pub use statistics::StatsPlugin;
pub use streaks::StreakPlugin;

// Re-export models
pub use categories::{DEFAULT_CATEGORIES, HabitCategory, HabitCategoryAssignment};
pub use chains::{HabitChain, HabitChainItem};
pub use notes::{HabitNote, RECENT_DAYS};
pub use reminders::HabitReminder;
pub use rewards::{DAILY_CLAIM_XP, LevelInfo, NEXT_LEVEL_XP, XpProfile, xp_for};
pub use statistics::HabitStats;
pub use streaks::HabitStreak;

pub use clock::{Clock, ClockProvider};

// Re-export test utilities
#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;

use habitat_plugin::discovery::PluginDiscovery;
use habitat_plugin::plugin::{PluginBundle, PluginDescriptor, PluginSet};

/// The plugins shipped by this crate, in settings-screen order.
///
/// Includes the premium plugins when the `premium` feature is on.
///
/// # Customization
///
/// ```ignore
/// registry.register_set(DefaultFeatures.build().disable::<StatsPlugin>());
/// ```
pub struct DefaultFeatures;

impl PluginBundle for DefaultFeatures {
    fn build(self) -> PluginSet {
        let set = PluginSet::new()
            .add(PluginDescriptor::of::<ReminderPlugin>().with_data().with_view())
            .add(PluginDescriptor::of::<StreakPlugin>().with_data().with_view())
            .add(PluginDescriptor::of::<NotesPlugin>().with_data().with_view())
            .add(PluginDescriptor::of::<CategoryPlugin>().with_data().with_view())
            .add(PluginDescriptor::of::<StatsPlugin>().with_view());

        #[cfg(feature = "premium")]
        let set: PluginSet = set.into_iter().chain(PremiumFeatures.build()).collect();

        set
    }
}

/// The premium plugins only.
#[cfg(feature = "premium")]
pub struct PremiumFeatures;

#[cfg(feature = "premium")]
impl PluginBundle for PremiumFeatures {
    fn build(self) -> PluginSet {
        PluginSet::new()
            .add(PluginDescriptor::of::<RewardsPlugin>().with_data())
            .add(PluginDescriptor::of::<ChainsPlugin>().with_data())
    }
}

/// Returns the plugins this crate registered for link-time discovery.
///
/// Order is unspecified.
#[must_use]
pub fn discover() -> Vec<PluginDescriptor> {
    PluginDiscovery::new().within(module_path!()).discover()
}
