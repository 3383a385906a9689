//! Experience points and levels (premium).
//!
//! Completing a habit earns XP according to its frequency; uncompleting it
//! takes the same amount back. A daily bonus can be claimed once per day.

use crate::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use habitat_model::{Habit, HabitFrequency, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// XP needed to advance one level.
pub const NEXT_LEVEL_XP: u64 = 2000;

/// XP granted by [`RewardsPlugin::claim_daily`].
pub const DAILY_CLAIM_XP: u64 = 50;

/// Returns the XP earned by completing a habit of `frequency`.
#[must_use]
pub const fn xp_for(frequency: HabitFrequency) -> u64 {
    match frequency {
        HabitFrequency::Daily => 30,
        HabitFrequency::Weekly => 50,
        HabitFrequency::Monthly => 70,
        HabitFrequency::Custom => 40,
    }
}

/// Persisted XP balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "XpProfile")]
pub struct XpProfile {
    /// Accumulated XP, never negative.
    pub total_xp: u64,
    /// Day of the last daily bonus claim.
    pub last_daily_claim: Option<NaiveDate>,
}

/// Level derived from an [`XpProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    /// 1-based level.
    pub level: u64,
    /// XP earned within the current level.
    pub current_xp: u64,
    /// XP span of one level.
    pub next_level_xp: u64,
}

impl From<&XpProfile> for LevelInfo {
    fn from(profile: &XpProfile) -> Self {
        Self {
            level: profile.total_xp / NEXT_LEVEL_XP + 1,
            current_xp: profile.total_xp % NEXT_LEVEL_XP,
            next_level_xp: NEXT_LEVEL_XP,
        }
    }
}

/// Awards XP for completions. Enabled in premium builds.
///
/// Completion events carry only a habit id, so the plugin awards by the
/// frequency last seen through [`track`](Self::track). Completions of
/// untracked habits earn nothing.
pub struct RewardsPlugin {
    config: Configuration,
    clock: Clock,
    profile: RwLock<XpProfile>,
    frequencies: RwLock<HashMap<HabitId, HabitFrequency>>,
}

impl RewardsPlugin {
    /// Creates the plugin with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &Configuration, clock: Clock) -> Self {
        Self {
            config: config.clone(),
            clock,
            profile: RwLock::new(XpProfile::default()),
            frequencies: RwLock::new(HashMap::new()),
        }
    }

    /// Records the frequencies of `habits` for later awards.
    pub fn track(&self, habits: &[Habit]) {
        let mut frequencies = self.frequencies.write();
        for habit in habits {
            frequencies.insert(habit.id, habit.frequency);
        }
    }

    /// Returns a copy of the XP profile.
    #[must_use]
    pub fn profile(&self) -> XpProfile {
        self.profile.read().clone()
    }

    /// Returns the current level.
    #[must_use]
    pub fn level(&self) -> LevelInfo {
        LevelInfo::from(&*self.profile.read())
    }

    /// Grants the daily bonus. Returns `false` if it was already claimed today.
    pub fn claim_daily(&self) -> bool {
        let today = self.clock.today();
        let mut profile = self.profile.write();
        if profile.last_daily_claim == Some(today) {
            return false;
        }
        profile.total_xp += DAILY_CLAIM_XP;
        profile.last_daily_claim = Some(today);
        tracing::info!(total_xp = profile.total_xp, "daily bonus claimed");
        true
    }

    fn frequency_of(&self, habit_id: HabitId) -> Option<HabitFrequency> {
        self.frequencies.read().get(&habit_id).copied()
    }
}

impl FeaturePlugin for RewardsPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self::with_clock(config, Clock::system()))
    }

    fn is_enabled(&self) -> bool {
        self.config.is_premium()
    }

    fn name(&self) -> &str {
        "rewards"
    }
}

#[async_trait]
impl DataPlugin for RewardsPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![XpProfile::descriptor()]
    }

    async fn did_delete_habit(&self, habit_id: HabitId) -> Result<(), HookError> {
        self.frequencies.write().remove(&habit_id);
        Ok(())
    }

    async fn completion_did_change(
        &self,
        habit_id: HabitId,
        is_completed: bool,
        _completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), HookError> {
        let Some(frequency) = self.frequency_of(habit_id) else {
            tracing::debug!(habit_id = %habit_id, "completion of untracked habit ignored");
            return Ok(());
        };
        let xp = xp_for(frequency);
        let mut profile = self.profile.write();
        profile.total_xp = if is_completed {
            profile.total_xp + xp
        } else {
            profile.total_xp.saturating_sub(xp)
        };
        tracing::debug!(habit_id = %habit_id, xp, total_xp = profile.total_xp, "xp updated");
        Ok(())
    }
}

#[cfg(feature = "premium")]
submit_plugin!(PluginDescriptor::of::<RewardsPlugin>().with_data());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn plugin() -> (RewardsPlugin, Arc<MockClock>) {
        let mock = Arc::new(MockClock::new(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()));
        let config = Configuration::new().with_build_mode(BuildMode::Premium);
        (RewardsPlugin::with_clock(&config, Clock::with_provider(mock.clone())), mock)
    }

    #[tokio::test]
    async fn awards_by_tracked_frequency() {
        let (plugin, _) = plugin();
        let monthly = Habit::new("Budget review", HabitFrequency::Monthly);
        plugin.track(std::slice::from_ref(&monthly));

        plugin.completion_did_change(monthly.id, true, None).await.unwrap();
        assert_eq!(plugin.profile().total_xp, 70);
    }

    #[tokio::test]
    async fn untracked_habits_earn_nothing() {
        let (plugin, _) = plugin();
        plugin.completion_did_change(HabitId::new(), true, None).await.unwrap();
        assert_eq!(plugin.profile().total_xp, 0);

        let custom = Habit::new("Sketch", HabitFrequency::Custom);
        plugin.track(std::slice::from_ref(&custom));
        plugin.completion_did_change(custom.id, true, None).await.unwrap();
        assert_eq!(plugin.profile().total_xp, 40);
    }

    #[tokio::test]
    async fn uncompleting_never_goes_negative() {
        let (plugin, _) = plugin();
        let daily = Habit::new("Floss", HabitFrequency::Daily);
        plugin.track(std::slice::from_ref(&daily));

        plugin.completion_did_change(daily.id, false, None).await.unwrap();
        assert_eq!(plugin.profile().total_xp, 0);
    }

    #[test]
    fn daily_claim_once_per_day() {
        let (plugin, mock) = plugin();
        assert!(plugin.claim_daily());
        assert!(!plugin.claim_daily());
        mock.advance(chrono::Duration::days(1));
        assert!(plugin.claim_daily());
        assert_eq!(plugin.profile().total_xp, 2 * DAILY_CLAIM_XP);
    }

    #[test]
    fn level_rolls_over() {
        let profile = XpProfile {
            total_xp: 4130,
            last_daily_claim: None,
        };
        let level = LevelInfo::from(&profile);
        assert_eq!(level.level, 3);
        assert_eq!(level.current_xp, 130);
        assert_eq!(LevelInfo::from(&XpProfile::default()).level, 1);
    }

    #[test]
    fn enabled_by_premium_build_mode() {
        let config = Configuration::new();
        let plugin = RewardsPlugin::from_config(&config).unwrap();
        assert!(!plugin.is_enabled());

        config.apply(Settings {
            build_mode: BuildMode::Premium,
            ..Settings::default()
        });
        assert!(plugin.is_enabled());
        assert_eq!(plugin.level().next_level_xp, NEXT_LEVEL_XP);
    }
}
