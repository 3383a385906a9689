//! Configuration gate for plugin activation.
//!
//! [`Configuration`] is a cheap, cloneable handle over named boolean flags and
//! a [`BuildMode`]. Every clone shares the same state, so a plugin that keeps
//! the handle it was built with always observes the current value of its flag.
//!
//! [`Settings`] is a plain serde snapshot of the same data, used to load and
//! persist configuration.

use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Build flavour of the running program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// Regular build.
    #[default]
    Standard,
    /// Premium build; enables the premium plugins.
    Premium,
}

/// Serializable snapshot of a [`Configuration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Build flavour.
    pub build_mode: BuildMode,
    /// Flag values by name. Missing flags read as `false`.
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Default)]
struct ConfigState {
    flags: HashMap<String, bool>,
    build_mode: BuildMode,
}

/// Shared handle over feature flags and build mode.
///
/// # Example
///
/// ```
/// use habitat_plugin::config::Configuration;
///
/// let config = Configuration::new();
/// let seen_by_plugin = config.clone();
///
/// assert!(!seen_by_plugin.flag("enable_streaks"));
/// config.set_flag("enable_streaks", true);
/// assert!(seen_by_plugin.flag("enable_streaks"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    state: Arc<RwLock<ConfigState>>,
}

impl Configuration {
    /// Creates a standard-build configuration with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a settings snapshot.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let config = Self::new();
        config.apply(settings);
        config
    }

    /// Sets a flag, returning the handle for chaining.
    #[must_use]
    pub fn with_flag(self, name: impl Into<String>, enabled: bool) -> Self {
        self.set_flag(name, enabled);
        self
    }

    /// Sets the build mode, returning the handle for chaining.
    #[must_use]
    pub fn with_build_mode(self, mode: BuildMode) -> Self {
        self.state.write().build_mode = mode;
        self
    }

    /// Returns the value of `name`, or `false` if it was never set.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.state.read().flags.get(name).copied().unwrap_or(false)
    }

    /// Sets `name` for every holder of this handle.
    pub fn set_flag(&self, name: impl Into<String>, enabled: bool) {
        let name = name.into();
        tracing::debug!(flag = %name, enabled, "configuration flag changed");
        self.state.write().flags.insert(name, enabled);
    }

    /// Returns the build mode.
    #[must_use]
    pub fn build_mode(&self) -> BuildMode {
        self.state.read().build_mode
    }

    /// Returns `true` for premium builds.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.build_mode() == BuildMode::Premium
    }

    /// Replaces the current state with `settings`.
    pub fn apply(&self, settings: Settings) {
        let mut state = self.state.write();
        state.build_mode = settings.build_mode;
        state.flags = settings.flags.into_iter().collect();
    }

    /// Takes a snapshot of the current state.
    #[must_use]
    pub fn settings(&self) -> Settings {
        let state = self.state.read();
        Settings {
            build_mode: state.build_mode,
            flags: state
                .flags
                .iter()
                .map(|(name, enabled)| (name.clone(), *enabled))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flags_are_off() {
        let config = Configuration::new();
        assert!(!config.flag("enable_reminders"));
        assert_eq!(config.build_mode(), BuildMode::Standard);
    }

    #[test]
    fn clones_share_state() {
        let config = Configuration::new().with_flag("enable_daily_notes", true);
        let other = config.clone();

        other.set_flag("enable_daily_notes", false);
        assert!(!config.flag("enable_daily_notes"));
    }

    #[test]
    fn settings_snapshot_round_trip() {
        let config = Configuration::new()
            .with_flag("enable_streaks", true)
            .with_flag("enable_categories", false)
            .with_build_mode(BuildMode::Premium);

        let settings = config.settings();
        assert_eq!(settings.flags.get("enable_streaks"), Some(&true));
        assert!(config.is_premium());

        let restored = Configuration::from_settings(settings.clone());
        assert_eq!(restored.settings(), settings);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "flags": { "enable_statistics": true } }"#).unwrap();
        assert_eq!(settings.build_mode, BuildMode::Standard);

        let config = Configuration::from_settings(settings);
        assert!(config.flag("enable_statistics"));
        assert!(!config.flag("enable_streaks"));
    }

    #[test]
    fn apply_replaces_previous_flags() {
        let config = Configuration::new().with_flag("enable_streaks", true);
        config.apply(Settings::default());
        assert!(!config.flag("enable_streaks"));
    }
}
