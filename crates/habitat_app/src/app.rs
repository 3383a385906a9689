//! The composition root.

use crate::bootstrap::StoreBootstrap;
use crate::error::AppError;
use crate::habit_list::HabitList;
use habitat_features::RewardsPlugin;
use habitat_model::{Habit, Schema, StorageProvider};
use habitat_plugin::config::{Configuration, Settings};
use habitat_plugin::discovery::discover_plugins;
use habitat_plugin::plugin::PluginDescriptor;
use habitat_plugin::registry::PluginRegistry;
use habitat_plugin::view::PluginView;
use std::sync::Arc;

/// A running Habitat instance.
///
/// Owns the configuration, the plugin registry and the habit list. Startup
/// runs registration, instantiation, schema composition, storage open and the
/// initial load, in that order. Loaded and added habits are reported to
/// [`RewardsPlugin`] when it is running.
pub struct App<S> {
    config: Configuration,
    registry: Arc<PluginRegistry>,
    schema: Schema,
    habits: HabitList<S>,
}

impl<S: StorageProvider> App<S> {
    /// Starts with every plugin registered for link-time discovery.
    pub async fn start(config: Configuration, storage: Arc<S>) -> Result<Self, AppError> {
        Self::with_plugins(config, storage, discover_plugins()).await
    }

    /// Starts with an explicit set of plugins.
    pub async fn with_plugins(
        config: Configuration,
        storage: Arc<S>,
        plugins: impl IntoIterator<Item = PluginDescriptor>,
    ) -> Result<Self, AppError> {
        let registry = Arc::new(PluginRegistry::new());
        registry.register_all(plugins);

        let instances = registry.instantiate_all(&config);
        let schema = StoreBootstrap::new(Arc::clone(&storage)).open(&registry, &instances)?;

        let rewards = Arc::clone(&registry);
        let habits = HabitList::new(Arc::clone(&registry), storage).observe(move |habits| {
            if let Some(plugin) = rewards.instance_of::<RewardsPlugin>() {
                plugin.track(habits);
            }
        });
        habits.load().await?;

        tracing::info!(
            plugins = instances.len(),
            habits = habits.habits().len(),
            build_mode = ?config.build_mode(),
            "habitat started"
        );

        Ok(Self {
            config,
            registry,
            schema,
            habits,
        })
    }

    /// Returns the shared configuration handle.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the plugin registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Returns the schema storage was opened with.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the habit list.
    #[must_use]
    pub fn habits(&self) -> &HabitList<S> {
        &self.habits
    }

    /// Replaces the live flags. Hooks and views follow immediately; the open
    /// schema does not change until the next start.
    pub fn apply_settings(&self, settings: Settings) {
        self.config.apply(settings);
    }

    /// Row contributions for `habit`.
    #[must_use]
    pub fn row_views(&self, habit: &Habit) -> Vec<PluginView> {
        self.registry.views_for_row(habit)
    }

    /// Detail contributions for `habit`.
    #[must_use]
    pub fn detail_views(&self, habit: &Habit) -> Vec<PluginView> {
        self.registry.views_for_detail(habit)
    }

    /// Settings contributions.
    #[must_use]
    pub fn settings_views(&self) -> Vec<PluginView> {
        self.registry.settings_views()
    }
}
