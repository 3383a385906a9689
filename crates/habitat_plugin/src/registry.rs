//! The plugin registry.
//!
//! [`PluginRegistry`] owns registered descriptors and the current batch of
//! live instances. It composes the storage schema from enabled data plugins,
//! fans lifecycle events out to them, and collects view contributions.
//!
//! State sits behind one `RwLock`. Mutations are serialized: `register` and
//! `clear_all` take the write lock, and `instantiate_all` holds an upgradable
//! read for its whole run, upgrading only to install the new batch. Queries
//! and dispatch take the read lock only long enough to clone `Arc` handles, so
//! no lock is held while hooks run or across an `.await`.

use crate::capability::{DataPlugin, ViewPlugin};
use crate::config::Configuration;
use crate::lifecycle::{DispatchSummary, LifecycleEvent, dispatch};
use crate::plugin::{FeaturePlugin, PluginDescriptor, PluginId, PluginInstance, PluginSet};
use crate::view::PluginView;
use chrono::{DateTime, Utc};
use habitat_model::{Habit, HabitId, Schema};
use hashbrown::HashSet;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;

#[derive(Default)]
struct RegistryState {
    descriptors: Vec<PluginDescriptor>,
    ids: HashSet<PluginId>,
    instances: Vec<PluginInstance>,
}

/// Registry of plugin descriptors and live instances.
///
/// # Example
///
/// ```ignore
/// let registry = PluginRegistry::new();
/// registry.register_all(PluginDiscovery::new().within("habitat_features").discover());
///
/// let instances = registry.instantiate_all(&config);
/// let schema = registry.composed_models(&instances);
///
/// registry.notify_will_delete(&habit).await;
/// ```
#[derive(Default)]
pub struct PluginRegistry {
    state: RwLock<RegistryState>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────

    /// Registers a descriptor. Returns `false` if it was already registered.
    ///
    /// Registration never constructs the plugin.
    pub fn register(&self, descriptor: impl Into<PluginDescriptor>) -> bool {
        let descriptor = descriptor.into();
        let mut state = self.state.write();

        if !state.ids.insert(descriptor.id()) {
            tracing::debug!(plugin = %descriptor.id(), "plugin already registered");
            return false;
        }

        tracing::debug!(
            plugin = %descriptor.id(),
            origin = descriptor.origin(),
            data = descriptor.is_data(),
            view = descriptor.is_view(),
            "plugin registered"
        );
        state.descriptors.push(descriptor);
        true
    }

    /// Registers every descriptor, returning how many were new.
    pub fn register_all(&self, descriptors: impl IntoIterator<Item = PluginDescriptor>) -> usize {
        descriptors
            .into_iter()
            .map(|descriptor| self.register(descriptor))
            .filter(|added| *added)
            .count()
    }

    /// Registers a [`PluginSet`] in order, returning how many were new.
    pub fn register_set(&self, set: PluginSet) -> usize {
        self.register_all(set)
    }

    /// Removes every descriptor and instance.
    pub fn clear_all(&self) {
        let mut state = self.state.write();
        state.descriptors.clear();
        state.ids.clear();
        state.instances.clear();
        tracing::debug!("plugin registry cleared");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Instantiation
    // ─────────────────────────────────────────────────────────────────────

    /// Builds one instance per registered descriptor, in registration order,
    /// replacing any previous batch.
    ///
    /// A plugin that fails to construct is logged and left out; the others
    /// are unaffected.
    pub fn instantiate_all(&self, config: &Configuration) -> Vec<PluginInstance> {
        // Readers keep going while constructors run; other mutations wait.
        let state = self.state.upgradable_read();

        let instances: Vec<PluginInstance> = state
            .descriptors
            .iter()
            .filter_map(|descriptor| match descriptor.instantiate(config) {
                Ok(instance) => Some(instance),
                Err(err) => {
                    tracing::warn!(plugin = %descriptor.id(), error = %err, "plugin dropped");
                    None
                }
            })
            .collect();

        tracing::info!(
            registered = state.descriptors.len(),
            instantiated = instances.len(),
            "plugins instantiated"
        );

        RwLockUpgradableReadGuard::upgrade(state).instances = instances.clone();
        instances
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the enabled data plugins of the current batch, in order.
    ///
    /// Recomputed on every call, so flag changes are observed immediately.
    #[must_use]
    pub fn enabled_data_plugins(&self) -> Vec<Arc<dyn DataPlugin>> {
        self.instances()
            .iter()
            .filter(|instance| instance.is_enabled())
            .filter_map(|instance| instance.as_data().cloned())
            .collect()
    }

    /// Composes the storage schema: the primary entity followed by the
    /// models of every enabled data plugin in `instances`, deduplicated.
    #[must_use]
    pub fn composed_models(&self, instances: &[PluginInstance]) -> Schema {
        let mut schema = Schema::primary::<Habit>();
        for instance in instances.iter().filter(|instance| instance.is_enabled()) {
            if let Some(data) = instance.as_data() {
                schema.extend(data.models());
            }
        }
        tracing::debug!(models = ?schema.names(), "schema composed");
        schema
    }

    /// Composes the schema from the current batch of instances.
    #[must_use]
    pub fn current_schema(&self) -> Schema {
        self.composed_models(&self.instances())
    }

    /// Returns the number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().descriptors.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().descriptors.is_empty()
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: PluginId) -> bool {
        self.state.read().ids.contains(&id)
    }

    /// Returns registered ids in registration order.
    #[must_use]
    pub fn registered(&self) -> Vec<PluginId> {
        self.state
            .read()
            .descriptors
            .iter()
            .map(PluginDescriptor::id)
            .collect()
    }

    /// Returns the current batch of instances.
    #[must_use]
    pub fn instances(&self) -> Vec<PluginInstance> {
        self.state.read().instances.clone()
    }

    /// Returns the live instance of plugin `P`, if one exists.
    #[must_use]
    pub fn instance_of<P: FeaturePlugin>(&self) -> Option<Arc<P>> {
        let id = PluginId::of::<P>();
        self.state
            .read()
            .instances
            .iter()
            .find(|instance| instance.id() == id)
            .and_then(PluginInstance::downcast::<P>)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────

    /// Delivers `event` to every enabled data plugin and waits for all hooks.
    ///
    /// The recipient set is computed once, before any hook runs. Hook errors
    /// and panics are logged and reported in the summary, never returned.
    pub async fn notify(&self, event: LifecycleEvent) -> DispatchSummary {
        let recipients = self.enabled_data_plugins();
        dispatch(&recipients, &event).await
    }

    /// Announces that `habit` is about to be deleted.
    pub async fn notify_will_delete(&self, habit: &Habit) -> DispatchSummary {
        self.notify(LifecycleEvent::WillDelete {
            habit: habit.clone(),
        })
        .await
    }

    /// Announces that the habit with `habit_id` was deleted.
    pub async fn notify_did_delete(&self, habit_id: HabitId) -> DispatchSummary {
        self.notify(LifecycleEvent::DidDelete { habit_id }).await
    }

    /// Announces a completion change.
    pub async fn notify_completion_changed(
        &self,
        habit_id: HabitId,
        is_completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> DispatchSummary {
        self.notify(LifecycleEvent::CompletionChanged {
            habit_id,
            is_completed,
            completed_at,
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────

    /// Row contributions of enabled view plugins, in registration order.
    #[must_use]
    pub fn views_for_row(&self, habit: &Habit) -> Vec<PluginView> {
        self.view_plugins(true)
            .iter()
            .filter_map(|view| view.row_view(habit))
            .collect()
    }

    /// Detail contributions of enabled view plugins, in registration order.
    #[must_use]
    pub fn views_for_detail(&self, habit: &Habit) -> Vec<PluginView> {
        self.view_plugins(true)
            .iter()
            .filter_map(|view| view.detail_view(habit))
            .collect()
    }

    /// Settings contributions of every view plugin, enabled or not, so a
    /// disabled feature can still be switched on.
    #[must_use]
    pub fn settings_views(&self) -> Vec<PluginView> {
        self.view_plugins(false)
            .iter()
            .filter_map(|view| view.settings_view())
            .collect()
    }

    fn view_plugins(&self, enabled_only: bool) -> Vec<Arc<dyn ViewPlugin>> {
        self.instances()
            .iter()
            .filter(|instance| !enabled_only || instance.is_enabled())
            .filter_map(|instance| instance.as_view().cloned())
            .collect()
    }
}
