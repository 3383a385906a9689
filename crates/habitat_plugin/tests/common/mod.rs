//! Shared mock plugins for the integration tests.
//!
//! Plugins are constructed by the registry from a [`Configuration`] alone, so
//! observations go to static slots. Each test uses its own slot numbers.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use parking_lot::Mutex;

// ─────────────────────────────────────────────────────────────────────────────
// Models
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Model)]
pub struct ModelX;

#[derive(Model)]
pub struct ModelY;

#[derive(Model)]
pub struct ModelZ;

// ─────────────────────────────────────────────────────────────────────────────
// Call recording
// ─────────────────────────────────────────────────────────────────────────────

/// Observations of one counting plugin.
pub struct Calls {
    pub will_delete: AtomicUsize,
    pub did_delete: AtomicUsize,
    pub completion_changed: AtomicUsize,
    pub seen: Mutex<Vec<HabitId>>,
}

impl Calls {
    const fn new() -> Self {
        Self {
            will_delete: AtomicUsize::new(0),
            did_delete: AtomicUsize::new(0),
            completion_changed: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn total(&self) -> usize {
        self.will_delete.load(Ordering::SeqCst)
            + self.did_delete.load(Ordering::SeqCst)
            + self.completion_changed.load(Ordering::SeqCst)
    }

    fn record(&self, counter: &AtomicUsize, habit_id: HabitId) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(habit_id);
    }
}

pub const SLOTS: usize = 32;

pub static CALLS: [Calls; SLOTS] = [const { Calls::new() }; SLOTS];

/// Returns the observations for `slot`.
pub fn calls(slot: usize) -> &'static Calls {
    &CALLS[slot]
}

/// Flag that enables the plugins using `slot`.
pub fn flag(slot: usize) -> String {
    format!("slot_{slot}")
}

// ─────────────────────────────────────────────────────────────────────────────
// Counting plugin
// ─────────────────────────────────────────────────────────────────────────────

/// Records every hook call in `CALLS[SLOT]`. Enabled by `flag(SLOT)`.
pub struct Counting<const SLOT: usize> {
    config: Configuration,
}

impl<const SLOT: usize> Counting<SLOT> {
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::of::<Self>().with_data().with_view().build()
    }
}

impl<const SLOT: usize> FeaturePlugin for Counting<SLOT> {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self {
            config: config.clone(),
        })
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(&flag(SLOT))
    }
}

#[async_trait]
impl<const SLOT: usize> DataPlugin for Counting<SLOT> {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![ModelX::descriptor()]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        calls(SLOT).record(&calls(SLOT).will_delete, habit.id);
        Ok(())
    }

    async fn did_delete_habit(&self, habit_id: HabitId) -> Result<(), HookError> {
        calls(SLOT).record(&calls(SLOT).did_delete, habit_id);
        Ok(())
    }

    async fn completion_did_change(
        &self,
        habit_id: HabitId,
        _is_completed: bool,
        _completed_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<(), HookError> {
        calls(SLOT).record(&calls(SLOT).completion_changed, habit_id);
        Ok(())
    }
}

impl<const SLOT: usize> ViewPlugin for Counting<SLOT> {
    fn row_view(&self, habit: &Habit) -> Option<PluginView> {
        Some(PluginView::row(
            format!("counting_{SLOT}"),
            serde_json::json!({ "habit": habit.name }),
        ))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            format!("counting_{SLOT}"),
            serde_json::json!({ "enabled": self.is_enabled() }),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Misbehaving plugins
// ─────────────────────────────────────────────────────────────────────────────

/// Always enabled; every hook returns an error.
pub struct Failing;

impl FeaturePlugin for Failing {
    fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self)
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[async_trait]
impl DataPlugin for Failing {
    fn models(&self) -> Vec<ModelDescriptor> {
        Vec::new()
    }

    async fn will_delete_habit(&self, _habit: &Habit) -> Result<(), HookError> {
        Err(HookError::failed("refusing to clean up"))
    }
}

/// Always enabled; every hook panics.
pub struct Panicking;

impl FeaturePlugin for Panicking {
    fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self)
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[async_trait]
impl DataPlugin for Panicking {
    fn models(&self) -> Vec<ModelDescriptor> {
        Vec::new()
    }

    async fn will_delete_habit(&self, _habit: &Habit) -> Result<(), HookError> {
        panic!("hook exploded");
    }
}

/// Fails construction unconditionally.
pub struct Refusing;

impl FeaturePlugin for Refusing {
    fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
        Err(PluginError::construction::<Self>("missing backing store"))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

impl DataPlugin for Refusing {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![ModelZ::descriptor()]
    }
}

/// Sleeps for `MILLIS` in `did_delete_habit`, then counts in `CALLS[SLOT]`.
pub struct Slow<const SLOT: usize, const MILLIS: u64>;

impl<const SLOT: usize, const MILLIS: u64> FeaturePlugin for Slow<SLOT, MILLIS> {
    fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self)
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[async_trait]
impl<const SLOT: usize, const MILLIS: u64> DataPlugin for Slow<SLOT, MILLIS> {
    fn models(&self) -> Vec<ModelDescriptor> {
        Vec::new()
    }

    async fn did_delete_habit(&self, habit_id: HabitId) -> Result<(), HookError> {
        tokio::time::sleep(Duration::from_millis(MILLIS)).await;
        calls(SLOT).record(&calls(SLOT).did_delete, habit_id);
        Ok(())
    }
}
