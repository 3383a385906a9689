//! Chained habits (premium).
//!
//! A chain is an ordered sequence of habits meant to be done one after
//! another.

use crate::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitChain")]
pub struct HabitChain {
    /// Chain id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// One habit's place in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitChainItem")]
pub struct HabitChainItem {
    /// Owning chain.
    pub chain_id: Uuid,
    /// Linked habit.
    pub habit_id: HabitId,
    /// 0-based position within the chain.
    pub position: u32,
}

#[derive(Default)]
struct ChainState {
    chains: Vec<HabitChain>,
    items: Vec<HabitChainItem>,
}

impl ChainState {
    fn set_items(&mut self, chain_id: Uuid, habits: &[HabitId]) {
        self.items.retain(|item| item.chain_id != chain_id);
        self.items.extend(habits.iter().zip(0..).map(|(habit_id, position)| {
            HabitChainItem {
                chain_id,
                habit_id: *habit_id,
                position,
            }
        }));
    }

    fn habits_in(&self, chain_id: Uuid) -> Vec<HabitId> {
        let mut items: Vec<_> = self
            .items
            .iter()
            .filter(|item| item.chain_id == chain_id)
            .collect();
        items.sort_by_key(|item| item.position);
        items.into_iter().map(|item| item.habit_id).collect()
    }
}

/// Manages habit chains. Enabled in premium builds.
pub struct ChainsPlugin {
    config: Configuration,
    clock: Clock,
    state: RwLock<ChainState>,
}

impl ChainsPlugin {
    /// Creates the plugin with an explicit clock.
    #[must_use]
    pub fn with_clock(config: &Configuration, clock: Clock) -> Self {
        Self {
            config: config.clone(),
            clock,
            state: RwLock::new(ChainState::default()),
        }
    }

    /// Creates a chain over `habits`, in order, and returns its id.
    pub fn create_chain(&self, name: impl Into<String>, habits: &[HabitId]) -> Uuid {
        let chain = HabitChain {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: self.clock.now(),
        };
        let id = chain.id;
        let mut state = self.state.write();
        state.chains.push(chain);
        state.set_items(id, habits);
        id
    }

    /// Replaces the habits of `chain_id`. Returns `false` if the chain does not exist.
    pub fn replace_items(&self, chain_id: Uuid, habits: &[HabitId]) -> bool {
        let mut state = self.state.write();
        if !state.chains.iter().any(|chain| chain.id == chain_id) {
            return false;
        }
        state.set_items(chain_id, habits);
        true
    }

    /// Returns all chains in creation order.
    #[must_use]
    pub fn chains(&self) -> Vec<HabitChain> {
        self.state.read().chains.clone()
    }

    /// Returns the habits of `chain_id` in chain order.
    #[must_use]
    pub fn habits_in(&self, chain_id: Uuid) -> Vec<HabitId> {
        self.state.read().habits_in(chain_id)
    }
}

impl FeaturePlugin for ChainsPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        Ok(Self::with_clock(config, Clock::system()))
    }

    fn is_enabled(&self) -> bool {
        self.config.is_premium()
    }

    fn name(&self) -> &str {
        "chains"
    }
}

#[async_trait]
impl DataPlugin for ChainsPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![HabitChain::descriptor(), HabitChainItem::descriptor()]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        let mut state = self.state.write();
        let affected: Vec<Uuid> = state
            .items
            .iter()
            .filter(|item| item.habit_id == habit.id)
            .map(|item| item.chain_id)
            .collect();

        for chain_id in affected {
            let remaining: Vec<_> = state
                .habits_in(chain_id)
                .into_iter()
                .filter(|id| *id != habit.id)
                .collect();
            state.set_items(chain_id, &remaining);
            if remaining.is_empty() {
                state.chains.retain(|chain| chain.id != chain_id);
                tracing::debug!(chain_id = %chain_id, "empty chain removed");
            }
        }
        Ok(())
    }
}

#[cfg(feature = "premium")]
submit_plugin!(PluginDescriptor::of::<ChainsPlugin>().with_data());
