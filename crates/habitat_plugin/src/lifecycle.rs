//! Habit lifecycle events and their concurrent fan-out.
//!
//! One event is delivered to a snapshot of data plugins. All hooks are polled
//! concurrently on the caller's task and the caller waits for every one of
//! them. A hook that returns an error or panics is logged and counted; it
//! never affects its siblings or the caller.

use crate::capability::DataPlugin;
use crate::error::HookError;
use chrono::{DateTime, Utc};
use core::fmt;
use futures::FutureExt;
use futures::future::join_all;
use habitat_model::{Habit, HabitId};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleEvent
// ─────────────────────────────────────────────────────────────────────────────

/// A habit lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// A habit is about to be deleted; it is still in storage.
    WillDelete {
        /// The habit being deleted.
        habit: Habit,
    },
    /// A habit was deleted and storage saved.
    DidDelete {
        /// Id of the deleted habit.
        habit_id: HabitId,
    },
    /// A habit's completion state changed and storage saved.
    CompletionChanged {
        /// Id of the habit.
        habit_id: HabitId,
        /// New completion state.
        is_completed: bool,
        /// Completion time, when completed.
        completed_at: Option<DateTime<Utc>>,
    },
}

impl LifecycleEvent {
    /// Returns the event kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::WillDelete { .. } => EventKind::WillDelete,
            Self::DidDelete { .. } => EventKind::DidDelete,
            Self::CompletionChanged { .. } => EventKind::CompletionChanged,
        }
    }

    /// Returns the id of the habit the event concerns.
    #[must_use]
    pub fn habit_id(&self) -> HabitId {
        match self {
            Self::WillDelete { habit } => habit.id,
            Self::DidDelete { habit_id } | Self::CompletionChanged { habit_id, .. } => *habit_id,
        }
    }
}

/// Discriminant of a [`LifecycleEvent`], for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`LifecycleEvent::WillDelete`]
    WillDelete,
    /// [`LifecycleEvent::DidDelete`]
    DidDelete,
    /// [`LifecycleEvent::CompletionChanged`]
    CompletionChanged,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WillDelete => "will_delete",
            Self::DidDelete => "did_delete",
            Self::CompletionChanged => "completion_changed",
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DispatchSummary
// ─────────────────────────────────────────────────────────────────────────────

/// Why a single hook failed.
#[derive(Debug)]
pub enum FailureCause {
    /// The hook returned an error.
    Error(HookError),
    /// The hook panicked; carries the panic message when it was a string.
    Panic(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(err) => write!(f, "{err}"),
            Self::Panic(message) => write!(f, "panicked: {message}"),
        }
    }
}

/// A hook failure attributed to one plugin.
#[derive(Debug)]
pub struct HookFailure {
    /// Name of the failing plugin.
    pub plugin: String,
    /// What went wrong.
    pub cause: FailureCause,
}

/// Outcome of one fan-out.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    /// Number of plugins the event was delivered to.
    pub recipients: usize,
    /// Hooks that failed, in recipient order.
    pub failures: Vec<HookFailure>,
}

impl DispatchSummary {
    /// Returns `true` if every hook succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of hooks that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.recipients - self.failures.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fan-out
// ─────────────────────────────────────────────────────────────────────────────

/// Delivers `event` to every plugin in `recipients` and waits for all hooks.
pub(crate) async fn dispatch(
    recipients: &[Arc<dyn DataPlugin>],
    event: &LifecycleEvent,
) -> DispatchSummary {
    if recipients.is_empty() {
        tracing::trace!(event = %event.kind(), "no enabled data plugins; nothing to dispatch");
        return DispatchSummary::default();
    }

    tracing::debug!(
        event = %event.kind(),
        habit_id = %event.habit_id(),
        recipients = recipients.len(),
        "dispatching lifecycle event"
    );

    let outcomes = join_all(recipients.iter().map(|plugin| deliver(plugin.as_ref(), event))).await;

    let failures = recipients
        .iter()
        .zip(outcomes)
        .filter_map(|(plugin, outcome)| {
            outcome.err().map(|cause| {
                match &cause {
                    FailureCause::Error(err) => tracing::warn!(
                        plugin = %plugin.name(),
                        event = %event.kind(),
                        error = %err,
                        "lifecycle hook failed"
                    ),
                    FailureCause::Panic(message) => tracing::error!(
                        plugin = %plugin.name(),
                        event = %event.kind(),
                        panic = %message,
                        "lifecycle hook panicked"
                    ),
                }
                HookFailure {
                    plugin: plugin.name().to_string(),
                    cause,
                }
            })
        })
        .collect();

    DispatchSummary {
        recipients: recipients.len(),
        failures,
    }
}

/// Runs the hook matching `event` on one plugin, containing errors and panics.
async fn deliver(plugin: &dyn DataPlugin, event: &LifecycleEvent) -> Result<(), FailureCause> {
    let hook = async {
        match event {
            LifecycleEvent::WillDelete { habit } => plugin.will_delete_habit(habit).await,
            LifecycleEvent::DidDelete { habit_id } => plugin.did_delete_habit(*habit_id).await,
            LifecycleEvent::CompletionChanged {
                habit_id,
                is_completed,
                completed_at,
            } => {
                plugin
                    .completion_did_change(*habit_id, *is_completed, *completed_at)
                    .await
            }
        }
    };

    match AssertUnwindSafe(hook).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(FailureCause::Error(err)),
        Err(payload) => Err(FailureCause::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
