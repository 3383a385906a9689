//! Presentation objects contributed by view plugins.
//!
//! Rendering is not part of the runtime: a [`PluginView`] is plain data that a
//! front end turns into widgets.

use core::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a [`PluginView`] is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSlot {
    /// A habit's list row.
    Row,
    /// A habit's detail screen.
    Detail,
    /// The settings screen.
    Settings,
}

impl fmt::Display for ViewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Row => "row",
            Self::Detail => "detail",
            Self::Settings => "settings",
        })
    }
}

/// Presentation data produced by a view plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginView {
    /// Name of the contributing plugin.
    pub plugin: String,
    /// Target slot.
    pub slot: ViewSlot,
    /// Slot content.
    pub content: Value,
}

impl PluginView {
    /// Creates a view.
    #[must_use]
    pub fn new(plugin: impl Into<String>, slot: ViewSlot, content: Value) -> Self {
        Self {
            plugin: plugin.into(),
            slot,
            content,
        }
    }

    /// Creates a [`ViewSlot::Row`] view.
    #[must_use]
    pub fn row(plugin: impl Into<String>, content: Value) -> Self {
        Self::new(plugin, ViewSlot::Row, content)
    }

    /// Creates a [`ViewSlot::Detail`] view.
    #[must_use]
    pub fn detail(plugin: impl Into<String>, content: Value) -> Self {
        Self::new(plugin, ViewSlot::Detail, content)
    }

    /// Creates a [`ViewSlot::Settings`] view.
    #[must_use]
    pub fn settings(plugin: impl Into<String>, content: Value) -> Self {
        Self::new(plugin, ViewSlot::Settings, content)
    }
}
