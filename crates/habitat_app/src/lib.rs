//! Composition root for Habitat.
//!
//! - [`App`] - Registers plugins, opens storage and owns the habit list
//! - [`StoreBootstrap`] - One-shot schema composition and storage open
//! - [`HabitList`] - Habit mutations that drive plugin lifecycle events
//! - [`logging`] - `tracing` subscriber setup
//! - [`settings`] - Settings from the environment or JSON
//!
//! # Example
//!
//! ```
//! use habitat_app::App;
//! use habitat_features::{DefaultFeatures, flags};
//! use habitat_model::{Habit, HabitFrequency, MemoryStorage};
//! use habitat_plugin::prelude::*;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = Configuration::new().with_flag(flags::ENABLE_STREAKS, true);
//! let storage = Arc::new(MemoryStorage::new());
//! let app = App::with_plugins(config, storage, DefaultFeatures.build())
//!     .await
//!     .unwrap();
//!
//! let id = app.habits().add(Habit::new("Read", HabitFrequency::Daily)).await.unwrap();
//! assert!(app.habits().toggle_completion(id).await.unwrap());
//! # });
//! ```

mod app;
mod bootstrap;
mod error;
mod habit_list;

pub mod logging;
pub mod settings;

pub use app::App;
pub use bootstrap::StoreBootstrap;
pub use error::AppError;
pub use habit_list::HabitList;
pub use settings::SettingsError;
