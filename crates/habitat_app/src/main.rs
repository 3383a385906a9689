//! Habitat demo CLI.
//!
//! Starts with the plugins linked into the binary, adds a few habits, toggles
//! and deletes one, and prints what the plugins contributed.
//!
//! # Usage
//!
//! ```bash
//! HABITAT_LOG=debug HABITAT_ENABLE_STREAKS=true HABITAT_ENABLE_CATEGORIES=true habitat-demo
//! ```

#![expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "demo binary reports to the terminal"
)]

use habitat_app::logging::LoggingConfig;
use habitat_app::{App, AppError, settings};
use habitat_model::{Habit, HabitFrequency, MemoryStorage};
use habitat_plugin::config::Configuration;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    LoggingConfig::new().init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let settings = settings::from_env()?;
    let config = Configuration::from_settings(settings);
    let app = App::start(config, Arc::new(MemoryStorage::new())).await?;

    println!("schema: {}", app.schema().names().join(", "));

    let habits = app.habits();
    let read = habits.add(Habit::new("Read 20 pages", HabitFrequency::Daily)).await?;
    let gym = habits
        .add(Habit::new("Gym", HabitFrequency::Weekly).with_repeat_days([1, 3, 5]))
        .await?;
    habits
        .add(Habit::new("Pay rent", HabitFrequency::Monthly).with_monthly_day(1))
        .await?;

    habits.toggle_completion(read).await?;
    habits.toggle_completion(gym).await?;

    for habit in habits.habits() {
        let row: Vec<_> = app
            .row_views(&habit)
            .into_iter()
            .map(|view| format!("{}={}", view.plugin, view.content))
            .collect();
        println!("{:<14} {}", habit.name, row.join("  "));
    }

    habits.delete(&[gym]).await?;
    println!("{} habits left", habits.habits().len());

    for view in app.settings_views() {
        println!("settings: {} {}", view.plugin, view.content);
    }
    Ok(())
}
