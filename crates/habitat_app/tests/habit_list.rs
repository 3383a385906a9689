//! The habit list against a store that can refuse writes.

use chrono::Utc;
use habitat_app::{AppError, HabitList};
use habitat_model::{Habit, HabitFrequency, MemoryStorage, Schema, StorageError, StorageProvider};
use habitat_plugin::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Memory store whose next save can be made to fail.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    fail_next_save: AtomicBool,
}

impl FlakyStorage {
    fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageProvider for FlakyStorage {
    fn open(&self, schema: Schema) -> Result<(), StorageError> {
        self.inner.open(schema)
    }

    fn schema(&self) -> Option<Schema> {
        self.inner.schema()
    }

    async fn load_all(&self) -> Result<Vec<Habit>, StorageError> {
        self.inner.load_all().await
    }

    async fn save_all(&self, habits: &[Habit]) -> Result<(), StorageError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".to_owned()));
        }
        self.inner.save_all(habits).await
    }
}

async fn list_with(habits: Vec<Habit>) -> (HabitList<FlakyStorage>, Arc<FlakyStorage>) {
    let storage = Arc::new(FlakyStorage {
        inner: MemoryStorage::with_habits(habits),
        ..FlakyStorage::default()
    });
    storage.open(Schema::primary::<Habit>()).unwrap();
    let list = HabitList::new(Arc::new(PluginRegistry::new()), Arc::clone(&storage));
    list.load().await.unwrap();
    (list, storage)
}

#[tokio::test]
async fn failed_delete_keeps_the_habit() {
    let habit = Habit::new("Read", HabitFrequency::Daily);
    let (list, storage) = list_with(vec![habit.clone()]).await;

    storage.fail_next_save();
    let result = list.delete(&[habit.id]).await;
    assert!(matches!(result, Err(AppError::Storage(StorageError::Backend(_)))));
    assert!(list.get(habit.id).is_some());
    assert_eq!(storage.load_all().await.unwrap().len(), 1);

    assert_eq!(list.delete(&[habit.id]).await.unwrap(), 1);
    assert!(list.habits().is_empty());
    assert!(storage.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_toggle_leaves_completion_unchanged() {
    let habit = Habit::new("Stretch", HabitFrequency::Daily);
    let (list, storage) = list_with(vec![habit.clone()]).await;

    storage.fail_next_save();
    assert!(list.toggle_completion(habit.id).await.is_err());
    let now = Utc::now();
    assert!(!list.get(habit.id).unwrap().is_completed_for_current_period(now));

    assert!(list.toggle_completion(habit.id).await.unwrap());
    assert!(list.get(habit.id).unwrap().is_completed_for_current_period(Utc::now()));
}

#[tokio::test]
async fn failed_add_is_not_listed() {
    let (list, storage) = list_with(Vec::new()).await;

    storage.fail_next_save();
    assert!(list.add(Habit::new("Run", HabitFrequency::Weekly)).await.is_err());
    assert!(list.habits().is_empty());
}

#[tokio::test]
async fn observers_see_loaded_and_added_habits() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let storage = Arc::new(MemoryStorage::with_habits(vec![Habit::new(
        "Walk",
        HabitFrequency::Daily,
    )]));
    storage.open(Schema::primary::<Habit>()).unwrap();

    let sink = Arc::clone(&seen);
    let list = HabitList::new(Arc::new(PluginRegistry::new()), storage).observe(move |habits| {
        sink.lock()
            .extend(habits.iter().map(|habit| habit.name.clone()));
    });
    list.load().await.unwrap();
    list.add(Habit::new("Swim", HabitFrequency::Weekly))
        .await
        .unwrap();

    assert_eq!(*seen.lock(), ["Walk", "Swim"]);
}
