//! Habit categories.
//!
//! A fixed starter set of categories is seeded at construction. Each habit
//! is assigned to at most one category.

use crate::flags::ENABLE_CATEGORIES;
use async_trait::async_trait;
use habitat_model::{Habit, HabitId, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// A named, coloured category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitCategory")]
pub struct HabitCategory {
    /// Category id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Colour as `#RRGGBB`.
    pub color_hex: String,
    /// Icon identifier.
    pub icon: String,
}

impl HabitCategory {
    /// Creates a category with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, color_hex: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color_hex: color_hex.into(),
            icon: icon.into(),
        }
    }
}

/// Links a habit to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Model)]
#[model(name = "HabitCategoryAssignment")]
pub struct HabitCategoryAssignment {
    /// Assigned habit.
    pub habit_id: HabitId,
    /// Target category.
    pub category_id: Uuid,
}

/// Starter categories as `(name, color, icon)`.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 4] = [
    ("Salud", "#10B981", "heart.fill"),
    ("Productividad", "#3B82F6", "chart.line.uptrend.xyaxis"),
    ("Bienestar", "#8B5CF6", "sparkles"),
    ("Aprendizaje", "#F59E0B", "book.fill"),
];

#[derive(Default)]
struct CategoryState {
    categories: Vec<HabitCategory>,
    assignments: HashMap<HabitId, Uuid>,
}

/// Groups habits into categories. Enabled by `enable_categories`.
pub struct CategoryPlugin {
    config: Configuration,
    state: RwLock<CategoryState>,
}

impl CategoryPlugin {
    /// Returns all categories in creation order.
    #[must_use]
    pub fn categories(&self) -> Vec<HabitCategory> {
        self.state.read().categories.clone()
    }

    /// Adds a category and returns its id.
    pub fn add_category(&self, category: HabitCategory) -> Uuid {
        let id = category.id;
        self.state.write().categories.push(category);
        id
    }

    /// Returns the category assigned to `habit_id`.
    #[must_use]
    pub fn category_of(&self, habit_id: HabitId) -> Option<HabitCategory> {
        let state = self.state.read();
        let category_id = state.assignments.get(&habit_id)?;
        state
            .categories
            .iter()
            .find(|category| category.id == *category_id)
            .cloned()
    }

    /// Assigns `habit_id` to `category_id`, or clears the assignment with `None`.
    ///
    /// Returns `false` if the category does not exist.
    pub fn set_assignment(&self, habit_id: HabitId, category_id: Option<Uuid>) -> bool {
        let mut state = self.state.write();
        match category_id {
            Some(id) if state.categories.iter().any(|category| category.id == id) => {
                state.assignments.insert(habit_id, id);
                true
            }
            Some(_) => false,
            None => {
                state.assignments.remove(&habit_id);
                true
            }
        }
    }

    /// Returns every current assignment.
    #[must_use]
    pub fn assignments(&self) -> Vec<HabitCategoryAssignment> {
        self.state
            .read()
            .assignments
            .iter()
            .map(|(habit_id, category_id)| HabitCategoryAssignment {
                habit_id: *habit_id,
                category_id: *category_id,
            })
            .collect()
    }
}

impl FeaturePlugin for CategoryPlugin {
    fn from_config(config: &Configuration) -> Result<Self, PluginError> {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, color, icon)| HabitCategory::new(*name, *color, *icon))
            .collect();
        Ok(Self {
            config: config.clone(),
            state: RwLock::new(CategoryState {
                categories,
                assignments: HashMap::new(),
            }),
        })
    }

    fn is_enabled(&self) -> bool {
        self.config.flag(ENABLE_CATEGORIES)
    }

    fn name(&self) -> &str {
        "categories"
    }
}

#[async_trait]
impl DataPlugin for CategoryPlugin {
    fn models(&self) -> Vec<ModelDescriptor> {
        vec![
            HabitCategory::descriptor(),
            HabitCategoryAssignment::descriptor(),
        ]
    }

    async fn will_delete_habit(&self, habit: &Habit) -> Result<(), HookError> {
        self.state.write().assignments.remove(&habit.id);
        Ok(())
    }
}

impl ViewPlugin for CategoryPlugin {
    fn row_view(&self, habit: &Habit) -> Option<PluginView> {
        self.category_of(habit.id).map(|category| {
            PluginView::row(
                self.name(),
                json!({ "name": category.name, "color": category.color_hex, "icon": category.icon }),
            )
        })
    }

    fn detail_view(&self, habit: &Habit) -> Option<PluginView> {
        let selected = self.category_of(habit.id).map(|category| category.id);
        Some(PluginView::detail(
            self.name(),
            json!({ "selected": selected, "options": self.categories() }),
        ))
    }

    fn settings_view(&self) -> Option<PluginView> {
        Some(PluginView::settings(
            self.name(),
            json!({ "flag": ENABLE_CATEGORIES, "enabled": self.is_enabled() }),
        ))
    }
}

submit_plugin!(PluginDescriptor::of::<CategoryPlugin>().with_data().with_view());
