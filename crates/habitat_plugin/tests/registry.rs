//! Integration tests for `PluginRegistry` registration, instantiation,
//! schema composition and view collection.

mod common;

use common::{Counting, ModelX, ModelY, ModelZ, Refusing, flag};
use habitat_model::{Habit, HabitFrequency, Model, ModelDescriptor};
use habitat_plugin::prelude::*;
use proptest::prelude::*;

// A: [X], B: [Y, X], C: [Z]
struct PluginA(Configuration);
struct PluginB(Configuration);
struct PluginC(Configuration);

macro_rules! flagged_plugin {
    ($plugin:ident, $flag:literal, [$($model:ident),*]) => {
        impl FeaturePlugin for $plugin {
            fn from_config(config: &Configuration) -> Result<Self, PluginError> {
                Ok(Self(config.clone()))
            }
            fn is_enabled(&self) -> bool {
                self.0.flag($flag)
            }
        }

        impl DataPlugin for $plugin {
            fn models(&self) -> Vec<ModelDescriptor> {
                vec![$($model::descriptor()),*]
            }
        }
    };
}

flagged_plugin!(PluginA, "a", [ModelX]);
flagged_plugin!(PluginB, "b", [ModelY, ModelX]);
flagged_plugin!(PluginC, "c", [ModelZ]);

fn abc_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    registry.register_set(
        PluginSet::new()
            .add(PluginDescriptor::of::<PluginA>().with_data())
            .add(PluginDescriptor::of::<PluginB>().with_data())
            .add(PluginDescriptor::of::<PluginC>().with_data()),
    );
    registry
}

#[test]
fn schema_is_union_of_enabled_models() {
    let config = Configuration::new()
        .with_flag("a", true)
        .with_flag("b", true)
        .with_flag("c", false);
    let registry = abc_registry();

    let instances = registry.instantiate_all(&config);
    let schema = registry.composed_models(&instances);

    assert_eq!(schema.names(), vec!["Habit", "ModelX", "ModelY"]);
    assert!(!schema.contains::<ModelZ>());
}

#[test]
fn schema_with_no_plugins_is_primary_only() {
    let registry = PluginRegistry::new();
    let instances = registry.instantiate_all(&Configuration::new());

    assert!(instances.is_empty());
    assert_eq!(registry.composed_models(&instances).names(), vec!["Habit"]);
}

#[test]
fn instantiation_follows_registration_order_and_replaces() {
    let config = Configuration::new();
    let registry = abc_registry();

    let first = registry.instantiate_all(&config);
    let ids: Vec<PluginId> = first.iter().map(PluginInstance::id).collect();
    assert_eq!(ids, registry.registered());

    let second = registry.instantiate_all(&config);
    assert_eq!(second.len(), 3);
    assert_eq!(registry.instances().len(), 3);

    // The second batch holds new plugin objects.
    let old = first[0].downcast::<PluginA>().unwrap();
    let new = registry.instance_of::<PluginA>().unwrap();
    assert!(!std::sync::Arc::ptr_eq(&old, &new));
}

#[test]
fn construction_failure_drops_only_that_plugin() {
    let config = Configuration::new().with_flag("a", true);
    let registry = PluginRegistry::new();
    registry.register(PluginDescriptor::of::<PluginA>().with_data());
    registry.register(PluginDescriptor::of::<Refusing>().with_data());
    registry.register(PluginDescriptor::of::<PluginB>().with_data());

    let instances = registry.instantiate_all(&config);

    assert_eq!(registry.len(), 3);
    assert_eq!(instances.len(), 2);
    assert!(registry.instance_of::<Refusing>().is_none());
    assert!(registry.instance_of::<PluginA>().is_some());
    // Refusing's model never reaches the schema.
    assert!(!registry.composed_models(&instances).contains::<ModelZ>());
}

#[test]
fn capabilities_are_presence_checks() {
    let registry = PluginRegistry::new();
    registry.register(PluginDescriptor::of::<PluginA>());
    registry.register(Counting::<0>::descriptor());

    let instances = registry.instantiate_all(&Configuration::new());

    assert!(instances[0].as_data().is_none());
    assert!(instances[0].as_view().is_none());
    assert!(instances[1].as_data().is_some());
    assert!(instances[1].as_view().is_some());
}

#[test]
fn base_only_plugins_never_contribute_models() {
    let config = Configuration::new().with_flag("a", true);
    let registry = PluginRegistry::new();
    registry.register(PluginDescriptor::of::<PluginA>());

    registry.instantiate_all(&config);

    assert!(registry.enabled_data_plugins().is_empty());
    assert_eq!(registry.current_schema().names(), vec!["Habit"]);
}

#[test]
fn views_are_ordered_and_filtered() {
    let config = Configuration::new()
        .with_flag(flag(1), true)
        .with_flag(flag(2), false)
        .with_flag(flag(3), true);
    let registry = PluginRegistry::new();
    registry.register(Counting::<3>::descriptor());
    registry.register(Counting::<2>::descriptor());
    registry.register(Counting::<1>::descriptor());
    registry.instantiate_all(&config);

    let habit = Habit::new("Stretch", HabitFrequency::Daily);

    let rows: Vec<String> = registry
        .views_for_row(&habit)
        .into_iter()
        .map(|view| view.plugin)
        .collect();
    assert_eq!(rows, vec!["counting_3", "counting_1"]);

    // Counting has no detail view.
    assert!(registry.views_for_detail(&habit).is_empty());

    // Settings are offered for disabled plugins too.
    let settings = registry.settings_views();
    assert_eq!(settings.len(), 3);
    assert_eq!(settings[1].plugin, "counting_2");
    assert_eq!(settings[1].content["enabled"], false);
    assert!(settings.iter().all(|view| view.slot == ViewSlot::Settings));

    // Stable across calls.
    let again: Vec<String> = registry
        .views_for_row(&habit)
        .into_iter()
        .map(|view| view.plugin)
        .collect();
    assert_eq!(again, rows);
}

#[test]
fn clear_then_reregister() {
    let registry = abc_registry();
    registry.instantiate_all(&Configuration::new());
    registry.clear_all();

    assert!(registry.is_empty());
    assert!(registry.register(PluginDescriptor::of::<PluginA>().with_data()));
    assert_eq!(registry.registered(), vec![PluginId::of::<PluginA>()]);
}

#[test]
fn register_all_counts_new_descriptors() {
    let registry = PluginRegistry::new();
    let added = registry.register_all([
        PluginDescriptor::of::<PluginA>().build(),
        PluginDescriptor::of::<PluginA>().with_data().build(),
        PluginDescriptor::of::<PluginB>().build(),
    ]);

    assert_eq!(added, 2);
    // First registration wins.
    assert!(registry.instantiate_all(&Configuration::new())[0].as_data().is_none());
}

proptest! {
    #[test]
    fn schema_tracks_enabled_flags(a in any::<bool>(), b in any::<bool>(), c in any::<bool>()) {
        let config = Configuration::new()
            .with_flag("a", a)
            .with_flag("b", b)
            .with_flag("c", c);
        let registry = abc_registry();
        let schema = registry.composed_models(&registry.instantiate_all(&config));

        prop_assert_eq!(schema.primary_model().map(ModelDescriptor::name), Some("Habit"));
        prop_assert_eq!(schema.contains::<ModelX>(), a || b);
        prop_assert_eq!(schema.contains::<ModelY>(), b);
        prop_assert_eq!(schema.contains::<ModelZ>(), c);
        prop_assert_eq!(schema.len(), 1 + usize::from(a || b) + usize::from(b) + usize::from(c));
    }
}
