//! Type-erased plugin descriptors.

use super::{FeaturePlugin, PluginId, PluginInstance};
use crate::capability::{DataPlugin, ViewPlugin};
use crate::config::Configuration;
use crate::error::PluginError;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use std::sync::Arc;

/// Builds live [`PluginInstance`]s for one plugin type.
///
/// Factories are created by [`PluginDescriptor::of`] and keep the concrete
/// type knowledge needed to construct the plugin and expose its capabilities.
pub trait PluginFactory: Send + Sync {
    /// Constructs a new instance from the current configuration.
    ///
    /// # Errors
    ///
    /// Propagates the plugin's [`FeaturePlugin::from_config`] error.
    fn create(&self, config: &Configuration) -> Result<PluginInstance, PluginError>;

    /// Returns `true` if instances expose [`DataPlugin`].
    fn is_data(&self) -> bool;

    /// Returns `true` if instances expose [`ViewPlugin`].
    fn is_view(&self) -> bool;
}

/// Typed factory created by [`DescriptorBuilder`].
struct TypedFactory<P> {
    data: Option<fn(Arc<P>) -> Arc<dyn DataPlugin>>,
    view: Option<fn(Arc<P>) -> Arc<dyn ViewPlugin>>,
    _marker: PhantomData<fn() -> P>,
}

impl<P: FeaturePlugin> PluginFactory for TypedFactory<P> {
    fn create(&self, config: &Configuration) -> Result<PluginInstance, PluginError> {
        let plugin = Arc::new(P::from_config(config)?);
        let data = self.data.map(|upcast| upcast(Arc::clone(&plugin)));
        let view = self.view.map(|upcast| upcast(Arc::clone(&plugin)));
        Ok(PluginInstance::new(PluginId::of::<P>(), plugin, data, view))
    }

    fn is_data(&self) -> bool {
        self.data.is_some()
    }

    fn is_view(&self) -> bool {
        self.view.is_some()
    }
}

fn upcast_data<P: DataPlugin>(plugin: Arc<P>) -> Arc<dyn DataPlugin> {
    plugin
}

fn upcast_view<P: ViewPlugin>(plugin: Arc<P>) -> Arc<dyn ViewPlugin> {
    plugin
}

/// Module path of a type, derived from its type name.
fn module_of(type_name: &'static str) -> &'static str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rfind("::").map_or(base, |end| &base[..end])
}

// ─────────────────────────────────────────────────────────────────────────────
// DescriptorBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Typed builder returned by [`PluginDescriptor::of`].
///
/// Declares which extended capabilities the plugin exposes. The compiler
/// checks each declaration against the plugin's trait implementations.
pub struct DescriptorBuilder<P> {
    origin: &'static str,
    data: Option<fn(Arc<P>) -> Arc<dyn DataPlugin>>,
    view: Option<fn(Arc<P>) -> Arc<dyn ViewPlugin>>,
}

impl<P: FeaturePlugin> DescriptorBuilder<P> {
    /// Declares the [`DataPlugin`] capability.
    #[must_use]
    pub fn with_data(mut self) -> Self
    where
        P: DataPlugin,
    {
        self.data = Some(upcast_data::<P>);
        self
    }

    /// Declares the [`ViewPlugin`] capability.
    #[must_use]
    pub fn with_view(mut self) -> Self
    where
        P: ViewPlugin,
    {
        self.view = Some(upcast_view::<P>);
        self
    }

    /// Overrides the module origin used by discovery filters.
    #[must_use]
    pub fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = origin;
        self
    }

    /// Finishes the descriptor.
    #[must_use]
    pub fn build(self) -> PluginDescriptor {
        PluginDescriptor {
            id: PluginId::of::<P>(),
            origin: self.origin,
            factory: Arc::new(TypedFactory {
                data: self.data,
                view: self.view,
                _marker: PhantomData,
            }),
        }
    }
}

impl<P: FeaturePlugin> From<DescriptorBuilder<P>> for PluginDescriptor {
    fn from(builder: DescriptorBuilder<P>) -> Self {
        builder.build()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginDescriptor
// ─────────────────────────────────────────────────────────────────────────────

/// A registrable plugin: identity, module origin and factory.
///
/// Equality and hashing use the [`PluginId`] only. Cloning is cheap.
///
/// # Example
///
/// ```ignore
/// let descriptor = PluginDescriptor::of::<StreakPlugin>()
///     .with_data()
///     .with_view()
///     .build();
/// ```
#[derive(Clone)]
pub struct PluginDescriptor {
    id: PluginId,
    origin: &'static str,
    factory: Arc<dyn PluginFactory>,
}

impl PluginDescriptor {
    /// Starts a descriptor for plugin type `P` with only the base capability.
    #[must_use]
    pub fn of<P: FeaturePlugin>() -> DescriptorBuilder<P> {
        DescriptorBuilder {
            origin: module_of(core::any::type_name::<P>()),
            data: None,
            view: None,
        }
    }

    /// Returns the plugin's id.
    #[must_use]
    pub fn id(&self) -> PluginId {
        self.id
    }

    /// Returns the module the plugin was declared or submitted from.
    #[must_use]
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    /// Returns a copy of this descriptor with a different origin.
    #[must_use]
    pub fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = origin;
        self
    }

    /// Returns `true` if instances expose [`DataPlugin`].
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.factory.is_data()
    }

    /// Returns `true` if instances expose [`ViewPlugin`].
    #[must_use]
    pub fn is_view(&self) -> bool {
        self.factory.is_view()
    }

    /// Constructs an instance from `config`.
    ///
    /// # Errors
    ///
    /// Propagates the plugin's construction error.
    pub fn instantiate(&self, config: &Configuration) -> Result<PluginInstance, PluginError> {
        self.factory.create(config)
    }
}

impl PartialEq for PluginDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PluginDescriptor {}

impl Hash for PluginDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id.type_name())
            .field("origin", &self.origin)
            .field("data", &self.is_data())
            .field("view", &self.is_view())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitat_model::ModelDescriptor;

    struct Plain;
    impl FeaturePlugin for Plain {
        fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
            Ok(Self)
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }

    struct Both;
    impl FeaturePlugin for Both {
        fn from_config(_config: &Configuration) -> Result<Self, PluginError> {
            Ok(Self)
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }
    impl DataPlugin for Both {
        fn models(&self) -> Vec<ModelDescriptor> {
            Vec::new()
        }
    }
    impl ViewPlugin for Both {}

    #[test]
    fn module_of_strips_type_and_generics() {
        assert_eq!(module_of("a::b::Plugin"), "a::b");
        assert_eq!(module_of("a::b::Plugin<c::d::E>"), "a::b");
        assert_eq!(module_of("Plugin"), "Plugin");
    }

    #[test]
    fn default_origin_is_declaring_module() {
        let descriptor = PluginDescriptor::of::<Plain>().build();
        assert_eq!(descriptor.origin(), module_path!());
    }

    #[test]
    fn capabilities_follow_builder() {
        let plain = PluginDescriptor::of::<Plain>().build();
        assert!(!plain.is_data());
        assert!(!plain.is_view());

        let both: PluginDescriptor = PluginDescriptor::of::<Both>().with_data().with_view().into();
        assert!(both.is_data());
        assert!(both.is_view());

        let instance = both.instantiate(&Configuration::new()).unwrap();
        assert!(instance.as_data().is_some());
        assert!(instance.as_view().is_some());
        assert!(instance.downcast::<Both>().is_some());
    }

    #[test]
    fn equality_by_id_only() {
        let a = PluginDescriptor::of::<Both>().with_data().build();
        let b = PluginDescriptor::of::<Both>().with_origin("elsewhere").build();
        assert_eq!(a, b);
        assert_ne!(a, PluginDescriptor::of::<Plain>().build());
    }
}
