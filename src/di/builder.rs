use crate::di::Container;
use crate::di::Injectable;
use crate::di::container::{Provider, Registration, erase, erase_factory};
use crate::error::{ContainerError, Result};
use crate::logging::LoggingBuilder;
use crate::module::Module;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// A trait binding waiting for its implementation to be checked at build time.
struct PendingBinding {
    trait_id: TypeId,
    trait_name: &'static str,
    impl_id: TypeId,
    impl_name: &'static str,
}

/// Mutable registration set used to configure services before building the final
/// immutable [`Container`].
///
/// # Example
/// ```
/// use bootwire::ContainerBuilder;
/// use std::sync::Arc;
///
/// trait Database: Send + Sync {}
/// struct PostgresDatabase;
/// impl Database for PostgresDatabase {}
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .register(PostgresDatabase)
///     .bind::<dyn Database, PostgresDatabase, _>(|db| db as Arc<dyn Database>);
/// let container = builder.build().unwrap();
/// assert!(container.resolve::<dyn Database>().is_ok());
/// ```
pub struct ContainerBuilder {
    registrations: HashMap<TypeId, Vec<Registration>>,
    bindings: Vec<PendingBinding>,
}

impl ContainerBuilder {
    /// Create an empty registration set
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            bindings: Vec::new(),
        }
    }

    fn push<T: ?Sized + 'static>(&mut self, provider: Provider) -> &mut Self {
        self.registrations
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Registration::new(std::any::type_name::<T>(), provider));
        self
    }

    /// Register a service instance as a singleton
    pub fn register<T: Send + Sync + 'static>(&mut self, instance: T) -> &mut Self {
        self.register_arc(Arc::new(instance))
    }

    /// Register an already shared instance, typically an `Arc<dyn Trait>`, as a singleton
    pub fn register_arc<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.push::<T>(Provider::Instance(erase(instance)))
    }

    /// Register a factory that is run on first resolution; its result is shared afterwards
    pub fn register_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(Provider::Singleton(erase_factory(factory)))
    }

    /// Register a factory that is run on every resolution
    pub fn register_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(Provider::Transient(erase_factory(factory)))
    }

    /// Register an [`Injectable`] type as a singleton constructed from the container
    pub fn register_injectable<T: Injectable>(&mut self) -> &mut Self {
        self.register_singleton::<T, _>(|container| T::inject(container).map(Arc::new))
    }

    /// Bind a trait to a concrete implementation
    ///
    /// This enables resolving `Arc<dyn Trait>` to the registered implementation, sharing
    /// the implementation's instance. The implementation may be registered before or after
    /// the binding, but must be present when [`build`](Self::build) is called.
    pub fn bind<Trait, Impl, F>(&mut self, caster: F) -> &mut Self
    where
        Trait: ?Sized + Send + Sync + 'static,
        Impl: Send + Sync + 'static,
        F: Fn(Arc<Impl>) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.bindings.push(PendingBinding {
            trait_id: TypeId::of::<Trait>(),
            trait_name: std::any::type_name::<Trait>(),
            impl_id: TypeId::of::<Impl>(),
            impl_name: std::any::type_name::<Impl>(),
        });
        self.register_transient::<Trait, _>(move |container| {
            container.resolve::<Impl>().map(|instance| caster(instance))
        })
    }

    /// Remove every registration of `T`, returning how many were removed
    pub fn remove<T: ?Sized + 'static>(&mut self) -> usize {
        let type_id = TypeId::of::<T>();
        self.bindings.retain(|binding| binding.trait_id != type_id);
        self.registrations
            .remove(&type_id)
            .map_or(0, |registrations| registrations.len())
    }

    /// Let a [`Module`] register its providers
    pub fn add_module<M: Module>(&mut self) -> Result<&mut Self> {
        M::register(self)?;
        Ok(self)
    }

    /// Register logging infrastructure
    ///
    /// `configure` receives the logging builder before the
    /// [`LoggerFactory`](crate::logging::LoggerFactory) is built and registered.
    ///
    /// # Errors
    /// Returns [`ContainerError::Registration`] when the configured filter directives are invalid.
    pub fn add_logging<F>(&mut self, configure: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut LoggingBuilder),
    {
        let mut logging = LoggingBuilder::new();
        configure(&mut logging);
        let factory = logging.build()?;
        Ok(self.register(factory))
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.registrations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Build the container
    ///
    /// # Errors
    /// Returns [`ContainerError::Build`] when a trait binding targets an implementation
    /// that was never registered.
    pub fn build(self) -> Result<Container> {
        if let Some(binding) = self
            .bindings
            .iter()
            .find(|binding| !self.registrations.contains_key(&binding.impl_id))
        {
            return Err(ContainerError::build(format!(
                "binding for '{}' targets '{}', which is not registered",
                binding.trait_name, binding.impl_name
            )));
        }

        tracing::debug!("Building container ({} registrations)", self.len());
        Ok(Container::from_registrations(self.registrations))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
