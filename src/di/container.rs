use crate::error::{ContainerError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Type-erased service instance.
/// The inner value is always an `Arc<T>` for the capability `T` it was registered under,
/// which lets `T` be unsized (`dyn Trait`).
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

/// Construction slot of one singleton registration.
type SingletonSlot = Arc<Mutex<Option<Instance>>>;

/// Type-erased factory producing an [`Instance`].
pub(crate) type FactoryFn = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

static NEXT_REGISTRATION_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // Factory-backed registrations currently being constructed on this thread.
    static RESOLVING: RefCell<Vec<(usize, &'static str)>> = const { RefCell::new(Vec::new()) };
}

#[derive(Clone)]
pub(crate) enum Provider {
    Instance(Instance),
    Singleton(FactoryFn),
    Transient(FactoryFn),
}

#[derive(Clone)]
pub(crate) struct Registration {
    id: usize,
    type_name: &'static str,
    provider: Provider,
}

impl Registration {
    pub(crate) fn new(type_name: &'static str, provider: Provider) -> Self {
        Self {
            id: NEXT_REGISTRATION_ID.fetch_add(1, Ordering::Relaxed),
            type_name,
            provider,
        }
    }
}

pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

pub(crate) fn erase_factory<T, F>(factory: F) -> FactoryFn
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| factory(container).map(erase::<T>))
}

/// Marks a factory-backed registration as under construction for the current thread.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(registration: &Registration) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().position(|(id, _)| *id == registration.id) {
                let cycle = stack[pos..]
                    .iter()
                    .map(|(_, name)| *name)
                    .chain(std::iter::once(registration.type_name))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(ContainerError::CircularDependency { cycle });
            }
            stack.push((registration.id, registration.type_name));
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Finalized, immutable dependency injection container.
///
/// Produced by [`ContainerBuilder::build`](crate::di::ContainerBuilder::build). Registrations
/// can no longer change; singleton factories are run on first resolution and cached.
///
/// When a capability has several registrations, [`resolve`](Self::resolve) returns the one
/// registered last and [`resolve_all`](Self::resolve_all) returns all of them in
/// registration order.
pub struct Container {
    registrations: HashMap<TypeId, Vec<Registration>>,
    singletons: DashMap<usize, SingletonSlot>,
}

impl Container {
    /// Create an empty container with no registrations.
    pub fn new() -> Self {
        Self::from_registrations(HashMap::new())
    }

    pub(crate) fn from_registrations(registrations: HashMap<TypeId, Vec<Registration>>) -> Self {
        Self {
            registrations,
            singletons: DashMap::new(),
        }
    }

    /// Resolve exactly one instance of `T`.
    ///
    /// # Errors
    /// [`ContainerError::DependencyNotFound`] when nothing is registered for `T`; factory and
    /// cycle errors are returned as raised.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let registration = self
            .registrations
            .get(&TypeId::of::<T>())
            .and_then(|registrations| registrations.last())
            .ok_or_else(ContainerError::not_found::<T>)?;

        let instance = self.instantiate(registration)?;
        downcast::<T>(instance)
    }

    /// Resolve `T` if it is registered.
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        if self.contains::<T>() {
            self.resolve::<T>().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Resolve every registration of `T`, in registration order.
    ///
    /// An unregistered capability yields an empty vector.
    pub fn resolve_all<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>> {
        let Some(registrations) = self.registrations.get(&TypeId::of::<T>()) else {
            return Ok(Vec::new());
        };

        registrations
            .iter()
            .map(|registration| self.instantiate(registration).and_then(downcast::<T>))
            .collect()
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// Total number of registrations across all capabilities.
    pub fn len(&self) -> usize {
        self.registrations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn instantiate(&self, registration: &Registration) -> Result<Instance> {
        match &registration.provider {
            Provider::Instance(instance) => Ok(Arc::clone(instance)),
            Provider::Transient(factory) => {
                let _guard = ResolutionGuard::enter(registration)?;
                factory(self)
            }
            Provider::Singleton(factory) => {
                // The shard lock must be released before the factory runs, since the
                // factory may resolve other singletons.
                let slot = Arc::clone(self.singletons.entry(registration.id).or_default().value());

                // Entered before locking the slot so a same-thread cycle is reported
                // instead of deadlocking.
                let _guard = ResolutionGuard::enter(registration)?;
                let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(instance) = slot.as_ref() {
                    return Ok(Arc::clone(instance));
                }

                // A failed factory leaves the slot empty so the next resolve retries.
                let created = factory(self)?;
                tracing::debug!("Constructed singleton: {}", registration.type_name);
                *slot = Some(Arc::clone(&created));
                Ok(created)
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.len())
            .field("singletons", &self.singletons.len())
            .finish()
    }
}

fn downcast<T: ?Sized + Send + Sync + 'static>(instance: Instance) -> Result<Arc<T>> {
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| ContainerError::DowncastFailed {
            type_name: std::any::type_name::<T>().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::ContainerBuilder;

    #[derive(Debug)]
    struct TestService {
        value: i32,
    }

    trait MyTrait: Send + Sync {
        fn get_value(&self) -> i32;
    }

    struct MyTraitImpl {
        value: i32,
    }

    impl MyTrait for MyTraitImpl {
        fn get_value(&self) -> i32 {
            self.value
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut builder = ContainerBuilder::new();
        builder.register(TestService { value: 42 });
        let container = builder.build().unwrap();

        let service = container.resolve::<TestService>().unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn test_register_and_resolve_trait() {
        let mut builder = ContainerBuilder::new();
        builder
            .register(MyTraitImpl { value: 99 })
            .bind::<dyn MyTrait, MyTraitImpl, _>(|i| i as Arc<dyn MyTrait>);
        let container = builder.build().unwrap();

        let trait_instance = container.resolve::<dyn MyTrait>().unwrap();
        assert_eq!(trait_instance.get_value(), 99);

        let concrete = container.resolve::<MyTraitImpl>().unwrap();
        assert_eq!(concrete.value, 99);
    }

    #[test]
    fn test_missing_dependency() {
        let container = Container::new();
        let err = container.resolve::<TestService>().unwrap_err();
        assert!(matches!(err, ContainerError::DependencyNotFound { .. }));
        assert!(container.try_resolve::<TestService>().unwrap().is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut builder = ContainerBuilder::new();
        builder
            .register_arc::<dyn MyTrait>(Arc::new(MyTraitImpl { value: 1 }))
            .register_arc::<dyn MyTrait>(Arc::new(MyTraitImpl { value: 2 }));
        let container = builder.build().unwrap();

        assert_eq!(container.resolve::<dyn MyTrait>().unwrap().get_value(), 2);

        let all: Vec<i32> = container
            .resolve_all::<dyn MyTrait>()
            .unwrap()
            .iter()
            .map(|s| s.get_value())
            .collect();
        assert_eq!(all, vec![1, 2]);
    }

    #[test]
    fn test_resolve_all_unregistered_is_empty() {
        let container = Container::new();
        assert!(container.resolve_all::<dyn MyTrait>().unwrap().is_empty());
    }

    #[test]
    fn test_singleton_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut builder = ContainerBuilder::new();
        builder.register_singleton::<TestService, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(TestService { value: 7 }))
        });
        let container = builder.build().unwrap();

        let first = container.resolve::<TestService>().unwrap();
        let second = container.resolve::<TestService>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_singleton_factory_runs_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut builder = ContainerBuilder::new();
        builder.register_singleton::<TestService, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(50));
            Ok(Arc::new(TestService { value: 7 }))
        });
        let container = builder.build().unwrap();

        let barrier = std::sync::Barrier::new(8);
        let resolved: Vec<Arc<TestService>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        container.resolve::<TestService>().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(resolved.iter().all(|s| Arc::ptr_eq(s, &resolved[0])));
    }

    #[test]
    fn test_failed_singleton_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut builder = ContainerBuilder::new();
        builder.register_singleton::<TestService, _>(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ContainerError::factory::<TestService>("not ready"));
            }
            Ok(Arc::new(TestService { value: 3 }))
        });
        let container = builder.build().unwrap();

        assert!(container.resolve::<TestService>().is_err());
        assert_eq!(container.resolve::<TestService>().unwrap().value, 3);
        assert_eq!(container.resolve::<TestService>().unwrap().value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_transient_factory_runs_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut builder = ContainerBuilder::new();
        builder.register_transient::<TestService, _>(move |_| {
            let value = counter.fetch_add(1, Ordering::SeqCst) as i32;
            Ok(Arc::new(TestService { value }))
        });
        let container = builder.build().unwrap();

        let first = container.resolve::<TestService>().unwrap();
        let second = container.resolve::<TestService>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_error_is_passed_through() {
        let mut builder = ContainerBuilder::new();
        builder.register_transient::<TestService, _>(|_| {
            Err(ContainerError::factory::<TestService>("connection refused"))
        });
        let container = builder.build().unwrap();

        let err = container.resolve::<TestService>().unwrap_err();
        assert_eq!(
            err,
            ContainerError::factory::<TestService>("connection refused")
        );
    }

    #[test]
    fn test_circular_dependency_detected() {
        #[derive(Debug)]
        struct A;
        #[derive(Debug)]
        struct B;

        let mut builder = ContainerBuilder::new();
        builder
            .register_singleton::<A, _>(|c| c.resolve::<B>().map(|_| Arc::new(A)))
            .register_singleton::<B, _>(|c| c.resolve::<A>().map(|_| Arc::new(B)));
        let container = builder.build().unwrap();

        let err = container.resolve::<A>().unwrap_err();
        match err {
            ContainerError::CircularDependency { cycle } => {
                assert!(cycle.contains("A"));
                assert!(cycle.contains("B"));
            }
            other => panic!("expected circular dependency, got {other:?}"),
        }

        // The failed attempt must not leave stale entries on the resolution stack.
        let err = container.resolve::<B>().unwrap_err();
        assert!(matches!(err, ContainerError::CircularDependency { .. }));
    }
}
