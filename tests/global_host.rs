//! The process-wide host is shared by every test in a binary, so this file holds a
//! single test that walks it through its whole life in order.

use bootwire::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct NamedPlatform(&'static str);

impl Platform for NamedPlatform {
    fn name(&self) -> &str {
        self.0
    }
}

trait CustomThing: Send + Sync {}

struct Counter(AtomicUsize);

#[test]
fn test_global_host_lifecycle() {
    // Before initialize: every access fails the same way.
    assert!(!bootwire::is_initialized());
    assert_eq!(bootwire::current().unwrap_err(), ResolveError::Uninitialized);
    assert!(matches!(
        bootwire::resolve::<dyn Platform>(),
        Err(ResolveError::Uninitialized)
    ));
    assert!(matches!(
        bootwire::resolve_all::<dyn CustomThing>(),
        Err(ResolveError::Uninitialized)
    ));
    assert!(bootwire::logger_factory().is_err());

    let early = bootwire::lazy_resolve::<dyn Platform>();
    assert!(!early.is_forced());

    // A failing hook does not publish anything.
    let failing = FnStartup::new()
        .on_services(|_, _| Err(ContainerError::registration("missing connection string")));
    let err = bootwire::initialize(Arc::new(NamedPlatform("P0")), Some(&failing)).unwrap_err();
    assert!(matches!(err, InitError::Container(ContainerError::Registration { .. })));
    assert!(!bootwire::is_initialized());
    assert!(matches!(
        bootwire::resolve::<dyn Platform>(),
        Err(ResolveError::Uninitialized)
    ));

    // Bootstrap without a hook.
    let platform: Arc<dyn Platform> = Arc::new(NamedPlatform("P1"));
    bootwire::initialize(Arc::clone(&platform), None).unwrap();
    assert!(bootwire::is_initialized());

    let resolved = bootwire::resolve::<dyn Platform>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &platform));
    assert_eq!(resolved.name(), "P1");
    assert!(bootwire::resolve_all::<dyn CustomThing>().unwrap().is_empty());

    // The handle created before initialize was never forced, so it sees the new state.
    assert_eq!(early.get().unwrap().name(), "P1");

    // Re-initializing replaces the resolver by default.
    let before = bootwire::current().unwrap();
    let startup = FnStartup::new().on_services(|services, _| {
        services.register(Counter(AtomicUsize::new(0)));
        Ok(())
    });
    HostBuilder::new()
        .platform(NamedPlatform("P2"))
        .startup(startup)
        .init_global()
        .unwrap();

    let after = bootwire::current().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(bootwire::resolve::<dyn Platform>().unwrap().name(), "P2");

    // The host exists by now, so its options can no longer be chosen.
    let err = HostBuilder::new()
        .platform(NamedPlatform("P3"))
        .options(HostOptions::default().with_reinit(ReinitPolicy::Reject))
        .init_global()
        .unwrap_err();
    assert!(matches!(err, InitError::GlobalOptionsFixed));
    assert_eq!(bootwire::resolve::<dyn Platform>().unwrap().name(), "P2");

    let counter = bootwire::lazy_resolve::<Counter>();
    counter.get().unwrap().0.fetch_add(1, Ordering::SeqCst);
    assert_eq!(
        bootwire::resolve::<Counter>().unwrap().0.load(Ordering::SeqCst),
        1
    );
}
