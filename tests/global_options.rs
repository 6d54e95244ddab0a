//! Runs in its own binary so the process-wide host is still untouched when the test
//! starts.

use bootwire::prelude::*;

struct NamedPlatform(&'static str);

impl Platform for NamedPlatform {
    fn name(&self) -> &str {
        self.0
    }
}

#[test]
fn test_init_global_honors_builder_options() {
    let reject = HostOptions::default().with_reinit(ReinitPolicy::Reject);

    HostBuilder::new()
        .platform(NamedPlatform("P1"))
        .options(reject)
        .init_global()
        .unwrap();
    assert_eq!(bootwire::host().options().reinit, ReinitPolicy::Reject);

    // The seeded policy applies to later calls, whichever entry point they use.
    let err = HostBuilder::new()
        .platform(NamedPlatform("P2"))
        .init_global()
        .unwrap_err();
    assert!(matches!(err, InitError::AlreadyInitialized));
    assert!(matches!(
        bootwire::initialize(Arc::new(NamedPlatform("P3")), None),
        Err(InitError::AlreadyInitialized)
    ));
    assert_eq!(bootwire::resolve::<dyn Platform>().unwrap().name(), "P1");

    // Options cannot be swapped once the host exists.
    let err = HostBuilder::new()
        .platform(NamedPlatform("P4"))
        .options(HostOptions::default())
        .init_global()
        .unwrap_err();
    assert!(matches!(err, InitError::GlobalOptionsFixed));
    assert_eq!(bootwire::host().options().reinit, ReinitPolicy::Reject);
}
