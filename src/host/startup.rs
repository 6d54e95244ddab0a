use crate::di::{Container, ContainerBuilder};
use crate::error::Result;
use crate::logging::LoggingBuilder;
use crate::platform::Platform;

/// Customization points invoked by [`Host::initialize`](crate::host::Host::initialize).
///
/// Called in a fixed order: [`configure_logging`](Self::configure_logging),
/// [`configure_services`](Self::configure_services), then
/// [`create_container`](Self::create_container). Every method has a default, so an
/// implementation only overrides what it needs.
pub trait Startup {
    /// Adjust sinks, filters and levels
    fn configure_logging(&self, _logging: &mut LoggingBuilder, _platform: &dyn Platform) {}

    /// Add, replace or remove registrations
    ///
    /// An error aborts bootstrap and is returned unchanged by `initialize`.
    fn configure_services(
        &self,
        _services: &mut ContainerBuilder,
        _platform: &dyn Platform,
    ) -> Result<()> {
        Ok(())
    }

    /// Finalize the registration set
    ///
    /// Defaults to [`ContainerBuilder::build`].
    fn create_container(&self, services: ContainerBuilder) -> Result<Container> {
        services.build()
    }
}

type LoggingFn = Box<dyn Fn(&mut LoggingBuilder, &dyn Platform) + Send + Sync>;
type ServicesFn = Box<dyn Fn(&mut ContainerBuilder, &dyn Platform) -> Result<()> + Send + Sync>;
type ContainerFn = Box<dyn Fn(ContainerBuilder) -> Result<Container> + Send + Sync>;

/// A [`Startup`] assembled from closures.
///
/// ```
/// use bootwire::FnStartup;
///
/// struct Clock;
///
/// let startup = FnStartup::new()
///     .on_logging(|logging, _| {
///         logging.add_directive("bootwire=debug");
///     })
///     .on_services(|services, _| {
///         services.register(Clock);
///         Ok(())
///     });
/// ```
#[derive(Default)]
pub struct FnStartup {
    logging: Option<LoggingFn>,
    services: Option<ServicesFn>,
    container: Option<ContainerFn>,
}

impl FnStartup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_logging<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut LoggingBuilder, &dyn Platform) + Send + Sync + 'static,
    {
        self.logging = Some(Box::new(f));
        self
    }

    pub fn on_services<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ContainerBuilder, &dyn Platform) -> Result<()> + Send + Sync + 'static,
    {
        self.services = Some(Box::new(f));
        self
    }

    pub fn on_create_container<F>(mut self, f: F) -> Self
    where
        F: Fn(ContainerBuilder) -> Result<Container> + Send + Sync + 'static,
    {
        self.container = Some(Box::new(f));
        self
    }
}

impl Startup for FnStartup {
    fn configure_logging(&self, logging: &mut LoggingBuilder, platform: &dyn Platform) {
        if let Some(f) = &self.logging {
            f(logging, platform);
        }
    }

    fn configure_services(
        &self,
        services: &mut ContainerBuilder,
        platform: &dyn Platform,
    ) -> Result<()> {
        match &self.services {
            Some(f) => f(services, platform),
            None => Ok(()),
        }
    }

    fn create_container(&self, services: ContainerBuilder) -> Result<Container> {
        match &self.container {
            Some(f) => f(services),
            None => services.build(),
        }
    }
}
