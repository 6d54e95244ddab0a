//! Host bootstrap and resolution
//!
//! [`Host`] owns the published resolver. [`Host::initialize`] builds it in a fixed order:
//!
//! ```text
//! 1. Fresh ContainerBuilder
//! 2. Platform (dyn Platform), ConfigService, default StartupModule
//! 3. Logging                        ← Startup::configure_logging
//! 4. Services                       ← Startup::configure_services
//! 5. Finalize                       ← Startup::create_container
//! 6. Publish the container
//! 7. StartupModule::start
//! ```
//!
//! Any failure before step 6 leaves the host exactly as it was. The resolution methods
//! fail with [`ResolveError::Uninitialized`] until a container has been published.
//!
//! The process-wide host lives in [`global`]; create a [`Host`] directly to pass it
//! around explicitly from the composition root.

pub mod builder;
mod error;
pub mod global;
mod lazy;
mod startup;

pub use builder::HostBuilder;
pub use error::{InitError, ResolveError};
pub use lazy::Lazy;
pub use startup::{FnStartup, Startup};

use crate::config::{ConfigService, HostOptions, ReinitPolicy};
use crate::di::{Container, ContainerBuilder};
use crate::lifecycle::{StartupModule, register_default_startup};
use crate::logging::LoggerFactory;
use crate::platform::Platform;
use std::sync::{Arc, PoisonError, RwLock};

/// Holder of the finalized container and the entry point for resolving from it.
pub struct Host {
    options: HostOptions,
    config: ConfigService,
    state: RwLock<Option<Arc<Container>>>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// An uninitialized host with default options and empty configuration
    pub fn new() -> Self {
        Self::with_options(HostOptions::default())
    }

    pub fn with_options(options: HostOptions) -> Self {
        Self::with_config(ConfigService::new(), options)
    }

    pub fn with_config(config: ConfigService, options: HostOptions) -> Self {
        Self {
            options,
            config,
            state: RwLock::new(None),
        }
    }

    /// An uninitialized host configured from `BOOTWIRE_*` environment variables
    pub fn from_env() -> Self {
        let config = ConfigService::from_env();
        let options = HostOptions::from_config(&config);
        Self::with_config(config, options)
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    /// Build the container, publish it and start the startup module
    ///
    /// # Errors
    /// - [`InitError::Container`]: a registration, hook, build or startup module
    ///   resolution failure, exactly as the container or hook reported it. Nothing is
    ///   published.
    /// - [`InitError::AlreadyInitialized`]: the host is initialized and its policy is
    ///   [`ReinitPolicy::Reject`].
    /// - [`InitError::Start`]: the startup module failed. The container stays published.
    pub fn initialize(
        &self,
        platform: Arc<dyn Platform>,
        startup: Option<&dyn Startup>,
    ) -> Result<(), InitError> {
        if self.options.reinit == ReinitPolicy::Reject && self.is_initialized() {
            return Err(InitError::AlreadyInitialized);
        }

        tracing::info!("Initializing host for platform {}", platform.name());

        let container = self.build_container(&platform, startup).map_err(|e| {
            tracing::error!("Host initialization failed: {}", e);
            e
        })?;

        let module = container.resolve::<dyn StartupModule>().map_err(|e| {
            tracing::error!("Startup module could not be resolved: {}", e);
            e
        })?;

        self.publish(Arc::clone(&container))?;

        if let Ok(Some(factory)) = container.try_resolve::<LoggerFactory>() {
            factory.try_install_global();
        }

        tracing::debug!("Starting startup module");
        module.start().map_err(|e| {
            tracing::error!("Startup module failed: {}", e);
            e
        })?;

        tracing::info!("Host initialized");
        Ok(())
    }

    fn build_container(
        &self,
        platform: &Arc<dyn Platform>,
        startup: Option<&dyn Startup>,
    ) -> Result<Arc<Container>, InitError> {
        let mut services = ContainerBuilder::new();

        tracing::debug!("Registering platform and host services");
        services
            .register_arc::<dyn Platform>(Arc::clone(platform))
            .register(self.config.clone());
        register_default_startup(&mut services);

        tracing::debug!("Configuring logging");
        let log_filter = self.options.log_filter.clone();
        services.add_logging(|logging| {
            if let Some(filter) = log_filter {
                logging.add_directive(filter);
            }
            if let Some(startup) = startup {
                startup.configure_logging(logging, &**platform);
            }
        })?;

        let container = match startup {
            Some(startup) => {
                tracing::debug!("Configuring services");
                startup.configure_services(&mut services, &**platform)?;
                tracing::debug!("Creating container");
                startup.create_container(services)?
            }
            None => services.build()?,
        };

        Ok(Arc::new(container))
    }

    fn publish(&self, container: Arc<Container>) -> Result<(), InitError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.is_some() {
            match self.options.reinit {
                ReinitPolicy::Reject => return Err(InitError::AlreadyInitialized),
                ReinitPolicy::Replace => tracing::warn!("Replacing the published resolver"),
            }
        }
        *state = Some(container);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The published container
    ///
    /// # Errors
    /// [`ResolveError::Uninitialized`] before a successful `initialize`.
    pub fn current(&self) -> Result<Arc<Container>, ResolveError> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
            .ok_or(ResolveError::Uninitialized)
    }

    /// Resolve exactly one `T`
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveError> {
        Ok(self.current()?.resolve::<T>()?)
    }

    /// A handle that resolves `T` on first use
    pub fn lazy_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Lazy<'_, T> {
        Lazy::new(self)
    }

    /// Resolve every `T`, in registration order; empty when none is registered
    pub fn resolve_all<T: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Vec<Arc<T>>, ResolveError> {
        Ok(self.current()?.resolve_all::<T>()?)
    }

    pub fn logger_factory(&self) -> Result<Arc<LoggerFactory>, ResolveError> {
        self.resolve::<LoggerFactory>()
    }
}
