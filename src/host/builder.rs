use super::{Host, InitError, Startup, global};
use crate::config::{ConfigService, HostOptions};
use crate::platform::Platform;
use std::sync::Arc;

/// Builder for bootstrapping a [`Host`]
///
/// # Example
///
/// ```rust
/// use bootwire::{FnStartup, HostBuilder, Platform};
///
/// struct Desktop;
///
/// impl Platform for Desktop {
///     fn name(&self) -> &str {
///         "desktop"
///     }
/// }
///
/// struct Clock;
///
/// let host = HostBuilder::new()
///     .platform(Desktop)
///     .startup(FnStartup::new().on_services(|services, _| {
///         services.register(Clock);
///         Ok(())
///     }))
///     .build()
///     .expect("Failed to initialize host");
///
/// assert!(host.resolve::<Clock>().is_ok());
/// ```
#[derive(Default)]
pub struct HostBuilder {
    platform: Option<Arc<dyn Platform>>,
    startup: Option<Box<dyn Startup>>,
    options: Option<HostOptions>,
    config: Option<ConfigService>,
}

impl HostBuilder {
    /// Create a new host builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the platform
    pub fn platform<P: Platform>(self, platform: P) -> Self {
        self.shared_platform(Arc::new(platform))
    }

    /// Set an already shared platform
    pub fn shared_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the startup hook
    pub fn startup<S: Startup + 'static>(mut self, startup: S) -> Self {
        self.startup = Some(Box::new(startup));
        self
    }

    /// Set host options; defaults to options read from the configuration
    pub fn options(mut self, options: HostOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the configuration; defaults to `BOOTWIRE_*` environment variables
    pub fn config(mut self, config: ConfigService) -> Self {
        self.config = Some(config);
        self
    }

    /// Build and initialize a new host
    ///
    /// # Errors
    ///
    /// Returns [`InitError::MissingPlatform`] without a platform, otherwise whatever
    /// [`Host::initialize`] returns.
    pub fn build(self) -> Result<Host, InitError> {
        let platform = self.platform.ok_or(InitError::MissingPlatform)?;
        let config = self.config.unwrap_or_else(ConfigService::from_env);
        let options = self
            .options
            .unwrap_or_else(|| HostOptions::from_config(&config));

        let host = Host::with_config(config, options);
        host.initialize(platform, self.startup.as_deref())?;
        Ok(host)
    }

    /// Initialize the process-wide host
    ///
    /// Without [`options`](Self::options) or [`config`](Self::config) this initializes the
    /// existing process-wide host. With either of them, the process-wide host is created
    /// from those settings, which is only possible before anything else has touched it.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::GlobalOptionsFixed`] when options or configuration were set
    /// but the process-wide host already exists, otherwise what [`build`](Self::build)
    /// returns.
    pub fn init_global(self) -> Result<(), InitError> {
        let platform = self.platform.ok_or(InitError::MissingPlatform)?;

        let host = if self.options.is_none() && self.config.is_none() {
            global::host()
        } else {
            let config = self.config.unwrap_or_else(ConfigService::from_env);
            let options = self
                .options
                .unwrap_or_else(|| HostOptions::from_config(&config));
            global::seed(Host::with_config(config, options))?
        };

        host.initialize(platform, self.startup.as_deref())
    }
}
