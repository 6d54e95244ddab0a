//! # Bootwire
//!
//! Application bootstrap with built-in dependency injection for Rust.
//!
//! Bootwire builds a container once per process, seeds it with the platform and
//! logging, lets a startup hook register everything else, publishes the finalized
//! container and starts the application's startup module. Afterwards any code can
//! resolve services without carrying the container around.
//!
//! ## Features
//!
//! - **One-shot bootstrap**: a fixed, documented initialization order
//! - **Predictable failures**: resolving before initialization is an error, never a default
//! - **Startup hooks**: customize logging, services and container construction
//! - **Trait Object Support**: resolve `Arc<dyn Trait>` registrations and bindings
//! - **Lazy and multi resolution**: `lazy_resolve` and `resolve_all`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bootwire::prelude::*;
//!
//! // 1. Describe the platform
//! struct Server;
//!
//! impl Platform for Server {
//!     fn name(&self) -> &str {
//!         "server"
//!     }
//! }
//!
//! // 2. Define your services
//! pub struct UserService;
//!
//! // 3. Register them from a startup hook
//! struct AppStartup;
//!
//! impl Startup for AppStartup {
//!     fn configure_logging(&self, logging: &mut LoggingBuilder, _platform: &dyn Platform) {
//!         logging.add_console().add_directive("bootwire=debug");
//!     }
//!
//!     fn configure_services(
//!         &self,
//!         services: &mut ContainerBuilder,
//!         _platform: &dyn Platform,
//!     ) -> bootwire::Result<()> {
//!         services.register(UserService);
//!         Ok(())
//!     }
//! }
//!
//! // 4. Bootstrap your application
//! fn main() {
//!     bootwire::initialize(Arc::new(Server), Some(&AppStartup))
//!         .expect("Failed to initialize application");
//!
//!     let _users = bootwire::resolve::<UserService>().unwrap();
//! }
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod module;
pub mod platform;

// Re-export core types
pub use config::{ConfigService, HostOptions, ReinitPolicy};
pub use di::{Container, ContainerBuilder, Injectable};
pub use error::{ContainerError, Result};
pub use host::global::{
    current, host, initialize, is_initialized, lazy_resolve, logger_factory, resolve,
    resolve_all,
};
pub use host::{FnStartup, Host, HostBuilder, InitError, Lazy, ResolveError, Startup};
pub use lifecycle::{LifecycleError, StartupModule, StartupTask};
pub use logging::{LoggerFactory, LoggingBuilder};
pub use module::Module;
pub use platform::Platform;

/// Prelude module for convenient imports
///
/// ```
/// use bootwire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, HostOptions, ReinitPolicy};
    pub use crate::di::{Container, ContainerBuilder, Injectable};
    pub use crate::error::{ContainerError, Result};
    pub use crate::host::{FnStartup, Host, HostBuilder, InitError, Lazy, ResolveError, Startup};
    pub use crate::lifecycle::{
        LifecycleError, StartupModule, StartupTask, TaskStartupModule,
    };
    pub use crate::logging::{Logger, LoggerFactory, LoggingBuilder};
    pub use crate::module::Module;
    pub use crate::platform::Platform;
    pub use std::sync::Arc;
}
