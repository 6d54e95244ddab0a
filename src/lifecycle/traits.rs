//! Startup contracts
//!
//! The host resolves exactly one [`StartupModule`] after the container is finalized and
//! calls [`StartupModule::start`] once. The default module runs every registered
//! [`StartupTask`].

use super::LifecycleError;

/// The entry-point component started as the last step of bootstrap
///
/// Register a custom implementation as `dyn StartupModule` to replace the default
/// task runner.
///
/// # Example
///
/// ```rust
/// use bootwire::lifecycle::{LifecycleError, StartupModule};
///
/// struct Banner;
///
/// impl StartupModule for Banner {
///     fn start(&self) -> Result<(), LifecycleError> {
///         tracing::info!("application started");
///         Ok(())
///     }
/// }
/// ```
pub trait StartupModule: Send + Sync {
    /// Called once, synchronously, after the resolver has been published
    fn start(&self) -> Result<(), LifecycleError>;
}

/// Work run by the default startup module, in registration order
///
/// Use this hook to:
/// - Warm up caches
/// - Schedule background jobs
/// - Validate configuration that needs resolved services
///
/// # Example
///
/// ```rust
/// use bootwire::lifecycle::{LifecycleError, StartupTask};
///
/// struct CacheWarmer;
///
/// impl StartupTask for CacheWarmer {
///     fn start(&self) -> Result<(), LifecycleError> {
///         // Pre-load frequently accessed data
///         Ok(())
///     }
/// }
/// ```
pub trait StartupTask: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Run the task
    ///
    /// An error stops the remaining tasks and fails bootstrap.
    fn start(&self) -> Result<(), LifecycleError>;
}
