//! The process-wide host
//!
//! Configured from `BOOTWIRE_*` environment variables on first use, unless
//! [`HostBuilder::init_global`](super::HostBuilder::init_global) seeded it with explicit
//! options first. These functions are re-exported at the crate root.

use super::{Host, InitError, Lazy, ResolveError, Startup};
use crate::di::Container;
use crate::logging::LoggerFactory;
use crate::platform::Platform;
use std::sync::{Arc, OnceLock};

static HOST: OnceLock<Host> = OnceLock::new();

/// The process-wide host
pub fn host() -> &'static Host {
    HOST.get_or_init(Host::from_env)
}

/// Install `host` as the process-wide host
///
/// Fails with [`InitError::GlobalOptionsFixed`] once the process-wide host exists, since
/// its options and configuration can no longer change.
pub(crate) fn seed(host: Host) -> Result<&'static Host, InitError> {
    HOST.set(host).map_err(|_| InitError::GlobalOptionsFixed)?;
    Ok(self::host())
}

/// Initialize the process-wide host, see [`Host::initialize`]
pub fn initialize(
    platform: Arc<dyn Platform>,
    startup: Option<&dyn Startup>,
) -> Result<(), InitError> {
    host().initialize(platform, startup)
}

pub fn is_initialized() -> bool {
    host().is_initialized()
}

pub fn current() -> Result<Arc<Container>, ResolveError> {
    host().current()
}

pub fn resolve<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>, ResolveError> {
    host().resolve::<T>()
}

pub fn lazy_resolve<T: ?Sized + Send + Sync + 'static>() -> Lazy<'static, T> {
    host().lazy_resolve::<T>()
}

pub fn resolve_all<T: ?Sized + Send + Sync + 'static>() -> Result<Vec<Arc<T>>, ResolveError> {
    host().resolve_all::<T>()
}

pub fn logger_factory() -> Result<Arc<LoggerFactory>, ResolveError> {
    host().logger_factory()
}
