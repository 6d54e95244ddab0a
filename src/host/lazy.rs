use super::{Host, ResolveError};
use std::sync::{Arc, OnceLock};

/// Deferred resolution of `T` from a [`Host`].
///
/// Nothing is resolved until [`get`](Self::get) is first called. The outcome of that first
/// resolution, success or error, is kept for the lifetime of the handle, and concurrent
/// callers wait for the single in-flight resolution instead of starting their own.
pub struct Lazy<'h, T: ?Sized + Send + Sync + 'static> {
    host: &'h Host,
    cell: OnceLock<Result<Arc<T>, ResolveError>>,
}

impl<'h, T: ?Sized + Send + Sync + 'static> Lazy<'h, T> {
    pub(crate) fn new(host: &'h Host) -> Self {
        Self {
            host,
            cell: OnceLock::new(),
        }
    }

    /// Resolve `T` on the first call and return that outcome on every call
    ///
    /// Errors are kept too: a handle first forced before the host is initialized keeps
    /// returning [`ResolveError::Uninitialized`] after initialization. Take a new handle
    /// from [`Host::lazy_resolve`] once the host is up.
    pub fn get(&self) -> Result<Arc<T>, ResolveError> {
        self.cell.get_or_init(|| self.host.resolve::<T>()).clone()
    }

    /// Whether the resolution has already happened
    pub fn is_forced(&self) -> bool {
        self.cell.get().is_some()
    }
}
