use crate::error::ContainerError;
use crate::lifecycle::LifecycleError;
use thiserror::Error;

/// Errors returned by the host's resolution operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Nothing has been published yet
    #[error("Resolver not initialized: call initialize() before resolving services")]
    Uninitialized,

    /// Raised by the container, passed through unchanged
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Errors returned by `initialize`.
#[derive(Debug, Error)]
pub enum InitError {
    /// Raised by the container or a startup hook, passed through unchanged
    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error("Startup module failed: {0}")]
    Start(#[from] LifecycleError),

    #[error("Host is already initialized and its re-initialization policy is 'reject'")]
    AlreadyInitialized,

    /// Options or configuration were given after the process-wide host was created
    #[error("The process-wide host already exists; its options and configuration are fixed")]
    GlobalOptionsFixed,

    #[error("No platform provided")]
    MissingPlatform,
}
