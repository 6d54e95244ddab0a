//! Lifecycle-specific error types

use thiserror::Error;

/// Errors that can occur while starting the application
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The startup module itself failed
    #[error("Startup failed: {0}")]
    StartFailed(String),

    /// A startup task failed
    #[error("Startup task failed for {task}: {message}")]
    TaskFailed {
        /// Name of the task that failed
        task: String,
        /// Error message
        message: String,
    },
}

impl LifecycleError {
    /// Create a startup failure error
    pub fn start_failed(msg: impl Into<String>) -> Self {
        Self::StartFailed(msg.into())
    }

    /// Create a task failure error
    pub fn task_failed(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            task: task.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
