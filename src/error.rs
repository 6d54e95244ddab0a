use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

/// Errors raised by the dependency container while registering, building or resolving.
///
/// Cloneable so that a cached resolution outcome can be handed out more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    #[error("Registration failed: {message}")]
    Registration { message: String },

    #[error("Container build failed: {message}")]
    Build { message: String },

    #[error("Factory for {type_name} failed: {message}")]
    Factory { type_name: String, message: String },
}

impl ContainerError {
    pub fn not_found<T: ?Sized>() -> Self {
        Self::DependencyNotFound {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn factory<T: ?Sized>(message: impl Into<String>) -> Self {
        Self::Factory {
            type_name: std::any::type_name::<T>().to_string(),
            message: message.into(),
        }
    }
}
