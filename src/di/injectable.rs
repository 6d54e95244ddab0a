use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be constructed from the DI container
///
/// Register such a type with
/// [`ContainerBuilder::register_injectable`](crate::di::ContainerBuilder::register_injectable);
/// it is then built once, on first resolution.
///
/// # Example
/// ```
/// use bootwire::{Container, ContainerBuilder, Injectable};
/// use std::sync::Arc;
///
/// trait UserRepository: Send + Sync {}
/// struct InMemoryUsers;
/// impl UserRepository for InMemoryUsers {}
///
/// struct UserService {
///     repository: Arc<dyn UserRepository>,
/// }
///
/// impl Injectable for UserService {
///     fn inject(container: &Container) -> bootwire::Result<Self> {
///         Ok(Self {
///             repository: container.resolve::<dyn UserRepository>()?,
///         })
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder
///     .register_arc::<dyn UserRepository>(Arc::new(InMemoryUsers))
///     .register_injectable::<UserService>();
/// let container = builder.build().unwrap();
/// assert!(container.resolve::<UserService>().is_ok());
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container
    ///
    /// # Errors
    /// Returns an error if any required dependency is not found in the container.
    fn inject(container: &Container) -> Result<Self>;
}
