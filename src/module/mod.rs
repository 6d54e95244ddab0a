use crate::di::ContainerBuilder;
use crate::error::Result;

/// A bundle of related registrations
///
/// Startup hooks add modules with
/// [`ContainerBuilder::add_module`](crate::di::ContainerBuilder::add_module) instead of
/// listing every provider by hand.
///
/// # Example
/// ```
/// use bootwire::{ContainerBuilder, Module};
///
/// struct Clock;
///
/// pub struct TimeModule;
///
/// impl Module for TimeModule {
///     fn register(services: &mut ContainerBuilder) -> bootwire::Result<()> {
///         services.register(Clock);
///         Ok(())
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_module::<TimeModule>().unwrap();
/// assert!(builder.contains::<Clock>());
/// ```
pub trait Module {
    /// Register all providers in this module
    fn register(services: &mut ContainerBuilder) -> Result<()>;
}
