//! Startup lifecycle
//!
//! ```text
//! 1. Container construction (platform, config, logging, hook registrations)
//!    ↓
//! 2. Finalize and publish the resolver
//!    ↓
//! 3. StartupModule::start                ← once, synchronously
//!    ↓
//! 4. StartupTask::start (each task)      ← default module only
//! ```

mod error;
mod module;
mod traits;

pub use error::{LifecycleError, Result};
pub(crate) use module::register_default_startup;
pub use module::TaskStartupModule;
pub use traits::{StartupModule, StartupTask};
