//! Default startup module

use super::{LifecycleError, Result, StartupModule, StartupTask};
use crate::di::{Container, ContainerBuilder, Injectable};
use std::sync::Arc;

/// Startup module that runs every registered `dyn StartupTask`, fail-fast.
pub struct TaskStartupModule {
    tasks: Vec<Arc<dyn StartupTask>>,
}

impl TaskStartupModule {
    pub fn new(tasks: Vec<Arc<dyn StartupTask>>) -> Self {
        Self { tasks }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Injectable for TaskStartupModule {
    fn inject(container: &Container) -> crate::Result<Self> {
        Ok(Self::new(container.resolve_all::<dyn StartupTask>()?))
    }
}

impl StartupModule for TaskStartupModule {
    fn start(&self) -> Result<()> {
        tracing::info!("Running startup tasks...");

        for task in &self.tasks {
            tracing::debug!("Starting: {}", task.name());
            task.start().map_err(|e| {
                tracing::error!("Startup task {} failed: {}", task.name(), e);
                LifecycleError::task_failed(task.name(), e.to_string())
            })?;
            tracing::debug!("Started: {}", task.name());
        }

        tracing::info!(
            "Startup tasks complete ({} tasks executed)",
            self.tasks.len()
        );
        Ok(())
    }
}

/// Register [`TaskStartupModule`] as the `dyn StartupModule` provider.
pub(crate) fn register_default_startup(services: &mut ContainerBuilder) {
    services.register_singleton::<dyn StartupModule, _>(|container| {
        TaskStartupModule::inject(container)
            .map(|module| Arc::new(module) as Arc<dyn StartupModule>)
    });
}
