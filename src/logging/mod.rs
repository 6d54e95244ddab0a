//! Logging registration
//!
//! Every container built by the host carries a [`LoggerFactory`]. Startup hooks shape it
//! through a [`LoggingBuilder`]: filter directives use the `RUST_LOG` syntax understood by
//! [`EnvFilter`], and each sink becomes its own `fmt` layer.
//!
//! ```
//! use bootwire::logging::LoggingBuilder;
//! use tracing::Level;
//!
//! let mut logging = LoggingBuilder::new();
//! logging
//!     .set_min_level(Level::WARN)
//!     .add_directive("bootwire=debug")
//!     .add_sink(std::io::stderr);
//!
//! let factory = logging.build().unwrap();
//! factory.create_logger("startup").warn("disk almost full");
//! ```

use crate::error::{ContainerError, Result};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Mutable logging configuration handed to startup hooks.
pub struct LoggingBuilder {
    directives: Vec<String>,
    min_level: Level,
    sinks: Vec<BoxMakeWriter>,
    ansi: bool,
    with_target: bool,
    install_global: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// No sinks, `INFO` minimum level, global installation enabled.
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            min_level: Level::INFO,
            sinks: Vec::new(),
            ansi: false,
            with_target: true,
            install_global: true,
        }
    }

    /// Add a filter directive such as `"my_crate=debug"`
    ///
    /// Directives are validated when the factory is built.
    pub fn add_directive(&mut self, directive: impl Into<String>) -> &mut Self {
        self.directives.push(directive.into());
        self
    }

    pub fn clear_directives(&mut self) -> &mut Self {
        self.directives.clear();
        self
    }

    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    /// Level applied to targets no directive matches
    pub fn set_min_level(&mut self, level: Level) -> &mut Self {
        self.min_level = level;
        self
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    /// Add an output sink
    pub fn add_sink<W>(&mut self, make_writer: W) -> &mut Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.sinks.push(BoxMakeWriter::new(make_writer));
        self
    }

    /// Add a sink writing to standard error
    pub fn add_console(&mut self) -> &mut Self {
        self.add_sink(std::io::stderr)
    }

    pub fn clear_sinks(&mut self) -> &mut Self {
        self.sinks.clear();
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn with_ansi(&mut self, ansi: bool) -> &mut Self {
        self.ansi = ansi;
        self
    }

    pub fn with_target(&mut self, with_target: bool) -> &mut Self {
        self.with_target = with_target;
        self
    }

    /// Whether the host should try to install the factory as the global default subscriber
    pub fn install_global(&mut self, install: bool) -> &mut Self {
        self.install_global = install;
        self
    }

    /// Build the factory
    ///
    /// # Errors
    /// Returns [`ContainerError::Registration`] when a directive cannot be parsed.
    pub fn build(self) -> Result<LoggerFactory> {
        let Self {
            directives,
            min_level,
            sinks,
            ansi,
            with_target,
            install_global,
        } = self;

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(min_level).into())
            .parse(directives.join(","))
            .map_err(|e| ContainerError::registration(format!("invalid log directive: {e}")))?;

        let sink_count = sinks.len();
        let layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = sinks
            .into_iter()
            .map(|sink| {
                tracing_subscriber::fmt::layer()
                    .with_writer(sink)
                    .with_ansi(ansi)
                    .with_target(with_target)
                    .boxed()
            })
            .collect();

        let subscriber = tracing_subscriber::registry().with(layers).with(filter);

        Ok(LoggerFactory {
            dispatch: Dispatch::new(subscriber),
            sink_count,
            install_global,
        })
    }
}

/// Creates [`Logger`]s that write to the configured sinks.
#[derive(Clone)]
pub struct LoggerFactory {
    dispatch: Dispatch,
    sink_count: usize,
    install_global: bool,
}

impl LoggerFactory {
    pub fn create_logger(&self, category: impl Into<String>) -> Logger {
        Logger {
            category: Arc::from(category.into()),
            dispatch: self.dispatch.clone(),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn sink_count(&self) -> usize {
        self.sink_count
    }

    /// Run `f` with this factory's subscriber as the thread's default
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install as the process-wide default subscriber
    ///
    /// Returns `false` when installation is disabled, there is nowhere to write to, or a
    /// global subscriber already exists.
    pub fn try_install_global(&self) -> bool {
        if !self.install_global || self.sink_count == 0 {
            return false;
        }

        match tracing::dispatcher::set_global_default(self.dispatch.clone()) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Global subscriber already installed, keeping it");
                false
            }
        }
    }
}

impl std::fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("sink_count", &self.sink_count)
            .field("install_global", &self.install_global)
            .finish()
    }
}

/// A named logging category bound to a factory's sinks.
#[derive(Clone)]
pub struct Logger {
    category: Arc<str>,
    dispatch: Dispatch,
}

impl Logger {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn log(&self, level: Level, message: &str) {
        let category = &*self.category;
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::ERROR => tracing::error!(category, "{message}"),
            Level::WARN => tracing::warn!(category, "{message}"),
            Level::INFO => tracing::info!(category, "{message}"),
            Level::DEBUG => tracing::debug!(category, "{message}"),
            Level::TRACE => tracing::trace!(category, "{message}"),
            // `Level` is a struct, so the match needs a fallback; the five constants above
            // are its only values.
            _ => tracing::trace!(category, "{message}"),
        });
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }
}
