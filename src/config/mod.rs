use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Prefix of the environment variables read by [`ConfigService::from_env`]
pub const ENV_PREFIX: &str = "BOOTWIRE_";

/// Configuration service
///
/// String key/value settings shared by the host and registered in every container it
/// builds. Keys loaded from the environment drop their prefix and are lower-cased, so
/// `BOOTWIRE_LOG` becomes `log`.
#[derive(Clone, Default, Debug)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `BOOTWIRE_*` environment variable
    pub fn from_env() -> Self {
        Self::from_vars(env::vars(), ENV_PREFIX)
    }

    /// Load the variables starting with `prefix`
    pub fn from_vars<I>(vars: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let service = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                service.set(&stripped.to_ascii_lowercase(), &value);
            }
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a value, `None` when the key is absent
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.config.get(key).map(|v| v.parse())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}

/// What a second `initialize` call on an already initialized host does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReinitPolicy {
    /// Build a new resolver and replace the published one
    #[default]
    Replace,
    /// Fail with `InitError::AlreadyInitialized`
    Reject,
}

/// Host settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOptions {
    pub reinit: ReinitPolicy,
    /// Extra filter directive applied before the startup hook configures logging
    pub log_filter: Option<String>,
}

impl HostOptions {
    pub const REINIT_KEY: &'static str = "reinit";
    pub const LOG_KEY: &'static str = "log";

    pub fn from_config(config: &ConfigService) -> Self {
        let reinit = match config.parse::<ReinitPolicy>(Self::REINIT_KEY) {
            Some(Ok(policy)) => policy,
            Some(Err(_)) => {
                tracing::warn!(
                    "Unknown re-initialization policy '{}', using '{}'",
                    config.get_or(Self::REINIT_KEY, ""),
                    ReinitPolicy::default()
                );
                ReinitPolicy::default()
            }
            None => ReinitPolicy::default(),
        };

        Self {
            reinit,
            log_filter: config.get(Self::LOG_KEY).filter(|f| !f.trim().is_empty()),
        }
    }

    pub fn with_reinit(mut self, reinit: ReinitPolicy) -> Self {
        self.reinit = reinit;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}
