//! Converter configuration.
//!
//! # Load Order
//!
//! 1. Default values
//! 2. YAML file (optional)
//! 3. Environment variables (`YCONVERT_*`)
//!
//! Each layer overrides the previous.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `YCONVERT_ENGINE_PATH` | `engine_path` |
//! | `YCONVERT_UNO_PATH` | `uno_path` |
//! | `YCONVERT_HOSTNAME` | `hostname` |
//! | `YCONVERT_PORT` | `port` |
//! | `YCONVERT_TIMEOUT_SECS` | `timeout_secs` |
//! | `YCONVERT_WORKING_DIR` | `working_dir` |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::metadata::UnknownFieldPolicy;

/// Default engine invocation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Settings injected into a [`Converter`](super::Converter) at construction.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use yconvert::convert::ConverterConfig;
///
/// let config = ConverterConfig::new()
///     .with_engine_path("/opt/onlyoffice/x2t")
///     .with_timeout(Duration::from_secs(60))
///     .with_env("LD_LIBRARY_PATH", "/opt/onlyoffice");
/// assert_eq!(config.timeout(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Converter binary
    pub engine_path: PathBuf,
    /// Directory of the office suite's UNO libraries
    pub uno_path: Option<PathBuf>,
    /// Office service host
    pub hostname: String,
    /// Office service port
    pub port: u16,
    /// Parent directory for per-request working areas; system temp if unset
    pub working_dir: Option<PathBuf>,
    /// Upper bound for one engine invocation
    pub timeout_secs: u64,
    /// Complete environment of the engine process
    pub environment: BTreeMap<String, String>,
    pub unknown_field_policy: UnknownFieldPolicy,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            engine_path: PathBuf::from("x2t"),
            uno_path: None,
            hostname: "localhost".to_string(),
            port: 2002,
            working_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            environment: BTreeMap::new(),
            unknown_field_policy: UnknownFieldPolicy::Ignore,
        }
    }
}

impl ConverterConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(format!("invalid YAML: {e}")))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading converter configuration");
        Self::from_yaml_str(&yaml)
    }

    /// Override fields from `YCONVERT_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Override fields from variables provided by `lookup`.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup("YCONVERT_ENGINE_PATH") {
            self.engine_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("YCONVERT_UNO_PATH") {
            self.uno_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("YCONVERT_HOSTNAME") {
            self.hostname = value;
        }
        if let Some(value) = lookup("YCONVERT_PORT") {
            self.port = value
                .parse()
                .map_err(|_| invalid_env_var("YCONVERT_PORT", "expected a port number"))?;
        }
        if let Some(value) = lookup("YCONVERT_TIMEOUT_SECS") {
            self.timeout_secs = value
                .parse()
                .map_err(|_| invalid_env_var("YCONVERT_TIMEOUT_SECS", "expected whole seconds"))?;
        }
        if let Some(value) = lookup("YCONVERT_WORKING_DIR") {
            self.working_dir = Some(PathBuf::from(value));
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject settings no engine call could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.engine_path.as_os_str().is_empty() {
            return Err(Error::Config("engine_path must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_engine_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.engine_path = path.into();
        self
    }

    pub fn with_uno_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.uno_path = Some(path.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the engine timeout, rounded down to whole seconds (at least one).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Add one variable to the engine environment.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_field_policy = policy;
        self
    }
}

fn invalid_env_var(name: &str, reason: &str) -> Error {
    Error::Config(format!("invalid value for {name}: {reason}"))
}
