//! API configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. The file named by `NOTIFY_CONFIG` (yaml, json or toml), if set
//! 3. `NOTIFY_`-prefixed environment variables, with `__` separating
//!    nested keys (`NOTIFY_NOTIFY_BACKENDS__OPS__DUMMY_PASS__X=1`)

use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

use core_kernel::BackendsConfig;
use domain_dispatch::DispatchOptions;

/// Environment variable naming the configuration file
pub const CONFIG_FILE_VAR: &str = "NOTIFY_CONFIG";

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Driver invocations in flight at once within one request
    pub max_concurrency: usize,
    /// Upper bound for one driver invocation, waiting for a worker included
    pub driver_timeout_secs: u64,
    /// Backend name to driver configurations
    #[serde(default)]
    pub notify_backends: BackendsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            max_concurrency: 8,
            driver_timeout_secs: 60,
            notify_backends: BackendsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the optional file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
            builder = builder.add_source(File::with_name(&path));
        }
        Self::finish(builder.add_source(Self::environment()))
    }

    /// Loads configuration from the environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.add_source(Self::environment()))
    }

    /// Parses configuration from a string, on top of the defaults
    pub fn parse(contents: &str, format: FileFormat) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.add_source(File::from_str(contents, format)))
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            max_concurrency: self.max_concurrency,
            driver_timeout: Duration::from_secs(self.driver_timeout_secs),
        }
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("max_concurrency", defaults.max_concurrency as i64)?
            .set_default("driver_timeout_secs", defaults.driver_timeout_secs as i64)
    }

    fn environment() -> Environment {
        Environment::with_prefix("NOTIFY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
