use crate::sender::{ClientConfig, TagError, TagRules};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The API token is missing. Please configure it in an environment variable of the function")]
    MissingApiToken,
    #[error("The Ingestion Url is missing. Please configure it in an environment variable of the function")]
    MissingIngestionUrl,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("Tag configuration error: {0}")]
    Tag(#[from] TagError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Output format of the process's own logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per event (default, for the Functions host log stream)
    #[default]
    Json,
    /// Human-readable compact lines
    Pretty,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Log Insight Cloud API token, sent as a bearer token
    #[arg(long, env = "vRealize_Log_Insight_Cloud_API_Token", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Log Insight Cloud ingestion URL
    #[arg(long, env = "vRealize_Log_Insight_Cloud_API_Url")]
    pub ingestion_url: Option<String>,

    /// Port the custom handler listens on (set by the Functions host)
    #[arg(long, env = "FUNCTIONS_CUSTOMHANDLER_PORT", default_value = "3000")]
    pub port: u16,

    /// Directory containing one `<function>/function.json` per function
    #[arg(long, env = "AzureWebJobsScriptRoot", default_value = ".")]
    pub function_root: PathBuf,

    /// Timeout for one ingestion request in seconds
    #[arg(long, env = "INGESTION_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Connection timeout for the ingestion endpoint in seconds
    #[arg(long, env = "INGESTION_CONNECT_TIMEOUT_SECS", default_value = "10")]
    pub connection_timeout_secs: u64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "RUST_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// `Tag_<name>` patterns collected from the environment (not CLI arguments)
    #[arg(skip)]
    pub tag_patterns: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            ingestion_url: None,
            port: 3000,
            function_root: PathBuf::from("."),
            request_timeout_secs: 30,
            connection_timeout_secs: 10,
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
            tag_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Parse the process arguments and environment. Exits on `--help`/`--version`.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::parse().with_tag_patterns(std::env::vars());
        config.validate()?;
        Ok(config)
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::try_parse_from(args)
            .map_err(|e| ConfigError::InvalidArgs(e.to_string()))?
            .with_tag_patterns(std::env::vars());
        config.validate()?;
        Ok(config)
    }

    /// Keep the `Tag_<name>` entries of `vars`.
    pub fn with_tag_patterns<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.tag_patterns = TagRules::patterns_from_vars(vars);
        self
    }

    /// Checks for the settings the server itself needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidConfig("Port cannot be 0".to_string()));
        }

        if self.request_timeout_secs == 0 || self.connection_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Ingestion timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Ingestion client settings. Fails when the token or URL is missing or a
    /// tag pattern does not compile.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_token = non_empty(self.api_token.as_deref()).ok_or(ConfigError::MissingApiToken)?;
        let ingestion_url =
            non_empty(self.ingestion_url.as_deref()).ok_or(ConfigError::MissingIngestionUrl)?;

        Url::parse(ingestion_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid ingestion URL '{ingestion_url}': {e}"))
        })?;

        let tag_rules = TagRules::from_patterns(self.tag_patterns.iter().cloned())?;

        Ok(ClientConfig {
            timeout: self.request_timeout(),
            connection_timeout: self.connection_timeout(),
            tag_rules,
            ..ClientConfig::new(ingestion_url, api_token)
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
