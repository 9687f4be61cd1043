use super::AppError;
use super::config::{LogFormat, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// HTTP stack crates whose debug output drowns the forwarder's own logs.
const QUIET_TARGETS: [&str; 4] = ["hyper", "reqwest", "h2", "tower"];

/// Filter directives for `level`, with `extra` (usually `RUST_LOG`) applied last.
pub fn build_filter_string(level: LogLevel, extra: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(QUIET_TARGETS.len() + 2);
    parts.push(level.as_str().to_string());

    for target in QUIET_TARGETS {
        parts.push(format!("{target}=warn"));
    }

    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        parts.push(extra.to_string());
    }

    parts.join(",")
}

/// Install the global tracing subscriber.
pub fn init_tracing(level: LogLevel, format: LogFormat) -> Result<(), AppError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter_string = build_filter_string(level, rust_log.as_deref());
    let env_filter = EnvFilter::try_new(&filter_string)
        .map_err(|e| AppError::Logging(format!("Invalid log filter '{filter_string}': {e}")))?;

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(env_filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).compact())
            .with(env_filter)
            .try_init(),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
