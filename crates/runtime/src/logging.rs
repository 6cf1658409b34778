use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub type LoggingError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) -> Result<(), LoggingError> {
    let directives = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directives.as_deref(), default_filter))
        .with_target(true)
        .try_init()
}

/// Falls back to `default_filter` when `directives` is missing or unparsable.
pub fn build_filter(directives: Option<&str>, default_filter: &str) -> EnvFilter {
    directives
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}
