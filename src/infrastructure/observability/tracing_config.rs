/// Log output options, resolved from the `logging` settings section.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub const DEFAULT_FILTER: &'static str = "info,call_analyst=debug,tower_http=debug";

    pub fn new(environment: impl Into<String>, json_format: bool, level: Option<&str>) -> Self {
        let default_filter = match level {
            Some(level) if !level.trim().is_empty() => level.to_string(),
            _ => Self::DEFAULT_FILTER.to_string(),
        };
        Self {
            environment: environment.into(),
            json_format,
            default_filter,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::new(
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            None,
        )
    }
}
