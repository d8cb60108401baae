use std::env;
use crate::error::{AppError, Result};
use crate::sink::SinkKind;
use dotenvy::dotenv;

/// Environment variable selecting the sink (`hyprctl` or `print`).
pub const ENV_SINK: &str = "GRIDSNAP_SINK";
/// Environment variable overriding the `hyprctl` binary.
pub const ENV_HYPRCTL: &str = "GRIDSNAP_HYPRCTL";
/// Environment variable keeping the overlay open after a placement.
pub const ENV_KEEP_OPEN: &str = "GRIDSNAP_KEEP_OPEN";

const DEFAULT_HYPRCTL: &str = "hyprctl";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub sink: SinkKind,
    pub hyprctl_path: String,
    /// Accept further drags instead of closing after the first placement.
    pub keep_open: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let sink = match env::var(ENV_SINK) {
            Ok(v) => v.parse()?,
            Err(_) => SinkKind::default(),
        };

        let hyprctl_path = env::var(ENV_HYPRCTL)
            .unwrap_or_else(|_| DEFAULT_HYPRCTL.to_string());

        let keep_open = env::var(ENV_KEEP_OPEN)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self::builder()
            .with_sink(sink)
            .with_hyprctl_path(hyprctl_path)
            .with_keep_open(keep_open)
            .build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            hyprctl_path: DEFAULT_HYPRCTL.to_string(),
            keep_open: false,
        }
    }
}

/// Interprets common truthy spellings; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Programmatic overrides on top of the defaults.
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    sink: Option<SinkKind>,
    hyprctl_path: Option<String>,
    keep_open: Option<bool>,
}

impl ConfigBuilder {
    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_hyprctl_path(mut self, path: impl Into<String>) -> Self {
        self.hyprctl_path = Some(path.into());
        self
    }

    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = Some(keep_open);
        self
    }

    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();
        let hyprctl_path = self.hyprctl_path.unwrap_or(defaults.hyprctl_path);
        if hyprctl_path.trim().is_empty() {
            return Err(AppError::config("hyprctl path must not be empty"));
        }
        Ok(Config {
            sink: self.sink.unwrap_or(defaults.sink),
            hyprctl_path,
            keep_open: self.keep_open.unwrap_or(defaults.keep_open),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.hyprctl_path, "hyprctl");
    }

    #[test]
    fn builder_overrides() {
        let config = Config::builder()
            .with_sink(SinkKind::Print)
            .with_hyprctl_path("/usr/local/bin/hyprctl")
            .with_keep_open(true)
            .build()
            .unwrap();
        assert_eq!(config.sink, SinkKind::Print);
        assert_eq!(config.hyprctl_path, "/usr/local/bin/hyprctl");
        assert!(config.keep_open);
    }

    #[test]
    fn empty_path_is_config_error() {
        let err = Config::builder().with_hyprctl_path("  ").build().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
