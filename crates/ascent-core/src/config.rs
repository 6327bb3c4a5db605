//! Configuration loading and typed config structures for the Ascent simulator.
//!
//! The configuration lives in `ascent-config.yaml` at the project root. Every
//! section and field has a default, so an empty or missing file yields a
//! runnable simulator ticking once per second.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Overrides `clock.tick_interval_ms`.
pub const ENV_TICK_INTERVAL_MS: &str = "ASCENT_TICK_INTERVAL_MS";
/// Overrides `clock.enabled`.
pub const ENV_CLOCK_ENABLED: &str = "ASCENT_CLOCK_ENABLED";
/// Overrides `output.format`.
pub const ENV_OUTPUT_FORMAT: &str = "ASCENT_OUTPUT_FORMAT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Autonomous clock settings.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observer output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ASCENT_TICK_INTERVAL_MS` overrides `clock.tick_interval_ms`
    /// - `ASCENT_CLOCK_ENABLED` overrides `clock.enabled`
    /// - `ASCENT_OUTPUT_FORMAT` overrides `output.format`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `ASCENT_*` environment variables when set.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override fields from `ASCENT_*` variables resolved through `lookup`.
    ///
    /// Unparseable values are logged at `warn` and ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_TICK_INTERVAL_MS) {
            match val.parse() {
                Ok(ms) => self.clock.tick_interval_ms = ms,
                Err(e) => warn!(value = %val, error = %e, "ignoring {ENV_TICK_INTERVAL_MS}"),
            }
        }
        if let Some(val) = lookup(ENV_CLOCK_ENABLED) {
            match val.parse() {
                Ok(enabled) => self.clock.enabled = enabled,
                Err(e) => warn!(value = %val, error = %e, "ignoring {ENV_CLOCK_ENABLED}"),
            }
        }
        if let Some(val) = lookup(ENV_OUTPUT_FORMAT) {
            match OutputFormat::parse(&val) {
                Some(format) => self.output.format = format,
                None => warn!(value = %val, "ignoring {ENV_OUTPUT_FORMAT}"),
            }
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `clock.tick_interval_ms` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "clock.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Autonomous clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Whether the clock runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Delay before the first tick, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub start_delay_ms: u64,
}

impl ClockConfig {
    /// Tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Start delay as a [`Duration`].
    pub const fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_ms: default_tick_interval_ms(),
            start_delay_ms: default_tick_interval_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Observer output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// How the console observer renders notifications.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Console rendering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per notification.
    Json,
}

impl OutputFormat {
    /// Parse a format name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn default_config_ticks_once_per_second() {
        let config = SimulationConfig::default();
        assert!(config.clock.enabled);
        assert_eq!(config.clock.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.clock.start_delay(), Duration::from_secs(1));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
clock:
  enabled: false
  tick_interval_ms: 250
  start_delay_ms: 0

logging:
  level: debug

output:
  format: json
";
        let config: SimulationConfig = serde_yml::from_str(yaml).unwrap();
        assert!(!config.clock.enabled);
        assert_eq!(config.clock.tick_interval_ms, 250);
        assert_eq!(config.clock.start_delay_ms, 0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config: SimulationConfig =
            serde_yml::from_str("clock:\n  tick_interval_ms: 10\n").unwrap();
        assert_eq!(config.clock.tick_interval_ms, 10);
        assert!(config.clock.enabled);
        assert_eq!(config.clock.start_delay_ms, 1000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = SimulationConfig::default();
        config.clock.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = SimulationConfig::parse("clock: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse(" text "), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn valid_overrides_replace_file_values() {
        let mut config = SimulationConfig::default();
        config.apply_overrides_from(|key| match key {
            ENV_TICK_INTERVAL_MS => Some("40".to_owned()),
            ENV_CLOCK_ENABLED => Some("false".to_owned()),
            ENV_OUTPUT_FORMAT => Some("json".to_owned()),
            _ => None,
        });
        assert_eq!(config.clock.tick_interval_ms, 40);
        assert!(!config.clock.enabled);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unparseable_overrides_are_ignored_with_a_warning() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut config = SimulationConfig::default();
        tracing::subscriber::with_default(subscriber, || {
            config.apply_overrides_from(|key| match key {
                ENV_TICK_INTERVAL_MS => Some("abc".to_owned()),
                ENV_CLOCK_ENABLED => Some("maybe".to_owned()),
                ENV_OUTPUT_FORMAT => Some("xml".to_owned()),
                _ => None,
            });
        });
        assert_eq!(config, SimulationConfig::default());

        let logs = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("ignoring ASCENT_TICK_INTERVAL_MS"), "{logs}");
        assert!(logs.contains("ignoring ASCENT_CLOCK_ENABLED"), "{logs}");
        assert!(logs.contains("ignoring ASCENT_OUTPUT_FORMAT"), "{logs}");
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("ascent-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
