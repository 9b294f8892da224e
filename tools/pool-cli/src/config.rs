//! CLI configuration management

use anyhow::{bail, Context, Result};
use pool_engine::ScoringConfig;
use pool_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

/// Main CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub store: StoreConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string() }
    }
}

/// Load configuration from defaults, an optional TOML file and `POOL_*` environment variables
///
/// Nested keys use a double underscore, e.g. `POOL_STORE__DATA_DIR` or
/// `POOL_LOGGING__LEVEL`.
pub fn load_config(file: Option<&Path>) -> Result<CliConfig> {
    let defaults = CliConfig {
        scoring: ScoringConfig::from_env().context("Invalid scoring environment")?,
        ..Default::default()
    };

    let mut builder = ::config::Config::builder()
        .add_source(::config::Config::try_from(&defaults).context("Failed to encode defaults")?);

    if let Some(path) = file {
        tracing::debug!("Loading configuration from file: {:?}", path);
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    let config: CliConfig = builder
        .add_source(
            ::config::Environment::with_prefix("POOL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &CliConfig) -> Result<()> {
    config.scoring.validate().context("Invalid scoring configuration")?;

    if let Err(reason) = config.store.validate() {
        bail!("Invalid store configuration: {reason}");
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        bail!("Invalid log level: {}", config.logging.level);
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        bail!("Invalid log format: {}", config.logging.format);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = CliConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.scoring.slots, 10);
    }

    #[test]
    fn rejects_unknown_log_settings() {
        let mut config = CliConfig::default();
        config.logging.level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = CliConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pool.toml");
        std::fs::write(
            &path,
            r#"
[store]
data_dir = "/srv/pool"
lock_grace_secs = 60

[scoring]
slots = 5

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.store.data_dir, std::path::PathBuf::from("/srv/pool"));
        assert_eq!(config.store.lock_grace_secs, 60);
        assert_eq!(config.store.predictions_file, "predictions.json");
        assert_eq!(config.scoring.slots, 5);
        assert_eq!(config.scoring.series_points.len(), 10);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pool.toml");
        std::fs::write(&path, "[scoring]\nslots = 0\n").unwrap();

        assert!(load_config(Some(path.as_path())).is_err());

        std::fs::write(&path, "[store]\nlock_grace_secs = 9223372036854775807\n").unwrap();

        assert!(load_config(Some(path.as_path())).is_err());
    }
}
