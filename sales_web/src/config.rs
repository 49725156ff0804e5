//! Application configuration
//!
//! Sources, lowest priority first: `config/default.toml`, the file named after
//! the `SALES_ENV` environment (`development.toml` or `production.toml`), then
//! environment variables such as `SALES_SERVER__PORT=8080`. Every file is
//! optional; missing keys fall back to the defaults below.

use chrono::Weekday;
use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use sales_forecast::data::ColumnMapping;
use sales_forecast::{ForecastOptions, ModelKind, ModelSettings, ZeroQuarterPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
}

/// Deployment environment, selects the override file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Read `SALES_ENV`, defaulting to development
    pub fn from_env() -> Self {
        match env::var("SALES_ENV")
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Where the transactions come from and how they are bucketed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub date_column: String,
    pub amount_column: String,
    /// Weekday the weekly buckets close on, e.g. "sunday"
    pub week_ending: String,
    /// Insert zero weeks where no sales were recorded
    pub fill_missing_weeks: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        let columns = ColumnMapping::default();
        Self {
            path: PathBuf::from("data/sample_transactions.csv"),
            date_column: columns.date_column,
            amount_column: columns.amount_column,
            week_ending: "sunday".to_string(),
            fill_missing_weeks: true,
        }
    }
}

impl DataConfig {
    pub fn week_end(&self) -> Result<Weekday, ConfigurationError> {
        self.week_ending.trim().parse::<Weekday>().map_err(|_| {
            ConfigurationError::InvalidValue(format!(
                "data.week_ending: unknown weekday '{}'",
                self.week_ending
            ))
        })
    }

    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping::new(self.date_column.clone(), self.amount_column.clone())
    }
}

/// Forecast model and request limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub model: ModelKind,
    /// Horizon used when a request does not name one
    pub horizon_weeks: usize,
    pub max_horizon_weeks: usize,
    pub confidence_level: f64,
    pub alpha: f64,
    pub beta: f64,
    pub window: usize,
    pub retain_zero_quarters: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let model = ModelSettings::default();
        Self {
            model: model.kind,
            horizon_weeks: 12,
            max_horizon_weeks: 104,
            confidence_level: model.confidence_level,
            alpha: model.alpha,
            beta: model.beta,
            window: model.window,
            retain_zero_quarters: false,
        }
    }
}

impl ForecastConfig {
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            kind: self.model,
            alpha: self.alpha,
            beta: self.beta,
            window: self.window,
            confidence_level: self.confidence_level,
        }
    }

    pub fn options(&self, horizon_weeks: usize) -> ForecastOptions {
        let policy = if self.retain_zero_quarters {
            ZeroQuarterPolicy::Retain
        } else {
            ZeroQuarterPolicy::Drop
        };
        ForecastOptions::new(horizon_weeks).with_zero_quarters(policy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info,sales_web=debug,tower_http=debug".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub forecast: ForecastConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load from `CONFIG_DIR` (default `config`) for the `SALES_ENV` environment
    pub fn load_from_env() -> Result<Self, ConfigurationError> {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load(Path::new(&config_dir), Environment::from_env())
    }

    /// Load and validate the configuration found in `config_dir`
    pub fn load(config_dir: &Path, environment: Environment) -> Result<Self, ConfigurationError> {
        debug!(dir = %config_dir.display(), ?environment, "loading configuration");

        let source = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(environment.as_filename())).required(false))
            .add_source(
                ConfigEnvironment::with_prefix("SALES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = source.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.data.week_end()?;

        if self.data.date_column.trim().is_empty() || self.data.amount_column.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "data column names must not be empty".to_string(),
            ));
        }

        let forecast = &self.forecast;
        in_range("forecast.max_horizon_weeks", forecast.max_horizon_weeks, 1, 520)?;
        in_range(
            "forecast.horizon_weeks",
            forecast.horizon_weeks,
            1,
            forecast.max_horizon_weeks,
        )?;

        // Builds the provider once so bad model parameters fail at startup
        sales_forecast::provider::build_provider(&forecast.model_settings())
            .map_err(|e| ConfigurationError::InvalidValue(format!("forecast: {}", e)))?;

        Ok(())
    }
}

fn in_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), ConfigurationError>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ConfigurationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.week_end().unwrap(), Weekday::Sun);
        assert_eq!(config.forecast.model, ModelKind::Holt);
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 4000\n\n[forecast]\nmodel = \"linear_trend\"\nhorizon_weeks = 8\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[server]\nhost = \"0.0.0.0\"\n\n[log]\njson = true\n",
        )
        .unwrap();

        let config = AppConfig::load(dir.path(), Environment::Production).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.forecast.model, ModelKind::LinearTrend);
        assert_eq!(config.forecast.horizon_weeks, 8);
        assert!(config.log.json);
        assert_eq!(config.forecast.max_horizon_weeks, 104);

        let development = AppConfig::load(dir.path(), Environment::Development).unwrap();
        assert_eq!(development.server.host, "127.0.0.1");
    }

    #[test]
    fn test_environment_variables_override_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "[forecast]\nwindow = 3\n").unwrap();

        env::set_var("SALES_FORECAST__WINDOW", "9");
        let config = AppConfig::load(dir.path(), Environment::Development);
        env::remove_var("SALES_FORECAST__WINDOW");

        assert_eq!(config.unwrap().forecast.window, 9);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.data.week_ending = "someday".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue(_))
        ));

        let mut config = AppConfig::default();
        config.forecast.horizon_weeks = 200;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::OutOfRange { .. })
        ));

        let mut config = AppConfig::default();
        config.forecast.confidence_level = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_filenames() {
        assert_eq!(Environment::Development.as_filename(), "development.toml");
        assert_eq!(Environment::Production.as_filename(), "production.toml");
    }
}
