use crate::domain::Decimal;
use crate::engine::SimulationParams;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the signal and result file names are resolved against.
    pub home: PathBuf,
    pub signals: Vec<String>,
    pub results: Vec<String>,
    /// Whether signal files start with a row of column titles.
    pub headers: bool,
    pub params: SimulationParams,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("Failed to read config file {0}: {1}")]
    Read(String, String),
    #[error("No trade signal files configured")]
    NoSignals,
    #[error("The numbers of input and output files must be the same: {signals} signal files, {results} result files")]
    Mismatch { signals: usize, results: usize },
}

/// On-disk layout of a JSON or YAML config file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    home: String,
    #[serde(default)]
    signals: Vec<String>,
    #[serde(default)]
    headers: bool,
    #[serde(default)]
    results: Vec<String>,
    cash: serde_json::Value,
    limit: serde_json::Value,
    #[serde(default)]
    commission: Option<serde_json::Value>,
}

impl ConfigFile {
    fn into_config(self) -> Result<Config, ConfigError> {
        let fee = match &self.commission {
            Some(value) => json_decimal("commission", value)?,
            None => Decimal::zero(),
        };
        let config = Config {
            home: PathBuf::from(self.home),
            signals: self.signals,
            results: self.results,
            headers: self.headers,
            params: SimulationParams {
                cash_base: json_decimal("cash", &self.cash)?,
                limit: json_decimal("limit", &self.limit)?,
                fee,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let home = env_map.get("FIFO_HOME").cloned().unwrap_or_default();

        let signals = parse_list(
            env_map
                .get("FIFO_SIGNALS")
                .ok_or_else(|| ConfigError::MissingEnv("FIFO_SIGNALS".to_string()))?,
        );
        let results = parse_list(
            env_map
                .get("FIFO_RESULTS")
                .ok_or_else(|| ConfigError::MissingEnv("FIFO_RESULTS".to_string()))?,
        );

        let headers = match env_map
            .get("FIFO_HEADERS")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
            .unwrap_or("false")
        {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "FIFO_HEADERS".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let required_decimal = |key: &str| -> Result<Decimal, ConfigError> {
            let raw = env_map
                .get(key)
                .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))?;
            parse_decimal(key, raw)
        };
        let cash_base = required_decimal("FIFO_CASH")?;
        let limit = required_decimal("FIFO_LIMIT")?;
        let fee = match env_map.get("FIFO_COMMISSION") {
            Some(raw) => parse_decimal("FIFO_COMMISSION", raw)?,
            None => Decimal::zero(),
        };

        let config = Config {
            home: PathBuf::from(home),
            signals,
            results,
            headers,
            params: SimulationParams {
                cash_base,
                limit,
                fee,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a config file with keys `home`, `signals`, `headers`, `results`,
    /// `cash`, `limit` and `commission`. Files ending in `.yaml` or `.yml`
    /// are read as YAML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Reading config file: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;

        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        };
        parsed.map_err(|e| match e {
            ConfigError::Read(_, message) => ConfigError::Read(path.display().to_string(), message),
            other => other,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(content)
            .map_err(|e| ConfigError::Read("<json>".to_string(), e.to_string()))?;
        file.into_config()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Read("<yaml>".to_string(), e.to_string()))?;
        file.into_config()
    }

    /// Check the batch can run before any simulation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signals.is_empty() {
            return Err(ConfigError::NoSignals);
        }
        if self.signals.len() != self.results.len() {
            return Err(ConfigError::Mismatch {
                signals: self.signals.len(),
                results: self.results.len(),
            });
        }
        if !self.params.cash_base.is_positive() {
            return Err(ConfigError::InvalidValue(
                "cash".to_string(),
                "must be positive".to_string(),
            ));
        }
        if !self.params.limit.is_positive() {
            return Err(ConfigError::InvalidValue(
                "limit".to_string(),
                "must be positive".to_string(),
            ));
        }
        if self.params.fee.is_negative() {
            return Err(ConfigError::InvalidValue(
                "commission".to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// (signal file, result file) pairs resolved against `home`.
    pub fn runs(&self) -> Vec<(PathBuf, PathBuf)> {
        self.signals
            .iter()
            .zip(&self.results)
            .map(|(signal, result)| (self.home.join(signal), self.home.join(result)))
            .collect()
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_decimal(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str_canonical(raw.trim()).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), format!("must be a decimal, got {}", raw))
    })
}

fn json_decimal(key: &str, value: &serde_json::Value) -> Result<Decimal, ConfigError> {
    match value {
        serde_json::Value::Number(n) => parse_decimal(key, &n.to_string()),
        serde_json::Value::String(s) => parse_decimal(key, s),
        other => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be a number, got {}", other),
        )),
    }
}
