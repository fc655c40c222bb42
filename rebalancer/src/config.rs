//! TOML configuration loading and validation.

use std::path::Path;

use fireplan::{DEFAULT_HOLD_EPSILON, EngineOptions};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Deltas within this many currency units of zero are HOLD.
    #[serde(default = "default_hold_epsilon")]
    pub hold_epsilon: f64,
}

fn default_hold_epsilon() -> f64 {
    DEFAULT_HOLD_EPSILON
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_epsilon: default_hold_epsilon(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecksConfig {
    /// Slack, in percentage points, when comparing target sums to 100%.
    #[serde(default = "default_percent_tolerance")]
    pub percent_tolerance: f64,
    /// Class drift (percentage points) beyond which a rebalance is due.
    #[serde(default = "default_drift_band")]
    pub drift_band_pct: f64,
    /// Treat a class without a target entry as a failure instead of a warning.
    #[serde(default)]
    pub fail_on_missing_class_target: bool,
}

fn default_percent_tolerance() -> f64 {
    0.01
}
fn default_drift_band() -> f64 {
    5.0
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            percent_tolerance: default_percent_tolerance(),
            drift_band_pct: default_drift_band(),
            fail_on_missing_class_target: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Load config from a TOML file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        let eps = self.engine.hold_epsilon;
        if !eps.is_finite() || eps < 0.0 {
            return Err(Error::Config(format!(
                "hold_epsilon must be >= 0 and finite, got {eps}"
            )));
        }
        let tol = self.checks.percent_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::Config(format!(
                "percent_tolerance must be >= 0 and finite, got {tol}"
            )));
        }
        let band = self.checks.drift_band_pct;
        if !band.is_finite() || band <= 0.0 || band > 100.0 {
            return Err(Error::Config(format!(
                "drift_band_pct must be in (0, 100], got {band}"
            )));
        }
        if self.logging.audit_file.is_empty() {
            return Err(Error::Config("audit_file must not be empty".into()));
        }
        Ok(())
    }

    /// Engine options derived from `[engine]`.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            hold_epsilon: self.engine.hold_epsilon,
            ..EngineOptions::default()
        }
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> std::path::PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
