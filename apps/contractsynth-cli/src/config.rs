//! `contractsynth.toml` configuration
//!
//! Every section is optional; missing keys fall back to the library
//! defaults.
//!
//! ```toml
//! [generator]
//! reconcile_tolerance = 1000
//!
//! [formatter]
//! coverage_threshold = 0.95
//! signature_lookahead = 15
//!
//! [invoice]
//! series = "AA/26E"
//! mode = "C1"
//!
//! [statement]
//! currency = "VND"
//! ```

use anyhow::Context;
use contract_formatter::FormatterOptions;
use export_core::InvoiceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use synth_data::{ReconcileOptions, DEFAULT_TOLERANCE};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "contractsynth.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub formatter: FormatterOptions,
    pub invoice: InvoiceConfig,
    pub statement: StatementSettings,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// The explicit file, else `contractsynth.toml` if present, else defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Phase-sum drift (VND) accepted without adjusting the final phase
    pub reconcile_tolerance: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reconcile_tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GeneratorConfig {
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            tolerance: self.reconcile_tolerance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSettings {
    pub currency: String,
    /// Derived from the period length when unset
    pub transaction_count: Option<usize>,
}

impl Default for StatementSettings {
    fn default() -> Self {
        Self {
            currency: "VND".to_string(),
            transaction_count: None,
        }
    }
}
