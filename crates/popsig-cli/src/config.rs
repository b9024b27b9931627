//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use popsig_core::IntegerEncoding;
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "POPSIG_CONFIG";

/// How `sign` prints the envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Base64, ready for the `Signature` header
    #[default]
    Header,
    /// Lowercase hex of the raw envelope
    Hex,
}

/// Signer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Width policy for X, Y, r and s
    pub integer_encoding: IntegerEncoding,

    /// Output format for `sign`
    pub output_format: OutputFormat,
}

impl SignerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `--config` first, then `POPSIG_CONFIG`, then defaults
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}
