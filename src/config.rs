// ============================================================================
// src/config.rs – derivation defaults loaded from TOML or YAML
// ============================================================================

use anyhow::{Context, Result};
use fastpbkdf2::Backend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Hex,
    Raw,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendChoice {
    Auto,
    Portable,
    ShaNi,
}

impl BackendChoice {
    pub fn resolve(self) -> Backend {
        match self {
            BackendChoice::Auto => Backend::detect(),
            BackendChoice::Portable => Backend::Portable,
            BackendChoice::ShaNi => Backend::ShaNi,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derive {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Derived key length in bytes.
    #[serde(default = "default_key_len")]
    pub key_len: usize,
    /// Length of salts produced by `fastpbkdf2 salt`.
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,
    #[serde(default = "default_backend")]
    pub backend: BackendChoice,
}

fn default_iterations() -> u32 {
    4096
}

fn default_key_len() -> usize {
    32
}

fn default_salt_len() -> usize {
    16
}

fn default_backend() -> BackendChoice {
    BackendChoice::Auto
}

impl Default for Derive {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            key_len: default_key_len(),
            salt_len: default_salt_len(),
            backend: default_backend(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

fn default_format() -> OutputFormat {
    OutputFormat::Hex
}

impl Default for Output {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub derive: Derive,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = fs::read_to_string(&p)
            .with_context(|| format!("read config: {}", p.as_ref().display()))?;
        let cfg: Self = if p.as_ref().extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&s).context("toml parse")?
        } else {
            serde_yaml::from_str(&s).context("yaml parse")?
        };
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_partial_uses_defaults() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(f, "[derive]\niterations = 10000\nbackend = \"portable\"").unwrap();
        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.derive.iterations, 10000);
        assert_eq!(cfg.derive.key_len, 32);
        assert_eq!(cfg.derive.backend, BackendChoice::Portable);
        assert_eq!(cfg.output.format, OutputFormat::Hex);
    }

    #[test]
    fn yaml_is_the_fallback_format() {
        let mut f = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(f, "derive:\n  key_len: 64\n  backend: sha-ni\noutput:\n  format: json").unwrap();
        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.derive.key_len, 64);
        assert_eq!(cfg.derive.backend, BackendChoice::ShaNi);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load("/nonexistent/fastpbkdf2.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fastpbkdf2.toml"));
    }
}
