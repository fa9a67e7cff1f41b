//! Command Line Interface
//!
//! Argument parsing plus the two things every mode needs before it can
//! start: the raw report text and the effective configuration.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use brief_core::{
    default_config_path, load_config_from_path, parse, parse_normalized, BriefConfig,
    ConfigOverrides, ParsedSummary,
};
use clap::Parser;

/// Progressive terminal digest for AI-generated security reports
#[derive(Debug, Parser)]
#[command(name = "brief-tui", version, about)]
pub struct Cli {
    /// Report file; `-` or omitted reads standard input
    #[arg(value_name = "REPORT")]
    pub report: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/brief/brief.toml)
    #[arg(long, env = "BRIEF_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the parsed report as JSON and exit
    #[arg(long)]
    pub print: bool,

    /// Fold nested sub-bullets before parsing (default)
    #[arg(long, overrides_with = "no_normalize")]
    normalize: bool,

    /// Parse the report exactly as written
    #[arg(long = "no-normalize", overrides_with = "normalize")]
    no_normalize: bool,

    /// Milliseconds between revealed paragraph characters
    #[arg(long, value_name = "MS")]
    pub reveal_speed_ms: Option<u64>,

    /// Seed for decoy and scramble characters
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Whether sub-bullets get folded before parsing
    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize || !self.no_normalize
    }

    /// Read the report from the file argument or standard input
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, or if standard input is an
    /// interactive terminal (nothing was piped in).
    pub fn read_report(&self) -> anyhow::Result<String> {
        match self.report.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read report {}", path.display())),
            _ => {
                let stdin = io::stdin();
                if stdin.is_terminal() {
                    bail!("No report given: pass a file or pipe one on standard input");
                }
                let mut raw = String::new();
                stdin
                    .lock()
                    .read_to_string(&mut raw)
                    .context("Failed to read report from standard input")?;
                Ok(raw)
            }
        }
    }

    /// Parse a raw report honoring `--normalize/--no-normalize`
    #[must_use]
    pub fn parse_report(&self, raw: &str) -> ParsedSummary {
        if self.normalize() {
            parse_normalized(raw)
        } else {
            parse(raw)
        }
    }

    /// Load configuration from file and environment, then apply CLI overrides
    ///
    /// # Errors
    ///
    /// Fails if an explicitly named config file is missing, or if loading
    /// or validation fails.
    pub fn load_config(&self) -> anyhow::Result<BriefConfig> {
        let path = match &self.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file {} does not exist", path.display());
                }
                Some(path.clone())
            }
            None => default_config_path(),
        };

        let mut config = load_config_from_path(path).context("Failed to load configuration")?;
        self.overrides()
            .apply(&mut config)
            .context("Invalid command line override")?;

        tracing::info!(source = %config.source(), "Configuration loaded");
        Ok(config)
    }

    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ms) = self.reveal_speed_ms {
            overrides = overrides.with_reveal_speed_ms(ms);
        }
        overrides
    }
}
