use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{ColorChoice, Parser};
use crossterm::tty::IsTty as _;

/// File in the working directory that holds the API key when neither the
/// flag nor the environment variable provide one.
pub const API_KEY_FILE: &str = "api_key";

#[derive(Parser, Debug, Clone)]
pub struct Options {
    /// Log every API call and reconciliation decision
    #[arg(short, long, global = true, default_value = "false")]
    pub debug: bool,

    #[arg(long, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Answer yes to every question, for use in scripts
    #[arg(short = 'y', long, global = true, default_value_t = false)]
    pub assume_yes: bool,

    /// Ask questions even when not attached to a terminal
    #[arg(long, global = true, default_value_t = false)]
    pub interactive: bool,

    #[arg(
        long,
        global = true,
        default_value_t = false,
        conflicts_with = "interactive"
    )]
    pub no_interactive: bool,

    /// Desired state of the services, as TOML or JSON
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// API key; read from the `api_key` file when not given
    #[arg(
        short = 'K',
        long,
        global = true,
        env = "CDNSYNC_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Base URL of the configuration API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Replaces `_s3accesskey_` in S3 logging endpoints
    #[arg(
        long,
        global = true,
        hide = true,
        env = "CDNSYNC_S3_ACCESS_KEY",
        hide_env_values = true
    )]
    pub s3_access_key: Option<String>,

    /// Replaces `_s3secretkey_` in S3 logging endpoints
    #[arg(
        long,
        global = true,
        hide = true,
        env = "CDNSYNC_S3_SECRET_KEY",
        hide_env_values = true
    )]
    pub s3_secret_key: Option<String>,
}

impl Options {
    /// Whether to ask questions on the terminal.
    pub fn is_interactive(&self) -> bool {
        if self.interactive {
            true
        } else if self.no_interactive {
            false
        } else {
            std::io::stdin().is_tty() && std::io::stdout().is_tty()
        }
    }

    pub fn use_color(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_tty(),
        }
    }

    /// The API key from the command line, the environment or
    /// [`API_KEY_FILE`] in `dir`, in that order.
    pub fn api_key(&self, dir: &Path) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        let path = dir.join(API_KEY_FILE);
        if !path.exists() {
            bail!(
                "no API key given; use --api-key, set CDNSYNC_API_KEY or create {}",
                path.display()
            );
        }
        let key = std::fs::read_to_string(&path)
            .with_context(|| format!("reading API key from {}", path.display()))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("API key file {} is empty", path.display());
        }
        Ok(key.to_string())
    }
}
