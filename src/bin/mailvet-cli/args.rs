use std::path::{Path, PathBuf};

use anyhow::Result;
#[cfg(feature = "with-serde")]
use anyhow::Context;
#[cfg(not(feature = "with-serde"))]
use anyhow::bail;
use clap::{ArgAction, Parser, Subcommand};
use mailvet::ValidatorOptions;

#[derive(Parser)]
#[command(name = "mailvet-cli")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// active la sonde SMTP (RCPT TO), souvent bloquée par les fournisseurs
    #[arg(long, global = true)]
    pub smtp: bool,

    /// timeout SMTP global, connexion comprise (secondes)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// timeout DNS par requête (secondes)
    #[arg(long = "dns-timeout")]
    pub dns_timeout: Option<u64>,

    /// port SMTP du serveur MX
    #[arg(long)]
    pub port: Option<u16>,

    /// nom utilisé pour HELO
    #[arg(long)]
    pub helo: Option<String>,

    /// enveloppe MAIL FROM (par défaut test@example.com)
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// fichier JSON de configuration (ValidatorOptions, feature `with-serde`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// logs sur stderr: -v debug, -vv trace (RUST_LOG prend le pas)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    Validate {
        /// adresse e-mail à vérifier
        email: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Options du fichier `--config` (ou défauts), surchargées par les flags.
    pub fn validator_options(&self) -> Result<ValidatorOptions> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => ValidatorOptions::default(),
        };
        if let Some(secs) = self.timeout {
            options.smtp.timeout_ms = secs.saturating_mul(1_000);
        }
        if let Some(secs) = self.dns_timeout {
            options.resolver.timeout_ms = secs.saturating_mul(1_000);
        }
        if let Some(port) = self.port {
            options.smtp.port = port;
        }
        if let Some(helo) = &self.helo {
            options.smtp.helo_domain = helo.clone();
        }
        if let Some(from) = &self.mail_from {
            options.smtp.mail_from = from.clone();
        }
        Ok(options)
    }
}

#[cfg(feature = "with-serde")]
fn load_config(path: &Path) -> Result<ValidatorOptions> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
}

#[cfg(not(feature = "with-serde"))]
fn load_config(_path: &Path) -> Result<ValidatorOptions> {
    bail!("--config nécessite la feature 'with-serde'")
}
