mod args;
mod output;

use anyhow::{Context, Result};
use mailvet::{EmailValidator, ValidationReport};
use tracing_subscriber::EnvFilter;

use std::io::{self, BufRead};

use crate::args::{Cli, Commands};

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let mut emails = Vec::new();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let email = line.trim();
            if !email.is_empty() {
                emails.push(email.to_string());
            }
        }
    } else if let Some(Commands::Validate { email }) = &cli.cmd {
        emails.push(email.clone());
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let options = cli.validator_options()?;
    let validator =
        EmailValidator::from_system_conf(options).context("initialise DNS resolver")?;

    let rows: Vec<ValidationReport> = emails
        .iter()
        .map(|email| validator.validate(email, cli.smtp))
        .collect();

    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 invalids, 1 fatal
    if output::any_invalid(&rows) {
        std::process::exit(2);
    }
    Ok(())
}
