//! `onboarding` entry-point: drives one onboarding operation per invocation.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use onboarding::config::OnboardingSettings;
use onboarding::inbound::cli::{CliArgs, run};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings =
        OnboardingSettings::load_from_environment().wrap_err("load onboarding settings")?;

    let mut stdout = io::stdout().lock();
    match run(&args, &settings) {
        Ok(output) => {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => match error.to_document() {
            Some(document) => {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&document)?)?;
                Ok(ExitCode::FAILURE)
            }
            None => Err(error).wrap_err("onboarding command failed"),
        },
    }
}
