mod classify;
mod cli;
mod config;
mod context;
mod error;
mod facts;
mod logging;
mod matcher;
mod model;
mod params;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Args;
use config::Config;
use facts::ModuleResult;
use matcher::TracingSink;
use params::Settings;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Config is read before the subscriber exists, its errors are logged after.
    let (config, config_err) = match Config::load(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init(args.log_level.as_deref(), config.log_level.as_deref())
        .context("Failed to initialize logging")?;
    if let Some(e) = config_err {
        tracing::warn!("{e:#}, using defaults");
    }

    // Merge: CLI > invocation document > config > defaults
    let settings: Settings = config.into();
    let result = run(&args, &settings);

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("Failed to serialize facts")?;
    println!("{output}");

    Ok(if result.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Every failure ends up as a JSON result so Ansible can report it.
fn run(args: &Args, settings: &Settings) -> ModuleResult {
    let mut invocation = match context::load_invocation(&args.invocation)
        .with_context(|| format!("Failed to load invocation from: {}", args.invocation))
    {
        Ok(invocation) => invocation,
        Err(e) => {
            tracing::error!("{e:#}");
            return ModuleResult::failure(format!("{e:#}"));
        }
    };
    args.apply_to(&mut invocation);

    let gathered = facts::gather(&invocation, settings, &TracingSink);
    if let Err(e) = &gathered {
        tracing::error!("{e}");
    }
    ModuleResult::from(gathered)
}
