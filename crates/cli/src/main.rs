// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wrench-sim`: a small driver that runs the S1-S6 example scenarios and
//! reports whether each held up, meant as both a smoke test of the
//! workspace and a worked example of wiring `wrench-engine`/`wrench-services`/
//! `wrench-xrootd` together end to end.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod output;
mod scenarios;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "wrench-sim", about = "Run the WRENCH-style example simulation scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or more scenarios and report pass/fail.
    Run {
        /// Scenario to run (s1..s6). Omit to run all of them.
        scenario: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the available scenarios.
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match cli.command {
        Command::List => {
            for name in scenarios::ALL {
                println!("{name}");
            }
            Ok(())
        }
        Command::Run { scenario, format } => run(scenario, format).await,
    }
}

async fn run(scenario: Option<String>, format: OutputFormat) -> anyhow::Result<()> {
    let names: Vec<String> = match scenario {
        Some(name) => {
            if !scenarios::ALL.contains(&name.as_str()) {
                bail!("unknown scenario {name:?}, expected one of {:?}", scenarios::ALL);
            }
            vec![name]
        }
        None => scenarios::ALL.iter().map(|s| s.to_string()).collect(),
    };

    let mut reports = Vec::new();
    for name in &names {
        tracing::info!(scenario = %name, "running scenario");
        let report = scenarios::run_by_name(name).await.with_context(|| format!("scenario {name:?} did not run"))?;
        reports.push(report);
    }

    print!("{}", output::render(format, &reports));

    if reports.iter().any(|r| !r.outcome.is_passed()) {
        std::process::exit(1);
    }
    Ok(())
}
