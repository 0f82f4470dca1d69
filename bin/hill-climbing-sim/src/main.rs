/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hill_climbing::AgentReport;
use scenario::{seeded_rng, Scenario};
use tracing_subscriber::EnvFilter;

/// Run one trial of greedy agents walking a weighted network.
#[derive(Debug, Parser)]
#[command(name = "hill-climbing-sim", version)]
struct Cli {
    /// Scenario file (YAML)
    #[arg(short, long, env = "HILL_CLIMBING_SCENARIO")]
    config: PathBuf,

    /// Random seed, overrides the seed in the scenario file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print agent reports as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn format_report(report: &AgentReport) -> String {
    format!(
        "{}  {:?}  {}",
        report.identity, report.locations, report.performance
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::from_path(&cli.config)
        .with_context(|| format!("loading scenario {}", cli.config.display()))?;
    let seed = cli.seed.or(scenario.seed).unwrap_or(0);
    tracing::info!(seed, config = %cli.config.display(), "loaded scenario");

    let mut rng = seeded_rng(seed);
    let mut simulation = scenario
        .build_simulation(&mut rng)
        .context("building simulation")?;
    simulation.run().context("running trial")?;

    let reports = simulation.reports();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", format_report(report));
        }
    }
    Ok(())
}
