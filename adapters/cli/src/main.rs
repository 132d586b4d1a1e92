#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Block World for Teams scenarios headlessly.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bw4t_core::{Command, Event};
use bw4t_system_agent::{Agents, TemplateBrain};
use bw4t_system_collection::CollectionGoal;
use bw4t_system_layout::{generate, LayoutConfig};
use bw4t_world::{apply, query, World};

mod scenario;
mod scenario_transfer;

/// Headless runner for the Block World for Teams scenario.
#[derive(Debug, Parser)]
#[command(name = "bw4t", version, about)]
struct Args {
    /// Path to a TOML scenario file; the built-in scenario is used otherwise.
    #[arg(long, value_name = "PATH", conflicts_with = "import")]
    scenario: Option<PathBuf>,

    /// Loads the scenario from a shareable one-line string instead of a file.
    #[arg(long, value_name = "STRING")]
    import: Option<String>,

    /// Prints the scenario as a shareable one-line string and exits.
    #[arg(long)]
    export: bool,

    /// Maximum number of ticks to simulate before giving up.
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Overrides the scenario's layout seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = resolve_scenario(&args)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    if args.export {
        println!("{}", scenario_transfer::encode(&config));
        return Ok(());
    }

    run(&config, args.ticks)
}

fn resolve_scenario(args: &Args) -> anyhow::Result<LayoutConfig> {
    if let Some(encoded) = &args.import {
        return scenario_transfer::decode(encoded).context("failed to import scenario string");
    }
    if let Some(path) = &args.scenario {
        return scenario::load(path)
            .with_context(|| format!("failed to load scenario from {}", path.display()));
    }
    Ok(LayoutConfig::default())
}

fn run(config: &LayoutConfig, tick_limit: u64) -> anyhow::Result<()> {
    let plan = generate(config).context("failed to generate the world layout")?;

    let mut world = World::new();
    let mut events = Vec::new();
    for command in plan.commands() {
        apply(&mut world, command, &mut events);
    }
    let rejections = events
        .iter()
        .filter(|event| matches!(event, Event::PlacementRejected { .. }))
        .count();
    if rejections > 0 {
        bail!("world construction rejected {rejections} placements");
    }

    println!("{}", query::welcome_banner(&world));

    let mut agents = Agents::new();
    for snapshot in query::agent_view(&world).iter() {
        agents.register(snapshot.id, Box::new(TemplateBrain));
    }

    let mut goal =
        CollectionGoal::discover(&world).context("failed to discover drop-off zones")?;
    info!(
        columns = plan.columns,
        rows = plan.rows,
        rooms = plan.rooms.len() - 1,
        blocks = plan.blocks.len(),
        zones = goal.zone_count(),
        agents = agents.len(),
        "scenario ready",
    );

    let mut progress = 0;
    for _ in 0..tick_limit {
        events.clear();
        apply(&mut world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        agents.handle(&events, &world, &mut commands);
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        let report = goal.evaluate(&world);
        if report.progress != progress {
            progress = report.progress;
            info!(
                tick = query::tick(&world).get(),
                progress = report.progress,
                total = report.total,
                "delivery progress changed",
            );
        }
        if report.satisfied {
            info!(
                tick = query::tick(&world).get(),
                "all drop-off zones satisfied",
            );
            return Ok(());
        }
    }

    bail!(
        "goal not satisfied within {tick_limit} ticks ({progress} of {} deliveries placed)",
        goal.evaluate(&world).total,
    )
}
