//! APM - Adaptive Power Management
//! Command-line interface for running stimulus scenarios against the model

use anyhow::Context;
use apm_core::config::limits;
use apm_core::{PowerReport, PowerState, PowerSystem, Scenario, TickOutputs};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "apm")]
#[command(author = "SIL Contributors")]
#[command(version = "2026.1.17")]
#[command(about = "APM - per-peripheral adaptive power management model", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the occupancy report
    Run {
        /// Scenario file (.toml)
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Print one line per tick
        #[arg(long)]
        trace: bool,
    },

    /// Validate a scenario file without running it
    Check {
        /// Scenario file (.toml)
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,
    },

    /// Show information about the model
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            scenario,
            json,
            trace,
        } => run_command(&scenario, json, trace),
        Commands::Check { scenario } => check_command(&scenario),
        Commands::Info => {
            print_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "apm=debug,apm_core=debug" } else { "apm=info,apm_core=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    Scenario::from_file(path).with_context(|| format!("failed to load scenario {}", path.display()))
}

// ============================================================================
// Commands
// ============================================================================

fn run_command(path: &Path, json: bool, trace: bool) -> anyhow::Result<()> {
    let mut scenario = load_scenario(path)?;
    let mut system = PowerSystem::new(scenario.system)?;
    let name = scenario
        .name
        .clone()
        .unwrap_or_else(|| path.display().to_string());

    tracing::info!(scenario = %name, ticks = scenario.ticks, "running scenario");

    for _ in 0..scenario.ticks {
        let out = system.step_from(&mut scenario)?;
        if trace && !json {
            print_tick(&out);
        }
    }

    let report = system.report(name);
    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn check_command(path: &Path) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    println!(
        "{} {} ({} slots, {} ticks, {} scripted peripherals)",
        "ok:".green().bold(),
        path.display(),
        scenario.system.slots,
        scenario.ticks,
        scenario.peripherals.len()
    );
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn state_cell(state: PowerState) -> ColoredString {
    let label = format!("{:<6}", state.to_string());
    match state {
        PowerState::Active => label.green(),
        PowerState::Idle => label.yellow(),
        PowerState::Sleep => label.blue(),
    }
}

fn print_tick(out: &TickOutputs) {
    let cells: Vec<String> = out
        .state
        .iter()
        .zip(&out.gated_level)
        .zip(&out.idle_count)
        .map(|((state, gated), idle)| {
            let clock = if *gated { "▔" } else { "▁" };
            format!("{} {} {:>5}", state_cell(*state), clock, idle)
        })
        .collect();
    println!("{:>6} │ {}", out.tick, cells.join(" │ "));

    for event in &out.events {
        println!("       {} {}", "↳".dimmed(), event);
    }
}

fn print_report(report: &PowerReport) {
    println!("{} {} ({} ticks)", "Report:".bold(), report.name, report.ticks);
    println!(
        "{:>4}  {:<7} {:<6} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "slot", "enabled", "state", "active", "idle", "entries", "%act", "%idle", "%sleep"
    );
    for slot in &report.slots {
        println!(
            "{:>4}  {:<7} {} {:>10} {:>10} {:>8} {:>7.1}% {:>7.1}% {:>7.1}%",
            slot.index,
            slot.enabled,
            state_cell(slot.state),
            slot.active_cycles,
            slot.idle_cycles,
            slot.sleep_entries,
            slot.active_residency * 100.0,
            slot.idle_residency * 100.0,
            slot.sleep_residency * 100.0,
        );
    }
    println!("{} {}", "Total sleep entries:".bold(), report.total_sleep_entries());
}

fn print_info() {
    println!("{}", "APM - Adaptive Power Management".bold());
    println!();
    println!("Pipeline per tick:");
    println!("  ActivityMonitor → IdlePredictor → PowerStateMachine → ClockGate → Counters");
    println!();
    println!("Construction limits:");
    let rows = [
        ("slots (N)", limits::SLOTS),
        ("idle_width (W)", limits::IDLE_WIDTH),
        ("window (WINDOW)", limits::WINDOW),
        ("counter_width (CW)", limits::COUNTER_WIDTH),
        ("phase_width", limits::PHASE_WIDTH),
    ];
    for (name, (min, max)) in rows {
        println!("  {:<20} {}..={}", name, min, max);
    }
    println!("  {:<20} 0..={}", "alpha", limits::ALPHA_MAX);
}
