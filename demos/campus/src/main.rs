//! campus — command-line driver for the cafeteria matching simulation.
//!
//! Generates a population of students and cafeterias, runs the negotiation
//! to quiescence (or the round cap), prints a summary and optionally writes
//! the CSV report.
//!
//! ```text
//! campus --students 200 --seed 7 --out output/campus
//! campus --config campus.json --json
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cm_core::MatchConfig;
use cm_output::{CsvWriter, SimOutputObserver};
use cm_sim::{MatchOutcome, NoopObserver};

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Negotiate student-to-cafeteria assignments with a message-passing agent model")]
struct Cli {
    /// JSON file with a MatchConfig; missing fields take their defaults
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long, short)]
    seed: Option<u64>,

    /// Override the number of students
    #[arg(long)]
    students: Option<usize>,

    /// Override the number of cafeterias
    #[arg(long)]
    cafeterias: Option<usize>,

    /// Override the seats per cafeteria
    #[arg(long)]
    capacity: Option<u32>,

    /// Override the round cap
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Directory for the CSV report (created if missing)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<MatchConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(n) = cli.students {
        config.student_count = n;
    }
    if let Some(m) = cli.cafeterias {
        config.cafeteria_count = m;
    }
    if let Some(c) = cli.capacity {
        config.capacity = c;
    }
    if let Some(r) = cli.max_rounds {
        config.max_rounds = r;
    }

    config.validate()?;
    Ok(config)
}

fn run_with_csv(config: MatchConfig, dir: &Path) -> Result<MatchOutcome> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let writer = CsvWriter::new(dir)?;
    let mut obs = SimOutputObserver::new(writer);
    let outcome = cm_sim::run(config, &mut obs)?;
    if let Some(e) = obs.take_error() {
        bail!("output error: {e}");
    }
    Ok(outcome)
}

fn print_table(outcome: &MatchOutcome) {
    println!("{:<10} {:>6} {:>10} {:>12}", "Cafeteria", "Load", "Capacity", "Utilisation");
    println!("{}", "-".repeat(41));
    for o in &outcome.occupancy {
        println!(
            "{:<10} {:>6} {:>10} {:>11.1}%",
            o.cafeteria.0,
            o.load,
            o.capacity,
            o.utilisation * 100.0,
        );
    }
    println!();
    println!("Rounds              : {}{}", outcome.rounds, if outcome.converged { "" } else { " (round cap hit)" });
    println!("Matched / unmatched : {} / {}", outcome.matched_count(), outcome.unmatched_count);
    println!("Satisfied students  : {}", outcome.satisfied_count);
    println!("Mean satisfaction   : {:.3}", outcome.mean_satisfaction);
    println!("Manager performance : {:.3}", outcome.manager_performance);
    if outcome.dropped_messages > 0 {
        println!("Dropped messages    : {}", outcome.dropped_messages);
    }
}

fn print_json(outcome: &MatchOutcome) -> Result<()> {
    let assignments: Vec<_> = outcome
        .assignments
        .iter()
        .map(|a| {
            serde_json::json!({
                "student":      a.student.0,
                "slot":         a.slot.0,
                "cafeteria":    a.cafeteria.map(|c| c.0),
                "satisfaction": a.satisfaction,
                "satisfied":    a.satisfied,
            })
        })
        .collect();
    let occupancy: Vec<_> = outcome
        .occupancy
        .iter()
        .map(|o| {
            serde_json::json!({
                "cafeteria":   o.cafeteria.0,
                "load":        o.load,
                "capacity":    o.capacity,
                "utilisation": o.utilisation,
                "slot_load":   o.slot_load,
            })
        })
        .collect();
    let summary = serde_json::json!({
        "rounds":              outcome.rounds,
        "converged":           outcome.converged,
        "matched":             outcome.matched_count(),
        "unmatched":           outcome.unmatched_count,
        "satisfied":           outcome.satisfied_count,
        "mean_satisfaction":   outcome.mean_satisfaction,
        "manager_performance": outcome.manager_performance,
        "dropped_messages":    outcome.dropped_messages,
        "assignments":         assignments,
        "occupancy":           occupancy,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = load_config(&cli)?;
    info!(
        students = config.student_count,
        cafeterias = config.cafeteria_count,
        capacity = config.capacity,
        seed = config.seed,
        "starting run"
    );

    let t0 = Instant::now();
    let outcome = match &cli.out {
        Some(dir) => run_with_csv(config, dir)?,
        None => cm_sim::run(config, &mut NoopObserver)?,
    };
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "run complete");

    if cli.json {
        print_json(&outcome)?;
    } else {
        print_table(&outcome);
    }
    if let Some(dir) = &cli.out {
        println!();
        println!("CSV report written to {}", dir.display());
    }
    Ok(())
}
