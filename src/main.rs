// Thu Jan 15 2026 - Alex

use anyhow::Context;
use bytes::{Buf, BufMut};
use clap::Parser;
use colored::Colorize;
use collective_gather::{
    comm::StatsSnapshot,
    config::Config,
    gather,
    utils::{format_bytes, format_duration, logging, measure_time, LoggingUtils},
    Communicator, FixedSize, GatherError, LocalGroup, Rank, SoloComm,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Runs a simulation-style step loop that gathers per-rank data at a root", long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'n', long)]
    ranks: Option<usize>,

    #[arg(short, long)]
    steps: Option<usize>,

    #[arg(short, long)]
    root: Option<Rank>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Overrides -v and RUST_LOG (error, warn, info, debug, trace, off)
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    no_progress: bool,

    #[arg(long)]
    no_verify: bool,

    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AtomRecord {
    id: u64,
    kind: u8,
    pos: [f64; 3],
    charge: f32,
}

impl FixedSize for AtomRecord {
    const SIZE: usize = u64::SIZE + u8::SIZE + <[f64; 3]>::SIZE + f32::SIZE;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        self.id.write_to(buf);
        self.kind.write_to(buf);
        self.pos.write_to(buf);
        self.charge.write_to(buf);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Self {
        Self {
            id: u64::read_from(buf),
            kind: u8::read_from(buf),
            pos: <[f64; 3]>::read_from(buf),
            charge: f32::read_from(buf),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Workload {
    atoms: Vec<AtomRecord>,
    names: Vec<String>,
    bonds: Vec<Vec<u64>>,
    labels: Vec<(u64, String)>,
}

impl Workload {
    // Deterministic in (rank, step) so the root can rebuild what every rank sent.
    fn generate(rank: Rank, step: usize, max_records: usize) -> Self {
        let count = (rank * 7 + step * 13 + 3) % (max_records + 1);
        let base = (rank as u64) * 1_000_000 + (step as u64) * 1_000;

        let atoms: Vec<AtomRecord> = (0..count)
            .map(|i| AtomRecord {
                id: base + i as u64,
                kind: (i % 4) as u8,
                pos: [i as f64 * 0.5, rank as f64, step as f64 * -0.25],
                charge: if i % 2 == 0 { 0.4 } else { -0.8 },
            })
            .collect();

        let names = (0..count / 4)
            .map(|i| format!("res{}-{}", rank, i))
            .collect();

        let bonds = atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (1..=(i % 3) as u64).map(|d| atom.id + d).collect())
            .collect();

        let labels = atoms
            .iter()
            .filter(|atom| atom.kind == 0)
            .map(|atom| (atom.id, format!("O\0{}", atom.id)))
            .collect();

        Self { atoms, names, bonds, labels }
    }

    fn element_count(&self) -> usize {
        self.atoms.len()
            + self.names.len()
            + self.bonds.iter().map(Vec::len).sum::<usize>()
            + self.labels.len()
    }
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    participants: usize,
    root: Rank,
    steps: usize,
    elements_gathered: usize,
    mismatched_contributions: usize,
    elapsed_ms: f64,
    traffic: Vec<StatsSnapshot>,
    total_traffic: StatsSnapshot,
}

fn gather_workload<C: Communicator + ?Sized>(
    local: &Workload,
    comm: &C,
    root: Rank,
) -> Result<Option<Vec<Workload>>, GatherError> {
    let atoms = gather(&local.atoms, comm, root)?;
    let names = gather(&local.names, comm, root)?;
    let bonds = gather(&local.bonds, comm, root)?;
    let labels = gather(&local.labels, comm, root)?;

    match (atoms, names, bonds, labels) {
        (Some(atoms), Some(names), Some(bonds), Some(labels)) => Ok(Some(
            itertools::izip!(atoms, names, bonds, labels)
                .map(|(atoms, names, bonds, labels)| Workload { atoms, names, bonds, labels })
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn run_participant<C: Communicator + ?Sized>(
    comm: &C,
    config: &Config,
    show_progress: bool,
) -> Result<Option<RunSummary>, GatherError> {
    let is_root = comm.is_root(config.root);

    let progress = if is_root && show_progress {
        let pb = ProgressBar::new(config.steps as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"));
        Some(pb)
    } else {
        None
    };

    let mut summary = RunSummary {
        participants: comm.size(),
        root: config.root,
        steps: config.steps,
        ..Default::default()
    };

    let (outcome, elapsed) = measure_time(|| -> Result<(), GatherError> {
        for step in 0..config.steps {
            let local = Workload::generate(comm.rank(), step, config.max_records_per_rank);
            let collected = gather_workload(&local, comm, config.root)?;

            if let Some(per_rank) = collected {
                summary.elements_gathered += per_rank.iter().map(Workload::element_count).sum::<usize>();

                if config.verify {
                    for (rank, workload) in per_rank.iter().enumerate() {
                        if *workload != Workload::generate(rank, step, config.max_records_per_rank) {
                            log::error!("step {}: contribution of rank {} does not match", step, rank);
                            summary.mismatched_contributions += 1;
                        }
                    }
                }
            }

            if let Some(ref pb) = progress {
                pb.set_message(format!("step {}", step));
                pb.inc(1);
            }
        }
        Ok(())
    });
    outcome?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("done");
    }

    let stats = comm.stats().snapshot();
    let traffic = gather(&[stats.collectives, stats.bytes_sent, stats.bytes_received], comm, config.root)?;

    Ok(traffic.map(|per_rank| {
        summary.elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        summary.traffic = per_rank
            .into_iter()
            .map(|[collectives, bytes_sent, bytes_received]| StatsSnapshot {
                collectives,
                bytes_sent,
                bytes_received,
            })
            .collect();
        for snapshot in &summary.traffic {
            summary.total_traffic.merge(snapshot);
        }
        summary
    }))
}

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(ranks) = args.ranks {
        config = config.with_participants(ranks);
    }
    if let Some(steps) = args.steps {
        config = config.with_steps(steps);
    }
    if let Some(root) = args.root {
        config = config.with_root(root);
    }
    if args.no_verify {
        config.verify = false;
    }
    if args.summary.is_some() {
        config.summary_file = args.summary.clone();
    }
    config.verbosity = config.verbosity.max(args.verbose);

    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Gather Summary".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    println!("  Participants: {}", summary.participants.to_string().green());
    println!("  Root: {}", summary.root);
    println!("  Steps: {}", summary.steps);
    println!("  Elements gathered: {}", summary.elements_gathered.to_string().green());
    println!(
        "  Elapsed: {}",
        format_duration(std::time::Duration::from_secs_f64(summary.elapsed_ms / 1000.0))
    );
    println!("  Collectives issued: {}", summary.total_traffic.collectives);
    println!("  Bytes moved: {}", format_bytes(summary.total_traffic.bytes_sent));

    if summary.mismatched_contributions == 0 {
        println!("  Mismatches: {}", "0".green());
    } else {
        println!("  Mismatches: {}", summary.mismatched_contributions.to_string().red().bold());
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    match &args.log_level {
        Some(level) => LoggingUtils::init_logger(LoggingUtils::level_from_str(level)),
        None => logging::init(config.verbosity),
    }

    println!("{}", "Collective Gather Demo".cyan().bold());
    println!("{}", "=".repeat(50).cyan());
    println!(
        "{} {} participants, {} steps, root {}",
        "[*]".blue(),
        config.participants,
        config.steps,
        config.root
    );

    let show_progress = !args.no_progress;
    let summary = if config.participants == 1 {
        run_participant(&SoloComm::new(), &config, show_progress)?
    } else {
        let results = LocalGroup::run(config.participants, |comm| {
            run_participant(comm, &config, show_progress)
        });

        let mut root_summary = None;
        for result in results {
            if let Some(summary) = result? {
                root_summary = Some(summary);
            }
        }
        root_summary
    };

    let summary = summary.context("root participant produced no summary")?;
    print_summary(&summary);

    if let Some(path) = &config.summary_file {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("{} Summary saved to: {}", "[+]".green(), path.display());
    }

    if summary.mismatched_contributions > 0 {
        anyhow::bail!("{} contributions did not survive the gather", summary.mismatched_contributions);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_log_level_flag() {
        let args = Args::try_parse_from(["gather-demo", "--log-level", "DEBUG"]).unwrap();
        let level = args.log_level.as_deref().map(LoggingUtils::level_from_str);
        assert_eq!(level, Some(LevelFilter::Debug));

        let args = Args::try_parse_from(["gather-demo", "-vv"]).unwrap();
        assert_eq!(args.log_level, None);
        assert_eq!(args.verbose, 2);
    }
}
