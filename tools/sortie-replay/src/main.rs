//! sortie-replay: run a seeded battle headless and check determinism.
//!
//! Usage:
//!   sortie-replay run --seed 7 --ticks 3000 --every 300
//!   sortie-replay verify --seed 7 --ticks 3000

use std::path::PathBuf;
use std::process;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sortie_core::commands::SimCommand;
use sortie_core::config::SimConfig;
use sortie_core::events::SimEvent;
use sortie_core::state::Snapshot;
use sortie_sim::SimulationEngine;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "verify" => cmd_verify(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "sortie-replay: headless SORTIE battle runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run one battle and print a digest line every N ticks\n\
         \n\
           --seed <N>       RNG seed (default: from config, else 0)\n\
           --ticks <N>      Ticks to simulate (default: 1800)\n\
           --every <N>      Digest interval in ticks (default: 300)\n\
           --config <path>  JSON SimConfig file (optional)\n\
         \n\
         verify    Run two engines side by side and compare every snapshot\n\
         \n\
           --seed <N>       RNG seed\n\
           --ticks <N>      Ticks to simulate (default: 1800)\n\
           --config <path>  JSON SimConfig file (optional)\n\
         \n\
         Logging is controlled with RUST_LOG, e.g. RUST_LOG=sortie_sim=debug\n"
    );
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn load_config(args: &[String]) -> SimConfig {
    let mut config = match parse_flag::<PathBuf>(args, "--config") {
        Some(path) => match SimConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: cannot load {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(seed) = parse_flag::<u64>(args, "--seed") {
        config.seed = seed;
    }
    config
}

fn new_engine(config: SimConfig) -> SimulationEngine {
    match SimulationEngine::new(config) {
        Ok(mut engine) => {
            engine.queue_command(SimCommand::StartBattle);
            engine
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

// --- Run command ---

#[derive(Default)]
struct Tally {
    hits: usize,
    destroyed: usize,
    missiles: usize,
    deployed: u32,
    captured: usize,
}

impl Tally {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::Hit { .. } => self.hits += 1,
                SimEvent::Destroyed { .. } => self.destroyed += 1,
                SimEvent::MissileLaunched { .. } => self.missiles += 1,
                SimEvent::Deployed { count, .. } => self.deployed += count,
                SimEvent::Captured { .. } => self.captured += 1,
                _ => {}
            }
        }
    }
}

fn digest(snapshot: &Snapshot, tally: &Tally) -> String {
    format!(
        "tick {:>6}  t={:>7.1}s  units {:>4}  hits {:>5}  destroyed {:>4}  missiles {:>3}  deployed {:>3}  captured {:>2}",
        snapshot.time.tick,
        snapshot.time.elapsed_secs,
        snapshot.live_units(),
        tally.hits,
        tally.destroyed,
        tally.missiles,
        tally.deployed,
        tally.captured,
    )
}

fn cmd_run(args: &[String]) {
    let config = load_config(args);
    let ticks: u64 = parse_flag(args, "--ticks").unwrap_or(1800);
    let every: u64 = parse_flag::<u64>(args, "--every").unwrap_or(300).max(1);

    info!(seed = config.seed, ticks, "run");
    println!("seed {}  difficulty {:?}", config.seed, config.difficulty);

    let mut engine = new_engine(config);
    let mut tally = Tally::default();
    for _ in 0..ticks {
        let snapshot = engine.tick();
        tally.record(&snapshot.events);
        if snapshot.time.tick % every == 0 {
            println!("{}", digest(&snapshot, &tally));
        }
    }
}

// --- Verify command ---

fn cmd_verify(args: &[String]) {
    let config = load_config(args);
    let ticks: u64 = parse_flag(args, "--ticks").unwrap_or(1800);

    let mut a = new_engine(config.clone());
    let mut b = new_engine(config.clone());

    for _ in 0..ticks {
        let (snap_a, snap_b) = (a.tick(), b.tick());
        let (json_a, json_b) = match (snap_a.to_json(), snap_b.to_json()) {
            (Ok(x), Ok(y)) => (x, y),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("Error: snapshot serialization failed: {e}");
                process::exit(1);
            }
        };
        if json_a != json_b {
            warn!(tick = snap_a.time.tick, "engines diverged");
            println!("DIVERGED at tick {} (seed {})", snap_a.time.tick, config.seed);
            process::exit(1);
        }
    }

    println!("OK: {ticks} ticks identical (seed {})", config.seed);
}
