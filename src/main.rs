//! Skirmish match runner CLI.
//!
//! Plays batches of two-ship duels and writes the match records as JSONL.
//!
//! Usage:
//!   skirmish [OPTIONS]
//!
//! Logging goes to stderr and honours `RUST_LOG`; records go to stdout unless
//! `--output` is given.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use skirmish::arena::{self, MatchSettings, SourceKind};
use skirmish::config::Config;
use skirmish::replay;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut settings = MatchSettings::default();
    let mut config_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => config_path = Some(value(&args, &mut i, flag).to_string()),
            "--matches" => settings.matches = parse(&args, &mut i, flag),
            "--max-turns" => settings.max_turns = parse(&args, &mut i, flag),
            "--seed" => settings.seed = parse(&args, &mut i, flag),
            "--threads" => settings.threads = parse(&args, &mut i, flag),
            "--source" => {
                let name = value(&args, &mut i, flag);
                settings.source = SourceKind::from_name(name).unwrap_or_else(|| {
                    eprintln!("Unknown source '{name}' (expected random or idle)");
                    process::exit(2);
                });
            }
            "--output" => output_path = Some(value(&args, &mut i, flag).to_string()),
            "--quiet" => settings.quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(2);
            }
        }
        i += 1;
    }

    init_tracing(settings.quiet);

    let config = match &config_path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    info!(
        matches = settings.matches,
        max_turns = settings.max_turns,
        seed = settings.seed,
        threads = settings.threads,
        source = ?settings.source,
        "starting batch"
    );

    let start = Instant::now();
    let records = match arena::run_matches(&config, &settings) {
        Ok(records) => records,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };
    info!(elapsed_secs = start.elapsed().as_secs_f64(), "batch complete");
    arena::log_summary(&records);

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            replay::write_jsonl(&records, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            replay::write_jsonl(&records, &mut writer)
        }
    };
    if let Err(err) = written {
        error!("failed to write match records: {err}");
        process::exit(1);
    }
    if let Some(path) = output_path {
        info!("wrote {} matches to {}", records.len(), path);
    }
}

/// Logs to stderr so stdout stays clean JSONL.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(2);
        }
    }
}

fn parse<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> T {
    let raw = value(args, i, flag);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid value for {flag}: '{raw}'");
        process::exit(2);
    })
}

fn print_usage() {
    eprintln!("Usage: skirmish [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE     Game config JSON (default: built-in reference values)");
    eprintln!("  --matches N       Number of matches to play (default: 10)");
    eprintln!("  --max-turns N     Turn limit per match (default: 20)");
    eprintln!("  --seed N          Base seed; match i uses seed + i (default: 0)");
    eprintln!("  --threads N       Worker threads (default: 4)");
    eprintln!("  --source KIND     Order source for both ships: random | idle (default: random)");
    eprintln!("  --output FILE     Write JSONL here instead of stdout");
    eprintln!("  --quiet           Only log warnings and errors");
    eprintln!("  --help            Show this help");
}
