mod debug_report;

use serde::Deserialize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use turnout::{Classifier, Inventory, MissionRecord, Options, PriorityClass, plan_dispatch};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing();

    let data = match turnout::load_dir(&config.catalog) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let classifier = Classifier::compile(&data);

    let mut snapshot = match read_snapshot(&config.snapshot) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    // Snapshots rarely carry an explicit priority; derive it from the name
    // the way the scraper tags incomplete/alliance missions.
    for mission in &mut snapshot.missions {
        if mission.priority == PriorityClass::Normal {
            mission.priority = PriorityClass::from_name(&mission.name);
        }
    }

    let options = Options { process_alliance: !config.skip_alliance };
    let plans = plan_dispatch(&classifier, &snapshot.missions, &snapshot.inventory, &options);
    debug_report::print_pass(&snapshot.missions, &plans, config.color);
}

/// One saved world snapshot: the scraped inventory plus the open missions.
#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    inventory: Inventory,
    #[serde(default)]
    missions: Vec<MissionRecord>,
}

fn read_snapshot(path: &PathBuf) -> Result<Snapshot, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| format!("failed to parse {}: {err}", path.display()))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

struct CliConfig {
    catalog: PathBuf,
    snapshot: PathBuf,
    skip_alliance: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut catalog: Option<PathBuf> = None;
    let mut snapshot: Option<PathBuf> = None;
    let mut skip_alliance = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("turnout {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--skip-alliance" => skip_alliance = true,
            "--catalog" => {
                let value = args.next().ok_or_else(|| "error: --catalog expects a value".to_string())?;
                catalog = Some(PathBuf::from(value));
            }
            "--snapshot" => {
                let value = args.next().ok_or_else(|| "error: --snapshot expects a value".to_string())?;
                snapshot = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--catalog=") => {
                catalog = Some(PathBuf::from(arg.trim_start_matches("--catalog=")));
            }
            _ if arg.starts_with("--snapshot=") => {
                snapshot = Some(PathBuf::from(arg.trim_start_matches("--snapshot=")));
            }
            _ => return Err(format!("error: unexpected argument '{arg}' (try --help)")),
        }
    }

    Ok(CliConfig {
        catalog: catalog.ok_or_else(|| "error: --catalog <dir> is required".to_string())?,
        snapshot: snapshot.ok_or_else(|| "error: --snapshot <file> is required".to_string())?,
        skip_alliance,
        color,
    })
}

fn print_help() {
    println!(
        "turnout — rule-driven dispatch allocation for dispatch-simulation games

USAGE:
    turnout --catalog <dir> --snapshot <file> [OPTIONS]

OPTIONS:
    --catalog <dir>      Directory of JSON rule files (plus categories.json)
    --snapshot <file>    JSON world snapshot: inventory, tanks, missions
    --skip-alliance      Do not process alliance missions
    --color / --no-color Force colored output on or off
    -h, --help           Print this help
    -V, --version        Print version

Set RUST_LOG (e.g. RUST_LOG=turnout=debug) for classification and
allocation traces."
    );
}
