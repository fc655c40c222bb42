//! CLI entry point for the fireplan rebalancer.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use fireplan_rebalancer::config::Config;
use fireplan_rebalancer::error::Error;
use fireplan_rebalancer::plan::{self, PlanOptions};
use fireplan_rebalancer::report::SortKey;
use fireplan_rebalancer::snapshot::JsonFileRepository;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "FIRE asset-allocation planner: per-asset and per-class rebalancing deltas")]
#[command(version)]
struct Cli {
    /// Path to rebalancer.toml (defaults apply if it does not exist)
    #[arg(long, default_value = "rebalancer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute deltas and actions, run target checks, report drift
    Plan {
        /// Path to snapshot.json
        snapshot: PathBuf,

        /// Asset table order: input, value, delta, name or class
        #[arg(long, default_value = "input", value_parser = SortKey::from_str)]
        sort: SortKey,

        /// Print a JSON document instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a snapshot only
    Validate {
        /// Path to snapshot.json
        snapshot: PathBuf,
    },

    /// Show class drift against targets
    Drift {
        /// Path to snapshot.json
        snapshot: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Plan {
            snapshot,
            sort,
            json,
        } => {
            let repo = JsonFileRepository::new(snapshot);
            let opts = PlanOptions {
                sort,
                json,
            };
            plan::run_plan(&config, &repo, &opts).map(|_| ())
        }
        Command::Validate { snapshot } => {
            plan::run_validate(&JsonFileRepository::new(snapshot)).map(|_| ())
        }
        Command::Drift { snapshot } => {
            plan::run_drift(&config, &JsonFileRepository::new(snapshot)).map(|_| ())
        }
    };

    if let Err(e) = result {
        match &e {
            Error::ChecksFailed(msg) => {
                eprintln!("\nAborted: target checks failed: {msg}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_sort_defaults_to_input() {
        let cli = Cli::try_parse_from(["rebalancer", "plan", "snap.json"]).unwrap();
        match cli.command {
            Command::Plan { sort, json, .. } => {
                assert_eq!(sort, SortKey::Input);
                assert!(!json);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn plan_sort_parses_through_sort_key() {
        let cli =
            Cli::try_parse_from(["rebalancer", "plan", "snap.json", "--sort", "Delta", "--json"])
                .unwrap();
        match cli.command {
            Command::Plan { sort, json, .. } => {
                assert_eq!(sort, SortKey::Delta);
                assert!(json);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn plan_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["rebalancer", "plan", "snap.json", "--sort", "size"]).is_err());
    }
}
