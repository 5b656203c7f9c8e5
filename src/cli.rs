// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every tuning flag can also come from an environment variable, so a cron
// job or CI step can configure the checker without a long command line.
// Precedence: flag > environment variable > built-in default.
// =============================================================================

use crate::checker::{
    CheckerConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_RETRY_DELAY_MS,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LINKS_FILE: &str = "public/links.json";

#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Re-checks every bookmark in a links.json file and marks dead ones as broken",
    long_about = "link-warden reads the dashboard's links.json, probes each URL over HTTP(S), \
                  flips `status` between \"active\" and \"broken\", and writes the file back once."
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe every link and update its status in place
    ///
    /// Example: link-warden check public/links.json --concurrency 8
    Check {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Output results in JSON format instead of progress lines
        #[arg(long)]
        json: bool,

        /// Exit with code 1 if any link is broken after the run
        #[arg(long)]
        fail_on_broken: bool,
    },

    /// Show how many links are active or broken, without checking anything
    Report {
        #[command(flatten)]
        store: StoreArgs,

        /// Output the report in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Path to the links JSON file
    #[arg(env = "LINK_WARDEN_FILE", default_value = DEFAULT_LINKS_FILE)]
    pub links_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct TuningArgs {
    /// Give up on a single request after this many milliseconds
    #[arg(long, env = "LINK_WARDEN_TIMEOUT_MS", default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Attempts per link before it is declared broken
    #[arg(
        long,
        env = "LINK_WARDEN_MAX_RETRIES",
        default_value_t = DEFAULT_MAX_RETRIES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, env = "LINK_WARDEN_RETRY_DELAY_MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// How many links to probe at once (1 = one after another)
    #[arg(long, env = "LINK_WARDEN_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

impl TuningArgs {
    pub fn to_config(&self) -> CheckerConfig {
        CheckerConfig {
            probe_timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            concurrency: self.concurrency,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pulls the fields of another Args struct into this subcommand
//    - `check` and `report` both take the links file without repeating it
//
// 2. How does `env = "..."` work?
//    - clap reads the variable only when the flag isn't on the command line
//    - Needs clap's "env" feature, enabled in Cargo.toml
//
// 3. Why flags in milliseconds instead of Duration?
//    - Plain numbers are easy to type and to put in an environment variable
//    - to_config() turns them into Durations in one place
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["link-warden", "check"]).unwrap();
        match cli.command {
            Commands::Check {
                store,
                tuning,
                json,
                fail_on_broken,
            } => {
                assert_eq!(store.links_file, PathBuf::from("public/links.json"));
                assert_eq!(tuning.to_config(), CheckerConfig::default());
                assert!(!json);
                assert!(!fail_on_broken);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_overrides() {
        let cli = Cli::try_parse_from([
            "link-warden",
            "check",
            "data/links.json",
            "--timeout-ms",
            "1000",
            "--max-retries",
            "3",
            "--retry-delay-ms",
            "50",
            "--concurrency",
            "8",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Check { store, tuning, json, .. } => {
                assert_eq!(store.links_file, PathBuf::from("data/links.json"));
                let config = tuning.to_config();
                assert_eq!(config.probe_timeout, Duration::from_millis(1000));
                assert_eq!(config.max_retries, 3);
                assert_eq!(config.retry_delay, Duration::from_millis(50));
                assert_eq!(config.concurrency, 8);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_retries_rejected() {
        let result = Cli::try_parse_from(["link-warden", "check", "--max-retries", "0"]);
        assert!(result.is_err());
    }
}
