// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, filtered by RUST_LOG)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code:
//      0   = run finished (broken links are a result, not a failure)
//      1   = broken links remain and --fail-on-broken was given
//      2   = fatal error (could not read or write the links file, bad flags)
//      130 = interrupted with Ctrl+C
// =============================================================================

mod checker;
mod cli;
mod report;
mod runner;
mod store;

use anyhow::{Context, Result};
use checker::{CheckerConfig, HttpProber};
use clap::Parser;
use cli::{Cli, Commands};
use runner::{BatchRunner, CheckError};
use std::path::Path;
use store::{JsonFileStore, LinkStore};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // The links file is replaced with a single rename at the very end of a
    // check, so dropping the run future here can never leave it half-written.
    // It may already hold this run's results, though: Ctrl+C can land after
    // the rename but before we print anything.
    let exit_code = tokio::select! {
        result = run(cli) => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("❌ Error: {:#}", e);
                2
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!(
                "\n⚠️  Interrupted: links file holds the old list or this run's results, never a mix"
            );
            130
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            store,
            tuning,
            json,
            fail_on_broken,
        } => handle_check(&store.links_file, tuning.to_config(), json, fail_on_broken).await,
        Commands::Report { store, json } => handle_report(&store.links_file, json).await,
    }
}

// Handles the 'check' subcommand
async fn handle_check(
    path: &Path,
    config: CheckerConfig,
    json: bool,
    fail_on_broken: bool,
) -> Result<i32> {
    config.validate()?;

    let store = JsonFileStore::new(path);
    let prober = HttpProber::new(config.probe_timeout).context("failed to build HTTP client")?;
    let runner = BatchRunner::from_config(prober, &config);

    if !json {
        println!("🔍 Checking links in {}...\n", store.path().display());
    }

    let mut transitions = Vec::new();
    let (records, summary) = runner::check_links(&store, &runner, |_, record, transition| {
        if !json {
            println!("{}", report::progress_line(record, transition));
        }
        transitions.push(transition);
    })
    .await?;

    if json {
        println!("{}", report::check_json(&records, &transitions, summary)?);
    } else {
        println!("\n💾 Saved results to {}", store.path().display());
        report::print_summary(&summary);
    }

    if fail_on_broken && summary.broken_after > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Handles the 'report' subcommand: read-only, no network
async fn handle_report(path: &Path, json: bool) -> Result<i32> {
    let store = JsonFileStore::new(path);
    let records = store.load().await.map_err(CheckError::StoreRead)?;
    report::print_status_report(&records, json)?;
    Ok(0)
}
