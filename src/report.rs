// src/report.rs
// =============================================================================
// Everything the user sees on stdout: progress lines, summaries, and the
// JSON documents printed with --json.
//
// Logs go to stderr through tracing; this module only prints results.
// =============================================================================

use crate::runner::{RunSummary, SummaryDocument, Transition};
use crate::store::LinkRecord;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// One line per record, e.g. `  Checking: Team wiki            ✅ ACTIVE`
pub fn progress_line(record: &LinkRecord, transition: Transition) -> String {
    format!("  Checking: {:<40} {}", record.title(), format_transition(transition))
}

pub fn format_transition(transition: Transition) -> &'static str {
    match transition {
        Transition::Active => "✅ ACTIVE",
        Transition::Broken => "❌ BROKEN",
        Transition::Fixed => "✅ FIXED",
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n📊 Summary:");
    println!("  Total links: {}", summary.total);
    println!("  Active links: {}", summary.active_after);
    println!("  Broken links: {}", summary.broken_after);
    println!("  Status changes: {}\n", summary.changes());
}

#[derive(Serialize)]
struct CheckedLink<'a> {
    id: &'a Value,
    title: &'a str,
    url: &'a str,
    result: Transition,
}

#[derive(Serialize)]
struct CheckDocument<'a> {
    summary: SummaryDocument,
    results: Vec<CheckedLink<'a>>,
}

/// Builds the --json output of `check`.
///
/// `transitions` holds one entry per record, in the same order.
pub fn check_json(
    records: &[LinkRecord],
    transitions: &[Transition],
    summary: RunSummary,
) -> Result<String> {
    let results = records
        .iter()
        .zip(transitions)
        .map(|(record, &result)| CheckedLink {
            id: record.id(),
            title: record.title(),
            url: record.url(),
            result,
        })
        .collect();

    let doc = CheckDocument {
        summary: summary.into(),
        results,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    total: usize,
    active: usize,
    broken: usize,
    broken_links: Vec<BrokenLink<'a>>,
}

#[derive(Serialize)]
struct BrokenLink<'a> {
    id: &'a Value,
    title: &'a str,
    url: &'a str,
}

/// Prints the current state of the list (the `report` command).
pub fn print_status_report(records: &[LinkRecord], json: bool) -> Result<()> {
    let counts = RunSummary::snapshot(records);
    let broken: Vec<BrokenLink> = records
        .iter()
        .filter(|r| r.status().is_broken())
        .map(|r| BrokenLink {
            id: r.id(),
            title: r.title(),
            url: r.url(),
        })
        .collect();

    if json {
        let report = StatusReport {
            total: counts.total,
            active: counts.active_after,
            broken: counts.broken_after,
            broken_links: broken,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Link status:");
    println!("  Total links: {}", counts.total);
    println!("  Active links: {}", counts.active_after);
    println!("  Broken links: {}", counts.broken_after);

    if !broken.is_empty() {
        println!("\n{:<40} {}", "TITLE", "URL");
        println!("{}", "=".repeat(80));
        for link in &broken {
            println!("{:<40} {}", truncate(link.title, 38), link.url);
        }
    }
    Ok(())
}

// Cuts on a char boundary so multi-byte titles don't panic
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
