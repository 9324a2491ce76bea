// Markdown and JSON emitters for a finished scan.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{AppRecord, CategoryRollup, Signal, SourceStatus, Task};

pub const REPORT_MD: &str = "market_scan_latest.md";
pub const REPORT_JSON: &str = "market_scan_latest.json";
pub const TASKS_MD: &str = "ui_ux_tasks_latest.md";

/// Full structured payload written to `market_scan_latest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: String,
    pub country: String,
    pub lang: String,
    pub reviews_per_app: u32,
    pub hits_per_query: usize,
    pub min_installs: u64,
    pub max_apps: usize,
    pub sources: Vec<SourceStatus>,
    /// Non-empty when the store could not be used at all.
    pub play_error: String,
    pub candidate_count: usize,
    /// Candidates whose metadata fetch failed, with the error on each row.
    #[serde(default)]
    pub fetch_errors: Vec<AppRecord>,
    pub selected_apps: Vec<AppRecord>,
    pub category_rollups: Vec<CategoryRollup>,
    pub uiux_tasks: Vec<Task>,
}

/// Signals shown as columns in the markdown signal table.
const TABLE_SIGNALS: [Signal; 6] = [
    Signal::Paywall,
    Signal::Bugs,
    Signal::Bypass,
    Signal::UiConfusion,
    Signal::Ads,
    Signal::Effective,
];

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn signal_header() -> (String, String) {
    let names: Vec<&str> = TABLE_SIGNALS.iter().map(|s| s.label()).collect();
    let header = format!("{} %", names.join(" % | "));
    let align = vec!["---:"; TABLE_SIGNALS.len()].join("|");
    (header, align)
}

fn sources_section(out: &mut String, sources: &[SourceStatus]) {
    let _ = writeln!(out, "## Source Reachability\n");
    let _ = writeln!(out, "| Source | HTTP | Data access | Notes |");
    let _ = writeln!(out, "|---|---:|:---:|---|");
    for s in sources {
        let note = if s.error.is_empty() { &s.final_url } else { &s.error };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            s.name,
            s.status,
            yes_no(s.data_accessible),
            note
        );
    }
    out.push('\n');
}

/// Render `market_scan_latest.md`.
pub fn render_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Market Intelligence Report\n");
    let _ = writeln!(out, "- Generated at (UTC): `{}`", report.generated_at);
    let _ = writeln!(
        out,
        "- Scope: Play Store country `{}`, language `{}`, newest `{}` reviews/app",
        report.country.to_uppercase(),
        report.lang,
        report.reviews_per_app
    );
    let _ = writeln!(
        out,
        "- Discovery: `{}` candidates, `{}` hits/query, min installs `{}`, up to `{}` apps\n",
        report.candidate_count, report.hits_per_query, report.min_installs, report.max_apps
    );

    sources_section(&mut out, &report.sources);

    let _ = writeln!(out, "## Competitor Snapshot\n");
    let _ = writeln!(
        out,
        "| App | Package | Category | Developer | Installs | Score | Ratings | Review sample |"
    );
    let _ = writeln!(out, "|---|---|---|---|---:|---:|---:|---:|");
    for app in &report.selected_apps {
        let sample = match app.review_signals {
            Some(ref sig) => sig.total_reviews.to_string(),
            None => "n/a".to_string(),
        };
        let _ = writeln!(
            out,
            "| {} | `{}` | {} | {} | {} | {} | {} | {} |",
            app.title,
            app.app_id(),
            app.category,
            opt(app.developer.as_deref()),
            app.installs,
            opt(app.score.map(|s| format!("{s:.2}"))),
            opt(app.ratings),
            sample
        );
    }
    out.push('\n');

    let failed: Vec<&AppRecord> = report
        .fetch_errors
        .iter()
        .chain(report.selected_apps.iter().filter(|a| !a.is_ok()))
        .collect();
    if !failed.is_empty() {
        let _ = writeln!(out, "## Fetch Errors\n");
        let _ = writeln!(out, "| App | Package | Kind | Error |");
        let _ = writeln!(out, "|---|---|---|---|");
        for app in failed {
            let (kind, message) = app
                .error
                .as_ref()
                .map(|e| (e.kind.as_str(), e.message.as_str()))
                .unwrap_or(("unknown", ""));
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | {} |",
                app.title,
                app.app_id(),
                kind,
                message
            );
        }
        out.push('\n');
    }

    let (header, align) = signal_header();
    let _ = writeln!(out, "## Newest Review Signals\n");
    let _ = writeln!(out, "| App | Low-star % | High-star % | {header} |");
    let _ = writeln!(out, "|---|---:|---:|{align}|");
    for app in &report.selected_apps {
        match &app.review_signals {
            Some(sig) => {
                let cells: Vec<String> = TABLE_SIGNALS
                    .iter()
                    .map(|s| format!("{:.1}", sig.pct(*s)))
                    .collect();
                let _ = writeln!(
                    out,
                    "| {} | {:.1} | {:.1} | {} |",
                    app.title,
                    sig.low_star_pct,
                    sig.high_star_pct,
                    cells.join(" | ")
                );
            }
            None => {
                let na = vec!["n/a"; TABLE_SIGNALS.len() + 2].join(" | ");
                let _ = writeln!(out, "| {} | {} |", app.title, na);
            }
        }
    }
    out.push('\n');

    let _ = writeln!(out, "## Category Rollups\n");
    if report.category_rollups.is_empty() {
        let _ = writeln!(out, "_No sampled reviews._\n");
    } else {
        let _ = writeln!(out, "| Category | Apps | Reviews | Low-star % | {header} |");
        let _ = writeln!(out, "|---|---:|---:|---:|{align}|");
        for r in &report.category_rollups {
            let cells: Vec<String> = TABLE_SIGNALS
                .iter()
                .map(|s| format!("{:.1}", r.pct(*s)))
                .collect();
            let _ = writeln!(
                out,
                "| {} | {} | {} | {:.1} | {} |",
                r.category,
                r.app_count,
                r.total_reviews,
                r.low_star_pct,
                cells.join(" | ")
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Priority UI/UX Tasks\n");
    for t in &report.uiux_tasks {
        let _ = writeln!(out, "- **{}** {}", t.priority, t.title);
    }
    let _ = writeln!(out, "\nFull backlog: `{TASKS_MD}`\n");

    let _ = writeln!(out, "## Product Implications (UI/UX + Growth)\n");
    let _ = writeln!(out, "- Onboarding value must be visible in the first session: lock state, default browser state, and next action.");
    let _ = writeln!(out, "- Trust and reliability are conversion-critical: show clear permission status and real-time protection state.");
    let _ = writeln!(out, "- Paywall friction is a known competitor complaint: keep free value obvious before asking for upgrades.");
    let _ = writeln!(out, "- Bypass complaints indicate weak guard design: emphasize tamper-resistance UX and transparent lock timing.");

    out
}

/// Render the reduced report written when the store could not be reached.
pub fn render_fallback_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Market Intelligence Report\n");
    let _ = writeln!(out, "- Generated at (UTC): `{}`", report.generated_at);
    let _ = writeln!(out, "- Error: `{}`\n", report.play_error);
    sources_section(&mut out, &report.sources);
    let _ = writeln!(out, "Check network access to play.google.com and rerun:\n");
    let _ = writeln!(out, "```bash");
    let _ = writeln!(out, "cargo run -p market-scan -- --out-dir <dir>");
    let _ = writeln!(out, "```");
    out
}

/// Render `ui_ux_tasks_latest.md`.
pub fn render_tasks_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# UI/UX Task Backlog\n");
    let _ = writeln!(out, "- Generated at (UTC): `{}`", report.generated_at);
    let _ = writeln!(
        out,
        "- Derived from `{}` review-sampled competitors\n",
        report
            .selected_apps
            .iter()
            .filter(|a| a.review_sample_size() > 0)
            .count()
    );

    let _ = writeln!(out, "| Priority | Task | Rationale | Success metric |");
    let _ = writeln!(out, "|---|---|---|---|");
    for t in &report.uiux_tasks {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            t.priority, t.title, t.rationale, t.success_metric
        );
    }

    let _ = writeln!(out, "\n## Feature Packaging Draft\n");
    let _ = writeln!(out, "### Free");
    let _ = writeln!(out, "- Porn, gambling and custom domain blocking");
    let _ = writeln!(out, "- Safe browser with enforced SafeSearch");
    let _ = writeln!(out, "- Protection status dashboard and permission checklist");
    let _ = writeln!(out, "- Basic lock timer for settings changes\n");
    let _ = writeln!(out, "### Premium");
    let _ = writeln!(out, "- Accountability partner reports");
    let _ = writeln!(out, "- Scheduled focus sessions and app-level blocking");
    let _ = writeln!(out, "- Extended lock durations with tamper alerts");
    let _ = writeln!(out, "- Multi-device sync");
    out
}

/// Write all report files into `out_dir`, creating it if needed.
/// Returns the written paths in write order.
pub fn write_reports(out_dir: &Path, report: &ScanReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir {}", out_dir.display()))?;

    let markdown = if report.play_error.is_empty() {
        render_markdown(report)
    } else {
        render_fallback_markdown(report)
    };

    let mut written = Vec::new();
    let md_path = out_dir.join(REPORT_MD);
    fs::write(&md_path, markdown)
        .with_context(|| format!("Failed to write {}", md_path.display()))?;
    written.push(md_path);

    let json_path = out_dir.join(REPORT_JSON);
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    written.push(json_path);

    if report.play_error.is_empty() {
        let tasks_path = out_dir.join(TASKS_MD);
        fs::write(&tasks_path, render_tasks_markdown(report))
            .with_context(|| format!("Failed to write {}", tasks_path.display()))?;
        written.push(tasks_path);
    }

    Ok(written)
}
