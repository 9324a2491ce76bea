//! Export Paparazzi report images to stable, human-friendly file names.
//!
//! The HTML report stores images under hashed names. `runs/*.js` carries the
//! metadata mapping snapshot names to those files; the latest snapshot per
//! name is copied to `{name}.png` and listed in `INDEX.md`.

pub mod error;

pub use error::{ExportError, Result};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const INDEX_FILE: &str = "INDEX.md";

/// One screenshot entry from a run file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub name: String,
    #[serde(default)]
    pub test_name: String,
    pub timestamp: DateTime<Utc>,
    /// Path of the image relative to the report directory.
    pub file: String,
}

/// A copied screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub report_dir: PathBuf,
    pub out_dir: PathBuf,
    pub exported: Vec<Exported>,
    pub skipped: usize,
}

static RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)window\.runs\["(?P<run_id>[^"]+)"\]\s*=\s*(?P<payload>\[.*\])\s*;?\s*\z"#)
        .unwrap()
});
static UNSAFE_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

/// Parse the text of one `window.runs["<id>"] = [...];` file. `path` is only
/// used for error context.
pub fn parse_run(text: &str, path: &Path) -> Result<Vec<Snapshot>> {
    let caps = RUN_RE
        .captures(text.trim())
        .ok_or_else(|| ExportError::UnrecognizedRun(path.to_path_buf()))?;
    let payload = caps
        .name("payload")
        .map(|m| m.as_str())
        .ok_or_else(|| ExportError::UnrecognizedRun(path.to_path_buf()))?;

    serde_json::from_str(payload).map_err(|source| ExportError::Payload {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_run_file(path: &Path) -> Result<Vec<Snapshot>> {
    let text = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    parse_run(&text, path)
}

/// Trim, replace spaces with `_`, then collapse any run of characters outside
/// `[A-Za-z0-9._-]` into a single `_`.
pub fn safe_filename(name: &str) -> String {
    let spaced = name.trim().replace(' ', "_");
    UNSAFE_CHARS_RE.replace_all(&spaced, "_").into_owned()
}

/// `*.js` files directly under `runs_dir`, sorted by path.
fn run_files(runs_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(runs_dir).map_err(|e| ExportError::io(runs_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ExportError::io(runs_dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "js") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Latest snapshot per name across every run file. Later files win ties.
pub fn latest_snapshots(runs_dir: &Path) -> Result<BTreeMap<String, Snapshot>> {
    if !runs_dir.is_dir() {
        return Err(ExportError::MissingRunsDir(runs_dir.to_path_buf()));
    }

    let mut best: BTreeMap<String, Snapshot> = BTreeMap::new();
    for run_file in run_files(runs_dir)? {
        let snapshots = parse_run_file(&run_file)?;
        debug!(file = %run_file.display(), snapshots = snapshots.len(), "Parsed run");
        for snap in snapshots {
            let newer = best
                .get(&snap.name)
                .map_or(true, |prev| snap.timestamp >= prev.timestamp);
            if newer {
                best.insert(snap.name.clone(), snap);
            }
        }
    }
    Ok(best)
}

pub fn render_index(report_dir: &Path, exported: &[Exported]) -> String {
    let mut out = String::from("# Paparazzi Screenshots\n\n");
    out.push_str(&format!("Source report: `{}`\n\n", report_dir.display()));
    for item in exported {
        let file_name = item
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push_str(&format!("- `{}` -> `{}`\n", item.name, file_name));
    }
    out
}

/// Copy the latest snapshot of every name from `report_dir` into `out_dir`
/// and write the index. Snapshots whose image is missing are skipped.
pub fn export_screenshots(report_dir: &Path, out_dir: &Path) -> Result<ExportSummary> {
    let best = latest_snapshots(&report_dir.join("runs"))?;
    let report_dir = fs::canonicalize(report_dir).map_err(|e| ExportError::io(report_dir, e))?;

    fs::create_dir_all(out_dir).map_err(|e| ExportError::io(out_dir, e))?;
    let out_dir = fs::canonicalize(out_dir).map_err(|e| ExportError::io(out_dir, e))?;

    let mut exported = Vec::new();
    let mut skipped = 0;
    for (name, snap) in &best {
        let src = report_dir.join(&snap.file);
        if !src.is_file() {
            warn!(name = name.as_str(), file = %src.display(), "Screenshot missing, skipping");
            skipped += 1;
            continue;
        }
        let dst = out_dir.join(format!("{}.png", safe_filename(name)));
        fs::copy(&src, &dst).map_err(|e| ExportError::io(&src, e))?;
        exported.push(Exported {
            name: name.clone(),
            path: dst,
        });
    }

    let index_path = out_dir.join(INDEX_FILE);
    fs::write(&index_path, render_index(&report_dir, &exported))
        .map_err(|e| ExportError::io(&index_path, e))?;

    info!(exported = exported.len(), skipped, "Screenshot export complete");

    Ok(ExportSummary {
        report_dir,
        out_dir,
        exported,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("runs/run1.js")
    }

    #[test]
    fn parses_run_payload() {
        let text = r#"
window.runs["abc123"] = [
  {"name": "home screen", "testName": "HomeTest", "timestamp": "2026-02-16T02:00:04.835Z", "file": "images/aa.png"},
  {"name": "settings", "timestamp": "2026-02-16T02:00:05Z", "file": "images/bb.png"}
];
"#;
        let snaps = parse_run(text, &path()).unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].name, "home screen");
        assert_eq!(snaps[0].test_name, "HomeTest");
        assert_eq!(snaps[0].file, "images/aa.png");
        assert_eq!(snaps[1].test_name, "");
        assert!(snaps[1].timestamp > snaps[0].timestamp);
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        let text = r#"window.runs["r"] = []"#;
        assert!(parse_run(text, &path()).unwrap().is_empty());
    }

    #[test]
    fn unrecognized_format_names_the_file() {
        let err = parse_run("var x = 1;", &path()).unwrap_err();
        assert!(matches!(err, ExportError::UnrecognizedRun(_)));
        assert!(err.to_string().contains("runs/run1.js"));
    }

    #[test]
    fn bad_json_payload_is_an_error() {
        let err = parse_run(r#"window.runs["r"] = [{"name": 1}];"#, &path()).unwrap_err();
        assert!(matches!(err, ExportError::Payload { .. }));
    }

    #[test]
    fn safe_filename_normalizes() {
        assert_eq!(safe_filename("  home screen  "), "home_screen");
        assert_eq!(safe_filename("a/b:c"), "a_b_c");
        assert_eq!(safe_filename("dark mode (large)"), "dark_mode__large_");
        assert_eq!(safe_filename("ok-name_1.v2"), "ok-name_1.v2");
        assert_eq!(safe_filename("émoji✓"), "_moji_");
    }

    #[test]
    fn index_lists_exported_files() {
        let exported = vec![Exported {
            name: "home screen".to_string(),
            path: PathBuf::from("/out/home_screen.png"),
        }];
        let index = render_index(Path::new("/report"), &exported);
        assert_eq!(
            index,
            "# Paparazzi Screenshots\n\nSource report: `/report`\n\n- `home screen` -> `home_screen.png`\n"
        );
    }
}
