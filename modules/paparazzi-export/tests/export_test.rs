use std::fs;
use std::path::Path;

use paparazzi_export::{export_screenshots, ExportError, INDEX_FILE};

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn run_file(run_id: &str, items: &str) -> String {
    format!("window.runs[\"{run_id}\"] = [{items}];\n")
}

#[test]
fn latest_snapshot_per_name_wins() {
    let report = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let r = report.path();

    write(
        &r.join("runs/a.js"),
        run_file(
            "a",
            r#"{"name": "home", "testName": "T", "timestamp": "2026-02-16T02:00:00Z", "file": "images/old.png"},
               {"name": "settings", "testName": "T", "timestamp": "2026-02-16T02:00:00Z", "file": "images/set.png"}"#,
        )
        .as_bytes(),
    );
    write(
        &r.join("runs/b.js"),
        run_file(
            "b",
            r#"{"name": "home", "testName": "T", "timestamp": "2026-02-16T03:00:00Z", "file": "images/new.png"}"#,
        )
        .as_bytes(),
    );
    write(&r.join("images/old.png"), b"old");
    write(&r.join("images/new.png"), b"new");
    write(&r.join("images/set.png"), b"set");

    let summary = export_screenshots(r, out.path()).unwrap();

    assert_eq!(summary.exported.len(), 2);
    assert_eq!(fs::read(out.path().join("home.png")).unwrap(), b"new");
    assert_eq!(fs::read(out.path().join("settings.png")).unwrap(), b"set");
}

#[test]
fn equal_timestamps_prefer_later_run_file() {
    let report = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let r = report.path();
    let ts = "2026-02-16T02:00:00.500Z";

    write(
        &r.join("runs/1.js"),
        run_file("1", &format!(r#"{{"name": "x", "timestamp": "{ts}", "file": "one.png"}}"#)).as_bytes(),
    );
    write(
        &r.join("runs/2.js"),
        run_file("2", &format!(r#"{{"name": "x", "timestamp": "{ts}", "file": "two.png"}}"#)).as_bytes(),
    );
    write(&r.join("one.png"), b"1");
    write(&r.join("two.png"), b"2");

    export_screenshots(r, out.path()).unwrap();
    assert_eq!(fs::read(out.path().join("x.png")).unwrap(), b"2");
}

#[test]
fn missing_images_are_skipped_and_left_out_of_index() {
    let report = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let r = report.path();

    write(
        &r.join("runs/a.js"),
        run_file(
            "a",
            r#"{"name": "gone screen", "timestamp": "2026-02-16T02:00:00Z", "file": "images/gone.png"},
               {"name": "home screen", "timestamp": "2026-02-16T02:00:00Z", "file": "images/home.png"}"#,
        )
        .as_bytes(),
    );
    write(&r.join("images/home.png"), b"png");

    let summary = export_screenshots(r, out.path()).unwrap();
    assert_eq!(summary.exported.len(), 1);
    assert_eq!(summary.skipped, 1);
    assert!(!out.path().join("gone_screen.png").exists());

    let index = fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
    assert!(index.starts_with("# Paparazzi Screenshots\n\nSource report: `"));
    assert!(index.contains("- `home screen` -> `home_screen.png`\n"));
    assert!(!index.contains("gone"));
}

#[test]
fn missing_runs_dir_is_fatal() {
    let report = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let err = export_screenshots(report.path(), &out.path().join("shots")).unwrap_err();
    assert!(matches!(err, ExportError::MissingRunsDir(_)));
    assert!(!out.path().join("shots").exists());
}

#[test]
fn malformed_run_file_is_fatal() {
    let report = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write(&report.path().join("runs/bad.js"), b"console.log('nope');");
    write(&report.path().join("runs/notes.txt"), b"ignored");

    let err = export_screenshots(report.path(), out.path()).unwrap_err();
    assert!(matches!(err, ExportError::UnrecognizedRun(ref p) if p.ends_with("bad.js")));
}
