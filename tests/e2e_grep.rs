// GrepMark - tests/e2e_grep.rs
//
// End-to-end tests for the filter -> highlight -> page pipeline.
//
// These tests read the fixture log from disk, run it through the real
// orchestrator, and write the HTML result page to a temp directory. The
// last section drives the compiled binary the same way a user would.

use grepmark::app::orchestrator::{self, RunOutcome};
use grepmark::core::model::{ColoredWord, WordLists};
use grepmark::platform::fs::read_input_lines;
use grepmark::ui::page::{write_page, PageOptions};
use grepmark::ui::theme::Theme;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn job_words() -> WordLists {
    WordLists::new(
        vec!["Job".to_string()],
        vec!["DEBUG".to_string()],
        vec![
            ColoredWord::new("failed", "firebrick"),
            ColoredWord::new("queued", "teal"),
        ],
    )
}

/// Run the binary with isolated config and data directories.
fn grepmark(dirs: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_grepmark"))
        .arg("--config-dir")
        .arg(dirs.path().join("config"))
        .arg("--data-dir")
        .arg(dirs.path().join("data"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch grepmark")
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// =============================================================================
// Library pipeline
// =============================================================================

#[test]
fn e2e_fixture_filter_keeps_job_lines_without_debug() {
    let lines = read_input_lines(Some(&fixture("sample.log"))).unwrap();
    assert_eq!(lines.len(), 9);

    let result = match orchestrator::run(&lines, &job_words()) {
        RunOutcome::Rendered(r) => r,
        RunOutcome::NoMatches => panic!("fixture should match"),
    };

    assert_eq!(result.lines.len(), 5, "lines: {:#?}", result.lines);
    assert!(result.lines.iter().all(|l| l.contains("Job")));
    assert!(result.lines.iter().all(|l| !l.contains("DEBUG")));
}

#[test]
fn e2e_fixture_markup_is_escaped_and_highlighted() {
    let lines = read_input_lines(Some(&fixture("sample.log"))).unwrap();
    let RunOutcome::Rendered(result) = orchestrator::run(&lines, &job_words()) else {
        panic!("fixture should match");
    };

    let joined = result.lines.join("\n");
    assert!(joined.contains("retrying &lt;attempt 2&gt;"));
    assert!(joined.contains("disk &amp; quota"));
    assert!(joined.contains("<span class=\"highlight highlight-0\">failed</span>"));
    assert_eq!(
        joined
            .matches("<span class=\"highlight highlight-1\">queued</span>")
            .count(),
        2
    );
}

#[test]
fn e2e_fixture_without_matches_reports_no_matches() {
    let lines = read_input_lines(Some(&fixture("sample.log"))).unwrap();
    let words = WordLists::new(vec!["CRITICAL".to_string()], Vec::new(), Vec::new());
    assert_eq!(orchestrator::run(&lines, &words), RunOutcome::NoMatches);
}

#[test]
fn e2e_page_written_to_disk() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("result.html");
    let lines = read_input_lines(Some(&fixture("sample.log"))).unwrap();
    let RunOutcome::Rendered(result) = orchestrator::run(&lines, &job_words()) else {
        panic!("fixture should match");
    };

    let options = PageOptions {
        font_size: 18,
        wrap: true,
        theme: Theme::Dark,
        source: "sample.log".to_string(),
    };
    write_page(&result, &options, std::fs::File::create(&out).unwrap()).unwrap();

    let html = read(&out);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("font-size: 18px"));
    assert!(html.contains(".highlight-0::before"));
    assert_eq!(html.matches("<div class=\"log-line\">").count(), 5);
    assert!(html.contains("5 lines from sample.log"));
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn e2e_cli_run_writes_page_and_records_session() {
    let dirs = TempDir::new().unwrap();
    let out = dirs.path().join("out.html");
    let input = fixture("sample.log");

    let output = grepmark(
        &dirs,
        &[
            "run",
            input.to_str().unwrap(),
            "-g",
            "Job",
            "-v",
            "DEBUG",
            "-H",
            "failed=red",
            "-o",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(read(&out).contains("<span class=\"highlight highlight-0\">failed</span>"));

    // A second run without word options reuses the session's lists.
    let out2 = dirs.path().join("again.html");
    let output = grepmark(&dirs, &["run", input.to_str().unwrap(), "-o", out2.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(read(&out2).matches("<div class=\"log-line\">").count(), 5);

    let output = grepmark(&dirs, &["session"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("grep:      Job"), "stdout: {stdout}");
    assert!(stdout.contains("failed=red"));
}

#[test]
fn e2e_cli_run_reads_stdin_to_stdout() {
    use std::io::Write;
    use std::process::Stdio;

    let dirs = TempDir::new().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_grepmark"))
        .arg("--data-dir")
        .arg(dirs.path())
        .arg("--config-dir")
        .arg(dirs.path())
        .args(["run", "-g", "keep", "--no-session"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"keep <this>\ndrop this\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let html = String::from_utf8_lossy(&output.stdout);
    assert!(html.contains("<div class=\"log-line\">keep &lt;this&gt;</div>"));
    assert!(!html.contains("drop this"));
    assert!(!dirs.path().join("session.json").exists());
}

#[test]
fn e2e_cli_no_matches_is_not_an_error() {
    let dirs = TempDir::new().unwrap();
    let out = dirs.path().join("out.html");
    let input = fixture("sample.log");
    let output = grepmark(
        &dirs,
        &["run", input.to_str().unwrap(), "-g", "CRITICAL", "-o", out.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No matches found"));
    assert!(!out.exists());
}

#[test]
fn e2e_cli_missing_input_exits_with_error() {
    let dirs = TempDir::new().unwrap();
    let missing = dirs.path().join("missing.log");
    let output = grepmark(&dirs, &["run", missing.to_str().unwrap(), "-g", "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
