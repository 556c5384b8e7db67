//! End-to-end runs of the built binary against stub sync scripts.

use std::path::Path;
use std::process::{Command, Output};

fn run_launcher(base_dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-sync-runner"))
        .arg("--base-dir")
        .arg(base_dir)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run git-sync-runner")
}

fn write_script(base_dir: &Path, body: &str) {
    std::fs::write(base_dir.join("auto_git_sync.sh"), body).unwrap();
}

#[test]
fn script_exit_is_recorded_and_launcher_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "echo boom >&2\nexit 3\n");

    let output = run_launcher(dir.path(), &[]);
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));

    let error_log = std::fs::read_to_string(dir.path().join("sync_error.log")).unwrap();
    assert!(error_log.contains("Git sync process terminated unexpectedly"));
    assert!(error_log.contains("Return code: 3"));
    assert!(error_log.contains("boom"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Starting RebasedCode Git Sync process..."));
    assert!(stdout.contains(&format!(
        "Script path: {}",
        dir.path().join("auto_git_sync.sh").display()
    )));
}

#[test]
fn startup_log_has_announcement_and_path() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "exit 0\n");

    let output = run_launcher(dir.path(), &[]);
    assert!(!output.status.success());

    let startup = std::fs::read_to_string(dir.path().join("sync_log.txt")).unwrap();
    let lines: Vec<&str> = startup.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(": Starting RebasedCode Git Sync Runner"));
    assert!(lines[1].ends_with(&format!(
        ": Script path: {}",
        dir.path().join("auto_git_sync.sh").display()
    )));
}

#[test]
fn missing_script_records_exception_only() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_launcher(dir.path(), &[]);
    assert!(!output.status.success());

    let error_log = std::fs::read_to_string(dir.path().join("sync_error.log")).unwrap();
    assert_eq!(error_log.lines().count(), 1);
    assert!(error_log.contains("Exception running git sync script"));
    assert!(!error_log.contains("terminated unexpectedly"));
}

#[test]
fn config_file_overrides_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("git-sync-runner.toml"),
        "[script]\nfile_name = \"loop.sh\"\n\n[logs]\nerror_log = \"errors.txt\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("loop.sh"), "exit 7\n").unwrap();

    let output = run_launcher(dir.path(), &[]);
    assert!(!output.status.success());

    let error_log = std::fs::read_to_string(dir.path().join("errors.txt")).unwrap();
    assert!(error_log.contains("Return code: 7"));
    assert!(!dir.path().join("sync_error.log").exists());
}

#[test]
fn dry_run_does_not_launch() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "exit 3\n");

    let output = run_launcher(dir.path(), &["--dry-run"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("auto_git_sync.sh (found)"));
    assert!(!dir.path().join("sync_log.txt").exists());
    assert!(!dir.path().join("sync_error.log").exists());
}
