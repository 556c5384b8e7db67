/// Log records written by the launcher and the append-only writer behind them.
///
/// Every record starts with a local timestamp (`YYYY-MM-DD HH:MM:SS: `).
/// Files are opened in append mode and created on first use; nothing here
/// ever truncates or rewrites a log.
use chrono::{DateTime, Local};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Announcement line written first on every start.
pub const STARTUP_MESSAGE: &str = "Starting RebasedCode Git Sync Runner";

/// Format a timestamp the way every log line expects it.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReport {
    /// Normal exit with a status code.
    Code(i32),
    /// Killed by a signal.
    Signal(i32),
}

impl ExitReport {
    /// Numeric return code; signals are reported as the negated signal number.
    pub fn return_code(&self) -> i32 {
        match self {
            ExitReport::Code(code) => *code,
            ExitReport::Signal(sig) => -sig,
        }
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.return_code())
    }
}

/// Startup entry: the announcement and the resolved script path.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub at: DateTime<Local>,
    pub script_path: PathBuf,
}

impl LaunchRecord {
    pub fn now(script_path: &Path) -> Self {
        Self {
            at: Local::now(),
            script_path: script_path.to_path_buf(),
        }
    }
}

impl fmt::Display for LaunchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = format_timestamp(&self.at);
        writeln!(f, "{ts}: {STARTUP_MESSAGE}")?;
        writeln!(f, "{ts}: Script path: {}", self.script_path.display())
    }
}

/// Written once the child has exited, which it is never supposed to do.
#[derive(Debug, Clone)]
pub struct TerminationRecord {
    pub at: DateTime<Local>,
    pub exit: ExitReport,
    /// Captured stderr, verbatim. Empty means the child wrote nothing.
    pub stderr: String,
}

impl fmt::Display for TerminationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: Git sync process terminated unexpectedly",
            format_timestamp(&self.at)
        )?;
        writeln!(f, "Return code: {}", self.exit)?;
        if !self.stderr.is_empty() {
            writeln!(f, "Error output: {}", self.stderr)?;
        }
        Ok(())
    }
}

/// Written when the launch itself failed.
#[derive(Debug, Clone)]
pub struct ExceptionRecord {
    pub at: DateTime<Local>,
    pub description: String,
}

impl fmt::Display for ExceptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: Exception running git sync script: {}",
            format_timestamp(&self.at),
            self.description
        )
    }
}

/// Append a record to `path`, creating the file if it does not exist.
///
/// The whole record goes out in a single write call.
pub fn append_record(path: &Path, record: &impl fmt::Display) -> std::io::Result<()> {
    let entry = record.to_string();
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| f.write_all(entry.as_bytes()))
}
