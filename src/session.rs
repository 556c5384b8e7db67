/// Script session lifecycle: spawn the sync script with piped stdout/stderr,
/// wait for it to exit, report exit status and captured output.
use crate::records::ExitReport;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;

/// Environment variable set on the child to keep its output unbuffered.
pub const UNBUFFERED_ENV: (&str, &str) = ("PYTHONUNBUFFERED", "1");

/// How to start the script.
#[derive(Debug, Clone)]
pub struct ScriptCommand {
    /// Interpreter program; `None` executes the script directly.
    pub interpreter: Option<String>,
    pub script: PathBuf,
}

impl ScriptCommand {
    pub fn new(interpreter: &str, script: &Path) -> Self {
        let interpreter = (!interpreter.trim().is_empty()).then(|| interpreter.to_string());
        Self {
            interpreter,
            script: script.to_path_buf(),
        }
    }

    fn program_and_args(&self) -> (String, Vec<String>) {
        let script = self.script.to_string_lossy().into_owned();
        match &self.interpreter {
            Some(interp) => (interp.clone(), vec![script]),
            None => (script, Vec::new()),
        }
    }
}

/// Result of a finished session.
#[derive(Debug)]
pub struct SessionResult {
    pub exit: ExitReport,
    /// Everything the script wrote to stdout.
    pub stdout: Vec<u8>,
    /// Everything the script wrote to stderr.
    pub stderr: Vec<u8>,
    /// Wall-clock duration of the session.
    pub duration: std::time::Duration,
    /// Child PID (for logging/diagnostics).
    pub pid: u32,
}

impl SessionResult {
    /// Captured stderr as text, lossily decoded.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Errors that can occur while starting or waiting on the script.
#[derive(Debug)]
pub enum SessionError {
    /// The script file does not exist.
    ScriptMissing { path: PathBuf },
    /// Failed to spawn the subprocess.
    Spawn { source: std::io::Error },
    /// Failed while waiting on the child or draining its pipes.
    Wait { source: std::io::Error },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ScriptMissing { path } => {
                write!(f, "script not found: {}", path.display())
            }
            SessionError::Spawn { source } => {
                write!(f, "failed to spawn sync script: {}", source)
            }
            SessionError::Wait { source } => {
                write!(f, "failed waiting for sync script: {}", source)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::ScriptMissing { .. } => None,
            SessionError::Spawn { source } => Some(source),
            SessionError::Wait { source } => Some(source),
        }
    }
}

fn exit_report(status: ExitStatus) -> ExitReport {
    if let Some(code) = status.code() {
        return ExitReport::Code(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return ExitReport::Signal(sig);
        }
    }
    ExitReport::Code(-1)
}

/// Spawn the script and block until it exits.
///
/// There is no timeout: the script is a long-running loop and this call only
/// returns once it has stopped. Both pipes are drained while waiting so the
/// child never stalls on a full pipe buffer.
pub async fn run_session(command: &ScriptCommand) -> Result<SessionResult, SessionError> {
    if !command.script.is_file() {
        return Err(SessionError::ScriptMissing {
            path: command.script.clone(),
        });
    }

    let (program, args) = command.program_and_args();
    tracing::info!(
        program = %program,
        args = ?args,
        "spawning sync script"
    );

    let start = Instant::now();

    let child = Command::new(&program)
        .args(&args)
        .env(UNBUFFERED_ENV.0, UNBUFFERED_ENV.1)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| SessionError::Spawn { source: e })?;

    let pid = child.id().unwrap_or(0);
    tracing::info!(pid, "sync script started");

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| SessionError::Wait { source: e })?;

    let duration = start.elapsed();
    let exit = exit_report(output.status);
    tracing::info!(
        exit_code = exit.return_code(),
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        duration_secs = duration.as_secs(),
        "sync script exited"
    );

    Ok(SessionResult {
        exit,
        stdout: output.stdout,
        stderr: output.stderr,
        duration,
        pid,
    })
}
