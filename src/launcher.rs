/// The launcher: label the process, write the startup log, run the sync
/// script until it stops, and record how it stopped.
///
/// The script is expected to loop forever, so every way out of `run` is an
/// anomaly and the process exit code is always a failure.
use crate::config::LauncherConfig;
use crate::launcher_dir::LauncherDir;
use crate::process_label::ProcessLabel;
use crate::records::{
    append_record, ExceptionRecord, ExitReport, LaunchRecord, TerminationRecord,
};
use crate::session::{run_session, ScriptCommand, SessionError, SessionResult};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Launcher lifecycle. Both `Terminated*` states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherState {
    NotStarted,
    Running,
    TerminatedExit,
    TerminatedException,
}

/// Errors that end a launch before the script has run to completion.
#[derive(Debug)]
pub enum LaunchError {
    /// Could not append to the startup log.
    StartupLog {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Script missing, spawn failure or wait failure.
    Session(SessionError),
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::StartupLog { path, source } => {
                write!(f, "failed to write startup log {}: {}", path.display(), source)
            }
            LaunchError::Session(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::StartupLog { source, .. } => Some(source),
            LaunchError::Session(e) => std::error::Error::source(e),
        }
    }
}

impl From<SessionError> for LaunchError {
    fn from(e: SessionError) -> Self {
        LaunchError::Session(e)
    }
}

/// What ended the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The script exited (it should not have).
    Exited { exit: ExitReport, stderr: String },
    /// The launch failed before or while waiting on the script.
    Failed { description: String },
}

impl LaunchOutcome {
    /// Process exit status for the launcher. There is no success path.
    pub fn exit_status(&self) -> u8 {
        1
    }
}

/// Print the startup banner. Only for interactive visibility; a closed
/// stdout must not stop the launch.
fn announce(
    out: &mut impl Write,
    script: &Path,
    startup_log: &Path,
    error_log: &Path,
) -> std::io::Result<()> {
    writeln!(out, "Starting RebasedCode Git Sync process...")?;
    writeln!(out, "Script path: {}", script.display())?;
    writeln!(
        out,
        "Logs will be written to {} and {}",
        startup_log.display(),
        error_log.display()
    )?;
    out.flush()
}

pub struct Launcher {
    dir: LauncherDir,
    interpreter: String,
    label: String,
    labeler: Box<dyn ProcessLabel>,
    state: LauncherState,
}

impl Launcher {
    pub fn new(dir: LauncherDir, config: &LauncherConfig, labeler: Box<dyn ProcessLabel>) -> Self {
        Self {
            dir,
            interpreter: config.script.interpreter.clone(),
            label: config.process.label.clone(),
            labeler,
            state: LauncherState::NotStarted,
        }
    }

    pub fn state(&self) -> LauncherState {
        self.state
    }

    pub fn dir(&self) -> &LauncherDir {
        &self.dir
    }

    fn set_state(&mut self, state: LauncherState) {
        tracing::debug!(from = ?self.state, to = ?state, "launcher state change");
        self.state = state;
    }

    /// Run the script to completion and record the outcome in the error log.
    ///
    /// Blocks for as long as the script runs. Exactly one record is
    /// appended to the error log: a termination record if the script
    /// exited, an exception record if the launch failed.
    pub async fn run(&mut self) -> LaunchOutcome {
        let error_log = self.dir.error_log();
        match self.launch().await {
            Ok(result) => {
                self.set_state(LauncherState::TerminatedExit);
                let record = TerminationRecord {
                    at: Local::now(),
                    exit: result.exit,
                    stderr: result.stderr_text(),
                };
                tracing::debug!(
                    stdout_bytes = result.stdout.len(),
                    duration_secs = result.duration.as_secs(),
                    "discarding captured stdout"
                );
                tracing::error!(
                    exit_code = result.exit.return_code(),
                    pid = result.pid,
                    "git sync process terminated unexpectedly"
                );
                if let Err(e) = append_record(&error_log, &record) {
                    tracing::error!(error = %e, path = %error_log.display(), "failed to write error log");
                }
                LaunchOutcome::Exited {
                    exit: record.exit,
                    stderr: record.stderr,
                }
            }
            Err(e) => {
                self.set_state(LauncherState::TerminatedException);
                let record = ExceptionRecord {
                    at: Local::now(),
                    description: e.to_string(),
                };
                tracing::error!(error = %e, "exception running git sync script");
                if let Err(e) = append_record(&error_log, &record) {
                    tracing::error!(error = %e, path = %error_log.display(), "failed to write error log");
                }
                LaunchOutcome::Failed {
                    description: record.description,
                }
            }
        }
    }

    async fn launch(&mut self) -> Result<SessionResult, LaunchError> {
        let script = self.dir.script();

        if let Err(e) = self.labeler.apply(&self.label) {
            tracing::debug!(error = %e, label = %self.label, "process relabel skipped");
        }

        let startup_log = self.dir.startup_log();
        append_record(&startup_log, &LaunchRecord::now(&script)).map_err(|e| {
            LaunchError::StartupLog {
                path: startup_log.clone(),
                source: e,
            }
        })?;

        if let Err(e) = announce(
            &mut std::io::stdout(),
            &script,
            &startup_log,
            &self.dir.error_log(),
        ) {
            tracing::debug!(error = %e, "startup banner not printed");
        }

        self.set_state(LauncherState::Running);
        let command = ScriptCommand::new(&self.interpreter, &script);
        Ok(run_session(&command).await?)
    }
}
