use serde::Deserialize;
use std::path::Path;

/// Optional overrides loaded from `git-sync-runner.toml` beside the launcher.
///
/// Every field has a default, and the defaults are the fixed names the
/// launcher has always used. A missing file means "use the defaults".
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    pub script: ScriptConfig,
    pub logs: LogsConfig,
    pub process: ProcessConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Script file name, resolved inside the launcher directory.
    pub file_name: String,
    /// Program used to run the script. Empty runs the script directly.
    pub interpreter: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogsConfig {
    pub startup_log: String,
    pub error_log: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessConfig {
    /// Name shown for the launcher in process listings.
    pub label: String,
}

// --- Default implementations ---

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            file_name: "auto_git_sync.sh".to_string(),
            interpreter: "/bin/bash".to_string(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            startup_log: "sync_log.txt".to_string(),
            error_log: "sync_error.log".to_string(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            label: "RebasedCodeGitSync".to_string(),
        }
    }
}

/// Load config from `path`, or fall back to defaults.
///
/// A missing file is silent. An unreadable or malformed file is reported
/// with a warning; the launcher still starts with the defaults.
pub fn load_config(path: &Path) -> LauncherConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}", path.display());
                LauncherConfig::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => LauncherConfig::default(),
        Err(e) => {
            tracing::warn!("failed to read {}: {e}", path.display());
            LauncherConfig::default()
        }
    }
}
