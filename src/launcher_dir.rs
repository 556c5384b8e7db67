use crate::config::LauncherConfig;
use std::path::{Path, PathBuf};

/// Well-known paths next to the launcher executable.
///
/// The sync script, both log files and the optional config file all live in
/// one directory. This struct owns that directory and hands out the sibling
/// paths, so nothing else has to know where the launcher was installed.
#[derive(Debug, Clone)]
pub struct LauncherDir {
    root: PathBuf,
    script_name: String,
    startup_log_name: String,
    error_log_name: String,
}

/// Name of the optional overrides file inside the launcher directory.
pub const CONFIG_FILE_NAME: &str = "git-sync-runner.toml";

impl LauncherDir {
    /// Create a LauncherDir rooted at `root`, using the names from `config`.
    pub fn new(root: impl Into<PathBuf>, config: &LauncherConfig) -> Self {
        Self {
            root: root.into(),
            script_name: config.script.file_name.clone(),
            startup_log_name: config.logs.startup_log.clone(),
            error_log_name: config.logs.error_log.clone(),
        }
    }

    /// The directory holding the launcher.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path to the external sync script.
    pub fn script(&self) -> PathBuf {
        self.root.join(&self.script_name)
    }

    /// Path to the startup log (e.g. `sync_log.txt`).
    pub fn startup_log(&self) -> PathBuf {
        self.root.join(&self.startup_log_name)
    }

    /// Path to the error log (e.g. `sync_error.log`).
    pub fn error_log(&self) -> PathBuf {
        self.root.join(&self.error_log_name)
    }

    /// Path to the optional config file.
    pub fn config(&self) -> PathBuf {
        config_path(&self.root)
    }
}

/// Path of the config file for a given launcher directory.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Directory containing the running executable, with symlinks resolved.
pub fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("executable {} has no parent directory", exe.display()),
        )
    })
}

/// Pick the launcher directory: an explicit override wins, otherwise the
/// executable's own directory. Relative overrides are made absolute against
/// the current working directory.
pub fn resolve_root(override_dir: Option<&Path>) -> std::io::Result<PathBuf> {
    match override_dir {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(std::env::current_dir()?.join(dir)),
        None => executable_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let dir = LauncherDir::new("/opt/rebased", &LauncherConfig::default());
        assert_eq!(dir.root(), Path::new("/opt/rebased"));
        assert_eq!(dir.script(), PathBuf::from("/opt/rebased/auto_git_sync.sh"));
        assert_eq!(dir.startup_log(), PathBuf::from("/opt/rebased/sync_log.txt"));
        assert_eq!(dir.error_log(), PathBuf::from("/opt/rebased/sync_error.log"));
        assert_eq!(
            dir.config(),
            PathBuf::from("/opt/rebased/git-sync-runner.toml")
        );
    }

    #[test]
    fn test_paths_follow_config_names() {
        let mut config = LauncherConfig::default();
        config.script.file_name = "other.sh".to_string();
        config.logs.startup_log = "start.log".to_string();
        config.logs.error_log = "err.log".to_string();

        let dir = LauncherDir::new("/srv", &config);
        assert_eq!(dir.script(), PathBuf::from("/srv/other.sh"));
        assert_eq!(dir.startup_log(), PathBuf::from("/srv/start.log"));
        assert_eq!(dir.error_log(), PathBuf::from("/srv/err.log"));
    }

    #[test]
    fn test_logs_are_distinct() {
        let dir = LauncherDir::new("/srv", &LauncherConfig::default());
        assert_ne!(dir.startup_log(), dir.error_log());
    }

    #[test]
    fn test_resolve_root_absolute_override() {
        let root = resolve_root(Some(Path::new("/tmp/somewhere"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn test_resolve_root_relative_override_is_absolute() {
        let root = resolve_root(Some(Path::new("relative/dir"))).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("relative/dir"));
    }

    #[test]
    fn test_resolve_root_defaults_to_executable_dir() {
        let root = resolve_root(None).unwrap();
        assert!(root.is_absolute());
        assert!(root.is_dir());
    }
}
