mod config;
mod launcher;
mod launcher_dir;
mod process_label;
mod records;
mod session;

use clap::Parser;
use launcher::Launcher;
use launcher_dir::LauncherDir;
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs the git sync script under a recognizable process name, logs the
/// start, and records an error entry if the script ever stops.
#[derive(Parser, Debug)]
#[command(name = "git-sync-runner", version, about)]
pub struct Cli {
    /// Directory holding the sync script and log files (default: the executable's directory)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Print resolved paths and settings, don't launch
    #[arg(long)]
    dry_run: bool,

    /// Extra logging (state changes, relabel failures)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "git_sync_runner=debug"
    } else {
        "git_sync_runner=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(?cli, "parsed CLI arguments");

    let root = match launcher_dir::resolve_root(cli.base_dir.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            // Without a directory there is no error log to write to.
            tracing::error!(error = %e, "cannot resolve launcher directory");
            return ExitCode::FAILURE;
        }
    };

    let config = config::load_config(&launcher_dir::config_path(&root));
    let dir = LauncherDir::new(root, &config);
    let mut launcher = Launcher::new(dir, &config, process_label::platform_label());

    if cli.dry_run {
        let dir = launcher.dir();
        println!("git-sync-runner v{}", env!("CARGO_PKG_VERSION"));
        println!("Launcher dir: {}", dir.root().display());
        println!(
            "Script path:  {} ({})",
            dir.script().display(),
            if dir.script().is_file() { "found" } else { "missing" }
        );
        println!("Interpreter:  {}", config.script.interpreter);
        println!("Startup log:  {}", dir.startup_log().display());
        println!("Error log:    {}", dir.error_log().display());
        println!("Config file:  {}", dir.config().display());
        println!("Process name: {}", config.process.label);
        println!("Dry run mode — not launching.");
        return ExitCode::SUCCESS;
    }

    tracing::info!(root = %launcher.dir().root().display(), "git-sync-runner starting");
    let outcome = launcher.run().await;
    tracing::debug!(?outcome, state = ?launcher.state(), "launcher finished");
    ExitCode::from(outcome.exit_status())
}
