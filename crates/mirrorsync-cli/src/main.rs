//! MirrorSync - one-way directory mirroring between a work computer and an external drive
//!
//! Mirrors a source tree into a destination tree, copying only files whose
//! bytes differ. Nothing is ever deleted from the destination.

mod display;
mod json_output;
mod modes;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use display::{display_error, display_info, display_success, display_warning};
use json_output::{CountResultJson, SyncResultJson};
use mirrorsync_config::{
    AppConfig, ConfigError, ConfigLoader, DirectoryStore, JsonDirectoryStore, LoggingConfig,
};
use mirrorsync_engine::{count_files, CancellationToken, MirrorEngine, MirrorOptions, SyncRequest};
use mirrorsync_types::{ErrorKind, SyncError};
use modes::{MirrorMode, MirrorPlan, MISSING_DIRECTORIES};
use progress::SyncProgressBar;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// MirrorSync - one-way directory mirroring
#[derive(Parser)]
#[command(
    name = "mirrorsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "One-way directory mirroring between a work computer and an external drive",
    long_about = "MirrorSync copies every file of a source directory into a destination directory,\n\
                  skipping files whose contents are already identical.\n\
                  Files that exist only in the destination are never touched."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON results
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror SOURCE into DESTINATION
    Sync {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        destination: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Mirror the work directory onto the external drive
    Work {
        /// Work directory (defaults to the remembered one)
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// External drive directory
        external_drive: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Mirror the external drive into the home directory
    Home {
        /// External drive directory
        external_drive: PathBuf,
        /// Home directory (defaults to the remembered one)
        #[arg(long)]
        home_dir: Option<PathBuf>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Count the files a mirror of PATH would visit
    Count {
        /// Directory to count
        path: PathBuf,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective settings
    Show,
    /// Show the remembered directories
    Dirs,
    /// Remember a work directory
    SetWork {
        /// Work directory
        dir: PathBuf,
    },
    /// Remember a home directory
    SetHome {
        /// Home directory
        dir: PathBuf,
    },
}

/// Settings shared by every command
struct Context {
    config: AppConfig,
    quiet: bool,
    json: bool,
}

impl Context {
    fn directory_store(&self) -> JsonDirectoryStore {
        JsonDirectoryStore::new(&self.config.mirror.directory_config_path)
    }

    fn chatty(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            display_error(&format!("Failed to load configuration: {}", e));
            return ExitCode::from(ErrorKind::Config.exit_code());
        }
    };

    let _log_guard = match init_logging(&cli, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            display_error(&format!("Failed to initialize logging: {:#}", e));
            return ExitCode::from(ErrorKind::Config.exit_code());
        }
    };

    info!("MirrorSync v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = Context {
        config,
        quiet: cli.quiet,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Sync {
            source,
            destination,
            yes,
        } => {
            let plan = Ok(MirrorPlan::direct(source, destination));
            mirror_command(&ctx, MirrorMode::Direct, plan, yes).await
        }
        Commands::Work {
            work_dir,
            external_drive,
            yes,
        } => {
            let plan = ctx
                .directory_store()
                .load()
                .map_err(SyncError::from)
                .and_then(|dirs| MirrorPlan::work(&dirs, work_dir, external_drive));
            mirror_command(&ctx, MirrorMode::Work, plan, yes).await
        }
        Commands::Home {
            external_drive,
            home_dir,
            yes,
        } => {
            let plan = ctx
                .directory_store()
                .load()
                .map_err(SyncError::from)
                .and_then(|dirs| MirrorPlan::home(&dirs, external_drive, home_dir));
            mirror_command(&ctx, MirrorMode::Home, plan, yes).await
        }
        Commands::Count { path } => count_command(&ctx, path),
        Commands::Config { action } => config_command(&ctx, action),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            display_error(&format!("{:#}", e));
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<SyncError>() {
        e.exit_code()
    } else if error.downcast_ref::<ConfigError>().is_some() {
        ErrorKind::Config.exit_code()
    } else {
        1
    }
}

fn init_logging(cli: &Cli, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let console_layer = if logging.json_format {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match &logging.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn print_json(document: &SyncResultJson) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

async fn mirror_command(
    ctx: &Context,
    mode: MirrorMode,
    plan: std::result::Result<MirrorPlan, SyncError>,
    yes: bool,
) -> Result<ExitCode> {
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) if e == SyncError::config(MISSING_DIRECTORIES) => {
            if ctx.json {
                print_json(&SyncResultJson::unresolved(mode, &e))?;
            } else {
                display_warning(MISSING_DIRECTORIES);
            }
            return Ok(ExitCode::from(e.exit_code()));
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.chatty() {
        display::display_plan(&plan);
    }

    if ctx.config.ui.confirm && !yes && !confirm()? {
        if ctx.json {
            print_json(&SyncResultJson::failure(&plan, &SyncError::Cancelled))?;
        } else if !ctx.quiet {
            display_info("Sync cancelled");
        }
        return Ok(ExitCode::from(ErrorKind::Cancelled.exit_code()));
    }

    remember_directories(ctx, &plan);

    let token = CancellationToken::new();
    let ctrl_c = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            warn!("Interrupted, stopping after the current file");
            token.cancel();

            // A second interrupt does not wait for the current file
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted again, exiting");
                std::process::exit(i32::from(ErrorKind::Cancelled.exit_code()));
            }
        })
    };

    let progress = if ctx.json {
        SyncProgressBar::hidden()
    } else {
        SyncProgressBar::new(ctx.config.ui.progress_bar, ctx.quiet)
    };
    let bar = progress.clone();

    let request = SyncRequest::new(&plan.source, &plan.destination)
        .with_options(MirrorOptions::from(&ctx.config.mirror));
    let engine = MirrorEngine::with_cancellation(token);

    let outcome = tokio::task::spawn_blocking(move || {
        let mut progress = progress;
        engine.sync(&request, &mut progress)
    })
    .await;
    ctrl_c.abort();
    bar.finish_and_clear();

    match outcome? {
        Ok(report) => {
            if ctx.json {
                print_json(&SyncResultJson::success(&plan, &report))?;
            } else if !ctx.quiet {
                display_success(plan.mode.success_message());
                display::display_report(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if ctx.json {
                print_json(&SyncResultJson::failure(&plan, &e))?;
            } else {
                display_error(&format!("Sync failed: {}", e));
            }
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

fn confirm() -> Result<bool> {
    if !console::user_attended_stderr() {
        return Err(SyncError::config("Cannot ask for confirmation without a terminal; pass --yes").into());
    }

    Ok(dialoguer::Confirm::new()
        .with_prompt("Start sync?")
        .default(true)
        .interact()?)
}

fn remember_directories(ctx: &Context, plan: &MirrorPlan) {
    let store = ctx.directory_store();
    let saved = store.load().and_then(|mut dirs| {
        if plan.remember(&mut dirs) {
            store.save(&dirs)?;
        }
        Ok(())
    });

    if let Err(e) = saved {
        warn!("Could not remember directories: {}", e);
        if ctx.chatty() {
            display_warning(&format!("Could not remember directories: {}", e));
        }
    }
}

fn count_command(ctx: &Context, path: PathBuf) -> Result<ExitCode> {
    if !path.is_dir() {
        warn!("{} is not a directory", path.display());
    }

    let files = count_files(&path);
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&CountResultJson::new(&path, files))?
        );
    } else if ctx.quiet {
        println!("{}", files);
    } else {
        println!(
            "{} {} files in {}",
            style("→").green().bold(),
            style(files).green(),
            style(path.display()).cyan()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn config_command(ctx: &Context, action: ConfigAction) -> Result<ExitCode> {
    let store = ctx.directory_store();

    match action {
        ConfigAction::Show => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            } else {
                println!("{} Current configuration:", style("⚙").blue().bold());
                print!("{}", serde_yaml::to_string(&ctx.config)?);
            }
        }
        ConfigAction::Dirs => {
            let dirs = store.load()?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&dirs)?);
            } else {
                display::display_directories(store.path(), &dirs);
            }
        }
        ConfigAction::SetWork { dir } => {
            let mut dirs = store.load()?;
            dirs.set_work_dir(&dir);
            store.save(&dirs)?;
            if ctx.chatty() {
                display_success(&format!("Work directory set to {}", dir.display()));
            }
        }
        ConfigAction::SetHome { dir } => {
            let mut dirs = store.load()?;
            dirs.set_home_dir(&dir);
            store.save(&dirs)?;
            if ctx.chatty() {
                display_success(&format!("Home directory set to {}", dir.display()));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
