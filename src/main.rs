//! treeload - grow reproducible directory trees for storage benchmarks.
//!
//! Usage:
//!   treeload grow [--testdir DIR] [--dirdepth N] [--dircount N] [--filecount N]
//!   treeload status [--testdir DIR]     Show the recorded tree shape
//!   treeload clean [--testdir DIR]      Forget the recorded shape
//!   treeload fsgroup [--parent DIR] [--group GID]
//!   treeload --help                     Show help

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use treeload_ops::{Orchestrator, RunOutcome, StateStore, TreeShape, WorkloadConfig};

const DEFAULT_TESTDIR: &str = "/testdir";

#[derive(Parser)]
#[command(
    name = "treeload",
    version,
    about = "Grow reproducible directory trees for storage benchmarks",
    long_about = "treeload populates a root with a uniform tree of directories and files, \
                  and grows an existing tree to a larger shape without redoing work.\n\n\
                  The shape reached is recorded in the root, and a run that did not \
                  finish blocks later runs until `treeload clean` is used."
)]
struct Cli {
    /// Suspend instead of exiting once the command has finished
    #[arg(long = "tsr", visible_alias = "stay-resident", global = true)]
    stay_resident: bool,

    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grow the tree to the given shape
    Grow {
        /// Base directory holding test data and its state record
        #[arg(long, default_value = DEFAULT_TESTDIR)]
        testdir: PathBuf,

        /// Depth of directories to create
        #[arg(long, default_value_t = 5)]
        dirdepth: u32,

        /// Count of directories to create per directory
        #[arg(long, default_value_t = 100)]
        dircount: u32,

        /// Count of files to create per directory
        #[arg(long, default_value_t = 100)]
        filecount: u32,
    },

    /// Show the recorded tree shape
    Status {
        /// Base directory holding test data and its state record
        #[arg(long, default_value = DEFAULT_TESTDIR)]
        testdir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove the state record, e.g. after an interrupted run
    Clean {
        /// Base directory holding test data and its state record
        #[arg(long, default_value = DEFAULT_TESTDIR)]
        testdir: PathBuf,
    },

    /// Hand a tree over to a group (ownership, group rw, setgid directories)
    #[cfg(unix)]
    Fsgroup {
        /// Base directory for traversal
        #[arg(long, default_value = DEFAULT_TESTDIR)]
        parent: PathBuf,

        /// Group id to set
        #[arg(long, default_value_t = treeload_fsgroup::DEFAULT_GROUP)]
        group: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install error handler: {e}");
    }

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let stay_resident = cli.stay_resident;
    let code = match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("Error: {report:?}");
            ExitCode::FAILURE
        }
    };

    if stay_resident {
        suspend();
    }
    code
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Park the process forever, so supervisors can read the outcome from liveness.
fn suspend() -> ! {
    info!("staying resident");
    loop {
        std::thread::park();
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Grow {
            testdir,
            dirdepth,
            dircount,
            filecount,
        } => run_grow(testdir, TreeShape::new(dirdepth, dircount, filecount)),
        Command::Status { testdir, format } => run_status(&testdir, format),
        Command::Clean { testdir } => run_clean(&testdir),
        #[cfg(unix)]
        Command::Fsgroup { parent, group } => run_fsgroup(&parent, group),
    }
}

/// Grow the tree under `testdir` to `desired`.
fn run_grow(testdir: PathBuf, desired: TreeShape) -> Result<()> {
    let config = WorkloadConfig::builder()
        .root(testdir)
        .desired(desired)
        .build()
        .context("Invalid configuration")?;

    let outcome = Orchestrator::new(config)
        .run()
        .context("Failed to reach desired tree shape")?;

    match outcome {
        RunOutcome::Unchanged => {
            println!("Desired shape ({desired}) is already on disk");
        }
        RunOutcome::Grown(stats) => {
            println!("{}", stats.summary());
            println!("Tree now at {desired}");
        }
    }

    Ok(())
}

/// Print the recorded state of `testdir`.
fn run_status(testdir: &Path, format: OutputFormat) -> Result<()> {
    let store = StateStore::new(testdir);
    let state = store.load().context("Unable to determine existing test state")?;

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(" {}", store.path().display());
            println!("{}", "─".repeat(60));
            println!(" Depth:          {}", state.shape.depth);
            println!(" Dirs per dir:   {}", state.shape.breadth);
            println!(" Files per dir:  {}", state.shape.files_per_dir);
            println!(" Directories:    {}", state.shape.total_dirs());
            println!(" Files:          {}", state.shape.total_files());
            println!(
                " In progress:    {}",
                if state.in_progress { "yes (interrupted run?)" } else { "no" }
            );
            println!();
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "state": state,
                "totalDirs": state.shape.total_dirs(),
                "totalFiles": state.shape.total_files(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Remove the state record of `testdir`.
fn run_clean(testdir: &Path) -> Result<()> {
    let store = StateStore::new(testdir);
    store.clear().context("Failed to clean up test state")?;
    eprintln!("Removed {}", store.path().display());
    Ok(())
}

/// Apply group ownership to everything under `parent`.
#[cfg(unix)]
fn run_fsgroup(parent: &Path, group: u32) -> Result<()> {
    let report = treeload_fsgroup::set_group_ownership(parent, group)
        .with_context(|| format!("Traversal failed on {}", parent.display()))?;

    println!(
        "Updated {} entries, skipped {} symlinks, {} failed",
        report.entries_updated, report.symlinks_skipped, report.failures
    );
    Ok(())
}
