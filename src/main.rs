mod calc;
mod cmd;
mod data;
mod logging;
mod state;
mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use crate::state::ViewMode;

#[derive(Parser)]
#[command(name = "focuscal", about = "calendar and focus timer for the terminal")]
struct Cli {
    /// Directory holding config.yaml and the log file (default: ./config)
    #[arg(long, default_value = "./config")]
    config_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml
    Init,
    /// Print a calendar page without starting the interactive view
    Show {
        /// Which page to print
        #[arg(long, value_enum, default_value_t = ViewArg::Month)]
        view: ViewArg,
        /// Date to browse (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Emit the cells as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective settings
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Month,
    Year,
    Decade,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Month => ViewMode::Month,
            ViewArg::Year => ViewMode::Year,
            ViewArg::Decade => ViewMode::Decade,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve config_dir to an absolute path so later file I/O does not
    // depend on the working directory.
    let config_dir = if cli.config_dir.is_absolute() {
        cli.config_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.config_dir)
    };
    data::persistence::set_config_dir(config_dir.clone());

    // Auto-init when the config directory is missing or empty and the user did
    // not explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&config_dir) {
        eprintln!(
            "Config directory '{}' is missing or empty, running init...",
            config_dir.display()
        );
        cmd::init::run()?;
    }

    let log_level = data::AppSettings::load()
        .map(|s| s.log_level)
        .unwrap_or_else(|_| data::AppSettings::default().log_level);
    let _log_guard = logging::init_tracing(&config_dir, cli.verbose, &log_level)?;
    info!(config_dir = %config_dir.display(), "focuscal starting");

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Show { view, date, json }) => {
            cmd::show::run(view.into(), date.as_deref(), json)
        }
        Some(Commands::Settings) => cmd::settings::run(),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
