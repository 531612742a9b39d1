pub mod cmd_config;
pub mod cmd_init;
pub mod cmd_inspect;
pub mod cmd_run;
pub mod cmd_version;

use std::time::Duration;

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::cli::commands::{
    cmd_init::InitCommand, cmd_inspect::InspectArgs, cmd_run::RunArgs,
    cmd_version::VersionCommand,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the migration, validate it and write the reports
    Run(RunArgs),

    /// Show the catalog snapshot of a table without changing anything
    Inspect(InspectArgs),

    /// Print the effective configuration (password hidden)
    Config,

    /// Initialize a .env file using defaults
    Init(InitCommand),

    /// Print version
    Version(VersionCommand),
}

pub trait ExitOnErr<T> {
    fn exit_on_err(self, msg: &str) -> T;
}

impl<T, E: std::fmt::Display> ExitOnErr<T> for Result<T, E> {
    fn exit_on_err(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("❌ {}: {}", msg, e);
                std::process::exit(1);
            }
        }
    }
}

/// Spinner whose message follows whatever is sent through the returned channel.
pub fn new_spinner() -> (ProgressBar, mpsc::UnboundedSender<String>) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let progress = spinner.clone();
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            progress.set_message(message.trim().to_string());
        }
    });

    (spinner, tx)
}
