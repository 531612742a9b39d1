mod commands;

use clap::Parser;
use colored::Colorize;

pub use crate::cli::commands::ExitOnErr;
use crate::cli::commands::{
    Commands, cmd_config, cmd_init, cmd_inspect, cmd_run, cmd_version,
};
use crate::config::Settings;

pub struct Context<'a> {
    pub settings: &'a Settings,
}

#[derive(Parser, Debug)]
#[command(
    name = "retable",
    about = "Validated PostgreSQL table rename",
    long_about = format!(
r#"{} - {}
Renames {} to {}, checks that data, keys, indexes, policies and triggers survived, and writes a report."#,
"RETABLE".green().bold(),
"One-shot PostgreSQL table rename with before/after validation.",
"software_licenses".cyan(), "accounts".cyan()
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Runs the selected command and returns the process exit code.
    pub async fn execute(&self, ctx: &Context<'_>) -> i32 {
        match &self.command {
            Some(Commands::Run(args)) => cmd_run::execute(args, ctx).await,
            Some(Commands::Inspect(args)) => cmd_inspect::execute(args, ctx).await,
            Some(Commands::Config) => cmd_config::execute(ctx).await,
            Some(Commands::Init(action)) => cmd_init::execute(action).await,
            Some(Commands::Version(action)) => cmd_version::execute(action).await,
            None => {
                eprintln!("No command given, see `retable --help`");
                2
            }
        }
    }
}
