use std::path::Path;

use clap::Args;
use inquire::Confirm;

use crate::{
    cli::commands::ExitOnErr,
    utils::init::{DEFAULT_ENV_TEMPLATE, get_env_file_with_defaults},
};

#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing .env file without asking
    #[arg(short, long, default_value_t = false)]
    pub overwrite: bool,
}

pub async fn execute(action: &InitCommand) -> i32 {
    init_env_file(action.overwrite).await
}

async fn init_env_file(overwrite: bool) -> i32 {
    let env_file =
        get_env_file_with_defaults(DEFAULT_ENV_TEMPLATE).exit_on_err("Failed to get env file");

    if Path::new(".env").exists() && !overwrite {
        let should_overwrite =
            Confirm::new("A .env file already exists. Do you want to overwrite it?")
                .with_default(false)
                .prompt()
                .unwrap_or(false);

        if !should_overwrite {
            println!("Exiting...");
            return 0;
        }
    }

    std::fs::write(".env", env_file).exit_on_err("Failed to create .env file");
    println!("✅ Successfully created .env file.");
    0
}
