use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Failed,
    DryRun,
}

impl RunStatus {
    pub fn new(success: bool, dry_run: bool) -> Self {
        match (success, dry_run) {
            (true, true) => RunStatus::DryRun,
            (true, false) => RunStatus::Success,
            (false, _) => RunStatus::Failed,
        }
    }

    pub fn to_colored_string(&self) -> String {
        match self {
            RunStatus::Success => "SUCCESS".green().bold().to_string(),
            RunStatus::Failed => "FAILED".red().bold().to_string(),
            RunStatus::DryRun => "DRY_RUN".blue().bold().to_string(),
        }
    }
}
