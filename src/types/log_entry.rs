use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn to_colored_string(&self) -> String {
        match self {
            LogLevel::Info => "INFO".normal().to_string(),
            LogLevel::Success => "SUCCESS".green().to_string(),
            LogLevel::Warning => "WARNING".yellow().to_string(),
            LogLevel::Error => "ERROR".red().to_string(),
            LogLevel::Fatal => "FATAL".red().bold().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}
