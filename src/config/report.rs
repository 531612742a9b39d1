use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    #[serde(default = "default_true")]
    pub json_enabled: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            file_prefix: default_file_prefix(),
            json_enabled: default_true(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("./reports")
}

fn default_file_prefix() -> String {
    "migration_report".to_string()
}

fn default_true() -> bool {
    true
}
