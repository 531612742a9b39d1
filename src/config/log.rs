use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub dir: Option<String>,

    /// One of `compact`, `pretty` or `json`.
    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default = "default_true")]
    pub file_enabled: bool,

    #[serde(
        default = "default_ext_level",
        deserialize_with = "deserialize_ext_level"
    )]
    pub ext_level: Option<HashMap<String, String>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            console_format: default_console_format(),
            file_enabled: default_true(),
            ext_level: default_ext_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> Option<String> {
    Some("./logs".to_string())
}

fn default_console_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ext_level() -> Option<HashMap<String, String>> {
    let mut map = HashMap::new();
    map.insert("sqlx".to_string(), "error".to_string());
    Some(map)
}

fn deserialize_ext_level<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;

    // sqlx logs every statement at info; keep it quiet unless asked for
    let mut map = HashMap::new();
    map.insert("sqlx".to_string(), "error".to_string());

    if let Some(s) = s {
        for pair in s.split(',') {
            if let Some((key, value)) = pair.trim().split_once(':') {
                map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    Ok(Some(map))
}

impl LogConfig {
    /// Renders the `EnvFilter` directive string, e.g. `info,sqlx=error`.
    pub fn filter_directives(&self) -> String {
        let mut filter = self.level.clone();

        if let Some(ext_levels) = &self.ext_level {
            let mut targets: Vec<_> = ext_levels.iter().collect();
            targets.sort();
            for (target, level) in targets {
                filter.push_str(&format!(",{}={}", target, level));
            }
        }

        filter
    }
}
