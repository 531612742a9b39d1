use std::path::{Path, PathBuf};

use crate::config::ReportConfig;
use crate::errors::ReportError;
use crate::types::Report;

/// Paths of the files produced for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub text: PathBuf,
    pub json: Option<PathBuf>,
}

/// Writes a report as a human-readable text file and, optionally, a JSON file.
///
/// Files are named `<prefix>_<YYYY-MM-DD_HH-MM-SS>.txt` / `.json` using the
/// report's migration timestamp, so the two files of a run always pair up.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    prefix: String,
    json_enabled: bool,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, json_enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            json_enabled,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.dir, &config.file_prefix, config.json_enabled)
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_json(mut self, json_enabled: bool) -> Self {
        self.json_enabled = json_enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, report: &Report) -> Result<ReportPaths, ReportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::CreateDir {
            dir: self.dir.clone(),
            source,
        })?;

        let base = format!("{}_{}", self.prefix, report.file_stamp());

        let text = self.dir.join(format!("{}.txt", base));
        write_file(&text, &report.to_string())?;

        let json = if self.json_enabled {
            let path = self.dir.join(format!("{}.json", base));
            let contents = serde_json::to_string_pretty(report)?;
            write_file(&path, &contents)?;
            Some(path)
        } else {
            None
        };

        Ok(ReportPaths { text, json })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
