use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::types::{LogEntry, LogLevel};
use crate::utils::ProgressReporter;

/// Configuration options for the RunContext.
#[derive(Debug, Default)]
pub struct RunContextOptions {
    /// If true, the migration script is rolled back after execution.
    pub dry: bool,
    /// Optional progress reporter sender.
    /// If None, progress reporting is disabled.
    pub progress_tx: Option<mpsc::UnboundedSender<String>>,
}

/// What a finished run recorded, consumed when the report is built.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub started_at: DateTime<Local>,
    pub dry_run: bool,
    pub log: Vec<LogEntry>,
    pub issues: Vec<String>,
}

/// State threaded through every pipeline stage: the run log, the issue list
/// and the progress channel.
#[derive(Debug)]
pub struct RunContext {
    started_at: DateTime<Local>,
    dry_run: bool,
    log: Vec<LogEntry>,
    issues: Vec<String>,
    progress_reporter: ProgressReporter,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RunContext {
    pub fn new(options: Option<RunContextOptions>) -> Self {
        let opts = options.unwrap_or_default();

        Self {
            started_at: Local::now(),
            dry_run: opts.dry,
            log: Vec::new(),
            issues: Vec::new(),
            progress_reporter: ProgressReporter::new(opts.progress_tx),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Appends a log entry, mirrors it to tracing and to the progress channel.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();

        match level {
            LogLevel::Info | LogLevel::Success => info!(level = %level, "{}", message),
            LogLevel::Warning => warn!("{}", message),
            LogLevel::Error | LogLevel::Fatal => error!(level = %level, "{}", message),
        }

        self.progress_reporter.report(message.clone());
        self.log.push(LogEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            level,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn fatal(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Records an issue. Any issue fails the run.
    pub fn issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn into_record(self) -> RunRecord {
        RunRecord {
            started_at: self.started_at,
            dry_run: self.dry_run,
            log: self.log,
            issues: self.issues,
        }
    }
}
