use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::error;

use crate::{
    cli::{Context, commands::new_spinner},
    services::MigrationService,
    types::Report,
    utils::{ReportPaths, ReportWriter, RunContext, RunContextOptions},
};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Migration script to execute, defaults to the configured script path
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Execute the script and roll it back, skipping validation
    #[arg(short, long, default_value_t = false)]
    pub dry: bool,

    /// Directory for the report files, defaults to the configured report dir
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only write the text report
    #[arg(long, default_value_t = false)]
    pub no_json: bool,

    /// Print the full text report after the summary
    #[arg(long, default_value_t = false)]
    pub show_report: bool,
}

/// Runs the migration and returns the process exit code.
pub async fn execute(args: &RunArgs, ctx: &Context<'_>) -> i32 {
    let (spinner, tx) = new_spinner();

    let service = MigrationService::new(ctx.settings, args.script.clone());
    let run_ctx = RunContext::new(Some(RunContextOptions {
        dry: args.dry,
        progress_tx: Some(tx),
    }));

    let report = service.run(run_ctx).await;
    spinner.finish_and_clear();

    let mut writer = ReportWriter::from_config(&ctx.settings.report);
    if let Some(dir) = &args.output_dir {
        writer = writer.with_dir(dir);
    }
    if args.no_json {
        writer = writer.with_json(false);
    }

    let mut exit_code = report.exit_code();
    let paths = match writer.write(&report) {
        Ok(paths) => Some(paths),
        Err(err) => {
            error!("Failed to write report: {}", err);
            eprintln!("❌ Failed to write report: {}", err);
            exit_code = 1;
            None
        }
    };

    if args.show_report {
        println!("{}", report);
    }
    print_summary(&report, paths.as_ref());

    exit_code
}

fn print_summary(report: &Report, paths: Option<&ReportPaths>) {
    let rule = "=".repeat(80);
    println!("{}", rule);
    println!("{}", "MIGRATION SUMMARY".bold());
    println!("{}", rule);
    println!("Run ID: {}", report.run_id.to_string().bright_black());
    println!("Migration: {}", report.migration_type);
    println!("Duration: {:.2} seconds", report.migration_duration_seconds);
    println!("Status: {}", report.status.to_colored_string());

    if report.validation_tests.is_empty() {
        println!("Validation Tests: {}", "not run".yellow());
    } else {
        println!(
            "Validation Tests: {}/{} passed",
            report.validation_tests.passed_count(),
            report.validation_tests.len()
        );
        for check in report.validation_tests.failed() {
            println!("    {} {}", "✗".red(), check.name);
        }
    }

    if report.issues.is_empty() {
        println!("Issues: 0");
    } else {
        println!("Issues: {}", report.issues.len().to_string().red());
        for issue in &report.issues {
            println!("    - {}", issue);
        }
    }

    if let Some(paths) = paths {
        println!("Text report: {}", paths.text.display());
        if let Some(json) = &paths.json {
            println!("JSON report: {}", json.display());
        }
    }
    println!("{}", rule);
}
