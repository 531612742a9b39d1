use retable::{
    cli::{Cli, Context, ExitOnErr},
    config::Settings,
    utils,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let settings = Settings::new().exit_on_err("Failed to load configuration");
    let cli = Cli::parse_args();

    // process::exit skips destructors, the guard must be dropped by hand to flush the log file
    let log_guard = utils::logger::init_logging(&settings.logs);

    let code = cli
        .execute(&Context {
            settings: &settings,
        })
        .await;

    drop(log_guard);
    std::process::exit(code);
}
