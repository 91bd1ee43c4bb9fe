//! Sheet history CLI entry point.
//!
//! Prints the canonical fragment of the token reached from `FRAGMENT` after
//! every `--op` has been applied, or renders the error and exits with 1.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use sheet_history_cli::{Args, error_adapter::to_reportable};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    // Fall back to `warn` rather than refusing to start on a bad level
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting sheet history");
    debug!(args:?; "Parsed arguments");

    let token = match sheet_history_cli::run(&args) {
        Ok(token) => token,
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &to_reportable(&err))
                .expect("Writing to String buffer is infallible");

            error!("{writer}");
            process::exit(1);
        }
    };

    // The fragment on stdout is the only output meant for scripts
    println!("{token}");
    info!(
        operations = args.operations.len(),
        fragment = token.url_fragment();
        "Completed successfully"
    );
}
