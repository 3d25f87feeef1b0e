//! DeepGuard CLI - Deepfake detection over folders of face images.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{detect::DetectArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Detect(args)) => detect(args),
        Some(Commands::Models(ref args)) => match commands::models::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run detect with flattened args
            if cli.detect.folder.is_none() {
                eprintln!("error: No folder specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            detect(cli.detect)
        }
    };

    exit_code.into()
}

fn detect(args: DetectArgs) -> ExitCode {
    let args = DetectArgs::with_config(args, &AppConfig::load());
    match commands::detect::run(&args) {
        Ok(outcome) => outcome.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
