//! CLI command definitions and handlers.

pub mod detect;
pub mod models;

use clap::{Parser, Subcommand};

/// DeepGuard - Deepfake detection for folders of face images
#[derive(Parser)]
#[command(name = "deepguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared detect arguments (folder, model, flags).
    #[command(flatten)]
    pub detect: detect::DetectArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify every image in a folder and annotate the results
    Detect(detect::DetectArgs),
    /// Locate detector models
    Models(models::ModelsArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every scored image is real.
    Success = 0,
    /// At least one image was classified as fake.
    FakeDetected = 1,
    /// The run could not complete.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
