//! Models command - locate detector models.

use anyhow::Result;
use clap::{Args, Subcommand};
use deepguard_adapters::models::{
    list_models as adapter_list_models, models_dir, DEFAULT_MODEL_FILE,
};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs) -> Result<()> {
    match args.command {
        ModelsCommand::List => list_models(),
        ModelsCommand::Path => print_path(),
    }
}

fn list_models() -> Result<()> {
    let models = adapter_list_models()?;
    let dir = models_dir();

    println!("Models directory: {}", dir.display());
    println!();

    for path in &models {
        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let marker = if name == DEFAULT_MODEL_FILE { "*" } else { " " };
        println!("  {marker} {name}");
    }

    println!();
    println!("{} model(s) installed", models.len());
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    println!("{}", models_dir().display());
    Ok(())
}
