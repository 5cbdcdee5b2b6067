// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands off to Layer 2, prints the results.
//
//   1. `train`   - fit the forest and publish the artifact
//   2. `predict` - load the artifact, classify one JSON reading
//   3. `inspect` - load the artifact, print its metadata

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, InspectArgs, PredictArgs, TrainArgs};
use std::io::Read;

use crate::application::predict_use_case::{InferenceService, ServeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "storage-guard",
    version,
    about = "Train a storage-safety classifier on sensor readings, then classify live readings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. Routing only.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on dataset: {}", args.dataset);
    let report = TrainUseCase::new(args.into()).execute()?;

    println!("{}", report.preview);
    println!("{}", report.metrics.summary());
    println!("Model trained and saved as {}", report.artifact_path.display());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    // Startup failures are fatal: never serve without a model
    let service = InferenceService::start(&ServeConfig::from(&args))
        .context("Cannot start inference service. Have you run 'train' first?")?;

    let body = match &args.input {
        Some(body) => body.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read request body from stdin")?;
            buf
        }
    };

    println!("{}", service.predict_json(&body));
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let service = InferenceService::start(&ServeConfig::from(&args))
        .context("Cannot load model artifact")?;
    let info = service.model_info();
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
