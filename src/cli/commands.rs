// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Three subcommands: `train`, `predict`, `inspect`.
// clap's derive macros generate --help, defaults, and the
// string → number conversions for every flag below.

use clap::{Args, Subcommand};

use crate::application::predict_use_case::ServeConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::feature_vector::FEATURE_COUNT;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the storage classifier on a labeled CSV and publish the artifact
    Train(TrainArgs),

    /// Classify one JSON reading with a published artifact
    Predict(PredictArgs),

    /// Show how a published artifact was built
    Inspect(InspectArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with temperature, humidity, moisture, gas_level, weight, status
    #[arg(long, default_value = "storage_data.csv")]
    pub dataset: String,

    /// Where to publish the trained model (replaced atomically)
    #[arg(long, default_value = "storage_ai_model.json")]
    pub artifact: String,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the split and for every tree
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Maximum tree depth (at most 40, which is also the cap when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs before it may split
    #[arg(long, default_value_t = 2)]
    pub min_samples_split: usize,

    /// Feature columns each tree is trained on (1-5, all by default)
    #[arg(long, default_value_t = FEATURE_COUNT)]
    pub max_features: usize,

    /// Train every tree on the full training set instead of a bootstrap draw
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Skip appending to metrics.csv next to the artifact
    #[arg(long)]
    pub no_metrics: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:      a.dataset,
            artifact_path:     a.artifact,
            test_fraction:     a.test_fraction,
            seed:              a.seed,
            n_trees:           a.trees,
            max_depth:         a.max_depth,
            min_samples_split: a.min_samples_split,
            max_features:      a.max_features,
            bootstrap:         !a.no_bootstrap,
            log_metrics:       !a.no_metrics,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Request body, e.g. '{"temperature":25,"humidity":60,...}'.
    /// Read from stdin when omitted.
    #[arg(long)]
    pub input: Option<String>,

    /// Published model to load
    #[arg(long, default_value = "storage_ai_model.json")]
    pub artifact: String,
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Published model to load
    #[arg(long, default_value = "storage_ai_model.json")]
    pub artifact: String,
}

impl From<&PredictArgs> for ServeConfig {
    fn from(a: &PredictArgs) -> Self {
        ServeConfig { artifact_path: a.artifact.clone() }
    }
}

impl From<&InspectArgs> for ServeConfig {
    fn from(a: &InspectArgs) -> Self {
        ServeConfig { artifact_path: a.artifact.clone() }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["storage-guard", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "storage-guard", "train", "--trees", "10", "--seed", "7",
            "--max-depth", "4", "--max-features", "2", "--no-bootstrap", "--no-metrics",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.n_trees, 10);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.max_depth, Some(4));
        assert_eq!(cfg.max_features, 2);
        assert!(!cfg.bootstrap);
        assert!(!cfg.log_metrics);
    }

    #[test]
    fn test_predict_args() {
        let cli = Cli::try_parse_from([
            "storage-guard", "predict", "--input", "{}", "--artifact", "m.json",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.input.as_deref(), Some("{}"));
        assert_eq!(ServeConfig::from(&args).artifact_path, "m.json");
    }
}
