//! ClaimGuard Trainer - offline training entry point
//!
//! Trains a fresh artifact from the canonical dataset (or a synthetic one),
//! persists it, and smoke-tests both scorers on the reference claim.
//!
//! ```text
//! claimguard-train [--dataset PATH] [--artifact PATH] [--synthetic N] [--write-csv PATH]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use claimguard_core::constants::{self, APP_NAME, APP_VERSION};
use claimguard_core::logic::artifact::FileArtifactStore;
use claimguard_core::logic::claim::ClaimRecord;
use claimguard_core::logic::dataset::{self, CsvDataset, InMemoryDataset, TrainingSource};
use claimguard_core::{EngineConfig, FraudEngine};

/// Train, persist and smoke-test a fraud detection artifact
#[derive(Debug, Parser)]
#[command(name = "claimguard-train", version, about, long_about = None)]
struct Args {
    /// Canonical training dataset (CSV with a FraudLabel column)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Where to write the trained artifact
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Train on N generated rows instead of the dataset
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    /// Also write the generated rows to this CSV (with --synthetic)
    #[arg(long, value_name = "PATH", requires = "synthetic")]
    write_csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!("Starting {} trainer v{}", APP_NAME, APP_VERSION);

    let mut config = EngineConfig::from_env();
    if let Some(path) = args.dataset {
        config.dataset_path = path;
    }
    if let Some(path) = args.artifact {
        config.artifact_path = path;
    }

    let source: Arc<dyn TrainingSource> = match args.synthetic {
        Some(n) => {
            let rows = dataset::synthetic::generate(n, constants::RANDOM_SEED);
            if let Some(path) = &args.write_csv {
                match dataset::write_csv(path, &rows) {
                    Ok(count) => log::info!("Wrote {} synthetic rows to {}", count, path.display()),
                    Err(e) => {
                        log::error!("Failed to write {}: {}", path.display(), e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            Arc::new(InMemoryDataset::new(rows))
        }
        None => Arc::new(CsvDataset::new(config.dataset_path.clone())),
    };

    let store = Arc::new(FileArtifactStore::new(config.artifact_path.clone()));
    let engine = FraudEngine::new(config, source, store);

    let artifact = match engine.retrain() {
        Ok(artifact) => artifact,
        Err(e) => {
            log::error!("Training failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let m = &artifact.metrics;
    log::info!(
        "Artifact {} saved to {} ({} rows, {} fraud, accuracy {:.3}, f1 {:.3}, auc {})",
        artifact.id,
        engine.config().artifact_path.display(),
        m.dataset_size,
        m.fraud_cases,
        m.accuracy,
        m.f1_score,
        m.roc_auc.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "n/a".into())
    );

    // smoke test
    let claim = ClaimRecord::sample();
    match engine.predict(&claim) {
        Ok(r) => log::info!(
            "Sample claim (model): p={:.3} {} fraud={}",
            r.probability,
            r.risk_level.label(),
            r.prediction
        ),
        Err(e) => {
            log::error!("Sample claim could not be scored: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let r = engine.score_heuristic(&claim);
    log::info!(
        "Sample claim (rules): p={:.2} {} score={} factors={:?}",
        r.probability,
        r.risk_level.label(),
        r.raw_score.unwrap_or_default(),
        r.risk_factors.unwrap_or_default()
    );

    ExitCode::SUCCESS
}
