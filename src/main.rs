//! # Pythia: MSA Difficulty Feature Extraction
//!
//! Derives the numeric difficulty features of a multiple sequence alignment
//! by orchestrating RAxML-NG parsimony sampling, then reports the assembled
//! feature vector.
//!
//! ## Usage
//! ```bash
//! # Extract features, keep the inferred parsimony trees
//! pythia --msa alignment.fasta --raxmlng raxml-ng --store-trees
//!
//! # Feature vector as JSON
//! pythia --msa alignment.fasta --raxmlng raxml-ng -o features.json
//! ```

use std::fs;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pythia::config::Config;
use pythia::data::{Alignment, Msa};
use pythia::error::Result;
use pythia::pipelines::FeaturePipeline;
use pythia::utils::progress::RunTimer;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::parse_and_validate()?;
    init_logging(&config);

    let timer = RunTimer::start();
    info!("Pythia v{}", env!("CARGO_PKG_VERSION"));

    let mut msa = Msa::from_file(&config.msa)?;
    if msa.contains_duplicates() {
        if config.remove_duplicates {
            let reduced_path = config.reduced_msa_path();
            warn!(
                "alignment contains duplicate sequences; saving a reduced copy as {}",
                reduced_path.display()
            );
            msa = msa.save_reduced(reduced_path)?;
        } else {
            return Err(pythia::PythiaError::invalid_data(
                "the alignment contains duplicate sequences, which distort topological \
                 distances; rerun with --remove-duplicates to extract features for a \
                 duplicate-free copy",
            ));
        }
    } else if config.remove_duplicates {
        warn!("alignment contains no duplicate sequences; --remove-duplicates has no effect");
    }

    info!(
        taxa = msa.taxon_count(),
        sites = msa.site_count(),
        model = %msa.model_string(),
        "alignment loaded"
    );
    match config.threads {
        Some(threads) => info!("using {threads} threads for parsimony inference"),
        None => info!("thread count not specified, using RAxML-NG autoconfig"),
    }

    let pipeline = FeaturePipeline::new(&config.raxmlng, config.pipeline_options());
    let features = pipeline.run(&msa, &timer)?;

    if config.verbose {
        println!("FEATURES:");
        for (key, value) in features.as_map() {
            println!("{}: {:.*}", key, config.precision, value);
        }
    }

    if let Some(output) = &config.output {
        let json = serde_json::to_string_pretty(&features)
            .expect("feature vector serializes infallibly");
        fs::write(output, json)?;
        info!("feature vector written to {}", output.display());
    }

    if let Some(destination) = config.trees_destination() {
        info!(
            "inferred parsimony trees saved to {}",
            destination.display()
        );
    }

    info!(
        "feature extraction finished in {:.2}s",
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}

fn init_logging(config: &Config) {
    let default_level = if config.quiet {
        "warn"
    } else if config.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pythia={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
