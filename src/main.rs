use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use japanese_normalizer::config::Config;
use japanese_normalizer::inference::ModelServerClient;
use japanese_normalizer::metrics::PipelineMetrics;
use japanese_normalizer::models::ModelSet;
use japanese_normalizer::pipeline::{Pipeline, PipelineError};
use japanese_normalizer::segment;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("japanese_normalizer=info".parse()?),
        )
        .init();

    info!("Starting Japanese normalization run");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Acquire input: a file argument, or stdin
    let text = read_input()?;
    let sentences = segment::split_sentences(&text);
    if sentences.is_empty() {
        info!("No sentences found in input, nothing to do");
        return Ok(());
    }
    info!("Segmented input into {} sentences", sentences.len());

    // Wire the model server into the pipeline
    let client = Arc::new(ModelServerClient::new(
        config.inference_base_url.clone(),
        config.inference_api_key.clone(),
        config.translator_model.clone(),
    ));
    let models = ModelSet {
        identifier: client.clone(),
        translator: client.clone(),
        analyzer: client.clone(),
        annotator: Some(client),
    };
    let pipeline = Pipeline::from_config(&config, models)?;

    let results = pipeline
        .process_batch(&sentences, |done, total| {
            info!("Processed sentence {}/{}", done, total);
        })
        .await;

    for result in &results {
        println!("{}", serde_json::to_string(result)?);
    }

    let report = PipelineMetrics::global().report();
    info!(
        "Run complete: {} results, cache hit rate {:.1}%, {} translator calls ({} failed), {} rate-limited",
        results.len(),
        report.cache_hit_rate,
        report.translator_calls,
        report.translator_failures,
        report.rate_limited,
    );

    Ok(())
}

/// Read the batch input: the file named by the first argument, or stdin.
///
/// An unreadable file surfaces as an extraction failure ("no input"), not a
/// panic.
fn read_input() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| PipelineError::Extraction(format!("{}: {}", path, e)).into()),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| PipelineError::Extraction(e.to_string()))
                .context("Failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}
