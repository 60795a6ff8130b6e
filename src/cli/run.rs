//! The `ocr-bench` run: load corpus, start workers, print summary

use super::Cli;
use anyhow::{Context, Result};
use ocr_bench_core::{aggregate_worker_stats, BenchError, OrchestratorBuilder, SamplerError};
use ocr_bench_samplers::{Corpus, RandomSampler};
use ocr_bench_vendors::OpenAIDriver;
use std::sync::Arc;

/// Run a stress test as described by `cli`
///
/// Returns once the stop condition is met, every worker has given up, or
/// the user presses Ctrl+C.
pub async fn run(cli: Cli) -> Result<()> {
    let corpus = match Corpus::load(&cli.folder) {
        Ok(corpus) => corpus,
        Err(e @ SamplerError::CorpusEmpty { .. }) => {
            println!("No images found in {}", cli.folder.display());
            return Err(BenchError::from(e).into());
        }
        Err(e) => return Err(e).context("failed to load image corpus"),
    };

    let harness = cli.harness_config();
    let endpoint = cli.endpoint_config();

    println!(
        "Found {} images. Starting stress test with concurrency {}...",
        corpus.len(),
        harness.concurrency
    );
    println!("Target URL: {}", endpoint.base_url);
    println!("Model: {}", endpoint.model);

    let driver = OpenAIDriver::new(endpoint).context("invalid endpoint configuration")?;
    let orchestrator = OrchestratorBuilder::new()
        .config(harness)
        .driver(Arc::new(driver))
        .sampler(Arc::new(RandomSampler::new(corpus)))
        .build()
        .context("failed to start worker pool")?;

    let worker_stats = orchestrator.run_with_signal_handling().await?;

    let summary = aggregate_worker_stats(&worker_stats);
    let snapshot = orchestrator.stats().snapshot();

    println!();
    println!("Stress test finished.");
    println!("Workers:       {}", summary.total_workers);
    println!("Completed:     {}", snapshot.completed);
    println!("Failed:        {}", summary.total_errors);
    println!(
        "Success Rate:  {:.1}% of {} attempts",
        summary.success_rate() * 100.0,
        summary.total_attempts()
    );
    println!("Total Tokens:  {}", snapshot.total_tokens);
    println!("Avg Time:      {:.2}s", snapshot.average_time.as_secs_f64());
    println!("Elapsed:       {:.2}s", summary.total_duration.as_secs_f64());
    println!(
        "Throughput:    {:.2} req/s, {:.1} tok/s",
        summary.requests_per_second, summary.tokens_per_second
    );

    Ok(())
}
