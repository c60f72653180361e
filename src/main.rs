//! LawLens command-line entry point.
//!
//! Builds the digest for one date and writes it as JSON (and optionally
//! Markdown).
//!
//! ```sh
//! NEWS_API_KEY=... lawlens -j ./json -m ./markdown --date 2025-05-06
//! ```

#![recursion_limit = "256"]

use awful_aj::{config, config_dir};
use chrono::Local;
use clap::Parser;
use lawlens::cli::Cli;
use lawlens::llm::LlmServices;
use lawlens::outputs::{json, markdown};
use lawlens::pipeline::NewsPipeline;
use lawlens::sources::{JsonFileSource, NewsApiConfig, NewsApiSource, Source};
use lawlens::utils::ensure_writable_dir;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lawlens starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.date, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    // ---- Model config & templates ----
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config_dir()?.join("config.yaml").to_string_lossy().to_string(),
    };
    let model_config = config::load_config(&config_path)?;
    info!(config_path = %config_path, "Loaded model configuration");
    let llm = LlmServices::load(model_config).await?;

    // ---- Article source ----
    let source = match &args.articles_file {
        Some(path) => {
            info!(path = %path.display(), "Using article file");
            Source::File(JsonFileSource::new(path))
        }
        None => Source::NewsApi(NewsApiSource::new(NewsApiConfig {
            api_key: args.news_api_key.clone(),
            endpoint: args.news_api_url.clone(),
            country: args.country.clone(),
            page_size: args.page_size,
        })),
    };

    // ---- Build digest ----
    let pipeline = NewsPipeline::new(source, llm.clone(), llm.clone(), llm)
        .with_concurrency(args.concurrency);
    let digest = pipeline.process_news(date).await;
    if digest.is_empty() {
        info!(%date, "No results for this date");
    }

    // ---- Outputs ----
    if let Err(e) = json::write_digest(&digest, &args.json_output_dir, date).await {
        error!(error = %e, "Failed to write digest JSON");
    }

    if let Some(markdown_output_dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_digest(&digest, markdown_output_dir, date).await {
            error!(path = %markdown_output_dir, error = %e, "Failed writing Markdown");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        common_headlines = digest.common_headlines.len(),
        relevant = digest.relevant_count(),
        "Execution complete"
    );

    Ok(())
}
