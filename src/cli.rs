//! Command-line interface definitions for LawLens.
//!
//! All options can be given as flags; credentials and endpoints also fall
//! back to environment variables.

use crate::pipeline::DEFAULT_CONCURRENCY;
use crate::sources::newsapi::{DEFAULT_COUNTRY, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the LawLens digest builder.
///
/// # Examples
///
/// ```sh
/// # Today's digest from NewsAPI
/// NEWS_API_KEY=... lawlens -j ./json -m ./markdown
///
/// # A specific day, from a local article file
/// lawlens -j ./json --date 2025-05-06 --articles-file ./articles.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Day to build the digest for (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Output directory for the digest JSON
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the digest Markdown
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Path to the model config.yaml (defaults to the awful_aj config dir)
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// NewsAPI top-headlines endpoint
    #[arg(long, env = "NEWS_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub news_api_url: String,

    /// Two-letter country code for top headlines
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Maximum number of headlines requested from NewsAPI
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Read articles from this JSON file instead of NewsAPI
    #[arg(long)]
    pub articles_file: Option<PathBuf>,

    /// Maximum number of articles assessed concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}
