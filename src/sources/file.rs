//! Offline article source backed by a JSON file.
//!
//! The file holds a JSON array of [`RawArticle`] (camelCase fields, as in the
//! digest output). Only articles whose `publishedDate` matches the requested
//! date are returned.

use super::finalize;
use crate::error::Result;
use crate::models::RawArticle;
use crate::services::ArticleSource;
use chrono::NaiveDate;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArticleSource for JsonFileSource {
    #[instrument(level = "info", skip_all, fields(%date, path = %self.path.display()))]
    async fn fetch_articles(&self, date: NaiveDate) -> Result<Vec<RawArticle>> {
        let body = fs::read_to_string(&self.path).await?;
        let all: Vec<RawArticle> = serde_json::from_str(&body)?;
        let total = all.len();

        let day = date.format("%Y-%m-%d").to_string();
        let articles = finalize(all.into_iter().filter(|a| a.published_date == day));
        info!(total, kept = articles.len(), "Loaded articles from file");
        Ok(articles)
    }
}
