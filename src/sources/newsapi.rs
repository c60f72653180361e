//! NewsAPI article source.
//!
//! Queries the [NewsAPI](https://newsapi.org) `top-headlines` endpoint for one
//! country and one day, then cleans each item into a [`RawArticle`].
//!
//! # Content clean-up
//!
//! NewsAPI returns at most a ~200 character excerpt, suffixed with a marker
//! such as `… [+3412 chars]`, and occasionally a few HTML tags. The excerpt
//! is reduced to plain text and the marker is dropped. Articles whose
//! content was pulled (`[Removed]`) fall back to their description.

use super::{REMOVED_MARKER, finalize};
use crate::error::{Result, ServiceError};
use crate::models::{PLACEHOLDER_URL, RawArticle};
use crate::services::ArticleSource;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_COUNTRY: &str = "in";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[\+\d+ chars\]\s*$").expect("valid truncation regex"));

/// Connection settings for [`NewsApiSource`], resolved once at startup.
#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub country: String,
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("country", &self.country)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    publishedAt: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    #[serde(default)]
    name: Option<String>,
}

/// Fetches a day's top headlines from NewsAPI.
#[derive(Debug)]
pub struct NewsApiSource {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiSource {
    pub fn new(config: NewsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn request(&self, date: NaiveDate) -> Result<TopHeadlinesResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ServiceError::MissingCredentials("NEWS_API_KEY"))?;

        let day = date.format("%Y-%m-%d").to_string();
        let page_size = self.config.page_size.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("country", self.config.country.as_str()),
                ("from", day.as_str()),
                ("to", day.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TopHeadlinesResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TopHeadlinesResponse = serde_json::from_str(&body)?;
        if parsed.status != "ok" {
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: parsed
                    .message
                    .or(parsed.code)
                    .unwrap_or_else(|| parsed.status.clone()),
            });
        }
        Ok(parsed)
    }
}

impl ArticleSource for NewsApiSource {
    #[instrument(level = "info", skip_all, fields(%date, country = %self.config.country))]
    async fn fetch_articles(&self, date: NaiveDate) -> Result<Vec<RawArticle>> {
        let response = self.request(date).await?;
        let received = response.articles.len();
        let articles = to_raw_articles(response.articles, date);
        info!(received, kept = articles.len(), "Fetched NewsAPI headlines");
        Ok(articles)
    }
}

fn to_raw_articles(items: Vec<NewsApiArticle>, requested: NaiveDate) -> Vec<RawArticle> {
    finalize(
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| to_raw_article(index, item, requested)),
    )
}

fn to_raw_article(index: usize, item: NewsApiArticle, requested: NaiveDate) -> RawArticle {
    let published_at = item
        .publishedAt
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let url = item.url.filter(|u| Url::parse(u).is_ok());
    let id = match url.as_deref() {
        Some(url) => url.to_string(),
        None => {
            let id = fallback_id(index, published_at);
            debug!(index, %id, "Article has no URL; using fallback id");
            id
        }
    };

    let published_date = published_at
        .map(|dt| dt.date_naive())
        .unwrap_or(requested)
        .format("%Y-%m-%d")
        .to_string();

    RawArticle {
        id,
        title: item
            .title
            .unwrap_or_else(|| "No Title Provided".to_string()),
        content: clean_content(item.content.as_deref(), item.description.as_deref()),
        source: item
            .source
            .and_then(|s| s.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown Source".to_string()),
        url: url.unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
        published_date,
    }
}

/// Deterministic id for an article without a URL.
///
/// Built from the position in the response and the article's own timestamp,
/// so refetching the same day yields the same ids.
fn fallback_id(index: usize, published_at: Option<DateTime<Utc>>) -> String {
    match published_at {
        Some(dt) => format!("news-article-{}-{}", index, dt.timestamp_millis()),
        None => {
            warn!(index, "Article has neither URL nor parseable publish time");
            format!("news-article-{}-unknown", index)
        }
    }
}

/// Turn NewsAPI's `content`/`description` pair into plain article text.
pub(crate) fn clean_content(content: Option<&str>, description: Option<&str>) -> String {
    let description = description.unwrap_or("");
    let raw = match content.filter(|c| !c.is_empty()) {
        Some(c) if c.trim() == REMOVED_MARKER => description,
        Some(c) => c,
        None => description,
    };

    let text = if raw.contains('<') {
        Html::parse_fragment(raw)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join("")
    } else {
        raw.to_string()
    };

    TRUNCATION_MARKER.replace(&text, "").trim().to_string()
}
