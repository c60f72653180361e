//! Article sources: where the raw articles for a date come from.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | NewsAPI | [`newsapi`] | `top-headlines` endpoint | Requires an API key |
//! | JSON file | [`file`] | Local `[RawArticle]` file | Offline runs and demos |
//!
//! Both apply the same clean-up contract before handing articles to the
//! pipeline: no empty or `[Removed]` titles, no empty content, unique ids.

use crate::error::Result;
use crate::models::RawArticle;
use crate::services::ArticleSource;
use chrono::NaiveDate;
use itertools::Itertools;

pub mod file;
pub mod newsapi;

pub use file::JsonFileSource;
pub use newsapi::{NewsApiConfig, NewsApiSource};

/// Marker NewsAPI uses for content pulled at the publisher's request.
pub(crate) const REMOVED_MARKER: &str = "[Removed]";

/// The source selected at startup.
#[derive(Debug)]
pub enum Source {
    NewsApi(NewsApiSource),
    File(JsonFileSource),
}

impl ArticleSource for Source {
    async fn fetch_articles(&self, date: NaiveDate) -> Result<Vec<RawArticle>> {
        match self {
            Source::NewsApi(source) => source.fetch_articles(date).await,
            Source::File(source) => source.fetch_articles(date).await,
        }
    }
}

/// Whether an article has a title and content worth showing.
pub(crate) fn is_usable(article: &RawArticle) -> bool {
    let title = article.title.trim();
    !title.is_empty() && title != REMOVED_MARKER && !article.content.trim().is_empty()
}

/// Drop unusable articles and keep only the first article per id.
pub(crate) fn finalize(articles: impl IntoIterator<Item = RawArticle>) -> Vec<RawArticle> {
    articles
        .into_iter()
        .filter(is_usable)
        .unique_by(|a| a.id.clone())
        .collect()
}
