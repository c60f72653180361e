//! Contracts of the external collaborators the pipeline depends on.
//!
//! The pipeline only ever talks to these traits. Production implementations
//! live in [`crate::sources`] and [`crate::llm`]; tests plug in mocks.
//!
//! | Trait | Input | Output |
//! |-------|-------|--------|
//! | [`ArticleSource`] | calendar date | `Vec<RawArticle>` |
//! | [`RelevanceClassifier`] | article content | [`RelevanceVerdict`] |
//! | [`Summarizer`] | article content | [`ArticleSummary`] |
//! | [`HeadlineGrouper`] | all candidates of a batch | `Vec<CommonHeadlineGroup>` |
//!
//! Retries, timeouts and rate limiting are the implementor's business; the
//! pipeline issues each call once and degrades on `Err`.

use crate::error::Result;
use crate::models::{
    ArticleSummary, CommonHeadlineGroup, HeadlineCandidate, RawArticle, RelevanceVerdict,
};
use chrono::NaiveDate;

/// Supplies the articles published on a given date.
///
/// Implementations must not return two articles with the same `id` and must
/// already have dropped articles without a usable title or content.
pub trait ArticleSource {
    async fn fetch_articles(&self, date: NaiveDate) -> Result<Vec<RawArticle>>;
}

/// Decides whether an article is relevant to police operations.
pub trait RelevanceClassifier {
    async fn classify(&self, article_content: &str) -> Result<RelevanceVerdict>;
}

/// Produces a short summary of a relevant article.
pub trait Summarizer {
    async fn summarize(&self, article_content: &str) -> Result<ArticleSummary>;
}

/// Clusters articles describing the same event under one common title.
///
/// Called once per batch with every candidate so it can match across sources.
pub trait HeadlineGrouper {
    async fn group(&self, candidates: &[HeadlineCandidate]) -> Result<Vec<CommonHeadlineGroup>>;
}
