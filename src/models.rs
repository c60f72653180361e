//! Data models for fetched articles, model-service payloads and the digest.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`RawArticle`]: An article as supplied by an article source
//! - [`ProcessedArticle`]: A raw article plus its relevance verdict and summary
//! - [`HeadlineCandidate`] / [`CommonHeadlineGroup`]: Input and output of the
//!   common-headline grouping service
//! - [`ResolvedHeadlineGroup`]: A common headline whose members carry URLs again
//! - [`CategorizedGroup`] / [`Digest`]: The final, presentation-facing output
//!
//! Everything that leaves the crate serializes with camelCase field names so
//! the digest JSON matches what the web front end already consumes.

use serde::{Deserialize, Serialize};

/// URL used for a grouped article that could not be matched back to the batch.
pub const PLACEHOLDER_URL: &str = "#";

/// A news article for a single calendar date, as returned by an article source.
///
/// `id` is unique within one fetch and usually equals `url`. `published_date`
/// is a `YYYY-MM-DD` string, not a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub published_date: String,
}

/// A [`RawArticle`] after the relevance and summary stage.
///
/// `relevance_reason` and `summary` are only set for relevant articles, except
/// that a diagnostic reason is attached when the article could not be judged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub published_date: String,
    pub is_relevant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ProcessedArticle {
    /// Build a processed article, copying identity fields verbatim from `raw`.
    pub fn from_raw(
        raw: &RawArticle,
        is_relevant: bool,
        relevance_reason: Option<String>,
        summary: Option<String>,
    ) -> Self {
        Self {
            id: raw.id.clone(),
            title: raw.title.clone(),
            content: raw.content.clone(),
            source: raw.source.clone(),
            url: raw.url.clone(),
            published_date: raw.published_date.clone(),
            is_relevant,
            relevance_reason,
            summary,
        }
    }

    /// A not-relevant article carrying a diagnostic reason and no summary.
    pub fn not_relevant(raw: &RawArticle, diagnostic: &str) -> Self {
        Self::from_raw(raw, false, Some(diagnostic.to_string()), None)
    }
}

/// Verdict returned by the relevance classifier.
///
/// Field names match the JSON schema of the `police_relevance` template,
/// hence the `#[allow(non_snake_case)]`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RelevanceVerdict {
    /// Whether the article concerns police operations.
    pub isRelevant: bool,
    /// Short explanation of the verdict.
    #[serde(default)]
    pub reason: String,
}

/// Summary returned by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSummary {
    pub summary: String,
}

/// An article as shown to the grouping service: text only, no id or url.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlineCandidate {
    pub title: String,
    pub content: String,
    pub source: String,
}

impl From<&RawArticle> for HeadlineCandidate {
    fn from(article: &RawArticle) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            source: article.source.clone(),
        }
    }
}

/// A cluster of articles about one event, as produced by the grouping service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonHeadlineGroup {
    pub common_title: String,
    #[serde(default)]
    pub articles: Vec<GroupedArticle>,
}

/// Member of a [`CommonHeadlineGroup`]. The model may omit `content`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupedArticle {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub source: String,
}

/// A link inside a resolved common headline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlineLink {
    pub title: String,
    pub source: String,
    pub url: String,
}

/// A common headline whose members were matched back to their original URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHeadlineGroup {
    pub common_title: String,
    pub articles: Vec<HeadlineLink>,
}

/// Relevant articles from one source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedGroup {
    pub source_name: String,
    pub articles: Vec<ProcessedArticle>,
}

/// The digest for one date: the only output of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub common_headlines: Vec<ResolvedHeadlineGroup>,
    pub categorized_news: Vec<CategorizedGroup>,
}

impl Digest {
    /// The digest returned whenever there is nothing (or nothing usable) to show.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.common_headlines.is_empty() && self.categorized_news.is_empty()
    }

    /// Number of relevant articles across all source groups.
    pub fn relevant_count(&self) -> usize {
        self.categorized_news.iter().map(|g| g.articles.len()).sum()
    }
}
