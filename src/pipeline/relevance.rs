//! Relevance and summary stage.
//!
//! Every article is judged on its own: too-short content is rejected without a
//! model call, otherwise the classifier decides and relevant articles are
//! summarized. A failure in either call, including a panic inside a service,
//! only degrades that one article.

use super::panic_message;
use crate::error::Result;
use crate::models::{ArticleSummary, ProcessedArticle, RawArticle, RelevanceVerdict};
use crate::services::{RelevanceClassifier, Summarizer};
use crate::utils::{content_len, has_min_content};
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, instrument, warn};

/// Reason attached to articles skipped for having too little content.
pub const CONTENT_TOO_SHORT: &str = "content too short";

/// Reason attached to articles whose classification or summary failed.
pub const PROCESSING_ERROR: &str = "processing error";

/// Assess one article. Never fails; errors become [`PROCESSING_ERROR`].
#[instrument(level = "debug", skip_all, fields(id = %article.id))]
pub async fn assess_article<C, S>(classifier: &C, summarizer: &S, article: &RawArticle) -> ProcessedArticle
where
    C: RelevanceClassifier,
    S: Summarizer,
{
    if !has_min_content(&article.content) {
        debug!(chars = content_len(&article.content), "Content too short; skipping classification");
        return ProcessedArticle::not_relevant(article, CONTENT_TOO_SHORT);
    }

    match evaluate(classifier, summarizer, &article.content).await {
        Ok((verdict, Some(summary))) if verdict.isRelevant => {
            let reason = Some(verdict.reason).filter(|r| !r.trim().is_empty());
            ProcessedArticle::from_raw(article, true, reason, Some(summary.summary))
        }
        Ok(_) => ProcessedArticle::from_raw(article, false, None, None),
        Err(e) => {
            warn!(id = %article.id, source = %article.source, error = %e, "Relevance/summary failed; marking article not relevant");
            ProcessedArticle::not_relevant(article, PROCESSING_ERROR)
        }
    }
}

async fn evaluate<C, S>(
    classifier: &C,
    summarizer: &S,
    content: &str,
) -> Result<(RelevanceVerdict, Option<ArticleSummary>)>
where
    C: RelevanceClassifier,
    S: Summarizer,
{
    let verdict = classifier.classify(content).await?;
    if !verdict.isRelevant {
        return Ok((verdict, None));
    }
    let summary = summarizer.summarize(content).await?;
    Ok((verdict, Some(summary)))
}

/// [`assess_article`], with a panic in either service contained to this article.
async fn assess_isolated<C, S>(classifier: &C, summarizer: &S, article: &RawArticle) -> ProcessedArticle
where
    C: RelevanceClassifier,
    S: Summarizer,
{
    match AssertUnwindSafe(assess_article(classifier, summarizer, article))
        .catch_unwind()
        .await
    {
        Ok(processed) => processed,
        Err(panic) => {
            warn!(
                id = %article.id,
                source = %article.source,
                panic = %panic_message(panic.as_ref()),
                "Relevance/summary panicked; marking article not relevant"
            );
            ProcessedArticle::not_relevant(article, PROCESSING_ERROR)
        }
    }
}

/// Assess a batch, at most `concurrency` articles at a time.
///
/// Output is in input order, one entry per article.
#[instrument(level = "info", skip_all, fields(total = articles.len(), concurrency = concurrency))]
pub async fn assess_articles<C, S>(
    classifier: &C,
    summarizer: &S,
    articles: &[RawArticle],
    concurrency: usize,
) -> Vec<ProcessedArticle>
where
    C: RelevanceClassifier,
    S: Summarizer,
{
    let processed: Vec<ProcessedArticle> = stream::iter(articles)
        .map(|article| assess_isolated(classifier, summarizer, article))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let relevant = processed.iter().filter(|a| a.is_relevant).count();
    let failed = processed
        .iter()
        .filter(|a| a.relevance_reason.as_deref() == Some(PROCESSING_ERROR))
        .count();
    info!(total = processed.len(), relevant, failed, "Relevance stage complete");
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::mocks::{MockClassifier, MockSummarizer, article, long_content};

    #[tokio::test]
    async fn test_short_content_skips_classifier() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let short = article(1, "Brief", "NDTV", "police raid, details awaited");

        let processed = assess_article(&classifier, &summarizer, &short).await;

        assert!(!processed.is_relevant);
        assert_eq!(processed.relevance_reason.as_deref(), Some(CONTENT_TOO_SHORT));
        assert_eq!(processed.summary, None);
        assert_eq!(classifier.calls(), 0);
        assert_eq!(summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_relevant_article_gets_reason_and_summary() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let raw = article(1, "Raid", "NDTV", &long_content("police"));

        let processed = assess_article(&classifier, &summarizer, &raw).await;

        assert!(processed.is_relevant);
        assert_eq!(processed.relevance_reason.as_deref(), Some("Mentions a police operation"));
        assert!(processed.summary.as_deref().unwrap().starts_with("Summary of"));
        assert_eq!(processed.id, raw.id);
        assert_eq!(processed.url, raw.url);
    }

    #[tokio::test]
    async fn test_irrelevant_article_has_no_reason_or_summary() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let raw = article(1, "Festival", "NDTV", &long_content("festival"));

        let processed = assess_article(&classifier, &summarizer, &raw).await;

        assert!(!processed.is_relevant);
        assert_eq!(processed.relevance_reason, None);
        assert_eq!(processed.summary, None);
        assert_eq!(summarizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_summary_failure_degrades_whole_article() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let raw = article(1, "Raid", "NDTV", &long_content("police FAIL_SUMMARY"));

        let processed = assess_article(&classifier, &summarizer, &raw).await;

        assert!(!processed.is_relevant);
        assert_eq!(processed.relevance_reason.as_deref(), Some(PROCESSING_ERROR));
        assert_eq!(processed.summary, None);
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let articles: Vec<_> = (0..20)
            .map(|i| {
                let marker = if i % 3 == 0 { "police" } else { "weather" };
                article(i, &format!("Story {i}"), "NDTV", &long_content(marker))
            })
            .collect();

        let processed = assess_articles(&classifier, &summarizer, &articles, 4).await;

        assert_eq!(processed.len(), articles.len());
        for (raw, out) in articles.iter().zip(&processed) {
            assert_eq!(raw.id, out.id);
        }
        assert_eq!(processed.iter().filter(|a| a.is_relevant).count(), 7);
    }

    #[tokio::test]
    async fn test_empty_reason_is_omitted() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let raw = article(1, "Raid", "NDTV", &long_content("police NO_REASON"));

        let processed = assess_article(&classifier, &summarizer, &raw).await;

        assert!(processed.is_relevant);
        assert_eq!(processed.relevance_reason, None);
        assert!(processed.summary.is_some());
    }

    #[tokio::test]
    async fn test_slow_articles_keep_their_position() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let articles = vec![
            article(1, "First", "NDTV", &long_content("police SLOW first")),
            article(2, "Second", "NDTV", &long_content("police SLOW second")),
            article(3, "Third", "NDTV", &long_content("police third")),
            article(4, "Fourth", "NDTV", &long_content("weather fourth")),
        ];

        let processed = assess_articles(&classifier, &summarizer, &articles, 4).await;

        // The fast articles complete while the slow ones are still waiting
        let completed = classifier.completion_order();
        assert_eq!(completed.len(), 4);
        assert!(completed[0].contains("third") || completed[0].contains("fourth"));
        assert!(completed[1].contains("third") || completed[1].contains("fourth"));
        assert!(completed[2].contains("SLOW"));
        assert!(completed[3].contains("SLOW"));

        // Output stays in batch order regardless
        let ids: Vec<_> = processed.iter().map(|a| a.id.as_str()).collect();
        let expected: Vec<_> = articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert!(processed[0].is_relevant && processed[1].is_relevant && processed[2].is_relevant);
        assert!(!processed[3].is_relevant);
    }

    #[tokio::test]
    async fn test_panic_is_contained_to_one_article() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let articles = vec![
            article(1, "Raid One", "NDTV", &long_content("police one")),
            article(2, "Raid Two", "NDTV", &long_content("police PANIC")),
            article(3, "Raid Three", "NDTV", &long_content("police three")),
        ];

        let processed = assess_articles(&classifier, &summarizer, &articles, 3).await;

        assert_eq!(processed.len(), 3);
        assert!(processed[0].is_relevant);
        assert!(!processed[1].is_relevant);
        assert_eq!(processed[1].relevance_reason.as_deref(), Some(PROCESSING_ERROR));
        assert_eq!(processed[1].summary, None);
        assert!(processed[2].is_relevant);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_makes_progress() {
        let classifier = MockClassifier::default();
        let summarizer = MockSummarizer::default();
        let articles = vec![article(1, "Raid", "NDTV", &long_content("police"))];

        let processed = assess_articles(&classifier, &summarizer, &articles, 0).await;
        assert_eq!(processed.len(), 1);
    }
}
