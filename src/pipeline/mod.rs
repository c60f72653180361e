//! The news-processing pipeline: one date in, one [`Digest`] out.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  fetch(date) ──►│ relevance + summary (fan-out)│──┐
//!        │        └──────────────────────────────┘  ├──► assemble ──► Digest
//!        └───────►│ common-headline grouping     │──┘
//!                 └──────────────────────────────┘
//! ```
//!
//! Both stages run concurrently over the same batch. Every external failure,
//! panics included, is absorbed where it happens: one article's call degrades
//! only that article and a failed grouping call only drops the common
//! headlines. [`NewsPipeline::process_news`] therefore always returns a
//! digest, empty when the source itself could not deliver.

use crate::error::Result;
use crate::models::Digest;
use crate::services::{ArticleSource, HeadlineGrouper, RelevanceClassifier, Summarizer};
use chrono::NaiveDate;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info, instrument};

pub mod digest;
pub mod headlines;
pub mod relevance;

#[cfg(test)]
pub(crate) mod mocks;

/// Default number of articles assessed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Wires an article source and the three text services into a digest builder.
pub struct NewsPipeline<S, C, Z, G> {
    source: S,
    classifier: C,
    summarizer: Z,
    grouper: G,
    concurrency: usize,
}

impl<S, C, Z, G> NewsPipeline<S, C, Z, G>
where
    S: ArticleSource,
    C: RelevanceClassifier,
    Z: Summarizer,
    G: HeadlineGrouper,
{
    pub fn new(source: S, classifier: C, summarizer: Z, grouper: G) -> Self {
        Self {
            source,
            classifier,
            summarizer,
            grouper,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Cap on concurrent relevance/summary evaluations (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build the digest for `date`.
    ///
    /// Never fails: a source error, or a panic outside the per-call guards
    /// (fetching, assembly), yields [`Digest::empty`].
    #[instrument(level = "info", skip_all, fields(%date))]
    pub async fn process_news(&self, date: NaiveDate) -> Digest {
        let t0 = Instant::now();
        match AssertUnwindSafe(self.build_digest(date)).catch_unwind().await {
            Ok(Ok(digest)) => {
                info!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    common_headlines = digest.common_headlines.len(),
                    sources = digest.categorized_news.len(),
                    relevant = digest.relevant_count(),
                    "Digest built"
                );
                digest
            }
            Ok(Err(e)) => {
                error!(error = %e, "Article source unavailable; returning empty digest");
                Digest::empty()
            }
            Err(panic) => {
                error!(
                    panic = %panic_message(panic.as_ref()),
                    "Unexpected failure while building digest; returning empty digest"
                );
                Digest::empty()
            }
        }
    }

    async fn build_digest(&self, date: NaiveDate) -> Result<Digest> {
        let articles = self.source.fetch_articles(date).await?;
        if articles.is_empty() {
            info!("No articles for this date; skipping model calls");
            return Ok(Digest::empty());
        }
        info!(count = articles.len(), "Articles to analyze");

        let (processed, common_headlines) = tokio::join!(
            relevance::assess_articles(&self.classifier, &self.summarizer, &articles, self.concurrency),
            headlines::common_headlines(&self.grouper, &articles),
        );

        Ok(digest::assemble(processed, common_headlines))
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
