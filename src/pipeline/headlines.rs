//! Common-headline stage.
//!
//! The grouping service sees every sufficiently long article of the batch at
//! once and returns clusters keyed by a shared title. Its members come back as
//! text only, so each one is matched to the batch again by `(title, source)`
//! to recover a link.
//!
//! # Matching
//!
//! The lookup is a linear, first-match search over the whole (unfiltered)
//! batch. Two articles sharing both title and source are indistinguishable to
//! it: the earlier one wins. Members with no match get [`PLACEHOLDER_URL`].

use super::panic_message;
use crate::models::{
    CommonHeadlineGroup, HeadlineCandidate, HeadlineLink, PLACEHOLDER_URL, RawArticle,
    ResolvedHeadlineGroup,
};
use crate::services::HeadlineGrouper;
use crate::utils::has_min_content;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, instrument, warn};

/// Articles eligible for grouping, reduced to the text the service needs.
pub fn headline_candidates(articles: &[RawArticle]) -> Vec<HeadlineCandidate> {
    articles
        .iter()
        .filter(|a| has_min_content(&a.content))
        .map(HeadlineCandidate::from)
        .collect()
}

/// Ask the grouping service for clusters. Never fails; errors and panics yield
/// no groups.
#[instrument(level = "info", skip_all)]
pub async fn detect_common_headlines<G>(grouper: &G, articles: &[RawArticle]) -> Vec<CommonHeadlineGroup>
where
    G: HeadlineGrouper,
{
    let candidates = headline_candidates(articles);
    if candidates.is_empty() {
        debug!("No article has enough content for grouping; skipping call");
        return Vec::new();
    }

    match AssertUnwindSafe(grouper.group(&candidates)).catch_unwind().await {
        Ok(Ok(groups)) => {
            info!(candidates = candidates.len(), groups = groups.len(), "Common-headline detection complete");
            groups
        }
        Ok(Err(e)) => {
            warn!(candidates = candidates.len(), error = %e, "Common-headline detection failed; continuing without groups");
            Vec::new()
        }
        Err(panic) => {
            warn!(
                candidates = candidates.len(),
                panic = %panic_message(panic.as_ref()),
                "Common-headline detection panicked; continuing without groups"
            );
            Vec::new()
        }
    }
}

/// Attach URLs from `batch` to every member of every group.
///
/// Groups are kept even when none of their members can be matched.
pub fn resolve_groups(groups: Vec<CommonHeadlineGroup>, batch: &[RawArticle]) -> Vec<ResolvedHeadlineGroup> {
    groups
        .into_iter()
        .map(|group| {
            let articles = group
                .articles
                .into_iter()
                .map(|member| {
                    let url = find_url(batch, &member.title, &member.source);
                    if url.is_none() {
                        debug!(title = %member.title, source = %member.source, "Grouped article not found in batch");
                    }
                    HeadlineLink {
                        url: url.unwrap_or(PLACEHOLDER_URL).to_string(),
                        title: member.title,
                        source: member.source,
                    }
                })
                .collect();
            ResolvedHeadlineGroup {
                common_title: group.common_title,
                articles,
            }
        })
        .collect()
}

fn find_url<'a>(batch: &'a [RawArticle], title: &str, source: &str) -> Option<&'a str> {
    batch
        .iter()
        .find(|a| a.title == title && a.source == source)
        .map(|a| a.url.as_str())
}

/// Detect and resolve common headlines for a batch.
pub async fn common_headlines<G>(grouper: &G, articles: &[RawArticle]) -> Vec<ResolvedHeadlineGroup>
where
    G: HeadlineGrouper,
{
    let groups = detect_common_headlines(grouper, articles).await;
    resolve_groups(groups, articles)
}
