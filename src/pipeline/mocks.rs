//! In-memory collaborators for pipeline tests.
//!
//! Behaviour is driven by markers in the article content so each test can
//! describe its batch declaratively:
//! - content containing `police` is classified relevant
//! - content containing `FAIL_CLASSIFY` makes the classifier fail
//! - content containing `FAIL_SUMMARY` makes the summarizer fail
//! - content containing `PANIC` makes the classifier panic
//! - content containing `SLOW` delays the classifier by [`SLOW_DELAY`]
//! - content containing `NO_REASON` yields a relevant verdict with an empty reason

use crate::error::{Result, ServiceError};
use crate::models::{
    ArticleSummary, CommonHeadlineGroup, GroupedArticle, HeadlineCandidate, RawArticle,
    RelevanceVerdict,
};
use crate::services::{ArticleSource, HeadlineGrouper, RelevanceClassifier, Summarizer};
use chrono::NaiveDate;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub const SLOW_DELAY: Duration = Duration::from_millis(60);

pub fn long_content(marker: &str) -> String {
    format!(
        "{marker}: the district administration issued a statement on Tuesday describing the situation in detail."
    )
}

pub fn article(id: usize, title: &str, source: &str, content: &str) -> RawArticle {
    RawArticle {
        id: format!("https://news.example/{id}"),
        title: title.to_string(),
        content: content.to_string(),
        source: source.to_string(),
        url: format!("https://news.example/{id}"),
        published_date: "2025-05-06".to_string(),
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
}

#[derive(Default)]
pub struct MockSource {
    pub articles: Vec<RawArticle>,
    pub fail: bool,
    pub panic: bool,
}

impl MockSource {
    pub fn with(articles: Vec<RawArticle>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }
}

impl ArticleSource for MockSource {
    async fn fetch_articles(&self, _date: NaiveDate) -> Result<Vec<RawArticle>> {
        if self.panic {
            panic!("source exploded");
        }
        if self.fail {
            return Err(ServiceError::Upstream {
                status: 429,
                message: "rate limited".to_string(),
            });
        }
        Ok(self.articles.clone())
    }
}

#[derive(Default)]
pub struct MockClassifier {
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
    pub finished: Mutex<Vec<(String, Instant)>>,
}

impl MockClassifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Content of every completed call, in completion order.
    pub fn completion_order(&self) -> Vec<String> {
        self.finished.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn first_finish(&self) -> Option<Instant> {
        self.finished.lock().unwrap().iter().map(|(_, at)| *at).min()
    }
}

impl RelevanceClassifier for MockClassifier {
    async fn classify(&self, article_content: &str) -> Result<RelevanceVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(article_content.to_string());
        if article_content.contains("SLOW") {
            tokio::time::sleep(SLOW_DELAY).await;
        }
        if article_content.contains("PANIC") {
            panic!("classifier exploded");
        }
        self.finished
            .lock()
            .unwrap()
            .push((article_content.to_string(), Instant::now()));
        if article_content.contains("FAIL_CLASSIFY") {
            return Err(ServiceError::Model("classifier unavailable".to_string()));
        }
        let is_relevant = article_content.contains("police");
        let reason = if article_content.contains("NO_REASON") {
            String::new()
        } else if is_relevant {
            "Mentions a police operation".to_string()
        } else {
            "Unrelated to policing".to_string()
        };
        Ok(RelevanceVerdict {
            isRelevant: is_relevant,
            reason,
        })
    }
}

#[derive(Default)]
pub struct MockSummarizer {
    pub calls: AtomicUsize,
}

impl MockSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Summarizer for MockSummarizer {
    async fn summarize(&self, article_content: &str) -> Result<ArticleSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if article_content.contains("FAIL_SUMMARY") {
            return Err(ServiceError::Model("summarizer unavailable".to_string()));
        }
        Ok(ArticleSummary {
            summary: format!("Summary of {} chars", article_content.chars().count()),
        })
    }
}

/// Returns `groups` (or fails, or panics) and records every batch it was given.
#[derive(Default)]
pub struct MockGrouper {
    pub groups: Vec<CommonHeadlineGroup>,
    pub fail: bool,
    pub panic: bool,
    pub calls: AtomicUsize,
    pub received: Mutex<Vec<Vec<HeadlineCandidate>>>,
    pub started_at: Mutex<Option<Instant>>,
}

impl MockGrouper {
    pub fn returning(groups: Vec<CommonHeadlineGroup>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn started_at(&self) -> Option<Instant> {
        *self.started_at.lock().unwrap()
    }

    pub fn last_batch(&self) -> Vec<HeadlineCandidate> {
        self.received.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl HeadlineGrouper for MockGrouper {
    async fn group(&self, candidates: &[HeadlineCandidate]) -> Result<Vec<CommonHeadlineGroup>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started_at.lock().unwrap().get_or_insert_with(Instant::now);
        self.received.lock().unwrap().push(candidates.to_vec());
        if self.panic {
            panic!("grouper exploded");
        }
        if self.fail {
            return Err(ServiceError::Model("grouping unavailable".to_string()));
        }
        Ok(self.groups.clone())
    }
}

pub fn group(common_title: &str, members: &[(&str, &str)]) -> CommonHeadlineGroup {
    CommonHeadlineGroup {
        common_title: common_title.to_string(),
        articles: members
            .iter()
            .map(|(title, source)| GroupedArticle {
                title: title.to_string(),
                content: String::new(),
                source: source.to_string(),
            })
            .collect(),
    }
}
