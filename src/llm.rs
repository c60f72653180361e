//! Model-backed implementations of the three text services.
//!
//! Each service is one `awful_aj` chat template. The template's system prompt
//! carries the instructions and JSON schema; the user message is the JSON
//! encoding of the service input. Replies are parsed into the typed outputs
//! from [`crate::models`].
//!
//! | Service | Template | Request body | Reply |
//! |---------|----------|--------------|-------|
//! | relevance | `police_relevance` | `{"articleContent": …}` | [`RelevanceVerdict`] |
//! | summary | `article_summary` | `{"articleContent": …}` | [`ArticleSummary`] |
//! | grouping | `common_headlines` | `[{"title","content","source"}, …]` | `[CommonHeadlineGroup]` |

use crate::api::{DEFAULT_MAX_RETRIES, ask_with_backoff};
use crate::error::{Result, ServiceError};
use crate::models::{
    ArticleSummary, CommonHeadlineGroup, HeadlineCandidate, RelevanceVerdict,
};
use crate::services::{HeadlineGrouper, RelevanceClassifier, Summarizer};
use crate::utils::{looks_truncated, truncate_for_log};
use awful_aj::{config::AwfulJadeConfig, template, template::ChatTemplate};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const RELEVANCE_TEMPLATE: &str = "police_relevance";
pub const SUMMARY_TEMPLATE: &str = "article_summary";
pub const GROUPING_TEMPLATE: &str = "common_headlines";

#[derive(Serialize)]
struct ArticleContentInput<'a> {
    #[serde(rename = "articleContent")]
    article_content: &'a str,
}

/// The three text services backed by one model configuration.
///
/// Cheap to clone; configuration and templates are shared.
#[derive(Clone)]
pub struct LlmServices {
    config: Arc<AwfulJadeConfig>,
    relevance: Arc<ChatTemplate>,
    summary: Arc<ChatTemplate>,
    grouping: Arc<ChatTemplate>,
    max_retries: usize,
}

impl LlmServices {
    pub fn new(
        config: AwfulJadeConfig,
        relevance: ChatTemplate,
        summary: ChatTemplate,
        grouping: ChatTemplate,
    ) -> Self {
        Self {
            config: Arc::new(config),
            relevance: Arc::new(relevance),
            summary: Arc::new(summary),
            grouping: Arc::new(grouping),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Load the three named templates from the `awful_aj` template directory.
    pub async fn load(config: AwfulJadeConfig) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let relevance = template::load_template(RELEVANCE_TEMPLATE).await?;
        let summary = template::load_template(SUMMARY_TEMPLATE).await?;
        let grouping = template::load_template(GROUPING_TEMPLATE).await?;
        info!(
            relevance = RELEVANCE_TEMPLATE,
            summary = SUMMARY_TEMPLATE,
            grouping = GROUPING_TEMPLATE,
            "Loaded templates"
        );
        Ok(Self::new(config, relevance, summary, grouping))
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Ask with `template` and parse the reply as `T`, re-asking once if the
    /// reply looks cut off.
    async fn ask_json<T: DeserializeOwned>(&self, template: &ChatTemplate, body: &str) -> Result<T> {
        let reply = self.ask_raw(template, body).await?;
        match serde_json::from_str::<T>(&reply) {
            Ok(parsed) => Ok(parsed),
            Err(e) if looks_truncated(&e) => {
                warn!(error = %e, "EOF while parsing; re-asking once");
                let second = self.ask_raw(template, body).await?;
                serde_json::from_str::<T>(&second).map_err(|e| {
                    warn!(
                        error = %e,
                        response_preview = %truncate_for_log(&second, 300),
                        "Model returned non-conforming JSON after re-ask"
                    );
                    ServiceError::from(e)
                })
            }
            Err(e) => {
                warn!(
                    error = %e,
                    response_preview = %truncate_for_log(&reply, 300),
                    "Model returned non-conforming JSON"
                );
                Err(e.into())
            }
        }
    }

    async fn ask_raw(&self, template: &ChatTemplate, body: &str) -> Result<String> {
        ask_with_backoff(&self.config, template, body, self.max_retries)
            .await
            .map_err(|e| ServiceError::Model(e.to_string()))
    }
}

impl RelevanceClassifier for LlmServices {
    #[instrument(level = "debug", skip_all)]
    async fn classify(&self, article_content: &str) -> Result<RelevanceVerdict> {
        let body = serde_json::to_string(&ArticleContentInput { article_content })?;
        self.ask_json(&self.relevance, &body).await
    }
}

impl Summarizer for LlmServices {
    #[instrument(level = "debug", skip_all)]
    async fn summarize(&self, article_content: &str) -> Result<ArticleSummary> {
        let body = serde_json::to_string(&ArticleContentInput { article_content })?;
        self.ask_json(&self.summary, &body).await
    }
}

impl HeadlineGrouper for LlmServices {
    #[instrument(level = "debug", skip_all, fields(candidates = candidates.len()))]
    async fn group(&self, candidates: &[HeadlineCandidate]) -> Result<Vec<CommonHeadlineGroup>> {
        let body = serde_json::to_string(candidates)?;
        self.ask_json(&self.grouping, &body).await
    }
}
