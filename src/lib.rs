//! # LawLens
//!
//! Builds a daily digest of news relevant to police operations.
//!
//! For a chosen date the pipeline fetches articles, asks a language model
//! whether each one concerns police operations, summarizes the ones that do,
//! and groups articles covering the same event across outlets under a common
//! title. The result is a [`Digest`] with two views: common headlines and
//! relevant articles by source.
//!
//! ## Architecture
//!
//! 1. **Source**: [`sources`] supply the raw articles for a date
//! 2. **Relevance & summary**: per-article fan-out, bounded concurrency
//! 3. **Common headlines**: one grouping call over the whole batch, run
//!    concurrently with step 2
//! 4. **Assembly**: relevant articles grouped by source, headlines re-linked
//!
//! The external services are traits in [`services`]; [`llm`] implements the
//! text services on top of `awful_aj`. [`NewsPipeline::process_news`] is the
//! single entry point and never fails.
//!
//! ```ignore
//! let pipeline = NewsPipeline::new(source, llm.clone(), llm.clone(), llm);
//! let digest = pipeline.process_news(date).await;
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod llm;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod services;
pub mod sources;
pub mod utils;

pub use error::ServiceError;
pub use models::{
    CategorizedGroup, Digest, HeadlineLink, ProcessedArticle, RawArticle, ResolvedHeadlineGroup,
};
pub use pipeline::NewsPipeline;
