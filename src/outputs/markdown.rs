//! Markdown rendering of a [`Digest`].
//!
//! Layout:
//!
//! ```text
//! # LawLens Daily Digest: 2025-05-06
//!
//! ## Common Headlines
//! ### <common title>
//! - **<source>:** [<title>](<url>)
//!
//! ## By Source
//! ### <source>
//! #### [<title>](<url>)
//! > **Relevance:** <reason>
//! **Summary:** <summary>
//! ```
//!
//! Anchors use [`slugify_title`] so the table of contents links resolve in
//! mdBook and GitHub alike.

use crate::models::{CategorizedGroup, Digest, PLACEHOLDER_URL, ResolvedHeadlineGroup};
use crate::utils::slugify_title;
use chrono::NaiveDate;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

const EMPTY_NOTICE: &str = "No police-relevant news found for this date.";

/// Render the whole digest.
pub fn digest_to_markdown(digest: &Digest, date: NaiveDate) -> String {
    let mut md = String::new();
    writeln!(md, "# LawLens Daily Digest: {}\n", date.format("%Y-%m-%d")).unwrap();

    if digest.is_empty() {
        writeln!(md, "_{}_", EMPTY_NOTICE).unwrap();
        return md;
    }

    if !digest.categorized_news.is_empty() {
        let sources = digest
            .categorized_news
            .iter()
            .map(|g| format!("[{}](#{})", g.source_name, slugify_title(&g.source_name)))
            .join(" · ");
        writeln!(
            md,
            "{} relevant articles from {} sources: {}\n",
            digest.relevant_count(),
            digest.categorized_news.len(),
            sources
        )
        .unwrap();
    }

    if !digest.common_headlines.is_empty() {
        writeln!(md, "## Common Headlines\n").unwrap();
        for headline in &digest.common_headlines {
            render_headline(&mut md, headline);
        }
    }

    writeln!(md, "## By Source\n").unwrap();
    if digest.categorized_news.is_empty() {
        writeln!(md, "_{}_\n", EMPTY_NOTICE).unwrap();
    }
    for group in &digest.categorized_news {
        render_source_group(&mut md, group);
    }

    md
}

fn render_headline(md: &mut String, headline: &ResolvedHeadlineGroup) {
    writeln!(md, "### {}\n", headline.common_title).unwrap();
    if headline.articles.is_empty() {
        return;
    }
    writeln!(md, "This topic was reported by multiple sources:\n").unwrap();
    for article in &headline.articles {
        if article.url == PLACEHOLDER_URL {
            writeln!(md, "- **{}:** {}", article.source, article.title).unwrap();
        } else {
            writeln!(md, "- **{}:** [{}]({})", article.source, article.title, article.url).unwrap();
        }
    }
    md.push('\n');
}

fn render_source_group(md: &mut String, group: &CategorizedGroup) {
    writeln!(md, "### {}\n", group.source_name).unwrap();
    for article in &group.articles {
        if article.url == PLACEHOLDER_URL {
            writeln!(md, "#### {}\n", article.title).unwrap();
        } else {
            writeln!(md, "#### [{}]({})\n", article.title, article.url).unwrap();
        }
        if let Some(reason) = article.relevance_reason.as_deref().filter(|r| !r.is_empty()) {
            writeln!(md, "> **Relevance:** {}\n", reason).unwrap();
        }
        if let Some(summary) = &article.summary {
            writeln!(md, "**Summary:** {}\n", summary).unwrap();
        }
    }
}

/// Write the rendered digest to `{markdown_output_dir}/{date}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, %date))]
pub async fn write_digest(
    digest: &Digest,
    markdown_output_dir: &str,
    date: NaiveDate,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = PathBuf::from(markdown_output_dir).join(format!("{}.md", date.format("%Y-%m-%d")));
    fs::write(&path, digest_to_markdown(digest, date)).await?;
    info!(path = %path.display(), "Wrote digest Markdown");
    Ok(path)
}
