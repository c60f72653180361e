//! Digest assembly: relevant articles grouped by source, plus common headlines.

use crate::models::{CategorizedGroup, Digest, ProcessedArticle, ResolvedHeadlineGroup};
use std::collections::HashMap;

/// Group relevant articles by source, in first-seen source order.
///
/// Articles that are not relevant are dropped. Within a group, articles keep
/// their processing order.
pub fn categorize(processed: Vec<ProcessedArticle>) -> Vec<CategorizedGroup> {
    let mut groups: Vec<CategorizedGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for article in processed.into_iter().filter(|a| a.is_relevant) {
        match index.get(&article.source) {
            Some(&i) => groups[i].articles.push(article),
            None => {
                index.insert(article.source.clone(), groups.len());
                groups.push(CategorizedGroup {
                    source_name: article.source.clone(),
                    articles: vec![article],
                });
            }
        }
    }
    groups
}

/// Build the final digest from both stages' results.
pub fn assemble(processed: Vec<ProcessedArticle>, common_headlines: Vec<ResolvedHeadlineGroup>) -> Digest {
    Digest {
        common_headlines,
        categorized_news: categorize(processed),
    }
}
