//! Joining assessments back onto the articles they came from.
//!
//! The join key is the [`ArticleId`] assigned at ingestion, so two articles
//! with the same headline keep their own verdicts. The merge never mutates its
//! inputs; it builds a fresh list of [`MergedArticle`] records in article order.

use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::models::{ArticleId, Assessment, MergedArticle, TrackedArticle};

/// The merged export plus any assessments that matched no article.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub records: Vec<MergedArticle>,
    pub unmatched: Vec<Assessment>,
}

/// Attach each assessment to its article.
///
/// Articles without an assessment are exported as `"Not Assessed"` / `"N/A"`.
/// An assessment whose id matches no article is logged, reported in
/// [`MergeOutcome::unmatched`], and otherwise skipped. If several assessments
/// share an id, the first one is used.
pub fn merge_assessments(articles: &[TrackedArticle], assessments: &[Assessment]) -> MergeOutcome {
    let mut by_id: HashMap<ArticleId, &Assessment> = HashMap::with_capacity(assessments.len());
    for assessment in assessments {
        by_id.entry(assessment.article_id).or_insert(assessment);
    }

    let records: Vec<MergedArticle> = articles
        .iter()
        .map(|tracked| match by_id.get(&tracked.id) {
            Some(assessment) => MergedArticle::assessed(&tracked.article, assessment),
            None => MergedArticle::unassessed(&tracked.article),
        })
        .collect();

    let known: HashSet<ArticleId> = articles.iter().map(|t| t.id).collect();
    let unmatched: Vec<Assessment> = assessments
        .iter()
        .filter(|a| !known.contains(&a.article_id))
        .cloned()
        .collect();

    for assessment in &unmatched {
        warn!(
            id = %assessment.article_id,
            title = %assessment.title,
            "Could not match assessment to any article; skipping"
        );
    }

    info!(
        articles = records.len(),
        assessed = records.iter().filter(|r| r.is_assessed()).count(),
        unmatched = unmatched.len(),
        "Merged assessments"
    );
    MergeOutcome { records, unmatched }
}

/// Export records for a batch that has not been assessed yet.
pub fn unassessed_records(articles: &[TrackedArticle]) -> Vec<MergedArticle> {
    articles
        .iter()
        .map(|tracked| MergedArticle::unassessed(&tracked.article))
        .collect()
}
