//! The per-article assessment loop.
//!
//! For each article, in order: render the prompt, ask the model, parse the
//! reply. Articles are processed one at a time and every article yields
//! exactly one [`Assessment`], whatever went wrong along the way.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use crate::model::{AskModel, reply_text};
use crate::models::{Assessment, NOT_AVAILABLE, TrackedArticle};
use crate::parser::parse_reply;
use crate::prompt::credibility_prompt;
use crate::utils::truncate_for_log;

/// Assess a single article.
#[instrument(level = "info", skip_all, fields(id = %tracked.id))]
pub async fn assess_article<M: AskModel>(model: &M, tracked: &TrackedArticle) -> Assessment {
    let article = &tracked.article;
    let prompt = credibility_prompt(article);
    debug!(prompt_bytes = prompt.len(), "Rendered credibility prompt");

    let reply = model.ask(&prompt).await;
    debug!(
        ok = reply.is_ok(),
        reply = %truncate_for_log(&reply_text(&reply), 200),
        "Model replied"
    );
    let verdict = parse_reply(&reply);

    Assessment {
        article_id: tracked.id,
        original_title_for_matching: article.title.clone(),
        title: article.title().unwrap_or(NOT_AVAILABLE).to_string(),
        credibility_label: verdict.label,
        reasoning: verdict.reasoning,
    }
}

/// Assess every article sequentially, calling `on_progress(done, total)` after each one.
///
/// The output has one entry per input, in input order. An empty input yields
/// an empty output.
#[instrument(level = "info", skip_all, fields(total = articles.len()))]
pub async fn assess_articles<M, F>(
    model: &M,
    articles: &[TrackedArticle],
    mut on_progress: F,
) -> Vec<Assessment>
where
    M: AskModel,
    F: FnMut(usize, usize),
{
    let total = articles.len();
    if total == 0 {
        info!("No articles to assess");
        return Vec::new();
    }

    let mut done = 0usize;
    let assessments: Vec<Assessment> = stream::iter(articles)
        .then(|tracked| assess_article(model, tracked))
        .inspect(|assessment| {
            done += 1;
            info!(
                done,
                total,
                id = %assessment.article_id,
                label = assessment.credibility_label.map(|l| l.as_str()).unwrap_or("none"),
                "Assessed article"
            );
            on_progress(done, total);
        })
        .collect()
        .await;

    info!(count = assessments.len(), "Credibility assessment complete");
    assessments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_assessments;
    use crate::model::{ModelError, ModelReply};
    use crate::models::{Article, ArticleSource, CredibilityLabel, track_articles};
    use std::cell::RefCell;

    const CREDIBLE_EXAMPLE: &str = "Estimated Credibility: Credible\nReasoning: The article reports on an official announcement from a regulatory body (IFSB), published by a reputable news agency (Reuters).";
    const NOT_CREDIBLE_EXAMPLE: &str = "Estimated Credibility: Not Credible\nReasoning: The claims are bold market projections distributed via a press release service (GlobeNewswire).";

    /// Replies according to which title appears in the prompt, and records every prompt.
    #[derive(Default)]
    struct ScriptedModel {
        replies: Vec<(&'static str, ModelReply)>,
        prompts: RefCell<Vec<String>>,
    }

    impl AskModel for ScriptedModel {
        async fn ask(&self, prompt: &str) -> ModelReply {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.replies
                .iter()
                .find(|(title, _)| prompt.contains(&format!("- Title: \"{title}\"")))
                .map(|(_, reply)| reply.clone())
                .unwrap_or_else(|| Ok("I cannot help with that.".to_string()))
        }
    }

    fn titled(title: Option<&str>) -> Article {
        Article {
            title: title.map(str::to_string),
            ..Article::default()
        }
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let model = ScriptedModel::default();
        let mut calls = 0;
        let out = assess_articles(&model, &[], |_, _| calls += 1).await;
        assert!(out.is_empty());
        assert_eq!(calls, 0);
        assert!(model.prompts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_one_result_per_article_in_order() {
        let model = ScriptedModel::default();
        let articles = track_articles(vec![
            titled(Some("first")),
            titled(None),
            titled(Some("third")),
            titled(Some("first")),
        ]);

        let mut progress = Vec::new();
        let out =
            assess_articles(&model, &articles, |done, total| progress.push((done, total))).await;

        assert_eq!(out.len(), articles.len());
        for (tracked, assessment) in articles.iter().zip(&out) {
            assert_eq!(assessment.article_id, tracked.id);
            assert_eq!(assessment.original_title_for_matching, tracked.article.title);
        }
        assert_eq!(out[1].title, "N/A");
        assert_eq!(progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);

        let prompts = model.prompts.borrow();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("- Title: \"first\""));
        assert!(prompts[1].contains("- Title: \"N/A\""));
        assert!(prompts[2].contains("- Title: \"third\""));
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let model = ScriptedModel {
            replies: vec![
                (
                    "broken",
                    Err(ModelError::Quota {
                        message: "429 Resource has been exhausted".to_string(),
                    }),
                ),
                ("fine", Ok(CREDIBLE_EXAMPLE.to_string())),
            ],
            ..ScriptedModel::default()
        };
        let articles = track_articles(vec![
            titled(Some("broken")),
            titled(Some("gibberish")),
            titled(Some("fine")),
        ]);

        let out = assess_articles(&model, &articles, |_, _| {}).await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].credibility_label, Some(CredibilityLabel::Error));
        assert!(out[0].reasoning.contains("quota issue"));
        assert_eq!(out[1].credibility_label, Some(CredibilityLabel::ParsingFailed));
        assert!(out[1].reasoning.contains("I cannot help with that."));
        assert_eq!(out[2].credibility_label, Some(CredibilityLabel::Credible));
    }

    #[tokio::test]
    async fn test_two_article_scenario_end_to_end() {
        let model = ScriptedModel {
            replies: vec![
                ("A", Ok(CREDIBLE_EXAMPLE.to_string())),
                ("B", Ok(NOT_CREDIBLE_EXAMPLE.to_string())),
            ],
            ..ScriptedModel::default()
        };
        let a = Article {
            source: Some(ArticleSource {
                id: Some("reuters".to_string()),
                name: Some("Reuters".to_string()),
            }),
            author: Some("Jane Doe".to_string()),
            title: Some("A".to_string()),
            description: Some("Regulator issues standard".to_string()),
            url: Some("https://example.com/a".to_string()),
            urlToImage: None,
            publishedAt: Some("2025-05-06T10:00:00Z".to_string()),
            content: Some("Body of A".to_string()),
        };
        let b = titled(Some("B"));
        let articles = track_articles(vec![a, b]);

        let out = assess_articles(&model, &articles, |_, _| {}).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].credibility_label, Some(CredibilityLabel::Credible));
        assert_eq!(out[1].credibility_label, Some(CredibilityLabel::NotCredible));

        let merged = merge_assessments(&articles, &out);
        assert!(merged.unmatched.is_empty());
        assert_eq!(merged.records[0].title.as_deref(), Some("A"));
        assert_eq!(merged.records[0].credibility_label.as_deref(), Some("Credible"));
        assert!(merged.records[0].credibility_reasoning.contains("Reuters"));
        assert_eq!(merged.records[1].title.as_deref(), Some("B"));
        assert_eq!(merged.records[1].credibility_label.as_deref(), Some("Not Credible"));
        assert!(merged.records[1].credibility_reasoning.contains("GlobeNewswire"));

        let prompts = model.prompts.borrow();
        assert!(prompts[1].contains("- Source Name (News Outlet): \"N/A\""));
    }
}
