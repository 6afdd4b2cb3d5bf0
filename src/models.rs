//! Data models for fetched articles, credibility assessments and the export shape.
//!
//! This module defines the records that flow through the pipeline:
//! - [`Article`]: One article as returned by NewsAPI
//! - [`NewsEnvelope`]: The NewsAPI response wrapper (`status`, `articles`, `message`)
//! - [`TrackedArticle`]: An article paired with the [`ArticleId`] assigned at ingestion
//! - [`Assessment`]: The parsed model verdict for one article
//! - [`MergedArticle`]: The exported record (article fields plus verdict)
//!
//! Article fields keep NewsAPI's camelCase names so the same structs can be
//! deserialized from the API and written back out unchanged, hence the
//! `#[allow(non_snake_case)]` attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted for any missing article field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Label exported for articles that were never assessed.
pub const NOT_ASSESSED: &str = "Not Assessed";

/// The outlet an article was published by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSource {
    /// NewsAPI's source identifier (often null for smaller outlets).
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable outlet name, e.g. "Reuters".
    #[serde(default)]
    pub name: Option<String>,
}

/// A news article as returned by the NewsAPI `everything` endpoint.
///
/// No field is guaranteed to be present. Missing and empty values are both
/// treated as absent when rendering prompts or reports.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    /// The outlet that published the article.
    pub source: Option<ArticleSource>,
    /// The journalist or organisation credited with the piece.
    pub author: Option<String>,
    /// The headline.
    pub title: Option<String>,
    /// Short description or lede.
    pub description: Option<String>,
    /// Link to the full article.
    pub url: Option<String>,
    /// Link to the lead image, kept only so saved article lists round-trip.
    pub urlToImage: Option<String>,
    /// Publication timestamp, ISO 8601 as provided by NewsAPI.
    pub publishedAt: Option<String>,
    /// Truncated body snippet.
    pub content: Option<String>,
}

/// Treat `None` and empty strings alike.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Article {
    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    pub fn content(&self) -> Option<&str> {
        present(&self.content)
    }

    pub fn author(&self) -> Option<&str> {
        present(&self.author)
    }

    pub fn published_at(&self) -> Option<&str> {
        present(&self.publishedAt)
    }

    /// The outlet name, if the article carries a source with a non-empty name.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| present(&s.name))
    }
}

/// The NewsAPI response envelope.
///
/// On success `status` is `"ok"` and `articles` holds the page. On failure
/// `status` is `"error"` and `message` explains why; `code` carries NewsAPI's
/// machine-readable error code when the API itself produced the error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewsEnvelope {
    pub status: String,
    #[serde(default, rename = "totalResults", skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NewsEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Build an error envelope for failures that never reached the API.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            total_results: None,
            articles: Vec::new(),
            code: None,
            message: Some(message.into()),
        }
    }
}

/// Synthetic identity assigned to each article when a batch is ingested.
///
/// Titles are not unique, so every join between articles and assessments goes
/// through this id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct ArticleId(pub usize);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An article together with its ingestion id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedArticle {
    pub id: ArticleId,
    pub article: Article,
}

/// Assign ids to a freshly fetched batch, in batch order.
pub fn track_articles(articles: Vec<Article>) -> Vec<TrackedArticle> {
    articles
        .into_iter()
        .enumerate()
        .map(|(i, article)| TrackedArticle {
            id: ArticleId(i),
            article,
        })
        .collect()
}

/// The categorical verdict parsed out of a model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CredibilityLabel {
    #[serde(rename = "Credible")]
    Credible,
    #[serde(rename = "Not Credible")]
    NotCredible,
    /// The model call failed.
    #[serde(rename = "Error")]
    Error,
    /// The reply did not follow the two-line format.
    #[serde(rename = "Parsing Failed")]
    ParsingFailed,
}

impl CredibilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredibilityLabel::Credible => "Credible",
            CredibilityLabel::NotCredible => "Not Credible",
            CredibilityLabel::Error => "Error",
            CredibilityLabel::ParsingFailed => "Parsing Failed",
        }
    }
}

impl fmt::Display for CredibilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of assessing one article.
///
/// Created once per input article by the pipeline and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Assessment {
    /// Join key back onto the originating [`TrackedArticle`].
    pub article_id: ArticleId,
    /// Copy of the source article's title, kept for display and for exports
    /// that predate [`ArticleId`].
    pub original_title_for_matching: Option<String>,
    /// The title, or `"N/A"` when the article had none.
    pub title: String,
    /// `None` when the reply had a reasoning line but no recognizable label.
    pub credibility_label: Option<CredibilityLabel>,
    pub reasoning: String,
}

/// One entry of the exported JSON array.
///
/// The key names and their order are the export contract.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MergedArticle {
    pub title: Option<String>,
    pub source: Option<ArticleSource>,
    pub author: Option<String>,
    pub publishedAt: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    /// `"Not Assessed"` when no assessment ran, null when one ran but yielded no label.
    pub credibility_label: Option<String>,
    pub credibility_reasoning: String,
}

impl MergedArticle {
    /// An export record for an article that was never assessed.
    pub fn unassessed(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            source: article.source.clone(),
            author: article.author.clone(),
            publishedAt: article.publishedAt.clone(),
            url: article.url.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
            credibility_label: Some(NOT_ASSESSED.to_string()),
            credibility_reasoning: NOT_AVAILABLE.to_string(),
        }
    }

    /// An export record carrying the verdict of `assessment`.
    pub fn assessed(article: &Article, assessment: &Assessment) -> Self {
        Self {
            credibility_label: assessment
                .credibility_label
                .map(|label| label.as_str().to_string()),
            credibility_reasoning: assessment.reasoning.clone(),
            ..Self::unassessed(article)
        }
    }

    pub fn is_assessed(&self) -> bool {
        self.credibility_label.as_deref() != Some(NOT_ASSESSED)
    }
}
