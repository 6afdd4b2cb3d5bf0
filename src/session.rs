//! Run state carried between a fetch and an assessment.
//!
//! A [`Session`] holds the current article batch, the assessments made for it,
//! the last user-facing error, and whether an assessment is in flight. The
//! pipeline functions themselves are stateless; the caller owns the session
//! and drives it through its transitions:
//!
//! ```text
//! apply_fetch / load_articles ─▸ begin_assessment ─▸ finish_assessment ─▸ export_records
//! ```

use thiserror::Error;
use tracing::{info, warn};

use crate::merge::{MergeOutcome, merge_assessments, unassessed_records};
use crate::model::AskModel;
use crate::models::{
    Article, Assessment, MergedArticle, NewsEnvelope, TrackedArticle, track_articles,
};
use crate::pipeline::assess_articles;

/// Why an assessment could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No articles to assess. Fetch articles first.")]
    NoArticles,
    #[error("Google API Key is missing. Cannot assess credibility.")]
    MissingCredentials,
    #[error("An assessment is already in progress.")]
    AlreadyAssessing,
}

#[derive(Debug, Default)]
pub struct Session {
    articles: Vec<TrackedArticle>,
    assessments: Vec<Assessment>,
    error_message: Option<String>,
    assessing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[TrackedArticle] {
        &self.articles
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True once at least one assessment has been recorded for the current batch.
    pub fn has_assessments(&self) -> bool {
        !self.assessments.is_empty()
    }

    /// Replace the batch with the result of a fetch.
    ///
    /// Any previous batch, assessments and error are discarded first. A failed
    /// fetch or an empty page leaves the session without articles and records
    /// the reason, which is also returned.
    pub fn apply_fetch(&mut self, envelope: NewsEnvelope) -> Result<usize, String> {
        self.reset();

        if !envelope.is_ok() {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown error from News API.".to_string());
            let message = format!("News API Error: {message}");
            warn!(%message, "Fetch failed");
            self.error_message = Some(message.clone());
            return Err(message);
        }

        if envelope.articles.is_empty() {
            let message = "No articles found for the query.".to_string();
            warn!("Fetch returned no articles");
            self.error_message = Some(message.clone());
            return Err(message);
        }

        Ok(self.load_articles(envelope.articles))
    }

    /// Start a new batch from articles obtained elsewhere (e.g. a saved file).
    pub fn load_articles(&mut self, articles: Vec<Article>) -> usize {
        self.reset();
        self.articles = track_articles(articles);
        info!(count = self.articles.len(), "Loaded article batch");
        self.articles.len()
    }

    /// Mark an assessment as started, clearing earlier verdicts and errors.
    pub fn begin_assessment(&mut self, credentials_present: bool) -> Result<(), SessionError> {
        if self.assessing {
            return Err(SessionError::AlreadyAssessing);
        }
        if !credentials_present {
            return Err(SessionError::MissingCredentials);
        }
        if self.articles.is_empty() {
            return Err(SessionError::NoArticles);
        }
        self.assessments.clear();
        self.error_message = None;
        self.assessing = true;
        Ok(())
    }

    /// Record the verdicts of a finished assessment and merge them onto the batch.
    pub fn finish_assessment(&mut self, assessments: Vec<Assessment>) -> MergeOutcome {
        self.assessing = false;
        let outcome = merge_assessments(&self.articles, &assessments);
        if !outcome.unmatched.is_empty() {
            self.error_message = Some(format!(
                "Could not match {} assessment result(s) to an article.",
                outcome.unmatched.len()
            ));
        }
        self.assessments = assessments;
        outcome
    }

    /// Run the whole assessment for the current batch.
    ///
    /// `model` is `None` when no credentials were supplied, which is refused
    /// before any article is touched.
    pub async fn assess<M, F>(
        &mut self,
        model: Option<&M>,
        on_progress: F,
    ) -> Result<MergeOutcome, SessionError>
    where
        M: AskModel,
        F: FnMut(usize, usize),
    {
        self.begin_assessment(model.is_some())?;
        let assessments = match model {
            Some(model) => assess_articles(model, &self.articles, on_progress).await,
            None => Vec::new(),
        };
        Ok(self.finish_assessment(assessments))
    }

    /// The export records for the current batch, assessed or not.
    pub fn export_records(&self) -> Vec<MergedArticle> {
        if self.assessments.is_empty() {
            unassessed_records(&self.articles)
        } else {
            merge_assessments(&self.articles, &self.assessments).records
        }
    }

    fn reset(&mut self) {
        self.articles.clear();
        self.assessments.clear();
        self.error_message = None;
    }
}
