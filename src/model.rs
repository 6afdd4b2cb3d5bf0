//! Gemini invocation for the credibility prompt.
//!
//! # Architecture
//!
//! - [`AskModel`]: Trait for anything that turns a prompt into a [`ModelReply`]
//! - [`GeminiClient`]: Calls the Gemini `generateContent` REST endpoint
//!
//! A call never fails out-of-band. Every outcome is a [`ModelReply`]: either the
//! reply text, or a [`ModelError`] saying why there is none. Blocked prompts and
//! quota rejections get their own variants because both are common and the
//! user can act on them.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::utils::truncate_for_log;

/// Public Gemini REST endpoint.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Why a model call produced no usable text.
///
/// The `Display` output is the message a user sees in place of the reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Gemini refused the prompt or withheld the answer.
    #[error("An error occurred while contacting Gemini: {message} | Block Reason: {reason}")]
    Blocked { reason: String, message: String },

    /// Rate limit or quota exhausted.
    #[error(
        "An error occurred while contacting Gemini: {message} | This might be a rate limit or quota issue. Please check your API usage."
    )]
    Quota { message: String },

    /// Network failure, non-success status, or an unusable body.
    #[error("An error occurred while contacting Gemini: {message}")]
    Request { message: String },
}

impl ModelError {
    /// Classify a failure message that carries no structured reason.
    fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_lowercase().contains("quota") {
            ModelError::Quota { message }
        } else {
            ModelError::Request { message }
        }
    }
}

/// The outcome of one model call.
pub type ModelReply = Result<String, ModelError>;

/// Flatten a reply to plain text: the answer, or the descriptive error message.
pub fn reply_text(reply: &ModelReply) -> String {
    match reply {
        Ok(text) => text.clone(),
        Err(e) => e.to_string(),
    }
}

/// Something that can answer a prompt.
///
/// Implementations must report every failure through [`ModelReply`] rather
/// than panicking, so one bad call never stops a batch.
pub trait AskModel {
    async fn ask(&self, prompt: &str) -> ModelReply;
}

// ---------------------------------------------------------------------------
// Gemini wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    promptFeedback: Option<PromptFeedback>,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PromptFeedback {
    blockReason: Option<String>,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
    finishReason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

/// Finish reasons that mean the answer was withheld rather than completed.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "RECITATION",
];

/// Turn an HTTP status and body from `generateContent` into a [`ModelReply`].
pub(crate) fn interpret_response(status: StatusCode, body: &str) -> ModelReply {
    if !status.is_success() {
        let api_error = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_default();
        let message = match api_error.message {
            Some(m) => format!("{} {}", api_error.code.unwrap_or(status.as_u16()), m),
            None => format!("{} {}", status, truncate_for_log(body, 300)),
        };
        let exhausted = status == StatusCode::TOO_MANY_REQUESTS
            || api_error.status.as_deref() == Some("RESOURCE_EXHAUSTED");
        return if exhausted {
            Err(ModelError::Quota { message })
        } else {
            Err(ModelError::from_message(message))
        };
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Request {
            message: format!("could not decode Gemini response: {e}"),
        })?;

    if let Some(reason) = parsed.promptFeedback.and_then(|f| f.blockReason) {
        return Err(ModelError::Blocked {
            reason,
            message: "Content blocked: the prompt was rejected by the safety filters".to_string(),
        });
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Request {
            message: "Gemini returned no candidates".to_string(),
        })?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finishReason {
            Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
                Err(ModelError::Blocked {
                    reason,
                    message: "Content blocked: the answer was withheld".to_string(),
                })
            }
            other => Err(ModelError::Request {
                message: format!(
                    "Gemini returned an empty answer (finish reason: {})",
                    other.as_deref().unwrap_or("unknown")
                ),
            }),
        };
    }

    Ok(text)
}

/// Client for the Gemini `generateContent` endpoint.
///
/// The prompt is sent as a single user turn. No sampling parameters are set,
/// so the model's defaults apply.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AskModel for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> ModelReply {
        let t0 = Instant::now();
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let sent = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await;

        let reply = match sent {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => interpret_response(status, &body),
                    Err(e) => Err(ModelError::from_message(e.to_string())),
                }
            }
            Err(e) => Err(ModelError::from_message(e.to_string())),
        };

        let dt = t0.elapsed();
        match &reply {
            Ok(text) => {
                info!(
                    elapsed_ms = dt.as_millis() as u64,
                    bytes = text.len(),
                    "Gemini call succeeded"
                );
                debug!(reply = %truncate_for_log(text, 300), "Gemini reply");
            }
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Gemini call failed"),
        }
        reply
    }
}
