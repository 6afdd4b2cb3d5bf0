//! Extraction of the credibility verdict from a model reply.
//!
//! The prompt asks for exactly two lines:
//!
//! ```text
//! Estimated Credibility: Credible
//! Reasoning: The article reports on an official announcement...
//! ```
//!
//! Replies are matched leniently (case-insensitive, reasoning may span
//! several lines). Anything that cannot be read as a verdict becomes one of the
//! sentinel labels instead of an error, so every article still gets a result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ModelReply;
use crate::models::CredibilityLabel;

/// Reasoning reported when a label was found but no `Reasoning:` line.
pub const DEFAULT_REASONING: &str = "Could not parse reasoning from the model's response.";

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Estimated Credibility:\s*(Credible|Not Credible)").unwrap());

static REASONING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)Reasoning:\s*(.*)").unwrap());

/// Substrings that mark a reply as an error report rather than an answer.
const ERROR_MARKERS: &[&str] = &["An error occurred", "Content blocked"];

/// Label and reasoning read from one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
    /// `None` when only a reasoning line was found.
    pub label: Option<CredibilityLabel>,
    pub reasoning: String,
}

fn looks_like_error(text: &str) -> bool {
    ERROR_MARKERS.iter().any(|m| text.contains(m)) || text.to_lowercase().contains("quota")
}

/// Parse a raw text reply.
///
/// 1. `Estimated Credibility:` followed by `Credible` or `Not Credible` sets the label.
/// 2. `Reasoning:` captures the rest of the text, trimmed.
/// 3. With no label, text that reads like an error report becomes `Error` with
///    the whole text as reasoning.
/// 4. With neither label nor reasoning, the result is `Parsing Failed` and the
///    reasoning quotes the raw text.
pub fn parse_response(text: &str) -> ParsedVerdict {
    let label = LABEL_RE.captures(text).map(|caps| {
        if caps[1].eq_ignore_ascii_case("credible") {
            CredibilityLabel::Credible
        } else {
            CredibilityLabel::NotCredible
        }
    });
    let reasoning = REASONING_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string());

    if label.is_none() && looks_like_error(text) {
        return ParsedVerdict {
            label: Some(CredibilityLabel::Error),
            reasoning: text.to_string(),
        };
    }

    match (label, reasoning) {
        (None, None) => ParsedVerdict {
            label: Some(CredibilityLabel::ParsingFailed),
            reasoning: format!("Failed to parse the expected format from AI. Raw response: {text}"),
        },
        (label, reasoning) => ParsedVerdict {
            label,
            reasoning: reasoning.unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        },
    }
}

/// Parse a tagged model reply.
///
/// A failed call is an `Error` verdict carrying the failure description; the
/// text of a successful call goes through [`parse_response`].
pub fn parse_reply(reply: &ModelReply) -> ParsedVerdict {
    match reply {
        Ok(text) => parse_response(text),
        Err(e) => ParsedVerdict {
            label: Some(CredibilityLabel::Error),
            reasoning: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;

    #[test]
    fn test_credible_reply() {
        let parsed = parse_response("Estimated Credibility: Credible\nReasoning: X");
        assert_eq!(parsed.label, Some(CredibilityLabel::Credible));
        assert_eq!(parsed.reasoning, "X");
    }

    #[test]
    fn test_not_credible_reply() {
        let parsed = parse_response("Estimated Credibility: Not Credible\nReasoning: Y");
        assert_eq!(parsed.label, Some(CredibilityLabel::NotCredible));
        assert_eq!(parsed.reasoning, "Y");
    }

    #[test]
    fn test_case_insensitive_label_is_normalized() {
        let parsed =
            parse_response("estimated credibility:   NOT CREDIBLE\nreasoning: loud press release");
        assert_eq!(parsed.label, Some(CredibilityLabel::NotCredible));
        assert_eq!(parsed.reasoning, "loud press release");

        let parsed = parse_response("ESTIMATED CREDIBILITY: credible\nREASONING: fine");
        assert_eq!(parsed.label, Some(CredibilityLabel::Credible));
    }

    #[test]
    fn test_multiline_reasoning_is_trimmed() {
        let text = "Estimated Credibility: Credible\nReasoning:\n  First line.\nSecond line.  \n\n";
        let parsed = parse_response(text);
        assert_eq!(parsed.reasoning, "First line.\nSecond line.");
    }

    #[test]
    fn test_label_without_reasoning_keeps_default() {
        let parsed = parse_response("Estimated Credibility: Credible");
        assert_eq!(parsed.label, Some(CredibilityLabel::Credible));
        assert_eq!(parsed.reasoning, DEFAULT_REASONING);
    }

    #[test]
    fn test_reasoning_without_label_has_no_label() {
        let parsed = parse_response("Verdict: probably fine\nReasoning: hard to say");
        assert_eq!(parsed.label, None);
        assert_eq!(parsed.reasoning, "hard to say");
    }

    #[test]
    fn test_unknown_label_word_is_not_matched() {
        let parsed = parse_response("Estimated Credibility: Plausible");
        assert_eq!(parsed.label, Some(CredibilityLabel::ParsingFailed));
        assert!(parsed.reasoning.contains("Estimated Credibility: Plausible"));
    }

    #[test]
    fn test_quota_text_is_error_with_full_text() {
        let text = "Request failed: Quota exceeded for this project.\nReasoning: none";
        let parsed = parse_response(text);
        assert_eq!(parsed.label, Some(CredibilityLabel::Error));
        assert_eq!(parsed.reasoning, text);
    }

    #[test]
    fn test_error_markers_are_case_sensitive_except_quota() {
        let parsed = parse_response("Content blocked by policy");
        assert_eq!(parsed.label, Some(CredibilityLabel::Error));

        let parsed = parse_response("content blocked by policy");
        assert_eq!(parsed.label, Some(CredibilityLabel::ParsingFailed));
    }

    #[test]
    fn test_label_wins_over_error_markers() {
        let text =
            "Estimated Credibility: Not Credible\nReasoning: The release mentions a quota system.";
        let parsed = parse_response(text);
        assert_eq!(parsed.label, Some(CredibilityLabel::NotCredible));
        assert_eq!(parsed.reasoning, "The release mentions a quota system.");
    }

    #[test]
    fn test_unrecognized_reply_is_parsing_failed() {
        let parsed = parse_response("I cannot help with that.");
        assert_eq!(parsed.label, Some(CredibilityLabel::ParsingFailed));
        assert!(parsed.reasoning.contains("I cannot help with that."));
    }

    #[test]
    fn test_failed_call_is_error_verdict() {
        let reply: ModelReply = Err(ModelError::Blocked {
            reason: "SAFETY".to_string(),
            message: "Content blocked: the prompt was rejected by the safety filters".to_string(),
        });
        let parsed = parse_reply(&reply);
        assert_eq!(parsed.label, Some(CredibilityLabel::Error));
        assert!(parsed.reasoning.contains("Block Reason: SAFETY"));
    }

    #[test]
    fn test_failed_call_without_markers_is_still_error() {
        let reply: ModelReply = Err(ModelError::Request {
            message: "connection reset".to_string(),
        });
        assert_eq!(parse_reply(&reply).label, Some(CredibilityLabel::Error));
    }

    #[test]
    fn test_successful_call_is_parsed() {
        let reply: ModelReply = Ok("Estimated Credibility: Credible\nReasoning: ok".to_string());
        assert_eq!(
            parse_reply(&reply),
            ParsedVerdict {
                label: Some(CredibilityLabel::Credible),
                reasoning: "ok".to_string(),
            }
        );
    }
}
