//! Prompt rendering for the credibility assessment.
//!
//! The template is fixed: editing it changes how the model answers, but the
//! pipeline only relies on the two-line output format it asks for
//! (`Estimated Credibility:` followed by `Reasoning:`), which is what
//! [`crate::parser`] looks for.

use crate::models::{Article, NOT_AVAILABLE};

/// Render the fact-checking prompt for one article.
///
/// Title, outlet name, author, publication date, description and content
/// snippet are substituted verbatim. Missing or empty fields become `"N/A"`.
/// Nothing is escaped or truncated.
pub fn credibility_prompt(article: &Article) -> String {
    let title = article.title().unwrap_or(NOT_AVAILABLE);
    let source_name = article.source_name().unwrap_or(NOT_AVAILABLE);
    let author = article.author().unwrap_or(NOT_AVAILABLE);
    let published_at = article.published_at().unwrap_or(NOT_AVAILABLE);
    let description = article.description().unwrap_or(NOT_AVAILABLE);
    let content = article.content().unwrap_or(NOT_AVAILABLE);

    format!(r#"You are a Fact-Checking Analyst AI. Your task is to evaluate the provided news article details and determine if its main factual claims are "Credible" or "Not Credible", along with a brief justification.

Article Information:
- Title: "{title}"
- Source Name (News Outlet): "{source_name}"
- Author/Publisher of Report (cited in article, or journalist): "{author}"
- Publication Date of News Item: "{published_at}"
- Description Snippet: "{description}"
- Content Snippet: "{content}"

Instructions for your analysis (consider these points before giving the assessment):
1. **Key Claims:** Identify the main factual claims (e.g., market size "$X Trillion by YYYY", "Z% CAGR", specific events, attributions).
2. **News Outlet ({source_name}):** Assess its nature. Is it a primary news source (e.g., Reuters, Associated Press), a press release distributor (e.g., GlobeNewswire, PR Newswire), an aggregator, a blog? This affects how the information should be viewed.
3. **Author/Original Source ({author}):** Assess its likely standing. Is it a known market research firm, an established journalist, a company making an announcement, an academic body, an individual, etc.?
4. **Nature of Claims:** Are these established facts, company announcements, or projections/forecasts? Projections inherently carry uncertainty. A claim being a projection doesn't automatically make it "Not Credible" but its basis should be considered.
5. **Red Flags/Context:**
   - Is the news outlet primarily a distributor of press releases? Then the content is likely paid for by the "author" and not independently vetted by the outlet. This leans towards "Not Credible" for independent factual claims unless the original source is highly reputable.
   - Is the language overly promotional or biased?
   - Are there any obvious contradictions or unsourced significant claims?

**Output Requirement:**
Based on your internal analysis of the above, provide your response *strictly* in the following format:

Estimated Credibility: [Credible/Not Credible]
Reasoning: [Your brief explanation, typically 2-4 sentences, justifying the assessment based on your analysis of source, author, and claim nature.]

Example 1:
Estimated Credibility: Credible
Reasoning: The article reports on an official announcement from a regulatory body (IFSB), published by a reputable news agency (Reuters). The claims are factual statements about new standards being released.

Example 2:
Estimated Credibility: Not Credible
Reasoning: The claims are bold market projections from an unknown research firm, distributed via a press release service (GlobeNewswire). The language is highly promotional, and no independent verification is provided by the news outlet.

Do not add any other text before "Estimated Credibility:" or after the reasoning.
Only use "Credible" or "Not Credible" as the assessment.
"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleSource;

    fn full_article() -> Article {
        Article {
            source: Some(ArticleSource {
                id: None,
                name: Some("Reuters".to_string()),
            }),
            author: Some("Jane Doe".to_string()),
            title: Some("IFSB releases Shariah governance standard".to_string()),
            description: Some("New guidance for Islamic banks.".to_string()),
            url: Some("https://example.com/a".to_string()),
            urlToImage: None,
            publishedAt: Some("2025-05-06T10:00:00Z".to_string()),
            content: Some("The Islamic Financial Services Board said…".to_string()),
        }
    }

    #[test]
    fn test_all_fields_substituted_verbatim() {
        let prompt = credibility_prompt(&full_article());
        assert!(prompt.contains(r#"- Title: "IFSB releases Shariah governance standard""#));
        assert!(prompt.contains(r#"- Source Name (News Outlet): "Reuters""#));
        assert!(prompt.contains(r#"- Author/Publisher of Report (cited in article, or journalist): "Jane Doe""#));
        assert!(prompt.contains(r#"- Publication Date of News Item: "2025-05-06T10:00:00Z""#));
        assert!(prompt.contains(r#"- Description Snippet: "New guidance for Islamic banks.""#));
        assert!(prompt.contains(r#"- Content Snippet: "The Islamic Financial Services Board said…""#));
        assert!(prompt.contains("**News Outlet (Reuters):**"));
        assert!(prompt.contains("**Author/Original Source (Jane Doe):**"));
        assert!(!prompt.contains("\"N/A\""));
    }

    #[test]
    fn test_missing_fields_render_as_na() {
        let article = Article {
            title: Some("B".to_string()),
            ..Article::default()
        };
        let prompt = credibility_prompt(&article);
        assert!(prompt.contains(r#"- Title: "B""#));
        assert!(prompt.contains(r#"- Source Name (News Outlet): "N/A""#));
        assert!(prompt.contains(r#"- Author/Publisher of Report (cited in article, or journalist): "N/A""#));
        assert!(prompt.contains(r#"- Publication Date of News Item: "N/A""#));
        assert!(prompt.contains(r#"- Description Snippet: "N/A""#));
        assert!(prompt.contains(r#"- Content Snippet: "N/A""#));
    }

    #[test]
    fn test_empty_strings_and_nameless_source_render_as_na() {
        let article = Article {
            source: Some(ArticleSource {
                id: Some("x".to_string()),
                name: None,
            }),
            title: Some(String::new()),
            author: Some(String::new()),
            ..Article::default()
        };
        let prompt = credibility_prompt(&article);
        assert!(prompt.contains(r#"- Title: "N/A""#));
        assert!(prompt.contains(r#"- Source Name (News Outlet): "N/A""#));
        assert!(prompt.contains("**Author/Original Source (N/A):**"));
    }

    #[test]
    fn test_requests_two_line_format() {
        let prompt = credibility_prompt(&Article::default());
        assert!(prompt.contains("Estimated Credibility: [Credible/Not Credible]"));
        assert!(prompt.contains("Reasoning: [Your brief explanation"));
        assert!(prompt.contains(r#"Only use "Credible" or "Not Credible" as the assessment."#));
    }
}
