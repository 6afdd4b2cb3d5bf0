//! Markdown credibility report.
//!
//! One section per article, in batch order. Each heading carries the verdict
//! (when there is a real one) and the outlet name; the body repeats the
//! article metadata and, once assessed, the label and reasoning.

use itertools::Itertools;
use std::fmt::Write;

use crate::models::{MergedArticle, NOT_ASSESSED, NOT_AVAILABLE};
use crate::utils::slugify_title;

pub const REPORT_FILENAME: &str = "assessed_articles.md";

/// How a stored label is shown to a reader.
pub fn label_display(label: Option<&str>) -> String {
    match label {
        Some("Credible") => "Credible".to_string(),
        Some("Not Credible") => "Not Credible".to_string(),
        Some(sentinel @ ("Error" | "Parsing Failed")) => format!("Assessment Error ({sentinel})"),
        Some(NOT_ASSESSED) | None => NOT_ASSESSED.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Only genuine verdicts are shown in headings.
fn heading_label(record: &MergedArticle) -> Option<&str> {
    match record.credibility_label.as_deref() {
        Some("Error" | "Parsing Failed") | Some(NOT_ASSESSED) | None => None,
        other => other,
    }
}

fn heading(index: usize, record: &MergedArticle) -> String {
    let mut parts = vec![match record.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => format!("Untitled Article {}", index + 1),
    }];
    if let Some(label) = heading_label(record) {
        parts.push(format!("(Assessment: {label})"));
    }
    let source = record
        .source
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .unwrap_or(NOT_AVAILABLE);
    parts.push(format!("- *Source: {source}*"));
    parts.join(" ")
}

/// Count records per displayed label, most frequent first (ties alphabetical).
pub fn label_tally(records: &[MergedArticle]) -> Vec<(String, usize)> {
    records
        .iter()
        .map(|r| label_display(r.credibility_label.as_deref()))
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

/// Render the full report.
pub fn report_to_markdown(records: &[MergedArticle], generated_at: &str) -> String {
    let mut md = String::new();

    writeln!(md, "# Islamic Finance News Credibility Report\n").unwrap();
    let tally = label_tally(records)
        .into_iter()
        .map(|(label, count)| format!("{count} {label}"))
        .join(" · ");
    writeln!(
        md,
        "_Generated {} · {} article{}{}{}_\n",
        generated_at,
        records.len(),
        if records.len() == 1 { "" } else { "s" },
        if tally.is_empty() { "" } else { " · " },
        tally
    )
    .unwrap();

    if records.is_empty() {
        writeln!(md, "No articles fetched.").unwrap();
        return md;
    }

    writeln!(md, "## Contents\n").unwrap();
    let headings: Vec<String> = records.iter().enumerate().map(|(i, r)| heading(i, r)).collect();
    for h in &headings {
        writeln!(md, "- [{}](#{})", h.replace(['[', ']'], ""), slugify_title(h)).unwrap();
    }
    writeln!(md).unwrap();

    for (record, h) in records.iter().zip(&headings) {
        writeln!(md, "## {h}\n").unwrap();
        writeln!(
            md,
            "**Published At:** {}  ",
            record.publishedAt.as_deref().unwrap_or(NOT_AVAILABLE)
        )
        .unwrap();
        writeln!(
            md,
            "**Author:** {}\n",
            record.author.as_deref().unwrap_or(NOT_AVAILABLE)
        )
        .unwrap();

        if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(md, "**Description:** {description}\n").unwrap();
        }
        if let Some(content) = record.content.as_deref().filter(|c| !c.is_empty()) {
            writeln!(md, "**Content Snippet:** {content}\n").unwrap();
        }
        if let Some(url) = record.url.as_deref().filter(|u| !u.is_empty()) {
            writeln!(md, "[Read full article]({url})\n").unwrap();
        }

        if record.is_assessed() {
            writeln!(md, "---\n").unwrap();
            writeln!(md, "**AI Credibility Assessment:**\n").unwrap();
            writeln!(
                md,
                "**Assessment:** **{}**  ",
                label_display(record.credibility_label.as_deref())
            )
            .unwrap();
            writeln!(md, "**Reasoning:** {}\n", record.credibility_reasoning).unwrap();
        } else {
            writeln!(md, "_(Awaiting assessment or assessment data not available)_\n").unwrap();
        }
    }

    md
}
