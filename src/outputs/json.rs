//! JSON output for fetched and assessed articles.
//!
//! Both files are pretty-printed with two-space indentation and keep non-ASCII
//! text as-is. They are written under a per-day directory so repeated runs on
//! the same day overwrite each other and runs on different days do not.

use chrono::Local;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::{Article, MergedArticle};

pub const FETCHED_FILENAME: &str = "articles_fetched.json";
pub const ASSESSED_FILENAME: &str = "assessed_articles.json";

/// The directory for today's output: `{output_dir}/{YYYY-MM-DD}`.
pub fn dated_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(Local::now().date_naive().to_string())
}

/// Serialize the export exactly as it is written to disk.
pub fn assessed_json(records: &[MergedArticle]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Read a previously saved article list (`articles_fetched.json` or a raw
/// NewsAPI array) so it can be assessed without fetching again.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_articles(path: &Path) -> Result<Vec<Article>, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let articles: Vec<Article> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), "Read saved articles");
    Ok(articles)
}

#[instrument(level = "info", skip_all, fields(path = %path.display(), bytes = json.len()))]
async fn write_json(json: String, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }
    fs::write(path, json).await?;
    info!("Wrote JSON file");
    Ok(())
}

/// Write the raw fetched articles to `{dir}/articles_fetched.json`.
pub async fn write_fetched(articles: &[Article], dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(FETCHED_FILENAME);
    write_json(serde_json::to_string_pretty(articles)?, &path).await?;
    Ok(path)
}

/// Write the merged export to `{dir}/assessed_articles.json`.
pub async fn write_assessed(
    records: &[MergedArticle],
    dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(ASSESSED_FILENAME);
    write_json(assessed_json(records)?, &path).await?;
    Ok(path)
}
