//! Command-line interface definitions.
//!
//! Credentials can be passed as flags but normally come from the environment
//! (or a `.env` file, which is loaded before parsing).

use clap::Parser;
use std::path::PathBuf;

/// Fetch Islamic finance news and assess each article's credibility with Gemini.
///
/// # Examples
///
/// ```sh
/// # Fetch, assess and write the report to ./output/<date>/
/// news_credibility -o ./output
///
/// # Only fetch and save the raw articles
/// news_credibility --fetch-only
///
/// # Assess a previously saved article list without calling NewsAPI
/// news_credibility -i ./output/2025-05-06/articles_fetched.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base directory for JSON and Markdown output
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Assess articles from a saved JSON file instead of fetching from NewsAPI
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Fetch and save articles without assessing them
    #[arg(long, conflicts_with = "input")]
    pub fetch_only: bool,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Google AI Studio key for Gemini
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Gemini model, overriding the config file
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,
}
