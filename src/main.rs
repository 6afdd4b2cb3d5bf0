//! # News Credibility
//!
//! Fetches recent Islamic finance news from NewsAPI, asks Gemini whether each
//! article's main claims are credible, and writes the merged results as JSON
//! and as a Markdown report.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... GOOGLE_API_KEY=... news_credibility -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: One page of articles from NewsAPI ([`source`])
//! 2. **Assessment**: For each article in turn, render the prompt ([`prompt`]),
//!    call Gemini ([`model`]) and parse the verdict ([`parser`]); see [`pipeline`]
//! 3. **Merge**: Attach verdicts to their articles by ingestion id ([`merge`])
//! 4. **Output**: `articles_fetched.json`, `assessed_articles.json` and a
//!    Markdown report under `<output_dir>/<date>/` ([`outputs`])
//!
//! Run state between those steps lives in a [`session::Session`].

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod merge;
mod model;
mod models;
mod outputs;
mod parser;
mod pipeline;
mod prompt;
mod session;
mod source;
mod utils;

use cli::Cli;
use model::GeminiClient;
use outputs::{json, markdown};
use session::Session;
use source::NewsApiClient;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_credibility starting up");
    match &dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    let args = Cli::parse();
    debug!(
        ?args.output_dir,
        ?args.config,
        ?args.input,
        fetch_only = args.fetch_only,
        "Parsed CLI arguments"
    );

    let out_dir = json::dated_dir(&args.output_dir);
    if let Err(e) = ensure_writable_dir(&out_dir).await {
        error!(
            path = %out_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let mut config = config::load_config(args.config.as_deref()).await?;
    if let Some(model) = &args.model {
        config.gemini.model = model.clone();
    }

    if args.google_api_key.is_none() && !args.fetch_only {
        warn!("GOOGLE_API_KEY not found. Credibility assessment will not be possible.");
    }

    // ---- Articles: from a saved file, or fetched fresh ----
    let mut session = Session::new();
    if let Some(input) = &args.input {
        let articles = json::read_articles(input).await?;
        session.load_articles(articles);
    } else {
        let Some(news_api_key) = args.news_api_key.as_deref() else {
            error!("NEWS_API_KEY not found. Cannot fetch news.");
            return Err("News API Key is missing. Set NEWS_API_KEY or pass --news-api-key.".into());
        };
        let news = NewsApiClient::new(news_api_key, config.news.clone());
        let envelope = news.fetch_articles().await;
        let count = session.apply_fetch(envelope)?;
        println!("Fetched {count} articles.");

        let fetched: Vec<_> = session.articles().iter().map(|t| t.article.clone()).collect();
        match json::write_fetched(&fetched, &out_dir).await {
            Ok(path) => info!(path = %path.display(), "Saved fetched articles"),
            Err(e) => error!(error = %e, "Failed to save fetched articles"),
        }
    }

    if args.fetch_only {
        info!(elapsed = ?start_time.elapsed(), "Fetch complete; skipping assessment");
        return Ok(());
    }

    // ---- Assessment ----
    let gemini = args.google_api_key.as_deref().map(|key| {
        GeminiClient::new(key, config.gemini.model.clone())
            .with_base_url(config.gemini.endpoint.clone())
    });
    info!(
        model = %config.gemini.model,
        count = session.articles().len(),
        "Assessing article credibility"
    );

    let outcome = match session
        .assess(gemini.as_ref(), |done, total| {
            eprintln!("Assessed {done}/{total} articles...")
        })
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Cannot perform assessment");
            return Err(e.into());
        }
    };

    println!("\nCredibility Results:");
    for assessment in session.assessments() {
        println!("  Title: {}", assessment.title);
        println!(
            "  Credibility: {}",
            markdown::label_display(assessment.credibility_label.map(|l| l.as_str()))
        );
        println!("  Reasoning: {}\n", assessment.reasoning);
    }
    for (label, count) in markdown::label_tally(&outcome.records) {
        println!("  {label}: {count}");
    }
    if let Some(message) = session.error_message() {
        warn!(%message, "Assessment finished with warnings");
    }

    // ---- Output ----
    let records = session.export_records();
    if session.has_assessments() {
        match json::write_assessed(&records, &out_dir).await {
            Ok(path) => println!("Saved assessed articles to {}", path.display()),
            Err(e) => error!(error = %e, "Failed to write assessed articles JSON"),
        }
    }

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let report = markdown::report_to_markdown(&records, &generated_at);
    let report_path = out_dir.join(markdown::REPORT_FILENAME);
    if let Err(e) = tokio::fs::write(&report_path, report).await {
        error!(path = %report_path.display(), error = %e, "Failed writing Markdown report");
    } else {
        info!(path = %report_path.display(), "Wrote Markdown report");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
