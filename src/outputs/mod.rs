//! Output generation for assessed article batches.
//!
//! # Submodules
//!
//! - [`json`]: Writes the fetched article list and the merged export as JSON
//! - [`markdown`]: Renders a readable credibility report
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── articles_fetched.json    # raw NewsAPI articles
//!     ├── assessed_articles.json   # merged export
//!     └── assessed_articles.md     # report
//! ```

pub mod json;
pub mod markdown;
