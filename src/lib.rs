//! urbix_rs
//!
//! A lightweight Rust library for retrieving, ranking, and displaying
//! urban-sustainability indicators of metropolitan regions. Pairs with the
//! `urbix` CLI and the `urbix-gui` desktop dashboard.
//!
//! ### Features
//! - Fetch indicator records from the REST backend (`/indicators`)
//! - Normalize messy numeric fields once, at ingestion
//! - Rank by composite score, filter by year, compute safe averages
//! - Render records as cards with progress bars (text, SVG, or GUI)
//! - Export as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use urbix_rs::{Client, YearFilter, card, stats};
//!
//! let client = Client::default();
//! let records = client.fetch_indicators()?;
//! let view = stats::aggregate(&records, YearFilter::Year(2010));
//! println!("mean smart score: {:.1}%", view.summary.mean_smart_pct);
//! for r in &view.records {
//!     print!("{}", card::render_card(r).to_text(20));
//! }
//! # Ok::<(), urbix_rs::ApiError>(())
//! ```

pub mod api;
pub mod card;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::Client;
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::ApiError;
pub use models::{IndicatorRecord, Metric, YearFilter};
