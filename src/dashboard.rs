//! Dashboard view controller.
//!
//! All UI state lives in one [`Dashboard`] value. Transitions consume the old value and
//! return the next one; the fetched records are never mutated, and changing the year
//! filter only re-derives the view.

use crate::card;
use crate::error::ApiError;
use crate::format;
use crate::models::{IndicatorRecord, YearFilter};
use crate::stats::{self, DashboardView};

/// The one message shown when loading fails.
pub const LOAD_ERROR_MESSAGE: &str = "failed to load indicators";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready(Vec<IndicatorRecord>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    state: LoadState,
    filter: YearFilter,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// A dashboard waiting for its first (and only) fetch.
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            filter: YearFilter::All,
        }
    }

    /// Apply the outcome of the fetch.
    pub fn loaded(self, result: Result<Vec<IndicatorRecord>, ApiError>) -> Self {
        let state = match result {
            Ok(records) => LoadState::Ready(records),
            Err(err) => {
                log::error!("{}: {}", LOAD_ERROR_MESSAGE, err);
                LoadState::Failed(LOAD_ERROR_MESSAGE.to_string())
            }
        };
        Self { state, ..self }
    }

    /// Select another year. Does not re-fetch.
    pub fn with_filter(self, filter: YearFilter) -> Self {
        Self { filter, ..self }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> YearFilter {
        self.filter
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Derived view for the current filter, once records are loaded.
    pub fn view(&self) -> Option<DashboardView<'_>> {
        match &self.state {
            LoadState::Ready(records) => Some(stats::aggregate(records, self.filter)),
            _ => None,
        }
    }

    /// Whole dashboard as plain text.
    pub fn render_text(&self, locale_tag: &str, bar_width: usize) -> String {
        match &self.state {
            LoadState::Loading => "Loading...\n".to_string(),
            LoadState::Failed(msg) => format!("error: {}\n", msg),
            LoadState::Ready(records) => {
                render_view(&stats::aggregate(records, self.filter), locale_tag, bar_width)
            }
        }
    }
}

/// Header, summary stats, then one card per record.
pub fn render_view(view: &DashboardView<'_>, locale_tag: &str, bar_width: usize) -> String {
    let years: Vec<String> = view.years.iter().map(|y| y.to_string()).collect();
    let mut out = String::new();
    out.push_str("Indicator dashboard\n");
    out.push_str(&format!(
        "Year: {}  (available: {})\n\n",
        view.filter,
        if years.is_empty() { "-".to_string() } else { years.join(", ") }
    ));
    out.push_str(&format!(
        "Regions: {}   Mean smart score: {}   Mean sustainability score: {}\n\n",
        format::format_count(view.summary.count, locale_tag),
        format::format_percent(view.summary.mean_smart_pct, locale_tag),
        format::format_percent(view.summary.mean_sustainable_pct, locale_tag),
    ));
    for record in &view.records {
        out.push_str(&card::render_card_locale(record, locale_tag).to_text(bar_width));
        out.push('\n');
    }
    out
}
