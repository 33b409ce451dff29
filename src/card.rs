//! Card renderer: one indicator record → display-ready projection.
//!
//! Rendering never fails. Scores that are missing or not numbers show as an empty
//! bar, auxiliary metrics that are missing show as [`NOT_AVAILABLE`].

use crate::format::{self, NOT_AVAILABLE};
use crate::models::IndicatorRecord;
use crate::stats::round1;
use serde::Serialize;

/// Title used when a record carries no region name.
pub const FALLBACK_TITLE: &str = "Metropolitan region";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    /// Stable key, `"{CODRM}-{ANO}"`.
    pub key: String,
    pub title: String,
    pub year: String,
    /// `NOTA_INTELIGENTE` clamped to [0, 1], as a percentage with one decimal.
    pub smart_pct: f64,
    /// `NOTA_SUSTENTAVEL` clamped to [0, 1], as a percentage with one decimal.
    pub sustainable_pct: f64,
    pub hdi: String,
    pub life_expectancy: String,
    pub hdi_income: String,
    #[serde(skip)]
    locale: String,
}

/// Score in [0, 1] → bar width in percent. Out-of-range values are clamped, missing or
/// NaN values render as 0.
pub fn score_percent(score: Option<f64>) -> f64 {
    match score {
        Some(v) if !v.is_nan() => round1(v.clamp(0.0, 1.0) * 100.0),
        _ => 0.0,
    }
}

/// Render a card with English number formatting.
pub fn render_card(record: &IndicatorRecord) -> CardView {
    render_card_locale(record, "en")
}

/// Render a card using the decimal separator of `locale_tag`.
pub fn render_card_locale(record: &IndicatorRecord, locale_tag: &str) -> CardView {
    let title = record
        .region_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string();
    let year = match record.year {
        Some(y) if y != 0 => y.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    };
    CardView {
        key: record.key(),
        title,
        year,
        smart_pct: score_percent(record.smart_score),
        sustainable_pct: score_percent(record.sustainable_score),
        hdi: format::format_decimal(record.hdi, 3, locale_tag),
        life_expectancy: format::format_decimal(record.life_expectancy, 1, locale_tag),
        hdi_income: format::format_decimal(record.hdi_income, 3, locale_tag),
        locale: locale_tag.to_string(),
    }
}

impl CardView {
    pub fn smart_label(&self) -> String {
        format::format_percent(self.smart_pct, &self.locale)
    }

    pub fn sustainable_label(&self) -> String {
        format::format_percent(self.sustainable_pct, &self.locale)
    }

    /// Plain-text card with ASCII progress bars `bar_width` cells wide.
    pub fn to_text(&self, bar_width: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {} ({}) ==\n", self.title, self.year));
        out.push_str(&format!(
            "  Smart score      {} {:>7}\n",
            progress_bar(self.smart_pct, bar_width),
            self.smart_label()
        ));
        out.push_str(&format!(
            "  Sustainability   {} {:>7}\n",
            progress_bar(self.sustainable_pct, bar_width),
            self.sustainable_label()
        ));
        out.push_str(&format!(
            "  HDI: {} | Life expectancy: {} | HDI income: {}\n",
            self.hdi, self.life_expectancy, self.hdi_income
        ));
        out
    }
}

/// `[#####-----]` style bar for a percentage in [0, 100].
pub fn progress_bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
