//! Locale-aware number formatting for cards and summaries.

use num_format::{Locale, ToFormattedString};

/// Marker for a value that is missing or not a number.
pub const NOT_AVAILABLE: &str = "N/A";

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `pt`, `pt_BR`, `de`, `de_DE`,
/// `german`, `fr`, `es`, `it`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Fixed-point formatting with the locale's decimal separator, or `N/A`.
pub fn format_decimal(value: Option<f64>, decimals: usize, locale_tag: &str) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let s = format!("{:.*}", decimals, v);
            let (_, sep) = map_locale(locale_tag);
            if sep == '.' { s } else { s.replace('.', &sep.to_string()) }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Percentage with one decimal, e.g. `81.3%` or `81,3%`.
pub fn format_percent(pct: f64, locale_tag: &str) -> String {
    format!("{}%", format_decimal(Some(pct), 1, locale_tag))
}

/// Integer count with the locale's thousands separator.
pub fn format_count(n: usize, locale_tag: &str) -> String {
    let (locale, _) = map_locale(locale_tag);
    (n as u64).to_formatted_string(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_locale() {
        assert_eq!(format_decimal(Some(0.81234), 3, "en"), "0.812");
        assert_eq!(format_decimal(Some(0.81234), 3, "pt-BR"), "0,812");
        assert_eq!(format_decimal(None, 3, "en"), "N/A");
        assert_eq!(format_decimal(Some(f64::NAN), 1, "en"), "N/A");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(12345, "en"), "12,345");
        assert_eq!(format_count(12345, "de"), "12.345");
    }
}
