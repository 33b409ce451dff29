//! Runtime configuration: where the backend lives and how values are formatted.
//!
//! Resolution order is defaults, then environment, then whatever the caller
//! (usually CLI flags) overrides explicitly.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LOCALE: &str = "en";

pub const ENV_BASE_URL: &str = "URBIX_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "URBIX_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "URBIX_LOCALE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the indicators API, without trailing slash.
    pub base_url: String,
    /// Total request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// Locale tag for number formatting (`en`, `pt`, `de`, ...).
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            locale: DEFAULT_LOCALE.into(),
        }
    }
}

impl Config {
    /// Defaults overlaid with `URBIX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL).filter(|s| !s.trim().is_empty()) {
            cfg = cfg.with_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.timeout = Some(Duration::from_secs(secs)),
                _ => log::warn!("ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }
        if let Some(locale) = lookup(ENV_LOCALE).filter(|s| !s.trim().is_empty()) {
            cfg.locale = locale.trim().to_string();
        }
        cfg
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://example.org/api/"),
            (ENV_TIMEOUT_SECS, "15"),
            (ENV_LOCALE, "pt"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.base_url, "https://example.org/api");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(15)));
        assert_eq!(cfg.locale, "pt");
    }

    #[test]
    fn bad_timeout_is_ignored() {
        let cfg = Config::from_lookup(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(cfg, Config::default());
    }
}
