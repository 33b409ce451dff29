//! Synchronous client for the **indicators REST API**.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET  /indicators` → JSON array of indicator records
//! - `GET  /indicators/{id}` → one record
//! - `POST /indicators` → create a record, returns the stored record
//! - `GET  /indicators/summary` → per-field min/max/mean/count
//!
//! ### Notes
//! - One round-trip per call. There are no retries: a failure is reported as
//!   [`ApiError`] and it is up to the caller to decide what to show.
//! - Records are normalized while decoding (see [`IndicatorRecord`]), so a response
//!   with odd values in numeric columns still decodes successfully.
//!
//! Typical usage:
//! ```no_run
//! # use urbix_rs::{Client, YearFilter, stats};
//! let client = Client::default();
//! let records = client.fetch_indicators()?;
//! let view = stats::aggregate(&records, YearFilter::All);
//! println!("{} regions", view.summary.count);
//! # Ok::<(), urbix_rs::ApiError>(())
//! ```
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{FieldSummary, IndicatorRecord};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(&Config::default()).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in ids
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

impl Client {
    /// Build a client for `config.base_url`.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = HttpClient::builder()
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("urbix_rs/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Client)?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetch every indicator record.
    ///
    /// ### Errors
    /// - Network/transport failure
    /// - Non-2xx status
    /// - Body is not a JSON array of objects
    pub fn fetch_indicators(&self) -> Result<Vec<IndicatorRecord>, ApiError> {
        let url = format!("{}/indicators", self.base_url);
        let records: Vec<IndicatorRecord> = self.get_json(&url)?;
        log::info!("fetched {} indicator records", records.len());
        Ok(records)
    }

    /// Fetch a single record by id. The id is percent-encoded into the path.
    pub fn fetch_indicator_by_id(&self, id: &str) -> Result<IndicatorRecord, ApiError> {
        let url = format!(
            "{}/indicators/{}",
            self.base_url,
            percent_encoding::utf8_percent_encode(id.trim(), SAFE)
        );
        self.get_json(&url)
    }

    /// Create a record and return what the server stored.
    ///
    /// ### Example
    /// ```no_run
    /// # use urbix_rs::{Client, IndicatorRecord};
    /// let payload = IndicatorRecord {
    ///     region_code: Some("RM01".into()),
    ///     year: Some(2010),
    ///     smart_score: Some(0.7),
    ///     sustainable_score: Some(0.6),
    ///     ..Default::default()
    /// };
    /// let created = Client::default().create_indicator(&payload)?;
    /// # Ok::<(), urbix_rs::ApiError>(())
    /// ```
    pub fn create_indicator<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<IndicatorRecord, ApiError> {
        let url = format!("{}/indicators", self.base_url);
        log::debug!("POST {}", url);
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .map_err(|source| transport(&url, source))?;
        decode(&url, resp)
    }

    /// Server-side statistics per column, keyed by column name (`IDHM`, `ANO`, ...).
    pub fn fetch_summary(&self) -> Result<BTreeMap<String, FieldSummary>, ApiError> {
        let url = format!("{}/indicators/summary", self.base_url);
        self.get_json(&url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|source| transport(url, source))?;
        decode(url, resp)
    }
}

fn transport(url: &str, source: reqwest::Error) -> ApiError {
    log::warn!("request to {} failed: {}", url, source);
    ApiError::Transport {
        url: url.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(url: &str, resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        log::warn!("{} responded with HTTP {}", url, status);
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    resp.json().map_err(|source| {
        log::warn!("could not decode response from {}: {}", url, source);
        ApiError::Decode {
            url: url.to_string(),
            source,
        }
    })
}
