//! Live API tests against a running backend. Run with:
//! `URBIX_API_URL=http://localhost:8000/api cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use urbix_rs::{Client, Config, YearFilter, stats};

#[test]
fn fetch_and_aggregate() {
    let client = Client::new(&Config::from_env()).unwrap();
    let records = client.fetch_indicators().unwrap();
    assert!(!records.is_empty());

    let view = stats::aggregate(&records, YearFilter::All);
    assert!(view.records.iter().all(|r| r.is_valid()));
    for pair in view.records.windows(2) {
        assert!(pair[0].composite_score() >= pair[1].composite_score());
    }
    if let Some(&year) = view.years.first() {
        let by_year = stats::aggregate(&records, YearFilter::Year(year));
        assert!(by_year.records.iter().all(|r| r.year == Some(year)));
    }
}

#[test]
fn fetch_summary() {
    let client = Client::new(&Config::from_env()).unwrap();
    let summary = client.fetch_summary().unwrap();
    assert!(summary.values().all(|s| s.min <= s.max && s.count > 0));
}
