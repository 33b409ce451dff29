use crate::models::IndicatorRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn guard_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{}", s),
        _ => s.to_string(),
    }
}

fn guard_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(guard_cell)
}

/// Save records as CSV with header (backend column names).
pub fn save_csv<P: AsRef<Path>>(records: &[IndicatorRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((
        "CODRM",
        "NOME_RM",
        "ANO",
        "NOTA_INTELIGENTE",
        "NOTA_SUSTENTAVEL",
        "IDHM",
        "ESPVIDA",
        "IDHM_R",
        "IDHM_E",
        "IDHM_L",
        "FECTOT",
        "RAZDEP",
        "T_FLFUND_TUDO",
        "T_FLMED_TUDO",
        "T_FLBAS_TUDO",
        "T_FUND11A13_TUDO",
    ))?;
    for r in records {
        wtr.serialize((
            guard_opt(&r.region_code),
            guard_opt(&r.region_name),
            r.year,
            r.smart_score,
            r.sustainable_score,
            r.hdi,
            r.life_expectancy,
            r.hdi_income,
            r.hdi_education,
            r.hdi_longevity,
            r.fertility,
            r.dependency_ratio,
            r.net_enrollment_fundamental,
            r.net_enrollment_secondary,
            r.net_enrollment_basic,
            r.fundamental_11_to_13,
        ))?;
    }
    wtr.flush()?;
    log::info!("saved {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Save records as a pretty JSON array (same shape the API returns).
pub fn save_json<P: AsRef<Path>>(records: &[IndicatorRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    log::info!("saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read records back from a JSON file, e.g. a payload for `create`.
pub fn load_json<T: serde::de::DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let recs = vec![IndicatorRecord {
            region_code: Some("RM01".into()),
            region_name: Some("Alpha".into()),
            year: Some(2000),
            smart_score: Some(0.5),
            sustainable_score: Some(0.25),
            ..Default::default()
        }];
        save_csv(&recs, &csvp).unwrap();
        save_json(&recs, &jsonp).unwrap();
        assert!(csvp.exists());
        let back: Vec<IndicatorRecord> = load_json(&jsonp).unwrap();
        assert_eq!(back, recs);
    }

    #[test]
    fn guard_only_touches_formula_starters() {
        assert_eq!(guard_cell("=1+1"), "'=1+1");
        assert_eq!(guard_cell("Belo Horizonte"), "Belo Horizonte");
    }
}
