use std::fs;
use urbix_rs::models::IndicatorRecord;
use urbix_rs::storage;

fn sample(n: usize) -> Vec<IndicatorRecord> {
    (0..n)
        .map(|i| IndicatorRecord {
            region_code: Some(format!("RM{:02}", i)),
            region_name: Some("Região Metropolitana".into()),
            year: Some(2000 + i as i32),
            smart_score: Some(0.5),
            sustainable_score: Some(0.25 + i as f64 / 10.0),
            hdi: if i % 2 == 0 { Some(0.7) } else { None },
            ..Default::default()
        })
        .collect()
}

#[test]
fn save_csv_and_json() {
    let rows = sample(3);
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("urbix.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("CODRM,NOME_RM,ANO,NOTA_INTELIGENTE,NOTA_SUSTENTAVEL,"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());

    // missing values are empty cells
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let idx = headers.iter().position(|h| h == "IDHM").unwrap();
    let cells: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap().get(idx).unwrap().to_string())
        .collect();
    assert_eq!(cells, vec!["0.7", "", "0.7"]);

    let json_path = dir.path().join("urbix.json");
    storage::save_json(&rows, &json_path).unwrap();
    let json_txt = fs::read_to_string(&json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json_txt).unwrap();
    assert_eq!(v.as_array().unwrap().len(), rows.len());
    assert_eq!(v[0]["CODRM"], "RM00");

    let back: Vec<IndicatorRecord> = storage::load_json(&json_path).unwrap();
    assert_eq!(back, rows);
}

//test if the CSV file won't include executable formulas
//a spreadsheet would evaluate cells starting with = + - @
//we prefix those cells with a single quote
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let records = vec![IndicatorRecord {
        region_code: Some("=HYPERLINK(\"http://evil\")".into()),
        region_name: Some("@foo".into()),
        year: Some(2020),
        smart_score: Some(0.1),
        sustainable_score: Some(0.2),
        ..Default::default()
    }];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("csv_injection.csv");
    storage::save_csv(&records, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    let cell = |name: &str| {
        let idx = headers
            .iter()
            .position(|h| h == name)
            .expect("header present");
        row.get(idx).unwrap().to_string()
    };

    let code = cell("CODRM");
    assert!(code.starts_with('\''), "CODRM not prefixed: {code}");
    assert!(code.contains("=HYPERLINK"), "CODRM content changed: {code}");

    let name = cell("NOME_RM");
    assert_eq!(name, "'@foo");

    // numbers are left alone
    assert_eq!(cell("ANO"), "2020");
}

#[test]
fn load_json_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = storage::load_json::<IndicatorRecord, _>(dir.path().join("nope.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}

#[test]
fn enrollment_columns_survive_export() {
    let src = r#"[{"CODRM":"RM01","ANO":2010,"NOTA_INTELIGENTE":0.6,"NOTA_SUSTENTAVEL":0.4,
        "T_FLFUND_TUDO":12.5,"T_FLMED_TUDO":"x","T_FLBAS_TUDO":88.0,"T_FUND11A13_TUDO":91.25}]"#;
    let records: Vec<IndicatorRecord> = serde_json::from_str(src).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("enrollment.json");
    storage::save_json(&records, &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v[0]["T_FLFUND_TUDO"], 12.5);
    assert_eq!(v[0]["T_FUND11A13_TUDO"], 91.25);
    assert!(v[0].get("T_FLMED_TUDO").is_none());

    let csv_path = dir.path().join("enrollment.csv");
    storage::save_csv(&records, &csv_path).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().unwrap().unwrap();
    let cell = |name: &str| {
        let idx = headers.iter().position(|h| h == name).unwrap();
        row.get(idx).unwrap().to_string()
    };
    assert_eq!(cell("T_FLFUND_TUDO"), "12.5");
    assert_eq!(cell("T_FLMED_TUDO"), "");
    assert_eq!(cell("T_FLBAS_TUDO"), "88.0");
}
