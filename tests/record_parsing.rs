use urbix_rs::models::IndicatorRecord;

#[test]
fn parse_sample_json() {
    let sample = r#"
    [
      {
        "CODRM": "RM01",
        "NOME_RM": "Região Metropolitana de Belém",
        "ANO": 2010,
        "NOTA_INTELIGENTE": 0.62,
        "NOTA_SUSTENTAVEL": 0.48,
        "IDHM": 0.729,
        "ESPVIDA": 74.9,
        "IDHM_R": 0.715,
        "FECTOT": 1.9,
        "T_FLFUND_TUDO": 12.5
      },
      {
        "CODRM": 2,
        "NOME_RM": null,
        "ANO": "2000",
        "NOTA_INTELIGENTE": "n/a",
        "NOTA_SUSTENTAVEL": 0.5,
        "IDHM": null
      }
    ]
    "#;

    let records: Vec<IndicatorRecord> = serde_json::from_str(sample).unwrap();
    assert_eq!(records.len(), 2);

    let a = &records[0];
    assert_eq!(a.region_code.as_deref(), Some("RM01"));
    assert_eq!(a.year, Some(2010));
    assert_eq!(a.scores(), Some((0.62, 0.48)));
    assert_eq!(a.life_expectancy, Some(74.9));
    assert_eq!(a.fertility, Some(1.9));
    assert_eq!(a.hdi_education, None);
    assert_eq!(a.net_enrollment_fundamental, Some(12.5));
    assert_eq!(a.net_enrollment_secondary, None);
    assert!(a.is_valid());

    // numeric code becomes a string, string year and score are dropped
    let b = &records[1];
    assert_eq!(b.region_code.as_deref(), Some("2"));
    assert_eq!(b.region_name, None);
    assert_eq!(b.year, None);
    assert_eq!(b.smart_score, None);
    assert_eq!(b.sustainable_score, Some(0.5));
    assert!(!b.is_valid());
    assert_eq!(b.key(), "2-?");
}

#[test]
fn integral_float_year_is_accepted() {
    let r: IndicatorRecord = serde_json::from_str(r#"{"ANO": 2010.0, "CODRM": "X"}"#).unwrap();
    assert_eq!(r.year, Some(2010));
    let r: IndicatorRecord = serde_json::from_str(r#"{"ANO": 2010.5}"#).unwrap();
    assert_eq!(r.year, None);
}

#[test]
fn serialization_uses_backend_names_and_skips_missing() {
    let r = IndicatorRecord {
        region_code: Some("RM01".into()),
        year: Some(2010),
        smart_score: Some(0.7),
        ..Default::default()
    };
    let v = serde_json::to_value(&r).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 3);
    assert_eq!(obj["CODRM"], "RM01");
    assert_eq!(obj["ANO"], 2010);
    assert_eq!(obj["NOTA_INTELIGENTE"], 0.7);
}

#[test]
fn out_of_range_number_fails_the_document() {
    // rejected by the JSON tokenizer, not by the field parser
    let res: Result<Vec<IndicatorRecord>, _> =
        serde_json::from_str(r#"[{"CODRM":"RM01","IDHM":1e400}]"#);
    assert!(res.is_err());
    let ok: Vec<IndicatorRecord> =
        serde_json::from_str(r#"[{"CODRM":"RM01","IDHM":"1e400"}]"#).unwrap();
    assert_eq!(ok[0].hdi, None);
}
