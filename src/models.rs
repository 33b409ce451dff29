use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One indicator observation: a metropolitan region in a given year.
///
/// Field names on the wire follow the backend (`CODRM`, `NOTA_INTELIGENTE`, ...).
/// Upstream data is not guaranteed clean, so every numeric field is parsed leniently:
/// anything that is not a JSON number (missing, `null`, a string, ...) becomes `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndicatorRecord {
    #[serde(
        rename = "CODRM",
        default,
        deserialize_with = "de_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub region_code: Option<String>,
    #[serde(
        rename = "NOME_RM",
        default,
        deserialize_with = "de_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub region_name: Option<String>,
    #[serde(
        rename = "ANO",
        default,
        deserialize_with = "de_lenient_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    #[serde(
        rename = "NOTA_INTELIGENTE",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub smart_score: Option<f64>,
    #[serde(
        rename = "NOTA_SUSTENTAVEL",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub sustainable_score: Option<f64>,
    #[serde(
        rename = "IDHM",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hdi: Option<f64>,
    #[serde(
        rename = "ESPVIDA",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub life_expectancy: Option<f64>,
    #[serde(
        rename = "IDHM_R",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hdi_income: Option<f64>,
    #[serde(
        rename = "IDHM_E",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hdi_education: Option<f64>,
    #[serde(
        rename = "IDHM_L",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hdi_longevity: Option<f64>,
    #[serde(
        rename = "FECTOT",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub fertility: Option<f64>,
    #[serde(
        rename = "RAZDEP",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub dependency_ratio: Option<f64>,
    /// Net enrollment rate, fundamental education (%).
    #[serde(
        rename = "T_FLFUND_TUDO",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_enrollment_fundamental: Option<f64>,
    /// Net enrollment rate, secondary education (%).
    #[serde(
        rename = "T_FLMED_TUDO",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_enrollment_secondary: Option<f64>,
    /// Net enrollment rate, basic education (%).
    #[serde(
        rename = "T_FLBAS_TUDO",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub net_enrollment_basic: Option<f64>,
    /// Share of 11 to 13 year olds in the final years of fundamental education (%).
    #[serde(
        rename = "T_FUND11A13_TUDO",
        default,
        deserialize_with = "de_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub fundamental_11_to_13: Option<f64>,
}

impl IndicatorRecord {
    /// Both primary scores, if they are present and not NaN.
    pub fn scores(&self) -> Option<(f64, f64)> {
        match (self.smart_score, self.sustainable_score) {
            (Some(s), Some(t)) if !s.is_nan() && !t.is_nan() => Some((s, t)),
            _ => None,
        }
    }

    /// A record only counts for statistics and display when both scores are usable.
    pub fn is_valid(&self) -> bool {
        self.scores().is_some()
    }

    /// Ranking key: `NOTA_INTELIGENTE + NOTA_SUSTENTAVEL`.
    pub fn composite_score(&self) -> Option<f64> {
        self.scores().map(|(s, t)| s + t)
    }

    /// Display key, `"{CODRM}-{ANO}"`.
    pub fn key(&self) -> String {
        let code = self.region_code.as_deref().unwrap_or("?");
        match self.year {
            Some(y) => format!("{}-{}", code, y),
            None => format!("{}-?", code),
        }
    }

    /// Value of a numeric metric by its wire name.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SmartScore => self.smart_score,
            Metric::SustainableScore => self.sustainable_score,
            Metric::Hdi => self.hdi,
            Metric::LifeExpectancy => self.life_expectancy,
            Metric::HdiIncome => self.hdi_income,
            Metric::HdiEducation => self.hdi_education,
            Metric::HdiLongevity => self.hdi_longevity,
            Metric::Fertility => self.fertility,
            Metric::DependencyRatio => self.dependency_ratio,
            Metric::NetEnrollmentFundamental => self.net_enrollment_fundamental,
            Metric::NetEnrollmentSecondary => self.net_enrollment_secondary,
            Metric::NetEnrollmentBasic => self.net_enrollment_basic,
            Metric::Fundamental11To13 => self.fundamental_11_to_13,
        }
    }
}

/// Numeric columns of an [`IndicatorRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    SmartScore,
    SustainableScore,
    Hdi,
    LifeExpectancy,
    HdiIncome,
    HdiEducation,
    HdiLongevity,
    Fertility,
    DependencyRatio,
    NetEnrollmentFundamental,
    NetEnrollmentSecondary,
    NetEnrollmentBasic,
    Fundamental11To13,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::SmartScore,
        Metric::SustainableScore,
        Metric::Hdi,
        Metric::LifeExpectancy,
        Metric::HdiIncome,
        Metric::HdiEducation,
        Metric::HdiLongevity,
        Metric::Fertility,
        Metric::DependencyRatio,
        Metric::NetEnrollmentFundamental,
        Metric::NetEnrollmentSecondary,
        Metric::NetEnrollmentBasic,
        Metric::Fundamental11To13,
    ];

    /// Column name used by the backend.
    pub fn wire_name(self) -> &'static str {
        match self {
            Metric::SmartScore => "NOTA_INTELIGENTE",
            Metric::SustainableScore => "NOTA_SUSTENTAVEL",
            Metric::Hdi => "IDHM",
            Metric::LifeExpectancy => "ESPVIDA",
            Metric::HdiIncome => "IDHM_R",
            Metric::HdiEducation => "IDHM_E",
            Metric::HdiLongevity => "IDHM_L",
            Metric::Fertility => "FECTOT",
            Metric::DependencyRatio => "RAZDEP",
            Metric::NetEnrollmentFundamental => "T_FLFUND_TUDO",
            Metric::NetEnrollmentSecondary => "T_FLMED_TUDO",
            Metric::NetEnrollmentBasic => "T_FLBAS_TUDO",
            Metric::Fundamental11To13 => "T_FUND11A13_TUDO",
        }
    }
}

/// Year selection for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearFilter {
    /// Every valid record, regardless of year.
    #[default]
    All,
    /// Only records whose `ANO` equals this year.
    Year(i32),
}

impl YearFilter {
    pub fn matches(&self, record: &IndicatorRecord) -> bool {
        match *self {
            YearFilter::All => true,
            YearFilter::Year(y) => record.year == Some(y),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        s.parse::<i32>()
            .map(YearFilter::Year)
            .map_err(|_| format!("invalid year filter '{}', expected 'all' or YYYY", s))
    }
}

/// Per-field statistics as returned by `GET /indicators/summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}

/// Serde helper: accept any JSON number as `f64`; everything else becomes `None`.
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientVisitor)?
        .and_then(|s| match s {
            Scalar::Float(v) => Some(v),
            Scalar::Int(v) => Some(v as f64),
            Scalar::Uint(v) => Some(v as f64),
            Scalar::Text(_) => None,
        }))
}

/// Serde helper: a year is an integral JSON number (`2010` or `2010.0`).
fn de_lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientVisitor)?
        .and_then(|s| match s {
            Scalar::Int(v) => i32::try_from(v).ok(),
            Scalar::Uint(v) => i32::try_from(v).ok(),
            Scalar::Float(v) if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Some(v as i32),
            _ => None,
        }))
}

/// Serde helper: region codes show up both as strings and as numbers.
fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientVisitor)?
        .map(|s| match s {
            Scalar::Text(t) => t,
            Scalar::Int(v) => v.to_string(),
            Scalar::Uint(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
        }))
}

enum Scalar {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

/// Reads any JSON value, keeping numbers and strings and discarding the rest.
struct LenientVisitor;

impl<'de> serde::de::Visitor<'de> for LenientVisitor {
    type Value = Option<Scalar>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "any JSON value")
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Scalar::Int(v)))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Scalar::Uint(v)))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(Scalar::Float(v)))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(Scalar::Text(v.to_string())))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(Scalar::Text(v)))
    }

    fn visit_bool<E: serde::de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientVisitor)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        while map
            .next_entry::<serde::de::IgnoredAny, serde::de::IgnoredAny>()?
            .is_some()
        {}
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_scores_become_none() {
        let r: IndicatorRecord = serde_json::from_str(
            r#"{"CODRM":"01","ANO":2010,"NOTA_INTELIGENTE":"x","NOTA_SUSTENTAVEL":null,"IDHM":[1]}"#,
        )
        .unwrap();
        assert_eq!(r.smart_score, None);
        assert_eq!(r.sustainable_score, None);
        assert_eq!(r.hdi, None);
        assert!(!r.is_valid());
    }

    #[test]
    fn nan_scores_are_invalid() {
        let r = IndicatorRecord {
            smart_score: Some(f64::NAN),
            sustainable_score: Some(0.5),
            ..Default::default()
        };
        assert!(!r.is_valid());
        assert_eq!(r.composite_score(), None);
    }

    #[test]
    fn year_filter_parses() {
        assert_eq!("all".parse::<YearFilter>().unwrap(), YearFilter::All);
        assert_eq!(" 2010 ".parse::<YearFilter>().unwrap(), YearFilter::Year(2010));
        assert!("20x0".parse::<YearFilter>().is_err());
    }
}
