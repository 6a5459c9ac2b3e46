use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a raw input row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as it comes out of CSV, JSON or Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Calendar date kept as text, e.g. `2018-01-01`.
    Date(String),
    Null,
}

impl FieldValue {
    /// Missing in the dataframe sense: null, NaN or a blank string.
    pub fn is_null(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Float(v) => v.is_nan(),
            FieldValue::String(s) | FieldValue::Date(s) => s.trim().is_empty(),
            FieldValue::Integer(_) | FieldValue::Bool(_) => false,
        }
    }

    /// Interpret the value as an `f64`, parsing numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    /// Interpret the value as an `i64`. Integral floats (`2018.0`) are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            FieldValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && v.fract() == 0.0)
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s.trim()),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{d}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

/// One raw input row: field name → value. Fields may be absent.
pub type RawRow = BTreeMap<String, FieldValue>;

// ---------------------------------------------------------------------------
// Dimension – a categorical attribute usable for filtering and ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    IncidentDate,
    IncidentYear,
    DayOfWeek,
    Category,
    Subcategory,
    PoliceDistrict,
    Neighborhood,
    SupervisorDistrict,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::IncidentDate,
        Dimension::IncidentYear,
        Dimension::DayOfWeek,
        Dimension::Category,
        Dimension::Subcategory,
        Dimension::PoliceDistrict,
        Dimension::Neighborhood,
        Dimension::SupervisorDistrict,
    ];

    /// Sidebar filters of the stock dashboard.
    pub const DEFAULT_FILTERS: [Dimension; 5] = [
        Dimension::IncidentDate,
        Dimension::Subcategory,
        Dimension::Neighborhood,
        Dimension::PoliceDistrict,
        Dimension::SupervisorDistrict,
    ];

    /// Column header in the public CSV export; also the canonical name.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::IncidentDate => "Incident Date",
            Dimension::IncidentYear => "Incident Year",
            Dimension::DayOfWeek => "Incident Day of Week",
            Dimension::Category => "Incident Category",
            Dimension::Subcategory => "Incident Subcategory",
            Dimension::PoliceDistrict => "Police District",
            Dimension::Neighborhood => "Analysis Neighborhood",
            Dimension::SupervisorDistrict => "Supervisor District",
        }
    }

    /// Field key used by the open-data JSON API.
    pub fn api_key(self) -> &'static str {
        match self {
            Dimension::IncidentDate => "incident_date",
            Dimension::IncidentYear => "incident_year",
            Dimension::DayOfWeek => "incident_day_of_week",
            Dimension::Category => "incident_category",
            Dimension::Subcategory => "incident_subcategory",
            Dimension::PoliceDistrict => "police_district",
            Dimension::Neighborhood => "analysis_neighborhood",
            Dimension::SupervisorDistrict => "supervisor_district",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Dimension {
    type Err = ExploreError;

    /// Accepts the column name (case-insensitive) or the API key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|d| d.column_name().eq_ignore_ascii_case(wanted) || d.api_key() == wanted)
            .ok_or_else(|| ExploreError::UnknownDimension(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Incident – one normalized record
// ---------------------------------------------------------------------------

/// A fully populated incident report. Built only by the projector.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    /// Date token (`YYYY-MM-DD` or whatever the source uses), no time part.
    pub incident_date: String,
    pub incident_year: i64,
    pub day_of_week: String,
    pub category: String,
    pub subcategory: String,
    pub police_district: String,
    pub neighborhood: String,
    pub supervisor_district: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Incident {
    /// The record's value for a categorical dimension.
    pub fn value(&self, dimension: Dimension) -> Cow<'_, str> {
        match dimension {
            Dimension::IncidentDate => Cow::Borrowed(&self.incident_date),
            Dimension::IncidentYear => Cow::Owned(self.incident_year.to_string()),
            Dimension::DayOfWeek => Cow::Borrowed(&self.day_of_week),
            Dimension::Category => Cow::Borrowed(&self.category),
            Dimension::Subcategory => Cow::Borrowed(&self.subcategory),
            Dimension::PoliceDistrict => Cow::Borrowed(&self.police_district),
            Dimension::Neighborhood => Cow::Borrowed(&self.neighborhood),
            Dimension::SupervisorDistrict => Cow::Borrowed(&self.supervisor_district),
        }
    }
}

/// Day formats seen in incident exports, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y/%m/%d", "%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"];

/// Parse a date token in any of the known export formats.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

// ---------------------------------------------------------------------------
// Dataset – the immutable, projected record set
// ---------------------------------------------------------------------------

/// All projected incidents plus per-dimension option lists.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Incident>,
    /// Distinct values per dimension, in first-seen order.
    unique_values: BTreeMap<Dimension, Vec<String>>,
}

impl Dataset {
    pub fn from_records(records: Vec<Incident>) -> Self {
        let mut unique_values = BTreeMap::new();
        for dim in Dimension::ALL {
            let mut seen: HashSet<Cow<'_, str>> = HashSet::new();
            let mut ordered = Vec::new();
            for rec in &records {
                let val = rec.value(dim);
                if !seen.contains(&val) {
                    ordered.push(val.to_string());
                    seen.insert(val);
                }
            }
            unique_values.insert(dim, ordered);
        }

        Dataset {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Incident] {
        &self.records
    }

    /// Distinct values of `dimension`, in first-seen order.
    pub fn unique_values(&self, dimension: Dimension) -> &[String] {
        self.unique_values
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal incident with every field populated.
    pub(crate) fn incident(category: &str, day: &str) -> Incident {
        Incident {
            incident_date: "2018-01-01".into(),
            incident_year: 2018,
            day_of_week: day.into(),
            category: category.into(),
            subcategory: format!("{category} - Other"),
            police_district: "Central".into(),
            neighborhood: "Mission".into(),
            supervisor_district: "9".into(),
            latitude: 37.76,
            longitude: -122.42,
        }
    }

    #[test]
    fn dimension_parses_column_names_and_api_keys() {
        assert_eq!(
            "Analysis Neighborhood".parse::<Dimension>(),
            Ok(Dimension::Neighborhood)
        );
        assert_eq!(
            "incident day of week".parse::<Dimension>(),
            Ok(Dimension::DayOfWeek)
        );
        assert_eq!(
            "police_district".parse::<Dimension>(),
            Ok(Dimension::PoliceDistrict)
        );
    }

    #[test]
    fn dates_parse_in_every_export_format() {
        let day = NaiveDate::from_ymd_opt(2018, 1, 9);
        assert_eq!(parse_date("2018/01/09"), day);
        assert_eq!(parse_date("2018/1/9"), day);
        assert_eq!(parse_date("2018-01-09"), day);
        assert_eq!(parse_date("01/09/2018"), day);
        assert_eq!(parse_date("January 9, 2018"), day);
        assert_eq!(parse_date("Tenderloin"), None);
    }

    #[test]
    fn unknown_dimension_is_a_named_error() {
        assert_eq!(
            "Resolution".parse::<Dimension>(),
            Err(ExploreError::UnknownDimension("Resolution".into()))
        );
    }

    #[test]
    fn unique_values_keep_first_seen_order() {
        let ds = Dataset::from_records(vec![
            incident("Theft", "Tue"),
            incident("Assault", "Mon"),
            incident("Theft", "Mon"),
        ]);
        assert_eq!(ds.unique_values(Dimension::Category), ["Theft", "Assault"]);
        assert_eq!(ds.unique_values(Dimension::DayOfWeek), ["Tue", "Mon"]);
        assert_eq!(ds.unique_values(Dimension::IncidentYear), ["2018"]);
    }

    #[test]
    fn null_like_values() {
        assert!(FieldValue::Null.is_null());
        assert!(FieldValue::Float(f64::NAN).is_null());
        assert!(FieldValue::String("  ".into()).is_null());
        assert!(!FieldValue::Integer(0).is_null());
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(FieldValue::Float(2018.0).as_i64(), Some(2018));
        assert_eq!(FieldValue::Float(9.5).as_i64(), None);
        assert_eq!(FieldValue::String("9.0".into()).as_i64(), Some(9));
        assert_eq!(FieldValue::String("37.77".into()).as_f64(), Some(37.77));
        assert_eq!(FieldValue::String("north".into()).as_f64(), None);
    }
}
