use super::model::{parse_date, Dataset, Dimension, FieldValue, Incident, RawRow};

// ---------------------------------------------------------------------------
// Rejection report
// ---------------------------------------------------------------------------

/// Why a raw row did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' has unusable value '{value}'")]
    InvalidField { field: &'static str, value: String },
}

/// A dropped input row: its position in the input and the first problem found.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: RejectReason,
}

/// Output of [`project`]: the clean dataset plus what was thrown away.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub dataset: Dataset,
    pub rejected: Vec<RejectedRow>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const LATITUDE_KEYS: [&str; 3] = [LATITUDE, "latitude", "lat"];
const LONGITUDE_KEYS: [&str; 3] = [LONGITUDE, "longitude", "lon"];

/// Map raw rows into [`Incident`]s, keeping input order.
///
/// A row is kept only when every recognised field is present, non-null and
/// of a usable type. Everything else is reported in [`Projection::rejected`].
pub fn project<I>(rows: I) -> Projection
where
    I: IntoIterator<Item = RawRow>,
{
    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (row_no, raw) in rows.into_iter().enumerate() {
        match project_row(&raw) {
            Ok(incident) => records.push(incident),
            Err(reason) => {
                log::debug!("Dropping row {row_no}: {reason}");
                rejected.push(RejectedRow {
                    row: row_no,
                    reason,
                });
            }
        }
    }

    if !rejected.is_empty() {
        log::warn!(
            "Dropped {} incomplete rows, kept {}",
            rejected.len(),
            records.len()
        );
    }

    Projection {
        dataset: Dataset::from_records(records),
        rejected,
    }
}

fn project_row(raw: &RawRow) -> Result<Incident, RejectReason> {
    let text = |dim: Dimension| -> Result<String, RejectReason> {
        dimension_value(raw, dim).map(|v| v.to_string())
    };

    let year_value = dimension_value(raw, Dimension::IncidentYear)?;
    let incident_year = year_value.as_i64().ok_or_else(|| RejectReason::InvalidField {
        field: Dimension::IncidentYear.column_name(),
        value: year_value.to_string(),
    })?;

    Ok(Incident {
        incident_date: date_token(dimension_value(raw, Dimension::IncidentDate)?),
        incident_year,
        day_of_week: text(Dimension::DayOfWeek)?,
        category: text(Dimension::Category)?,
        subcategory: text(Dimension::Subcategory)?,
        police_district: text(Dimension::PoliceDistrict)?,
        neighborhood: text(Dimension::Neighborhood)?,
        supervisor_district: text(Dimension::SupervisorDistrict)?,
        latitude: coordinate(raw, LATITUDE, &LATITUDE_KEYS)?,
        longitude: coordinate(raw, LONGITUDE, &LONGITUDE_KEYS)?,
    })
}

fn dimension_value(raw: &RawRow, dim: Dimension) -> Result<&FieldValue, RejectReason> {
    lookup(raw, &[dim.column_name(), dim.api_key()])
        .ok_or(RejectReason::MissingField(dim.column_name()))
}

fn coordinate(raw: &RawRow, field: &'static str, keys: &[&str]) -> Result<f64, RejectReason> {
    let value = lookup(raw, keys).ok_or(RejectReason::MissingField(field))?;
    value.as_f64().ok_or_else(|| RejectReason::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// First non-null value found under any of `keys`.
fn lookup<'r>(raw: &'r RawRow, keys: &[&str]) -> Option<&'r FieldValue> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| !v.is_null())
}

/// Strip a time-of-day suffix so dates act as day tokens.
///
/// Only cuts when the part before the time is itself a date, so text dates
/// such as `January 1, 2018` stay whole.
fn date_token(value: &FieldValue) -> String {
    let text = value.to_string();
    if parse_date(&text).is_some() {
        return text;
    }
    match text.split_once(['T', ' ']) {
        Some((day, _)) if parse_date(day).is_some() => day.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> RawRow {
        let mut row = RawRow::new();
        row.insert("Incident Date".into(), FieldValue::String("2018/01/01".into()));
        row.insert("Incident Year".into(), FieldValue::Integer(2018));
        row.insert("Incident Day of Week".into(), FieldValue::String("Monday".into()));
        row.insert("Incident Category".into(), FieldValue::String("Larceny Theft".into()));
        row.insert(
            "Incident Subcategory".into(),
            FieldValue::String("Larceny - From Vehicle".into()),
        );
        row.insert("Police District".into(), FieldValue::String("Mission".into()));
        row.insert("Analysis Neighborhood".into(), FieldValue::String("Mission".into()));
        row.insert("Supervisor District".into(), FieldValue::Float(9.0));
        row.insert("Latitude".into(), FieldValue::Float(37.7599));
        row.insert("Longitude".into(), FieldValue::Float(-122.4148));
        row.insert("Resolution".into(), FieldValue::String("Open or Active".into()));
        row
    }

    #[test]
    fn complete_row_is_projected() {
        let out = project(vec![full_row()]);
        assert!(out.rejected.is_empty());
        let rec = &out.dataset.records()[0];
        assert_eq!(rec.incident_date, "2018/01/01");
        assert_eq!(rec.incident_year, 2018);
        assert_eq!(rec.category, "Larceny Theft");
        assert_eq!(rec.supervisor_district, "9");
        assert_eq!(rec.latitude, 37.7599);
    }

    #[test]
    fn rows_with_missing_or_null_fields_are_rejected_and_reported() {
        let mut missing = full_row();
        missing.remove("Analysis Neighborhood");
        let mut null_lat = full_row();
        null_lat.insert("Latitude".into(), FieldValue::Null);
        let mut nan_lon = full_row();
        nan_lon.insert("Longitude".into(), FieldValue::Float(f64::NAN));

        let out = project(vec![missing, full_row(), null_lat, nan_lon]);

        assert_eq!(out.dataset.len(), 1);
        assert_eq!(
            out.rejected,
            vec![
                RejectedRow {
                    row: 0,
                    reason: RejectReason::MissingField("Analysis Neighborhood"),
                },
                RejectedRow {
                    row: 2,
                    reason: RejectReason::MissingField("Latitude"),
                },
                RejectedRow {
                    row: 3,
                    reason: RejectReason::MissingField("Longitude"),
                },
            ]
        );
    }

    #[test]
    fn non_numeric_coordinate_is_invalid() {
        let mut row = full_row();
        row.insert("Latitude".into(), FieldValue::String("north".into()));
        let out = project(vec![row]);
        assert_eq!(
            out.rejected[0].reason,
            RejectReason::InvalidField {
                field: "Latitude",
                value: "north".into(),
            }
        );
    }

    #[test]
    fn surviving_rows_keep_input_order() {
        let mut first = full_row();
        first.insert("Incident Category".into(), FieldValue::String("Assault".into()));
        let mut broken = full_row();
        broken.remove("Incident Year");
        let mut last = full_row();
        last.insert("Incident Category".into(), FieldValue::String("Robbery".into()));

        let out = project(vec![first, broken, last]);
        let cats: Vec<&str> = out
            .dataset
            .records()
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(cats, ["Assault", "Robbery"]);
    }

    #[test]
    fn api_style_rows_are_accepted() {
        let mut row = RawRow::new();
        for (key, val) in [
            ("incident_date", "2019-03-04T00:00:00.000"),
            ("incident_year", "2019"),
            ("incident_day_of_week", "Monday"),
            ("incident_category", "Robbery"),
            ("incident_subcategory", "Robbery - Street"),
            ("police_district", "Tenderloin"),
            ("analysis_neighborhood", "Tenderloin"),
            ("supervisor_district", "6"),
            ("latitude", "37.7837"),
            ("longitude", "-122.4129"),
        ] {
            row.insert(key.into(), FieldValue::String(val.into()));
        }

        let out = project(vec![row]);
        assert!(out.rejected.is_empty());
        let rec = &out.dataset.records()[0];
        assert_eq!(rec.incident_date, "2019-03-04");
        assert_eq!(rec.incident_year, 2019);
        assert_eq!(rec.longitude, -122.4129);
    }

    #[test]
    fn only_time_suffixes_are_cut_from_dates() {
        let dated = |date: &str| {
            let mut row = full_row();
            row.insert("Incident Date".into(), FieldValue::String(date.into()));
            row
        };
        let out = project(vec![
            dated("2018/01/01 12:30:00 AM"),
            dated("January 1, 2018"),
            dated("January 2, 2018"),
        ]);
        let dates: Vec<&str> = out
            .dataset
            .records()
            .iter()
            .map(|r| r.incident_date.as_str())
            .collect();
        assert_eq!(dates, ["2018/01/01", "January 1, 2018", "January 2, 2018"]);
    }

    #[test]
    fn empty_input_gives_empty_dataset() {
        let out = project(Vec::<RawRow>::new());
        assert!(out.dataset.is_empty());
        assert!(out.rejected.is_empty());
    }
}
