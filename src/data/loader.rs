use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FieldValue, RawRow};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read raw incident rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one row per incident, any scalar column types
/// * `.json`    – `[{ "incident_category": "...", ... }, ...]` (open-data API dump)
/// * `.csv`     – header row with the public export's column names
///
/// No field is validated here; that is the projector's job.
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Read {} raw rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as returned by the open-data API):
///
/// ```json
/// [
///   {
///     "incident_date": "2018-01-01T00:00:00.000",
///     "incident_category": "Larceny Theft",
///     "latitude": "37.7599",
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawRow> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_field(val)))
                .collect())
        })
        .collect()
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one incident per line.
/// Blank cells become [`FieldValue::Null`].
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), guess_field_type(cell)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn guess_field_type(s: &str) -> FieldValue {
    let s = s.trim();
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FieldValue::Float(f);
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one incident per row.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::new();
            for (field, col) in schema.fields().iter().zip(batch.columns()) {
                let value = extract_field_value(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", field.name()))?;
                raw.insert(field.name().clone(), value);
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_field_value(col: &ArrayRef, row: usize) -> Result<FieldValue> {
    if col.is_null(row) {
        return Ok(FieldValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => FieldValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => FieldValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int16 => FieldValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => FieldValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => FieldValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => FieldValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => FieldValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => FieldValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            FieldValue::Date(array_value_to_string(col, row)?)
        }
        _ => FieldValue::String(array_value_to_string(col, row)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::project::project;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("incident-explorer-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_rows_keep_headers_and_blank_cells() {
        let path = temp_path("rows.csv");
        std::fs::write(
            &path,
            "Incident Date,Incident Year,Incident Category,Supervisor District,Latitude\n\
             2018/01/01,2018,Larceny Theft,9,37.76\n\
             2018/01/02,2018,Assault,,\n",
        )
        .unwrap();

        let rows = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Incident Year"], FieldValue::Integer(2018));
        assert_eq!(rows[0]["Incident Category"], FieldValue::String("Larceny Theft".into()));
        assert_eq!(rows[0]["Latitude"], FieldValue::Float(37.76));
        assert_eq!(rows[1]["Supervisor District"], FieldValue::Null);
    }

    #[test]
    fn json_api_dump_is_read() {
        let path = temp_path("rows.json");
        std::fs::write(
            &path,
            r#"[{"incident_year": "2019", "latitude": 37.7, "supervisor_district": null},
                {"incident_year": 2020, "resolved": true}]"#,
        )
        .unwrap();

        let rows = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows[0]["incident_year"], FieldValue::String("2019".into()));
        assert_eq!(rows[0]["latitude"], FieldValue::Float(37.7));
        assert_eq!(rows[0]["supervisor_district"], FieldValue::Null);
        assert_eq!(rows[1]["incident_year"], FieldValue::Integer(2020));
        assert_eq!(rows[1]["resolved"], FieldValue::Bool(true));
    }

    #[test]
    fn json_must_be_an_array() {
        let path = temp_path("object.json");
        std::fs::write(&path, r#"{"incident_year": 2019}"#).unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("Expected top-level JSON array"));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("incidents.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension: .xlsx"));
    }

    #[test]
    fn parquet_rows_project_cleanly() {
        let path = temp_path("rows.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("Incident Date", DataType::Utf8, false),
            Field::new("Incident Year", DataType::Int64, false),
            Field::new("Incident Day of Week", DataType::Utf8, false),
            Field::new("Incident Category", DataType::Utf8, false),
            Field::new("Incident Subcategory", DataType::Utf8, false),
            Field::new("Police District", DataType::Utf8, false),
            Field::new("Analysis Neighborhood", DataType::Utf8, true),
            Field::new("Supervisor District", DataType::Float64, false),
            Field::new("Latitude", DataType::Float64, false),
            Field::new("Longitude", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2020/05/01", "2020/05/02"])),
                Arc::new(Int64Array::from(vec![2020, 2020])),
                Arc::new(StringArray::from(vec!["Friday", "Saturday"])),
                Arc::new(StringArray::from(vec!["Robbery", "Arson"])),
                Arc::new(StringArray::from(vec!["Robbery - Street", "Arson"])),
                Arc::new(StringArray::from(vec!["Southern", "Bayview"])),
                Arc::new(StringArray::from(vec![Some("South of Market"), None])),
                Arc::new(Float64Array::from(vec![6.0, 10.0])),
                Arc::new(Float64Array::from(vec![37.78, 37.73])),
                Arc::new(Float64Array::from(vec![-122.40, -122.39])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Analysis Neighborhood"], FieldValue::Null);

        let out = project(rows);
        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.dataset.records()[0].supervisor_district, "6");
    }
}
