use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const N_INCIDENTS: usize = 5_000;

/// (neighborhood, police district, supervisor district, latitude, longitude)
const NEIGHBORHOODS: [(&str, &str, i64, f64, f64); 10] = [
    ("Mission", "Mission", 9, 37.7599, -122.4148),
    ("Tenderloin", "Tenderloin", 5, 37.7837, -122.4129),
    ("South of Market", "Southern", 6, 37.7785, -122.4056),
    ("Financial District/South Beach", "Central", 3, 37.7946, -122.3999),
    ("Bayview Hunters Point", "Bayview", 10, 37.7290, -122.3875),
    ("North Beach", "Central", 3, 37.8061, -122.4103),
    ("Outer Richmond", "Richmond", 1, 37.7778, -122.4930),
    ("Sunset/Parkside", "Taraval", 4, 37.7530, -122.4950),
    ("Castro/Upper Market", "Park", 8, 37.7609, -122.4350),
    ("Western Addition", "Northern", 5, 37.7813, -122.4320),
];

/// (category, subcategories, relative weight)
const CATEGORIES: [(&str, &[&str], u32); 6] = [
    ("Larceny Theft", &["Larceny - From Vehicle", "Larceny Theft - Other", "Larceny - Shoplifting"], 40),
    ("Malicious Mischief", &["Vandalism", "Malicious Mischief - Other"], 14),
    ("Assault", &["Simple Assault", "Aggravated Assault"], 12),
    ("Burglary", &["Burglary - Residential", "Burglary - Commercial"], 10),
    ("Motor Vehicle Theft", &["Motor Vehicle Theft"], 9),
    ("Robbery", &["Robbery - Street", "Robbery - Commercial"], 6),
];

const WEEKDAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn weighted<'a, T>(&mut self, items: &'a [T], weight: impl Fn(&T) -> u32) -> &'a T {
        let total: u32 = items.iter().map(&weight).sum();
        let mut pick = (self.next_f64() * total as f64) as u32;
        for item in items {
            let w = weight(item);
            if pick < w {
                return item;
            }
            pick -= w;
        }
        &items[items.len() - 1]
    }
}

struct Row {
    date: String,
    year: i64,
    weekday: &'static str,
    category: &'static str,
    subcategory: &'static str,
    police_district: &'static str,
    neighborhood: Option<&'static str>,
    supervisor_district: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn generate(rng: &mut SimpleRng, start: NaiveDate) -> Vec<Row> {
    let days = 365 * 3;
    (0..N_INCIDENTS)
        .map(|_| {
            let date = start + Days::new(rng.below(days) as u64);
            let (neighborhood, police_district, supervisor_district, lat, lon) =
                NEIGHBORHOODS[rng.below(NEIGHBORHOODS.len())];
            let (category, subcategories, _) = *rng.weighted(&CATEGORIES, |c| c.2);
            let subcategory = subcategories[rng.below(subcategories.len())];

            // A few incomplete rows, as in the real export.
            let incomplete = rng.next_f64() < 0.02;

            Row {
                date: date.format("%Y/%m/%d").to_string(),
                year: i64::from(date.year()),
                weekday: WEEKDAYS[date.weekday().num_days_from_monday() as usize],
                category,
                subcategory,
                police_district,
                neighborhood: (!incomplete).then_some(neighborhood),
                supervisor_district,
                latitude: (!incomplete).then(|| lat + (rng.next_f64() - 0.5) * 0.01),
                longitude: (!incomplete).then(|| lon + (rng.next_f64() - 0.5) * 0.01),
            }
        })
        .collect()
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Incident Date", DataType::Utf8, false),
        Field::new("Incident Year", DataType::Int64, false),
        Field::new("Incident Day of Week", DataType::Utf8, false),
        Field::new("Incident Category", DataType::Utf8, false),
        Field::new("Incident Subcategory", DataType::Utf8, false),
        Field::new("Police District", DataType::Utf8, false),
        Field::new("Analysis Neighborhood", DataType::Utf8, true),
        Field::new("Supervisor District", DataType::Int64, false),
        Field::new("Latitude", DataType::Float64, true),
        Field::new("Longitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.date.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.weekday))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.subcategory))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.police_district))),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.neighborhood).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.supervisor_district))),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Incident Date",
        "Incident Year",
        "Incident Day of Week",
        "Incident Category",
        "Incident Subcategory",
        "Police District",
        "Analysis Neighborhood",
        "Supervisor District",
        "Latitude",
        "Longitude",
    ])?;
    let opt = |v: Option<f64>| v.map(|v| format!("{v:.6}")).unwrap_or_default();
    for r in rows {
        writer.write_record([
            r.date.clone(),
            r.year.to_string(),
            r.weekday.to_string(),
            r.category.to_string(),
            r.subcategory.to_string(),
            r.police_district.to_string(),
            r.neighborhood.unwrap_or_default().to_string(),
            r.supervisor_district.to_string(),
            opt(r.latitude),
            opt(r.longitude),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).context("invalid start date")?;
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, start);
    let incomplete = rows.iter().filter(|r| r.neighborhood.is_none()).count();

    write_parquet(&rows, "sample_incidents.parquet")?;
    write_csv(&rows, "sample_incidents.csv")?;

    println!(
        "Wrote {} incidents ({incomplete} incomplete) to sample_incidents.parquet and sample_incidents.csv",
        rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    #[test]
    fn dates_agree_with_year_and_weekday() {
        let rows = generate(&mut SimpleRng::new(7), start());
        for r in &rows {
            let date = NaiveDate::parse_from_str(&r.date, "%Y/%m/%d").unwrap();
            assert!(date >= start());
            assert_eq!(i64::from(date.year()), r.year);
            assert_eq!(
                WEEKDAYS[date.weekday().num_days_from_monday() as usize],
                r.weekday
            );
        }
        assert!(rows.iter().any(|r| r.weekday == "Monday"));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&mut SimpleRng::new(7), start());
        let b = generate(&mut SimpleRng::new(7), start());
        assert_eq!(a.len(), N_INCIDENTS);
        assert!(a.iter().zip(&b).all(|(x, y)| x.date == y.date && x.category == y.category));
    }
}
