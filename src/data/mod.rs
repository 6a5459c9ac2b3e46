/// Data layer: loading, projection, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ project  │  keep complete rows → Dataset (+ rejected rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  subset  │ ◄─── │  filter  │  per-dimension selections, AND-ed
///   └──────────┘      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  rank /  │  top-N, frequency tables, count + percentage
///   │  stats   │
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod project;
pub mod filter;
pub mod subset;
pub mod rank;
pub mod stats;
