use std::collections::HashMap;

use super::model::{parse_date, Dimension, Incident};
use crate::error::ExploreError;

/// Default number of entries in a ranking panel.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Frequency table
// ---------------------------------------------------------------------------

/// Occurrence counts of each distinct value of one dimension.
///
/// Entries are kept in first-encountered order until sorted, which makes the
/// descending sort stable and the ranking reproducible for a fixed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub dimension: Dimension,
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    /// Count `dimension` over `records` in a single pass.
    pub fn count<'a, I>(records: I, dimension: Dimension) -> Self
    where
        I: IntoIterator<Item = &'a Incident>,
    {
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for rec in records {
            let value = rec.value(dimension);
            match slots.get(&*value) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    slots.insert(value.to_string(), entries.len());
                    entries.push((value.into_owned(), 1));
                }
            }
        }

        FrequencyTable {
            dimension,
            entries,
        }
    }

    /// Entries as they stand (first-encountered order unless sorted).
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    /// Sum of all counts; equals the number of records counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descending by count; ties keep first-encountered order.
    pub fn sorted_by_count(mut self) -> Self {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self
    }

    /// Ascending by value. Values that read as dates sort chronologically
    /// and come first; the rest follow in string order.
    pub fn sorted_by_value(mut self) -> Self {
        self.entries.sort_by_cached_key(|(value, _)| {
            let date = parse_date(value);
            (date.is_none(), date, value.clone())
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Top-N ranking
// ---------------------------------------------------------------------------

/// The `n` most frequent values of a dimension, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankResult {
    pub dimension: Dimension,
    pub entries: Vec<(String, usize)>,
}

impl RankResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest count in the ranking (0 when empty).
    pub fn max_count(&self) -> usize {
        self.entries.first().map_or(0, |(_, c)| *c)
    }
}

/// Rank the values of `dimension` over `records`.
///
/// `n` larger than the number of distinct values returns all of them;
/// `n == 0` is rejected rather than yielding an empty ranking.
pub fn top_n<'a, I>(records: I, dimension: Dimension, n: usize) -> Result<RankResult, ExploreError>
where
    I: IntoIterator<Item = &'a Incident>,
{
    if n < 1 {
        return Err(ExploreError::InvalidRankRequest { n });
    }

    let mut entries = FrequencyTable::count(records, dimension)
        .sorted_by_count()
        .entries;
    entries.truncate(n);

    Ok(RankResult { dimension, entries })
}

/// [`top_n`] with the dimension given by name.
pub fn top_n_by_name<'a, I>(records: I, dimension: &str, n: usize) -> Result<RankResult, ExploreError>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let dimension: Dimension = dimension.parse()?;
    top_n(records, dimension, n)
}
