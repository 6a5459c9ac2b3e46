use std::fmt;

use super::model::Dataset;
use super::subset::Subset;

/// How much of the dataset the current filters keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: usize,
    /// `100 * count / total`, or `0.0` for an empty dataset.
    pub percentage: f64,
}

impl Summary {
    pub fn from_counts(count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        };
        Summary {
            count,
            total,
            percentage,
        }
    }
}

/// Compare a subset against the dataset it was drawn from.
pub fn summarize(subset: &Subset, dataset: &Dataset) -> Summary {
    Summary::from_counts(subset.len(), dataset.len())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} incidents match the filters ({:.2}% of all incidents)",
            self.count, self.percentage
        )
    }
}
