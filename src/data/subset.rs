use super::filter::FilterSet;
use super::model::{Dataset, Incident};

// ---------------------------------------------------------------------------
// Subset – the records that pass the current filters
// ---------------------------------------------------------------------------

/// Positions (into the owning [`Dataset`]) of the records that passed a
/// [`FilterSet`], in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subset {
    indices: Vec<usize>,
}

impl Subset {
    /// The identity subset: every record of `dataset`.
    pub fn full(dataset: &Dataset) -> Self {
        Subset {
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Resolve the subset against the dataset it was computed from.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Incident> + 'a {
        let records = dataset.records();
        self.indices.iter().filter_map(move |&i| records.get(i))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Single linear scan of `dataset`, keeping records that match `filters`.
pub fn apply(dataset: &Dataset, filters: &FilterSet) -> Subset {
    if filters.is_empty() {
        return Subset::full(dataset);
    }

    let pred = filters.combined_predicate();
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|&(_, rec)| pred(rec))
        .map(|(i, _)| i)
        .collect();
    Subset { indices }
}

// ---------------------------------------------------------------------------
// SubsetEngine – remembers the last (filters → subset) evaluation
// ---------------------------------------------------------------------------

/// Caches the subset for the most recent [`FilterSet`]. Must be reset with
/// [`SubsetEngine::invalidate`] whenever the dataset is replaced.
#[derive(Debug, Default)]
pub struct SubsetEngine {
    cached: Option<(FilterSet, Subset)>,
}

impl SubsetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subset of `dataset` under `filters`, recomputed only when the filters
    /// differ from the previous call.
    pub fn apply(&mut self, dataset: &Dataset, filters: &FilterSet) -> &Subset {
        if !self.is_cached_for(filters) {
            self.cached = None;
        }
        let (_, subset) = self.cached.get_or_insert_with(|| {
            let subset = apply(dataset, filters);
            log::debug!(
                "Recomputed subset: {} of {} records ({} active filters)",
                subset.len(),
                dataset.len(),
                filters.active_dimensions().count()
            );
            (filters.clone(), subset)
        });
        subset
    }

    /// Whether the next [`SubsetEngine::apply`] with `filters` is a cache hit.
    pub fn is_cached_for(&self, filters: &FilterSet) -> bool {
        self.cached.as_ref().is_some_and(|(last, _)| last == filters)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
