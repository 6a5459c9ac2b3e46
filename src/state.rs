use std::collections::BTreeMap;
use std::path::Path;

use crate::color::ColorMap;
use crate::config::{ExplorerConfig, RankScope};
use crate::data::filter::FilterSet;
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Dimension};
use crate::data::project::{Projection, RejectedRow, project};
use crate::data::rank::{FrequencyTable, RankResult, top_n};
use crate::data::stats::{Summary, summarize};
use crate::data::subset::{Subset, SubsetEngine};
use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// One "top N" panel: which dimension, how many entries, and the result.
#[derive(Debug, Clone)]
pub struct RankPanel {
    pub dimension: Dimension,
    pub n: usize,
    /// Distinct values in the current rank scope (upper bound for `n`).
    pub distinct: usize,
    pub result: Result<RankResult, ExploreError>,
}

impl RankPanel {
    fn new(dimension: Dimension, n: usize) -> Self {
        Self {
            dimension,
            n,
            distinct: 0,
            result: Ok(RankResult {
                dimension,
                entries: Vec::new(),
            }),
        }
    }
}

/// A frequency chart over the filtered subset.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub dimension: Dimension,
    /// Plot in value order (time series) instead of by count.
    pub by_value: bool,
    pub table: FrequencyTable,
}

const DISTRIBUTIONS: [(Dimension, bool); 4] = [
    (Dimension::DayOfWeek, false),
    (Dimension::IncidentDate, true),
    (Dimension::Category, false),
    (Dimension::Subcategory, false),
];

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: ExplorerConfig,

    /// Projected dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Rows dropped by the projector on the last load.
    pub rejected: Vec<RejectedRow>,

    /// Per-dimension filter selections.
    pub filters: FilterSet,

    engine: SubsetEngine,

    /// Records passing the current filters.
    pub subset: Subset,

    pub summary: Summary,

    /// Top neighborhoods and top categories.
    pub rankings: Vec<RankPanel>,

    pub rank_scope: RankScope,

    pub distributions: Vec<Distribution>,

    /// Map colours by incident category.
    pub category_colors: ColorMap,

    /// Sidebar search text per filter dimension.
    pub filter_search: BTreeMap<Dimension, String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> Self {
        let rankings = [Dimension::Neighborhood, Dimension::Category]
            .into_iter()
            .map(|dim| RankPanel::new(dim, config.default_top_n))
            .collect();
        Self {
            rank_scope: config.rank_scope,
            config,
            dataset: None,
            rejected: Vec::new(),
            filters: FilterSet::default(),
            engine: SubsetEngine::new(),
            subset: Subset::default(),
            summary: Summary::from_counts(0, 0),
            rankings,
            distributions: Vec::new(),
            category_colors: ColorMap::default(),
            filter_search: BTreeMap::new(),
            status_message: None,
        }
    }

    /// Read, project and ingest a file, reporting failures in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(rows) => {
                let projection = project(rows);
                log::info!(
                    "Loaded {} incidents ({} rows dropped) from {}",
                    projection.dataset.len(),
                    projection.rejected.len(),
                    path.display()
                );
                self.set_dataset(projection);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly projected dataset and reset filters.
    pub fn set_dataset(&mut self, projection: Projection) {
        let Projection { dataset, rejected } = projection;

        self.status_message = (!rejected.is_empty())
            .then(|| format!("{} incomplete rows were dropped while loading", rejected.len()));
        self.category_colors = ColorMap::new(dataset.unique_values(Dimension::Category));
        self.rejected = rejected;
        self.filters.clear_all();
        self.filter_search.clear();
        self.engine.invalidate();
        self.dataset = Some(dataset);

        self.refilter();
    }

    /// Recompute the subset and every view if the filters changed.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        if self.engine.is_cached_for(&self.filters) {
            return;
        }
        self.subset = self.engine.apply(ds, &self.filters).clone();
        self.recompute_views();
    }

    /// Recompute summary, rankings and distributions from the current subset.
    pub fn recompute_views(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        self.summary = summarize(&self.subset, ds);

        let full = Subset::full(ds);
        let scope = match self.rank_scope {
            RankScope::Subset => &self.subset,
            RankScope::Dataset => &full,
        };
        for panel in &mut self.rankings {
            panel.distinct = FrequencyTable::count(scope.records(ds), panel.dimension).distinct();
            panel.result = top_n(scope.records(ds), panel.dimension, panel.n);
        }

        self.distributions = DISTRIBUTIONS
            .iter()
            .map(|&(dimension, by_value)| {
                let table = FrequencyTable::count(self.subset.records(ds), dimension);
                Distribution {
                    dimension,
                    by_value,
                    table: if by_value {
                        table.sorted_by_value()
                    } else {
                        table.sorted_by_count()
                    },
                }
            })
            .collect();
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &str) {
        self.filters.toggle(dimension, value);
        self.refilter();
    }

    /// Remove the constraint on one dimension.
    pub fn clear_filter(&mut self, dimension: Dimension) {
        self.filters.clear(dimension);
        self.refilter();
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
        self.refilter();
    }

    /// Change how many entries the ranking panel `index` shows.
    pub fn set_top_n(&mut self, index: usize, n: usize) {
        if let Some(panel) = self.rankings.get_mut(index) {
            if panel.n != n {
                panel.n = n;
                self.recompute_views();
            }
        }
    }

    pub fn set_rank_scope(&mut self, scope: RankScope) {
        if self.rank_scope != scope {
            self.rank_scope = scope;
            self.recompute_views();
        }
    }
}
