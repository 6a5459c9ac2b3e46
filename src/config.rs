use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::Dimension;
use crate::data::rank::DEFAULT_TOP_N;
use crate::error::ExploreError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "INCIDENT_EXPLORER_CONFIG";

// ---------------------------------------------------------------------------
// Rank scope
// ---------------------------------------------------------------------------

/// Which records the ranking panels count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankScope {
    /// Only records passing the current filters.
    #[default]
    Subset,
    /// Every record, ignoring filters.
    Dataset,
}

impl RankScope {
    pub fn label(self) -> &'static str {
        match self {
            RankScope::Subset => "filtered incidents",
            RankScope::Dataset => "all incidents",
        }
    }
}

// ---------------------------------------------------------------------------
// ExplorerConfig
// ---------------------------------------------------------------------------

/// Validated settings for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Dimensions offered as sidebar filters, in display order.
    pub filter_dimensions: Vec<Dimension>,
    /// Initial N of every ranking panel.
    pub default_top_n: usize,
    pub rank_scope: RankScope,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            filter_dimensions: Dimension::DEFAULT_FILTERS.to_vec(),
            default_top_n: DEFAULT_TOP_N,
            rank_scope: RankScope::default(),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    filter_dimensions: Option<Vec<String>>,
    default_top_n: Option<usize>,
    rank_scope: Option<RankScope>,
}

impl ExplorerConfig {
    /// Load from the file named by [`CONFIG_ENV`], or defaults if unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text).context("parsing config JSON")?;
        let defaults = Self::default();

        let filter_dimensions = match raw.filter_dimensions {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<Dimension>())
                .collect::<Result<Vec<_>, ExploreError>>()?,
            None => defaults.filter_dimensions,
        };

        let default_top_n = raw.default_top_n.unwrap_or(defaults.default_top_n);
        if default_top_n < 1 {
            return Err(ExploreError::InvalidRankRequest { n: default_top_n }.into());
        }

        Ok(Self {
            filter_dimensions,
            default_top_n,
            rank_scope: raw.rank_scope.unwrap_or(defaults.rank_scope),
        })
    }
}
