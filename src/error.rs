/// Errors raised by the filtering and ranking core.
///
/// Malformed input rows are not errors: the projector records them in its
/// report and carries on. An empty dataset is not an error either.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExploreError {
    /// A filter, ranking or config entry named a dimension we don't know.
    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),

    /// A top-N request with `n < 1`.
    #[error("invalid rank request: n must be at least 1, got {n}")]
    InvalidRankRequest { n: usize },
}
