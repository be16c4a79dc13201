//! Query-layer errors.

use cinedeck_api::tmdb::FetchError;
use thiserror::Error;

/// Failure of a fan-out aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum AggregateError {
    /// A secondary request for one entity failed.
    #[error("secondary request for media {id} failed: {source}")]
    Item {
        /// Id of the entity whose request failed.
        id: u64,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },
    /// The aggregation was cancelled before every request settled.
    #[error("aggregation cancelled")]
    Cancelled,
}

impl AggregateError {
    /// Id of the failing entity, if any.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        match self {
            Self::Item { id, .. } => Some(*id),
            Self::Cancelled => None,
        }
    }
}

/// Failure of a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum QueryError {
    /// A single upstream request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A fan-out over a listing failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
