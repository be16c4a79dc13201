//! Query layer for cinedeck.
//!
//! Memoizes and deduplicates catalogue queries, fans out per-entity
//! secondary requests and re-assembles them in listing order.

/// Fan-out aggregation of secondary requests.
pub mod aggregate;
/// In-memory query cache with in-flight deduplication.
pub mod cache;
/// Memoized catalogue queries.
pub mod catalog;
/// Query-layer errors.
pub mod error;
/// Curated favorites.
pub mod favorites;
/// Cache keys.
pub mod key;
/// View-model helpers.
pub mod view;

pub use aggregate::{
    ItemOutcome, aggregate, aggregate_settled, aggregate_until_cancelled, index_by_id,
};
pub use cache::{CacheStats, QueryCache};
pub use catalog::{Catalog, FavoriteShowcase, GenreLists, HeroBanner, MediaBundle};
pub use error::{AggregateError, QueryError};
pub use favorites::{DEFAULT_HERO_ID, FavoriteEntry, FavoriteTable, LogoPosition};
pub use key::{CacheKey, QueryFacet};
pub use view::{Carousel, HeroArt, image_url};
