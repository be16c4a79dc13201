//! Cache keys.

use cinedeck_api::tmdb::{EndpointKind, MediaType, RequestDescriptor};

/// Query family a cache key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFacet {
    /// Primary listing.
    List,
    /// Per-entity details fanned out over a listing.
    Details,
    /// Per-entity images fanned out over a listing.
    Images,
    /// Details of a single entity.
    Detail,
    /// Images of a single entity.
    ImageSet,
    /// Cast and crew of a single entity.
    Credits,
    /// Reviews of a single entity.
    Reviews,
    /// Multi-search.
    Search,
    /// Genre id list.
    Genres,
    /// Curated favorites showcase.
    Favorites,
}

/// Deterministic identity of one memoized query.
///
/// Built from a facet plus every descriptor field, so two descriptors
/// with equal fields map to the same key no matter how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct CacheKey {
    /// Query family.
    pub facet: QueryFacet,
    /// Endpoint family of the underlying request.
    pub endpoint: EndpointKind,
    /// Media type.
    pub media_type: Option<MediaType>,
    /// Entity id.
    pub id: Option<u64>,
    /// Original language filter.
    pub original_language: Option<String>,
    /// Season number.
    pub season_number: Option<u32>,
    /// Genre filter.
    pub genre: Option<String>,
    /// Origin country.
    pub original_country: Option<String>,
    /// People filter.
    pub people: Option<String>,
    /// Search query.
    pub query: Option<String>,
    /// Entity ids for keys that span a fixed id set.
    pub ids: Vec<u64>,
}

impl CacheKey {
    /// Key for `descriptor` within `facet`.
    #[must_use]
    pub fn new(facet: QueryFacet, descriptor: &RequestDescriptor) -> Self {
        let RequestDescriptor {
            endpoint,
            media_type,
            id,
            original_language,
            season_number,
            genre,
            original_country,
            people,
            query,
        } = descriptor.clone();
        Self {
            facet,
            endpoint,
            media_type,
            id,
            original_language,
            season_number,
            genre,
            original_country,
            people,
            query,
            ids: Vec::new(),
        }
    }

    /// Key for a single-entity resource.
    #[must_use]
    pub fn entity(facet: QueryFacet, endpoint: EndpointKind, media_type: MediaType, id: u64) -> Self {
        Self::new(
            facet,
            &RequestDescriptor::new(endpoint).media_type(media_type).id(id),
        )
    }

    /// Same key, scoped to the ordered `ids` it was computed over.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<u64>) -> Self {
        self.ids = ids;
        self
    }

    /// Key for a query over a fixed, ordered id set.
    #[must_use]
    pub fn id_set(facet: QueryFacet, ids: &[u64]) -> Self {
        let mut key = Self::new(
            facet,
            &RequestDescriptor::new(EndpointKind::Details).media_type(MediaType::Movie),
        );
        key.ids = ids.to_vec();
        key
    }
}
