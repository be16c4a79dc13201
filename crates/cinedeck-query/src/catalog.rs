//! `Catalog` - memoized catalogue queries over a `MediaApi`.
//!
//! Each query family has its own cache. Listing-wide secondary data
//! (details, images) is fetched by fanning out over the cached listing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cinedeck_api::tmdb::{
    Credits, EndpointKind, FetchError, GenreList, MediaApi, MediaDetail, MediaImages,
    MediaListResult, MediaSummary, MediaType, RequestDescriptor, Reviews,
};
use tracing::instrument;

use crate::aggregate::{aggregate, index_by_id};
use crate::cache::QueryCache;
use crate::error::{AggregateError, QueryError};
use crate::favorites::{FavoriteEntry, FavoriteTable};
use crate::key::{CacheKey, QueryFacet};
use crate::view::HeroArt;

/// A listing plus its per-entity details and images, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaBundle {
    /// Primary listing.
    pub list: MediaListResult,
    /// `details[i]` belongs to `list.results[i]`.
    pub details: Vec<MediaDetail>,
    /// `images[i]` belongs to `list.results[i]`.
    pub images: Vec<MediaImages>,
}

/// Movie and TV genre lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreLists {
    /// Movie genres.
    pub movie: GenreList,
    /// TV genres.
    pub tv: GenreList,
}

impl GenreLists {
    /// Genre name for `id` within `media_type`.
    #[must_use]
    pub fn name_of(&self, media_type: MediaType, id: u32) -> Option<&str> {
        match media_type {
            MediaType::Movie => self.movie.name_of(id),
            MediaType::Tv => self.tv.name_of(id),
        }
    }
}

/// Images and details of every curated favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteShowcase {
    /// Image sets in favorites order.
    pub images: Vec<MediaImages>,
    /// Details keyed by movie id.
    pub details_by_id: HashMap<u64, MediaDetail>,
}

/// Hero banner content.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroBanner {
    /// Movie details.
    pub detail: MediaDetail,
    /// Key art.
    pub art: HeroArt,
}

/// Catalogue queries with per-facet memoization.
#[derive(Debug)]
pub struct Catalog<A> {
    api: Arc<A>,
    lists: QueryCache<CacheKey, MediaListResult, FetchError>,
    details: QueryCache<CacheKey, Vec<MediaDetail>, AggregateError>,
    images: QueryCache<CacheKey, Vec<MediaImages>, AggregateError>,
    detail: QueryCache<CacheKey, MediaDetail, FetchError>,
    image_sets: QueryCache<CacheKey, MediaImages, FetchError>,
    credits: QueryCache<CacheKey, Credits, FetchError>,
    reviews: QueryCache<CacheKey, Reviews, FetchError>,
    searches: QueryCache<CacheKey, MediaListResult, FetchError>,
    genres: QueryCache<CacheKey, GenreList, FetchError>,
    favorites: QueryCache<CacheKey, FavoriteShowcase, AggregateError>,
}

/// Fan-out key: the descriptor plus the listing ids it ran over, so a
/// refreshed listing never pairs with secondary data of an older one.
fn listing_key(facet: QueryFacet, descriptor: &RequestDescriptor, list: &MediaListResult) -> CacheKey {
    CacheKey::new(facet, descriptor).with_ids(list.results.iter().map(|item| item.id).collect())
}

fn cache<V, E>(ttl: Option<Duration>) -> QueryCache<CacheKey, V, E> {
    ttl.map_or_else(QueryCache::new, QueryCache::with_ttl)
}

impl<A> Catalog<A> {
    /// Catalog over `api` with process-lifetime caches.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api), None)
    }

    /// Catalog whose cached entries go stale after `ttl`.
    #[must_use]
    pub fn with_ttl(api: A, ttl: Duration) -> Self {
        Self::from_arc(Arc::new(api), Some(ttl))
    }

    /// Catalog over a shared `api`.
    #[must_use]
    pub fn from_arc(api: Arc<A>, ttl: Option<Duration>) -> Self {
        Self {
            api,
            lists: cache(ttl),
            details: cache(ttl),
            images: cache(ttl),
            detail: cache(ttl),
            image_sets: cache(ttl),
            credits: cache(ttl),
            reviews: cache(ttl),
            searches: cache(ttl),
            genres: cache(ttl),
            favorites: cache(ttl),
        }
    }

    /// Underlying API.
    #[must_use]
    pub const fn api(&self) -> &Arc<A> {
        &self.api
    }
}

impl<A> Catalog<A>
where
    A: MediaApi + Send + Sync + 'static,
{
    /// Primary listing for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the listing request fails.
    #[instrument(skip_all, fields(endpoint = ?descriptor.endpoint))]
    pub async fn media_list(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<MediaListResult, FetchError> {
        let api = Arc::clone(&self.api);
        let owned = descriptor.clone();
        self.lists
            .get_or_compute(CacheKey::new(QueryFacet::List, descriptor), move || {
                async move { api.list(&owned).await }
            })
            .await
    }

    /// Details of every entity in the listing, in listing order.
    ///
    /// Each request carries its entity's original language.
    ///
    /// # Errors
    ///
    /// - `QueryError::Fetch` if the listing request fails.
    /// - `QueryError::Aggregate` if any detail request fails.
    #[instrument(skip_all, fields(endpoint = ?descriptor.endpoint))]
    pub async fn media_details(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Vec<MediaDetail>, QueryError> {
        let list = self.media_list(descriptor).await?;
        let api = Arc::clone(&self.api);
        let media_type = descriptor.media_type_or_default();
        let details = self
            .details
            .get_or_compute(listing_key(QueryFacet::Details, descriptor, &list), move || {
                async move {
                    aggregate(&list.results, |item: &MediaSummary| {
                        let api = Arc::clone(&api);
                        let media_type = item.reported_media_type().unwrap_or(media_type);
                        let language = item.original_language.clone();
                        let id = item.id;
                        async move { api.details(media_type, id, language.as_deref()).await }
                    })
                    .await
                }
            })
            .await?;
        Ok(details)
    }

    /// Images of every entity in the listing, in listing order.
    ///
    /// # Errors
    ///
    /// - `QueryError::Fetch` if the listing request fails.
    /// - `QueryError::Aggregate` if any image request fails.
    #[instrument(skip_all, fields(endpoint = ?descriptor.endpoint))]
    pub async fn media_images(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Vec<MediaImages>, QueryError> {
        let list = self.media_list(descriptor).await?;
        let api = Arc::clone(&self.api);
        let media_type = descriptor.media_type_or_default();
        let images = self
            .images
            .get_or_compute(listing_key(QueryFacet::Images, descriptor, &list), move || {
                async move {
                    aggregate(&list.results, |item: &MediaSummary| {
                        let api = Arc::clone(&api);
                        let media_type = item.reported_media_type().unwrap_or(media_type);
                        let language = item.original_language.clone();
                        let id = item.id;
                        async move { api.images(media_type, id, language.as_deref()).await }
                    })
                    .await
                }
            })
            .await?;
        Ok(images)
    }

    /// Listing, details and images in one call; the two fan-outs run
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `QueryError` from the listing or either fan-out.
    #[instrument(skip_all, fields(endpoint = ?descriptor.endpoint))]
    pub async fn media_bundle(&self, descriptor: &RequestDescriptor) -> Result<MediaBundle, QueryError> {
        let list = self.media_list(descriptor).await?;
        let (details, images) = tokio::try_join!(
            self.media_details(descriptor),
            self.media_images(descriptor)
        )?;
        Ok(MediaBundle {
            list,
            details,
            images,
        })
    }

    /// Details of a single entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    #[instrument(skip(self))]
    pub async fn detail(&self, media_type: MediaType, id: u64) -> Result<MediaDetail, FetchError> {
        let api = Arc::clone(&self.api);
        let key = CacheKey::entity(QueryFacet::Detail, EndpointKind::Details, media_type, id);
        self.detail
            .get_or_compute(key, move || async move {
                api.details(media_type, id, None).await
            })
            .await
    }

    /// Images of a single entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    #[instrument(skip(self))]
    pub async fn images(&self, media_type: MediaType, id: u64) -> Result<MediaImages, FetchError> {
        let api = Arc::clone(&self.api);
        let key = CacheKey::entity(QueryFacet::ImageSet, EndpointKind::Images, media_type, id);
        self.image_sets
            .get_or_compute(key, move || async move {
                api.images(media_type, id, None).await
            })
            .await
    }

    /// Cast and crew of one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    #[instrument(skip(self))]
    pub async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, FetchError> {
        let api = Arc::clone(&self.api);
        let key = CacheKey::entity(QueryFacet::Credits, EndpointKind::Credits, media_type, id);
        self.credits
            .get_or_compute(key, move || async move { api.credits(media_type, id).await })
            .await
    }

    /// First page of reviews of one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    #[instrument(skip(self))]
    pub async fn reviews(&self, media_type: MediaType, id: u64) -> Result<Reviews, FetchError> {
        let api = Arc::clone(&self.api);
        let key = CacheKey::entity(QueryFacet::Reviews, EndpointKind::Reviews, media_type, id);
        self.reviews
            .get_or_compute(key, move || async move { api.reviews(media_type, id).await })
            .await
    }

    /// Multi-search over movies, TV and people.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<MediaListResult, FetchError> {
        let api = Arc::clone(&self.api);
        let owned = String::from(query);
        let key = CacheKey::new(
            QueryFacet::Search,
            &RequestDescriptor::new(EndpointKind::Search).query(query),
        );
        self.searches
            .get_or_compute(key, move || async move { api.search_multi(&owned).await })
            .await
    }

    async fn genre_list(&self, media_type: MediaType) -> Result<GenreList, FetchError> {
        let api = Arc::clone(&self.api);
        let key = CacheKey::new(
            QueryFacet::Genres,
            &RequestDescriptor::new(EndpointKind::GenreList).media_type(media_type),
        );
        self.genres
            .get_or_compute(key, move || async move { api.genre_list(media_type).await })
            .await
    }

    /// Movie and TV genre lists, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if either request fails.
    #[instrument(skip_all)]
    pub async fn genre_lists(&self) -> Result<GenreLists, FetchError> {
        let (movie, tv) = tokio::try_join!(
            self.genre_list(MediaType::Movie),
            self.genre_list(MediaType::Tv)
        )?;
        Ok(GenreLists { movie, tv })
    }

    /// Images and details of every favorite in `table`.
    ///
    /// # Errors
    ///
    /// Returns `AggregateError` if any image or detail request fails.
    #[instrument(skip_all, fields(favorites = table.len()))]
    pub async fn favorite_showcase(
        &self,
        table: &FavoriteTable,
    ) -> Result<FavoriteShowcase, AggregateError> {
        let api = Arc::clone(&self.api);
        let entries = table.entries().to_vec();
        let key = CacheKey::id_set(QueryFacet::Favorites, &table.ids());
        self.favorites
            .get_or_compute(key, move || async move {
                let image_fetch = |entry: &FavoriteEntry| {
                    let api = Arc::clone(&api);
                    let id = entry.id;
                    async move { api.images(MediaType::Movie, id, None).await }
                };
                let detail_fetch = |entry: &FavoriteEntry| {
                    let api = Arc::clone(&api);
                    let id = entry.id;
                    async move { api.details(MediaType::Movie, id, None).await }
                };
                let (images, details) = tokio::try_join!(
                    aggregate(&entries, image_fetch),
                    aggregate(&entries, detail_fetch)
                )?;
                Ok(FavoriteShowcase {
                    images,
                    details_by_id: index_by_id(details),
                })
            })
            .await
    }

    /// Details and key art of the hero movie named by `table`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if either request fails.
    #[instrument(skip_all, fields(hero_id = table.hero_id()))]
    pub async fn hero(&self, table: &FavoriteTable) -> Result<HeroBanner, FetchError> {
        let id = table.hero_id();
        let (detail, images) = tokio::try_join!(
            self.detail(MediaType::Movie, id),
            self.images(MediaType::Movie, id)
        )?;
        Ok(HeroBanner {
            detail,
            art: HeroArt::from_images(&images),
        })
    }
}
