//! `MediaApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::request::{MediaType, RequestDescriptor};
use super::types::{Credits, GenreList, MediaDetail, MediaImages, MediaListResult, Reviews};

/// Media catalogue API trait.
///
/// Abstracts the upstream calls so the query layer can run against a
/// mock in tests. Uses `trait_variant::make` to generate a `Send`-bound
/// async trait; the query layer requires the `Send` variant.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MediaApi: Send)]
pub trait LocalMediaApi {
    /// Fetches a listing (`discover`, `search`, `popular`, ...).
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn list(&self, descriptor: &RequestDescriptor) -> Result<MediaListResult, FetchError>;

    /// Fetches the detail object for one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn details(
        &self,
        media_type: MediaType,
        id: u64,
        original_language: Option<&str>,
    ) -> Result<MediaDetail, FetchError>;

    /// Fetches backdrops, posters and logos for one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn images(
        &self,
        media_type: MediaType,
        id: u64,
        original_language: Option<&str>,
    ) -> Result<MediaImages, FetchError>;

    /// Fetches cast and crew for one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, FetchError>;

    /// Fetches the first page of reviews for one entity.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn reviews(&self, media_type: MediaType, id: u64) -> Result<Reviews, FetchError>;

    /// Searches movies, TV and people at once (`search/multi`).
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn search_multi(&self, query: &str) -> Result<MediaListResult, FetchError>;

    /// Fetches the genre id list for a media type.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP request or JSON decoding fails.
    async fn genre_list(&self, media_type: MediaType) -> Result<GenreList, FetchError>;
}
