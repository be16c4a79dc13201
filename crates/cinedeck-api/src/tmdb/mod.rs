//! TMDB API client module.
//!
//! Turns structured request descriptors into TMDB v3 GET URLs and
//! fetches movie/TV listings, details, images, credits, reviews,
//! search results and genre lists.

mod api;
mod client;
mod error;
mod rate_limiter;
mod request;
mod types;
mod url_builder;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMediaApi, MediaApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{MediaClient, MediaClientBuilder};
pub use error::{FetchError, redact_api_key};
pub use request::{EndpointKind, MediaType, PathLayout, RequestDescriptor, SEASON_TOKEN};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    AuthorDetails, CastMember, Credits, CrewMember, Genre, GenreList, Image, MediaDetail,
    MediaImages, MediaKey, MediaListResult, MediaSummary, Review, Reviews, TmdbErrorResponse,
};
pub use url_builder::{DEFAULT_BASE_PATH, LOCALE, UrlBuilder};
