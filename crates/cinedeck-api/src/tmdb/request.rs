//! Request descriptor types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Media type path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature films.
    #[default]
    Movie,
    /// TV series.
    Tv,
}

impl MediaType {
    /// Returns the lowercase path segment (`movie` / `tv`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an endpoint arranges its path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLayout {
    /// `{segment}/{media_type}`; never carries an id.
    Nested,
    /// `{media_type}[/{id}]{segment}`.
    MediaFirst,
}

/// Placeholder replaced by the season number in endpoint templates.
pub const SEASON_TOKEN: &str = "{season_num}";

/// Upstream endpoint families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// `discover/{type}`: filtered listing.
    Discover,
    /// `{type}/{id}`: flat detail object.
    Details,
    /// `{type}/{id}/images`.
    Images,
    /// `{type}/{id}/credits`.
    Credits,
    /// `{type}/{id}/reviews`.
    Reviews,
    /// `{type}/search`: free-text search.
    Search,
    /// `{type}/genre`. The real genre list path comes from
    /// `UrlBuilder::genre_list_url`.
    GenreList,
    /// `tv/{id}/season/{n}`.
    Season,
    /// `{type}/popular`.
    Popular,
    /// `{type}/top_rated`.
    TopRated,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/airing_today`.
    AiringToday,
    /// `{type}/{id}/videos`.
    Videos,
    /// `{type}/{id}/similar`.
    Similar,
    /// `{type}/{id}/recommendations`.
    Recommendations,
}

impl EndpointKind {
    /// Path segment or template for this endpoint, with its leading `/`.
    ///
    /// `Details` has an empty segment. `Season` contains [`SEASON_TOKEN`].
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Discover => "/discover",
            Self::Details => "",
            Self::Images => "/images",
            Self::Credits => "/credits",
            Self::Reviews => "/reviews",
            Self::Search => "/search",
            Self::GenreList => "/genre",
            Self::Season => "/season/{season_num}",
            Self::Popular => "/popular",
            Self::TopRated => "/top_rated",
            Self::NowPlaying => "/now_playing",
            Self::Upcoming => "/upcoming",
            Self::OnTheAir => "/on_the_air",
            Self::AiringToday => "/airing_today",
            Self::Videos => "/videos",
            Self::Similar => "/similar",
            Self::Recommendations => "/recommendations",
        }
    }

    /// Path layout for this endpoint.
    #[must_use]
    pub const fn layout(self) -> PathLayout {
        match self {
            Self::Discover => PathLayout::Nested,
            _ => PathLayout::MediaFirst,
        }
    }

    /// Returns `true` for endpoints that answer with `{ results: [...] }`.
    #[must_use]
    pub const fn is_listing(self) -> bool {
        matches!(
            self,
            Self::Discover
                | Self::Search
                | Self::Popular
                | Self::TopRated
                | Self::NowPlaying
                | Self::Upcoming
                | Self::OnTheAir
                | Self::AiringToday
                | Self::Similar
                | Self::Recommendations
        )
    }
}

/// Structured description of one upstream GET request.
///
/// Every field except `endpoint` is optional; unset fields are simply
/// left out of the URL. Two descriptors with equal fields always build
/// the same URL and the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor {
    /// Endpoint family.
    pub endpoint: EndpointKind,
    /// `movie` or `tv`.
    pub media_type: Option<MediaType>,
    /// Entity id for per-entity endpoints.
    pub id: Option<u64>,
    /// Original language filter (ISO 639-1).
    pub original_language: Option<String>,
    /// Season number substituted into season templates.
    pub season_number: Option<u32>,
    /// Comma-separated genre ids.
    pub genre: Option<String>,
    /// Origin country (ISO 3166-1). Part of the cache identity only.
    pub original_country: Option<String>,
    /// Comma-separated person ids.
    pub people: Option<String>,
    /// Free-text search query.
    pub query: Option<String>,
}

impl RequestDescriptor {
    /// Creates a descriptor for `endpoint` with every optional field unset.
    #[must_use]
    pub const fn new(endpoint: EndpointKind) -> Self {
        Self {
            endpoint,
            media_type: None,
            id: None,
            original_language: None,
            season_number: None,
            genre: None,
            original_country: None,
            people: None,
            query: None,
        }
    }

    /// Sets the media type.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Sets the entity id.
    #[must_use]
    pub const fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the original language filter.
    #[must_use]
    pub fn original_language(mut self, language: impl Into<String>) -> Self {
        self.original_language = Some(language.into());
        self
    }

    /// Sets the season number.
    #[must_use]
    pub const fn season_number(mut self, season: u32) -> Self {
        self.season_number = Some(season);
        self
    }

    /// Sets the genre filter.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Sets the origin country.
    #[must_use]
    pub fn original_country(mut self, country: impl Into<String>) -> Self {
        self.original_country = Some(country.into());
        self
    }

    /// Sets the people filter.
    #[must_use]
    pub fn people(mut self, people: impl Into<String>) -> Self {
        self.people = Some(people.into());
        self
    }

    /// Sets the search query.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Media type, falling back to `movie` when unset.
    #[must_use]
    pub fn media_type_or_default(&self) -> MediaType {
        self.media_type.unwrap_or_default()
    }

    /// Descriptor for a per-entity secondary resource.
    ///
    /// Carries the owning entity's original language so the detail
    /// request is localised the same way as its listing.
    #[must_use]
    pub fn secondary(
        endpoint: EndpointKind,
        media_type: MediaType,
        id: u64,
        original_language: Option<&str>,
    ) -> Self {
        let mut descriptor = Self::new(endpoint).media_type(media_type).id(id);
        descriptor.original_language = original_language.map(String::from);
        descriptor
    }
}
