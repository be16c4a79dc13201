//! TMDB API response types.
//!
//! Fields the catalogue does not always receive are `Option` or carry a
//! serde default, so one type serves both movie and TV payloads.

use serde::{Deserialize, Serialize};

use super::request::MediaType;

/// Anything addressable by a TMDB media id.
///
/// Fan-out helpers use this to tag each secondary request with the id of
/// the entity it belongs to.
pub trait MediaKey {
    /// TMDB id of the owning media entity.
    fn media_id(&self) -> u64;
}

// --- Listings ---

/// Response from listing endpoints (`discover`, `search`, `popular`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaListResult {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Entities in upstream order.
    #[serde(default)]
    pub results: Vec<MediaSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie or TV entry inside a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    /// TMDB id.
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Original movie title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original TV name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Present in `search/multi` results (`movie`, `tv`, `person`).
    #[serde(default)]
    pub media_type: Option<String>,
    /// Genre ids.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Release date (movies).
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date (TV).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

impl MediaSummary {
    /// Title for movies, name for TV, empty when neither is present.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Media type reported by `search/multi`, if it is movie or TV.
    #[must_use]
    pub fn reported_media_type(&self) -> Option<MediaType> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaType::Movie),
            Some("tv") => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl MediaKey for MediaSummary {
    fn media_id(&self) -> u64 {
        self.id
    }
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `{type}/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    /// TMDB id.
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Runtime in minutes (movies).
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Release status (e.g. "Released", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Release date (movies).
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date (TV).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Number of seasons (TV).
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    /// Number of episodes (TV).
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MediaDetail {
    /// Title for movies, name for TV, empty when neither is present.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

impl MediaKey for MediaDetail {
    fn media_id(&self) -> u64 {
        self.id
    }
}

// --- Images ---

/// One image entry (backdrop, poster, or logo).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Relative file path (e.g. `/abc.jpg`).
    pub file_path: String,
    /// Width / height.
    #[serde(default)]
    pub aspect_ratio: f64,
    /// Pixel width.
    #[serde(default)]
    pub width: u32,
    /// Pixel height.
    #[serde(default)]
    pub height: u32,
    /// Image language (ISO 639-1), `None` for textless art.
    #[serde(default)]
    pub iso_639_1: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
}

/// Response from `{type}/{id}/images`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaImages {
    /// Owning media id.
    pub id: u64,
    /// Backdrops.
    #[serde(default)]
    pub backdrops: Vec<Image>,
    /// Posters.
    #[serde(default)]
    pub posters: Vec<Image>,
    /// Title logos.
    #[serde(default)]
    pub logos: Vec<Image>,
}

impl MediaKey for MediaImages {
    fn media_id(&self) -> u64 {
        self.id
    }
}

// --- Credits ---

/// Cast entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person id.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: Option<u32>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Crew entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person id.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Department (e.g. "Directing").
    #[serde(default)]
    pub department: Option<String>,
    /// Job (e.g. "Director").
    #[serde(default)]
    pub job: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Response from `{type}/{id}/credits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    /// Owning media id.
    pub id: u64,
    /// Cast.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl MediaKey for Credits {
    fn media_id(&self) -> u64 {
        self.id
    }
}

// --- Reviews ---

/// Review author metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Account name.
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar image path.
    #[serde(default)]
    pub avatar_path: Option<String>,
    /// Author rating (0-10).
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A single review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Review id (hex string upstream).
    pub id: String,
    /// Author handle.
    pub author: String,
    /// Author metadata.
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
    /// Review body.
    #[serde(default)]
    pub content: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Permalink.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response from `{type}/{id}/reviews`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reviews {
    /// Owning media id.
    pub id: u64,
    /// Current page.
    #[serde(default)]
    pub page: u32,
    /// Reviews on this page.
    #[serde(default)]
    pub results: Vec<Review>,
    /// Total number of reviews.
    #[serde(default)]
    pub total_results: u32,
}

impl MediaKey for Reviews {
    fn media_id(&self) -> u64 {
        self.id
    }
}

// --- Genres ---

/// Response from `genre/{type}/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl GenreList {
    /// Looks up a genre name by id.
    #[must_use]
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }
}

// --- Errors ---

/// Error body returned by TMDB on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_discover_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/discover_movie.json");

        // Act
        let list: MediaListResult = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(list.page, 1);
        assert_eq!(list.results.len(), 3);
        assert_eq!(list.results[0].id, 550);
        assert_eq!(list.results[0].display_title(), "Fight Club");
        assert_eq!(list.results[1].original_language.as_deref(), Some("ja"));
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        // Act
        let detail: MediaDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(detail.id, 550);
        assert_eq!(detail.display_title(), "Fight Club");
        assert_eq!(detail.runtime, Some(139));
        assert_eq!(detail.genres[0].name, "Drama");
    }

    #[test]
    fn test_parse_images_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_images_550.json");

        // Act
        let images: MediaImages = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(images.id, 550);
        assert!(!images.backdrops.is_empty());
        assert!(!images.logos.is_empty());
        assert!(images.backdrops[0].iso_639_1.is_none());
    }

    #[test]
    fn test_parse_credits_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_credits_550.json");

        // Act
        let credits: Credits = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(credits.media_id(), 550);
        assert_eq!(credits.cast[0].name, "Edward Norton");
        assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
    }

    #[test]
    fn test_parse_reviews_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_reviews_550.json");

        // Act
        let reviews: Reviews = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(reviews.id, 550);
        assert_eq!(reviews.results.len(), 1);
        assert_eq!(reviews.results[0].author, "Goddard");
    }

    #[test]
    fn test_parse_genre_list_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        // Act
        let genres: GenreList = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(genres.name_of(28), Some("Action"));
        assert_eq!(genres.name_of(9_999), None);
    }

    #[test]
    fn test_tv_summary_uses_name() {
        // Arrange
        let json = r#"{"id":1399,"name":"Game of Thrones","media_type":"tv"}"#;

        // Act
        let summary: MediaSummary = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(summary.display_title(), "Game of Thrones");
        assert_eq!(summary.reported_media_type(), Some(MediaType::Tv));
        assert!(summary.genre_ids.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }
}
