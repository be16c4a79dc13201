//! `UrlBuilder` - turns a `RequestDescriptor` into a TMDB GET URL.

use super::request::{EndpointKind, MediaType, PathLayout, RequestDescriptor, SEASON_TOKEN};

/// Default API root (no trailing slash).
pub const DEFAULT_BASE_PATH: &str = "https://api.themoviedb.org/3";

/// Hardcoded response locale.
pub const LOCALE: &str = "en";

/// Image language filter sent with `images` requests.
const IMAGE_LANGUAGE_FILTER: &str = "en,null";

/// Season substituted into season templates when none is given.
const DEFAULT_SEASON: u32 = 1;

/// One conditional query parameter.
///
/// The rule yields `Some(value)` when it applies to the descriptor.
type QueryRule = (&'static str, fn(&UrlBuilder, &RequestDescriptor) -> Option<String>);

/// Query parameter rules, in the order they are appended.
const QUERY_RULES: &[QueryRule] = &[
    ("api_key", |builder, _| Some(builder.api_key.clone())),
    ("language", |builder, _| Some(builder.locale.clone())),
    ("include_image_language", |_, d| {
        (d.endpoint == EndpointKind::Images).then(|| String::from(IMAGE_LANGUAGE_FILTER))
    }),
    ("with_original_language", |_, d| {
        let tv_listing = d.media_type == Some(MediaType::Tv) && d.id.is_none();
        if tv_listing || d.original_language.is_some() {
            Some(
                d.original_language
                    .clone()
                    .unwrap_or_else(|| String::from(LOCALE)),
            )
        } else {
            None
        }
    }),
    ("with_genres", |_, d| d.genre.clone()),
    ("with_people", |_, d| d.people.clone()),
    ("sort_by", |_, d| {
        has_filter(d).then(|| String::from("popularity.desc"))
    }),
    ("include_adult", |_, d| has_filter(d).then(|| false.to_string())),
    ("query", |_, d| {
        if d.endpoint == EndpointKind::Search {
            d.query.as_deref().map(encode_spaces)
        } else {
            None
        }
    }),
];

/// Genre or people filters switch on popularity sorting.
const fn has_filter(d: &RequestDescriptor) -> bool {
    d.genre.is_some() || d.people.is_some()
}

/// Replaces every space with the literal `%20`.
fn encode_spaces(query: &str) -> String {
    query.replace(' ', "%20")
}

/// Builds request URLs against a fixed base path and API key.
///
/// Building never fails and is deterministic: equal descriptors give
/// byte-identical URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct UrlBuilder {
    /// API root without trailing slash.
    base_path: String,
    /// API key sent as `api_key`.
    api_key: String,
    /// Response locale sent as `language`.
    locale: String,
}

impl UrlBuilder {
    /// Creates a builder. A trailing `/` on `base_path` is dropped.
    #[must_use]
    pub fn new(base_path: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        while base_path.ends_with('/') {
            base_path.pop();
        }
        Self {
            base_path,
            api_key: api_key.into(),
            locale: String::from(LOCALE),
        }
    }

    /// API root this builder targets.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Builds the full URL for `descriptor`.
    #[must_use]
    pub fn build(&self, descriptor: &RequestDescriptor) -> String {
        let mut url = self.path(descriptor);
        let query = self
            .query_params(descriptor)
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
        url
    }

    /// Evaluates the query rules for `descriptor`, in append order.
    #[must_use]
    pub fn query_params(&self, descriptor: &RequestDescriptor) -> Vec<(&'static str, String)> {
        QUERY_RULES
            .iter()
            .filter_map(|(name, rule)| rule(self, descriptor).map(|value| (*name, value)))
            .collect()
    }

    /// Builds the path part (base path included, no query string).
    #[must_use]
    pub fn path(&self, descriptor: &RequestDescriptor) -> String {
        let media_type = descriptor.media_type_or_default();
        let segment = descriptor.endpoint.segment();

        match descriptor.endpoint.layout() {
            PathLayout::Nested => format!("{}{segment}/{media_type}", self.base_path),
            PathLayout::MediaFirst => {
                let mut path = format!("{}/{media_type}", self.base_path);
                if let Some(id) = descriptor.id {
                    path.push('/');
                    path.push_str(&id.to_string());
                }
                if segment.contains(SEASON_TOKEN) {
                    let season = descriptor.season_number.unwrap_or(DEFAULT_SEASON);
                    path.push_str(&segment.replace(SEASON_TOKEN, &season.to_string()));
                } else {
                    path.push_str(segment);
                }
                path
            }
        }
    }

    /// `search/multi` URL used by the global search box.
    #[must_use]
    pub fn search_multi_url(&self, query: &str) -> String {
        format!(
            "{}/search/multi?api_key={}&query={}",
            self.base_path,
            self.api_key,
            encode_spaces(query)
        )
    }

    /// `genre/{type}/list` URL.
    #[must_use]
    pub fn genre_list_url(&self, media_type: MediaType) -> String {
        format!(
            "{}/genre/{media_type}/list?api_key={}",
            self.base_path, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("https://api.themoviedb.org/3", "KEY")
    }

    fn names(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn test_discover_nests_media_type() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Discover).media_type(MediaType::Movie);

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/discover/movie?api_key=KEY&language=en"
        );
    }

    #[test]
    fn test_discover_ignores_id() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Discover)
            .media_type(MediaType::Movie)
            .id(42);

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert!(url.contains("/discover/movie?"));
        assert!(!url.contains("/42"));
    }

    #[test]
    fn test_details_path_has_id_and_original_language() {
        // Arrange
        let descriptor =
            RequestDescriptor::secondary(EndpointKind::Details, MediaType::Movie, 550, Some("fr"));

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/movie/550?api_key=KEY&language=en&with_original_language=fr"
        );
    }

    #[test]
    fn test_images_adds_image_language_filter() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Images)
            .media_type(MediaType::Movie)
            .id(550);

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/movie/550/images?api_key=KEY&language=en&include_image_language=en,null"
        );
    }

    #[test]
    fn test_image_language_filter_only_on_images() {
        // Arrange
        let kinds = [
            EndpointKind::Discover,
            EndpointKind::Details,
            EndpointKind::Credits,
            EndpointKind::Reviews,
            EndpointKind::Search,
            EndpointKind::GenreList,
            EndpointKind::Season,
            EndpointKind::Popular,
            EndpointKind::Videos,
        ];

        // Act & Assert
        for kind in kinds {
            let descriptor = RequestDescriptor::new(kind)
                .media_type(MediaType::Movie)
                .id(1)
                .query("x");
            let url = builder().build(&descriptor);
            assert!(
                !url.contains("include_image_language"),
                "{kind:?} leaked image filter: {url}"
            );
        }
    }

    #[test]
    fn test_tv_listing_defaults_original_language() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Popular).media_type(MediaType::Tv);

        // Act
        let params = builder().query_params(&descriptor);

        // Assert
        assert!(params.contains(&("with_original_language", String::from("en"))));
    }

    #[test]
    fn test_tv_with_id_has_no_original_language() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Details)
            .media_type(MediaType::Tv)
            .id(1399);

        // Act
        let params = builder().query_params(&descriptor);

        // Assert
        assert_eq!(names(&params), vec!["api_key", "language"]);
    }

    #[test]
    fn test_genre_filter_adds_sort_and_adult_flag() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Discover)
            .media_type(MediaType::Movie)
            .genre("16");

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert!(url.ends_with(
            "&with_genres=16&sort_by=popularity.desc&include_adult=false"
        ));
    }

    #[test]
    fn test_people_filter_adds_sort_and_adult_flag() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Discover)
            .media_type(MediaType::Movie)
            .people("525");

        // Act
        let params = builder().query_params(&descriptor);

        // Assert
        assert_eq!(
            names(&params),
            vec!["api_key", "language", "with_people", "sort_by", "include_adult"]
        );
    }

    #[test]
    fn test_parameter_order_is_fixed() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Discover)
            .people("525")
            .genre("28")
            .original_language("ko")
            .media_type(MediaType::Tv);

        // Act
        let params = builder().query_params(&descriptor);

        // Assert
        assert_eq!(
            names(&params),
            vec![
                "api_key",
                "language",
                "with_original_language",
                "with_genres",
                "with_people",
                "sort_by",
                "include_adult",
            ]
        );
    }

    #[test]
    fn test_search_query_replaces_every_space() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Search)
            .media_type(MediaType::Movie)
            .query("the dark knight");

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/movie/search?api_key=KEY&language=en&query=the%20dark%20knight"
        );
    }

    #[test]
    fn test_only_discover_nests_media_type() {
        // Arrange
        let search = RequestDescriptor::new(EndpointKind::Search)
            .media_type(MediaType::Tv)
            .query("a b");
        let genres = RequestDescriptor::new(EndpointKind::GenreList).media_type(MediaType::Movie);
        let discover = RequestDescriptor::new(EndpointKind::Discover).media_type(MediaType::Tv);

        // Act & Assert
        assert_eq!(
            builder().build(&search),
            "https://api.themoviedb.org/3/tv/search?api_key=KEY&language=en&with_original_language=en&query=a%20b"
        );
        assert_eq!(
            builder().path(&genres),
            "https://api.themoviedb.org/3/movie/genre"
        );
        assert_eq!(
            builder().path(&discover),
            "https://api.themoviedb.org/3/discover/tv"
        );
    }

    #[test]
    fn test_query_ignored_outside_search() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Popular)
            .media_type(MediaType::Movie)
            .query("ignored");

        // Act
        let url = builder().build(&descriptor);

        // Assert
        assert!(!url.contains("query="));
    }

    #[test]
    fn test_season_template_defaults_to_one() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Season)
            .media_type(MediaType::Tv)
            .id(1399);

        // Act
        let path = builder().path(&descriptor);

        // Assert
        assert_eq!(path, "https://api.themoviedb.org/3/tv/1399/season/1");
    }

    #[test]
    fn test_season_template_uses_given_season() {
        // Arrange
        let descriptor = RequestDescriptor::new(EndpointKind::Season)
            .media_type(MediaType::Tv)
            .id(1399)
            .season_number(3);

        // Act
        let path = builder().path(&descriptor);

        // Assert
        assert_eq!(path, "https://api.themoviedb.org/3/tv/1399/season/3");
    }

    #[test]
    fn test_original_country_does_not_change_url() {
        // Arrange
        let plain = RequestDescriptor::new(EndpointKind::Discover).media_type(MediaType::Movie);
        let with_country = plain.clone().original_country("KR");

        // Act & Assert
        assert_eq!(builder().build(&plain), builder().build(&with_country));
    }

    #[test]
    fn test_equal_descriptors_build_identical_urls() {
        // Arrange
        let a = RequestDescriptor::new(EndpointKind::Discover)
            .media_type(MediaType::Tv)
            .genre("16")
            .people("1");
        let b = RequestDescriptor::new(EndpointKind::Discover)
            .people("1")
            .genre("16")
            .media_type(MediaType::Tv);

        // Act & Assert
        assert_eq!(builder().build(&a), builder().build(&b));
        assert_eq!(builder().build(&a), builder().build(&a));
    }

    #[test]
    fn test_genre_list_url() {
        // Arrange & Act
        let url = builder().genre_list_url(MediaType::Tv);

        // Assert
        assert_eq!(url, "https://api.themoviedb.org/3/genre/tv/list?api_key=KEY");
    }

    #[test]
    fn test_search_multi_url() {
        // Arrange & Act
        let url = builder().search_multi_url("spider man");

        // Assert
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/multi?api_key=KEY&query=spider%20man"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        // Arrange
        let builder = UrlBuilder::new("http://localhost:8080/3/", "KEY");

        // Act & Assert
        assert_eq!(builder.base_path(), "http://localhost:8080/3");
    }
}
