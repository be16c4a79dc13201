//! View-model helpers: image URLs, carousel paging and hero art.

use cinedeck_api::tmdb::{Image, MediaImages};

/// TMDB image CDN root.
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Size used when none is requested.
const ORIGINAL_SIZE: &str = "original";

/// Default number of tiles per carousel page.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Full CDN URL for a TMDB image path.
///
/// `size` is a TMDB size bucket such as `w500`; `None` selects the
/// original upload.
#[must_use]
pub fn image_url(file_path: &str, size: Option<&str>) -> String {
    let size = size.unwrap_or(ORIGINAL_SIZE);
    let path = file_path.trim_start_matches('/');
    format!("{IMAGE_BASE}/{size}/{path}")
}

/// Fixed-size pages over a list of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    total: usize,
    per_page: usize,
}

impl Carousel {
    /// Carousel over `total` tiles with the default page size.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self::with_page_size(total, DEFAULT_PAGE_SIZE)
    }

    /// Carousel over `total` tiles, `per_page` at a time (at least 1).
    #[must_use]
    pub const fn with_page_size(total: usize, per_page: usize) -> Self {
        let per_page = if per_page == 0 { 1 } else { per_page };
        Self { total, per_page }
    }

    /// Tiles per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Last page index reachable by [`Self::next_index`].
    ///
    /// Only whole pages count; a trailing partial page is never shown.
    #[must_use]
    pub const fn max_index(&self) -> usize {
        let pages = match self.total.checked_div(self.per_page) {
            Some(pages) => pages,
            None => 0,
        };
        pages.saturating_sub(1)
    }

    /// Page after `index`, wrapping back to `0` after the last page.
    #[must_use]
    pub const fn next_index(&self, index: usize) -> usize {
        if index >= self.max_index() {
            0
        } else {
            index.saturating_add(1)
        }
    }

    /// Tile index range of page `index`, clamped to `total`.
    #[must_use]
    pub fn page_range(&self, index: usize) -> std::ops::Range<usize> {
        let start = index.saturating_mul(self.per_page).min(self.total);
        let end = start.saturating_add(self.per_page).min(self.total);
        start..end
    }

    /// Tiles of page `index`.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], index: usize) -> &'a [T] {
        items.get(self.page_range(index)).unwrap_or_default()
    }
}

/// Key art for a banner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroArt {
    /// First backdrop.
    pub backdrop: Option<Image>,
    /// First poster.
    pub poster: Option<Image>,
    /// First logo.
    pub logo: Option<Image>,
}

impl HeroArt {
    /// Picks the first backdrop, poster and logo of an image set.
    #[must_use]
    pub fn from_images(images: &MediaImages) -> Self {
        Self {
            backdrop: images.backdrops.first().cloned(),
            poster: images.posters.first().cloned(),
            logo: images.logos.first().cloned(),
        }
    }

    /// Tile background: backdrop, else poster.
    #[must_use]
    pub fn tile_image(&self) -> Option<&Image> {
        self.backdrop.as_ref().or(self.poster.as_ref())
    }

    /// CDN URL of the tile background at `size`.
    #[must_use]
    pub fn tile_url(&self, size: Option<&str>) -> Option<String> {
        self.tile_image().map(|image| image_url(&image.file_path, size))
    }

    /// CDN URL of the logo at `size`.
    #[must_use]
    pub fn logo_url(&self, size: Option<&str>) -> Option<String> {
        self.logo
            .as_ref()
            .map(|image| image_url(&image.file_path, size))
    }
}
