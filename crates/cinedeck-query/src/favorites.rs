//! Curated favorites table.

use std::collections::HashMap;

use cinedeck_api::tmdb::MediaKey;
use serde::{Deserialize, Serialize};

/// Movie shown in the hero banner when none is configured
/// (Spider-Man: Into the Spider-Verse).
pub const DEFAULT_HERO_ID: u64 = 324_857;

/// Logo placement offsets inside a showcase tile (CSS lengths).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoPosition {
    /// Offset from the top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Offset from the right edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    /// Offset from the bottom edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    /// Offset from the left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

/// One curated favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// TMDB movie id.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Logo placement.
    #[serde(default)]
    pub position: LogoPosition,
    /// Logo translation `(x, y)` in percent.
    #[serde(default)]
    pub transform: (f64, f64),
    /// Logo width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_width: Option<u32>,
}

impl FavoriteEntry {
    /// Entry with default placement.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            position: LogoPosition::default(),
            transform: (0.0, 0.0),
            logo_width: None,
        }
    }
}

impl MediaKey for FavoriteEntry {
    fn media_id(&self) -> u64 {
        self.id
    }
}

/// Immutable, ordered favorites lookup.
///
/// Lookups of unknown ids return `None`. Duplicate ids keep their first
/// entry.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoriteTable {
    entries: Vec<FavoriteEntry>,
    by_id: HashMap<u64, usize>,
    hero_id: u64,
}

impl Default for FavoriteTable {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_HERO_ID)
    }
}

impl FavoriteTable {
    /// Builds the table, keeping entry order.
    #[must_use]
    pub fn new(entries: Vec<FavoriteEntry>, hero_id: u64) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            if by_id.contains_key(&entry.id) {
                tracing::warn!(id = entry.id, title = %entry.title, "duplicate favorite ignored");
                continue;
            }
            by_id.insert(entry.id, kept.len());
            kept.push(entry);
        }
        Self {
            entries: kept,
            by_id,
            hero_id,
        }
    }

    /// Table shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            vec![
                FavoriteEntry::new(324_857, "Spider-Man: Into the Spider-Verse"),
                FavoriteEntry::new(550, "Fight Club"),
                FavoriteEntry::new(129, "Spirited Away"),
                FavoriteEntry::new(680, "Pulp Fiction"),
                FavoriteEntry::new(155, "The Dark Knight"),
                FavoriteEntry::new(13, "Forrest Gump"),
            ],
            DEFAULT_HERO_ID,
        )
    }

    /// Entry for `id`.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&FavoriteEntry> {
        self.by_id.get(&id).and_then(|&index| self.entries.get(index))
    }

    /// Ids in configured order.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Entries in configured order.
    #[must_use]
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    /// Hero banner movie id.
    #[must_use]
    pub const fn hero_id(&self) -> u64 {
        self.hero_id
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no favorite is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
