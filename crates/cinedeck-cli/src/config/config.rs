//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinedeck_query::{DEFAULT_HERO_ID, FavoriteEntry, FavoriteTable};
use serde::{Deserialize, Serialize};

/// Environment variable holding the TMDB API key.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Movie shown in the hero banner.
    #[serde(default = "default_hero_id")]
    pub hero_id: u64,
    /// TMDB connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Curated favorites, in display order. Empty selects the built-in list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favorites: Vec<FavoriteEntry>,
}

/// TMDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// User-Agent override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Minimum gap between requests in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interval_ms: Option<u64>,
    /// API key, used when `TMDB_API_KEY` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

const fn default_hero_id() -> u64 {
    DEFAULT_HERO_ID
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hero_id: DEFAULT_HERO_ID,
            api: ApiConfig::default(),
            favorites: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Configured minimum request interval.
    #[must_use]
    pub fn min_interval(&self) -> Option<Duration> {
        self.min_interval_ms.map(Duration::from_millis)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Favorites table with the configured hero.
    #[must_use]
    pub fn favorite_table(&self) -> FavoriteTable {
        if self.favorites.is_empty() {
            let builtin = FavoriteTable::builtin();
            return FavoriteTable::new(builtin.entries().to_vec(), self.hero_id);
        }
        FavoriteTable::new(self.favorites.clone(), self.hero_id)
    }
}

/// Picks the API key: a non-empty environment value wins over the config.
///
/// # Errors
///
/// Returns an error if neither source provides a key.
pub fn resolve_api_key(env_value: Option<String>, config: &ApiConfig) -> Result<String> {
    env_value
        .filter(|key| !key.is_empty())
        .or_else(|| config.api_key.clone().filter(|key| !key.is_empty()))
        .with_context(|| format!("{API_KEY_ENV} environment variable or [api] api_key is required"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use cinedeck_query::LogoPosition;

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.hero_id, 324_857);
        assert!(config.favorites.is_empty());
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        // Arrange
        let toml_str = r#"
hero_id = 550

[api]
base_url = "http://localhost:8080/3"
min_interval_ms = 0

[[favorites]]
id = 129
title = "Spirited Away"
transform = [-10.0, 5.0]
logo_width = 300

[favorites.position]
bottom = "10%"
left = "5%"

[[favorites]]
id = 550
title = "Fight Club"
"#;

        // Act
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.hero_id, 550);
        assert_eq!(config.api.min_interval(), Some(Duration::ZERO));
        assert_eq!(config.favorites.len(), 2);
        assert_eq!(config.favorites[0].position.bottom.as_deref(), Some("10%"));
        assert_eq!(config.favorites[0].logo_width, Some(300));
        assert_eq!(config.favorites[1].position, LogoPosition::default());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            hero_id: 13,
            api: ApiConfig {
                user_agent: Some(String::from("cinedeck-test/1.0")),
                ..ApiConfig::default()
            },
            favorites: vec![FavoriteEntry::new(13, "Forrest Gump")],
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hero_id = \"not a number\"").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_empty_favorites_use_builtin_with_configured_hero() {
        // Arrange
        let config = AppConfig {
            hero_id: 550,
            ..AppConfig::default()
        };

        // Act
        let table = config.favorite_table();

        // Assert
        assert_eq!(table.hero_id(), 550);
        assert_eq!(table.len(), FavoriteTable::builtin().len());
    }

    #[test]
    fn test_env_api_key_wins() {
        // Arrange
        let config = ApiConfig {
            api_key: Some(String::from("from-config")),
            ..ApiConfig::default()
        };

        // Act & Assert
        assert_eq!(
            resolve_api_key(Some(String::from("from-env")), &config).unwrap(),
            "from-env"
        );
        assert_eq!(
            resolve_api_key(Some(String::new()), &config).unwrap(),
            "from-config"
        );
        assert!(resolve_api_key(None, &ApiConfig::default()).is_err());
    }
}
