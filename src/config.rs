use serde::Deserialize;
use std::path::PathBuf;

use crate::models::QuickGenrePolicy;

/// Placeholder shipped in sample env files; treated the same as no key at all
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Whether `key` can authenticate catalog calls at all
pub fn is_usable_credential(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key. Absence is not a startup error: every catalog call
    /// fails with a configuration error instead.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to poster, logo and profile paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Directory holding the persisted preferences
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout for catalog calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether picking a quick genre clears the advanced genre sets
    #[serde(default)]
    pub quick_genre_policy: QuickGenrePolicy,

    /// Fixed seed for reproducible discovery sessions
    #[serde(default)]
    pub discovery_seed: Option<u64>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push("reel-picker");
            path
        }
        None => PathBuf::from("./data"),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The API key, if one is set and is not the placeholder
    pub fn credential(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_usable_credential(key))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Config {
        envy::from_iter(
            vars.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(vec![]);
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.quick_genre_policy, QuickGenrePolicy::Independent);
        assert!(config.discovery_seed.is_none());
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_placeholder_key_is_not_a_credential() {
        let config = config_from(vec![("TMDB_API_KEY", PLACEHOLDER_API_KEY)]);
        assert!(config.credential().is_none());

        let config = config_from(vec![("TMDB_API_KEY", "   ")]);
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(vec![
            ("TMDB_API_KEY", "abc123"),
            ("PORT", "8080"),
            ("QUICK_GENRE_POLICY", "clears_advanced"),
            ("DISCOVERY_SEED", "42"),
        ]);
        assert_eq!(config.credential(), Some("abc123"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.quick_genre_policy, QuickGenrePolicy::ClearsAdvanced);
        assert_eq!(config.discovery_seed, Some(42));
    }
}
