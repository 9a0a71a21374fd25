//! Backend location and URL building.

use serde::{Deserialize, Serialize};

/// API origin used when none is configured at build time.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Where the segmentation/texture backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API origin, without a trailing slash.
    pub api_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ClientConfig {
    /// Create a config for the given API origin.
    ///
    /// Trailing slashes are dropped so paths can be appended directly.
    #[must_use]
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Config from the `RETEXTURE_API_BASE` build-time environment
    /// variable, falling back to [`DEFAULT_API_BASE`].
    #[must_use]
    pub fn from_build_env() -> Self {
        option_env!("RETEXTURE_API_BASE")
            .filter(|s| !s.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// Absolute URL of an API endpoint such as `/api/segment`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Absolute URL of a server-relative asset path.
    ///
    /// Already-absolute `http(s)://` URLs and `data:` URLs pass through
    /// unchanged; an empty path yields an empty string.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            return String::new();
        }
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
        {
            return path.to_owned();
        }
        self.endpoint(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        assert_eq!(ClientConfig::default().api_base, "http://localhost:5000");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ClientConfig::new("https://api.example.com//");
        assert_eq!(config.endpoint("/api/segment"), "https://api.example.com/api/segment");
    }

    #[test]
    fn asset_paths_lose_leading_slashes() {
        let config = ClientConfig::default();
        assert_eq!(
            config.asset_url("//static/textures/oak.png"),
            "http://localhost:5000/static/textures/oak.png"
        );
        assert_eq!(
            config.asset_url("static/oak.png"),
            "http://localhost:5000/static/oak.png"
        );
    }

    #[test]
    fn absolute_and_data_urls_pass_through() {
        let config = ClientConfig::default();
        assert_eq!(config.asset_url("https://cdn/x.png"), "https://cdn/x.png");
        assert_eq!(
            config.asset_url("data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn empty_asset_path_is_empty() {
        assert_eq!(ClientConfig::default().asset_url("  "), "");
    }
}
