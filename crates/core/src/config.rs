use crate::ConfigError;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Process-wide backend settings. The API key is only ever sent with search requests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_key: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ConfigError> {
        // Url::join drops the last path segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let parsed = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path_prefix() -> Result<(), Box<dyn std::error::Error>> {
        let config = ClientConfig::new("https://search.example.com/api/v1", None)?;
        assert_eq!(
            config.endpoint("search")?.as_str(),
            "https://search.example.com/api/v1/search"
        );

        let config = ClientConfig::new("https://search.example.com/api/v1/", None)?;
        assert_eq!(
            config.endpoint("feedback")?.as_str(),
            "https://search.example.com/api/v1/feedback"
        );
        Ok(())
    }

    #[test]
    fn default_points_at_local_backend() -> Result<(), Box<dyn std::error::Error>> {
        let config = ClientConfig::new(DEFAULT_API_URL, None)?;
        assert_eq!(config.endpoint("search")?.as_str(), "http://localhost:8000/search");
        assert_eq!(config.api_key(), None);
        Ok(())
    }

    #[test]
    fn empty_api_key_is_treated_as_absent() -> Result<(), ConfigError> {
        let config = ClientConfig::new(DEFAULT_API_URL, Some(String::new()))?;
        assert_eq!(config.api_key(), None);
        Ok(())
    }

    #[test]
    fn rejects_unparsable_url() {
        assert!(matches!(
            ClientConfig::new("not a url", None),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
