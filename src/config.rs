use crate::error::{MondoError, Result};
use crate::mondo::Credentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const CONFIG_DIR_PREFIX: &str = "mondo-client";
pub const DEFAULT_API_BASE_URL: &str = "https://api.getmondo.co.uk";

/// Credential store backed by `config.toml` in the XDG config directory.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Settings for the HTTP transport, passed explicitly to its constructor.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            user_agent: format!("mondo-client/{}", env!("CARGO_PKG_VERSION")),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(MondoError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| MondoError::Config(format!("Failed to parse config: {}", e)))?;

        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(MondoError::Config(
                "client_id and client_secret must be set in config file".to_string(),
            ));
        }

        if config.username.is_empty() || config.password.is_empty() {
            return Err(MondoError::Config(
                "username and password must be set in config file".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.client_id,
            &self.client_secret,
            &self.username,
            &self.password,
        )
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut client_config = ClientConfig::default();
        if let Some(base_url) = &self.base_url {
            client_config.base_url = Url::parse(base_url)
                .map_err(|e| MondoError::Config(format!("Invalid base_url {base_url:?}: {e}")))?;
        }
        Ok(client_config)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
            .place_config_file("config.toml")
            .map_err(|e| MondoError::Config(format!("Failed to create config directory: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
client_id = "oauthclient_123"
client_secret = "secret"
username = "johnny@example.com"
password = "passw0rd"
"#;

    #[test]
    fn test_config_serialization() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = Config::from_toml_str(&serialized).unwrap();

        assert_eq!(config.client_id, deserialized.client_id);
        assert_eq!(config.username, deserialized.username);
        assert!(deserialized.base_url.is_none());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let contents = r#"
client_id = "oauthclient_123"
client_secret = "secret"
username = ""
password = "passw0rd"
"#;
        let err = Config::from_toml_str(contents).unwrap_err();
        assert!(matches!(err, MondoError::Config(_)));
    }

    #[test]
    fn test_base_url_override() {
        let contents = format!("{SAMPLE}base_url = \"http://localhost:8080\"\n");
        let config = Config::from_toml_str(&contents).unwrap();

        let client_config = config.client_config().unwrap();
        assert_eq!(client_config.base_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_default_base_url() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let client_config = config.client_config().unwrap();
        assert_eq!(client_config.base_url.as_str(), "https://api.getmondo.co.uk/");
    }

    #[test]
    fn test_invalid_base_url() {
        let contents = format!("{SAMPLE}base_url = \"not a url\"\n");
        let config = Config::from_toml_str(&contents).unwrap();
        assert!(matches!(config.client_config(), Err(MondoError::Config(_))));
    }
}
