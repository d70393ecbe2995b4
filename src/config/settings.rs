//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the fusia client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User agent presented on every request; the web surface expects a mobile
/// browser string
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; U; Android 2.2; en-gb; GT-P1000 Build/FROYO) \
     AppleWebKit/533.1 (KHTML, like Gecko) Version/4.0 Mobile Safari/533.1";

const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

const DEFAULT_LOCALE: &str = "en-US,en-SG;q=0.9,en;q=0.8";

/// Main configuration settings for the fusia client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Account credentials
    pub credentials: CredentialSettings,
    /// HTTP transport configuration
    pub http: HttpSettings,
    /// Cookie persistence configuration
    pub cookies: CookieSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Account credentials used by the login flow
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CredentialSettings {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Base URL of the web surface
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Accept-Language header value
    pub locale: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Cookie persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Path of the durable cookie file; created empty when absent
    pub path: PathBuf,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("cookies.json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for the given account, everything else defaulted
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        let mut settings = Self::default();
        settings.credentials.username = username.into();
        settings.credentials.password = password.into();
        settings
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Invalid config file: {}", e)))
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(username) = std::env::var("FUSIA_USERNAME") {
            self.credentials.username = username;
        }

        if let Ok(password) = std::env::var("FUSIA_PASSWORD") {
            self.credentials.password = password;
        }

        if let Ok(base_url) = std::env::var("FUSIA_BASE_URL") {
            self.http.base_url = base_url;
        }

        if let Ok(path) = std::env::var("FUSIA_COOKIE_FILE") {
            self.cookies.path = PathBuf::from(path);
        }

        if let Ok(timeout) = std::env::var("FUSIA_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid timeout: {}", e)))?;
            self.http.timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.credentials.username.is_empty() {
            return Err(crate::Error::config("username must not be empty"));
        }

        url::Url::parse(&self.http.base_url)
            .map_err(|e| crate::Error::config(format!("Invalid base URL: {}", e)))?;

        Ok(())
    }
}
