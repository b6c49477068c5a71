//! Config sections. All of these are fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Remote captioning API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ImgflipConfig {
    /// Base URL of the Imgflip API.
    /// Default: https://api.imgflip.com
    #[serde(default = "ImgflipConfig::default_api_url")]
    pub api_url: String,

    /// Account name for premium endpoints (search, get_meme, caption_image).
    #[serde(default)]
    pub username: Option<String>,

    /// Account password. Prefer IMGFLIP_PASSWORD over writing it to disk.
    #[serde(default)]
    pub password: Option<String>,
}

impl ImgflipConfig {
    fn default_api_url() -> String {
        "https://api.imgflip.com".to_string()
    }
}

impl Default for ImgflipConfig {
    fn default() -> Self {
        Self {
            api_url: Self::default_api_url(),
            username: None,
            password: None,
        }
    }
}

impl std::fmt::Debug for ImgflipConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgflipConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// MCP server identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported to agents during initialization.
    /// Default: jester
    #[serde(default = "ServerConfig::default_name")]
    pub name: String,
}

impl ServerConfig {
    fn default_name() -> String {
        "jester".to_string()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
        }
    }
}

/// Logging and trace export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// EnvFilter directive string.
    /// Default: info,jester=debug
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,

    /// OTLP gRPC endpoint. Trace export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info,jester=debug".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            otlp_endpoint: None,
        }
    }
}
