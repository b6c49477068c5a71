//! Configuration loading for jester.
//!
//! Everything the server needs to know before it starts talking to an agent:
//! where the captioning API lives, which credentials to send, and how loud
//! the logs should be. Configuration is resolved once at process start and
//! handed to components by value; nothing downstream reads the environment.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/jester/config.toml` (system)
//! 2. `~/.config/jester/config.toml` (user)
//! 3. `./jester.toml` (local override, replaced by `--config` when given)
//! 4. Environment variables (`IMGFLIP_*`, `JESTER_*`)
//!
//! # Example Config
//!
//! ```toml
//! [imgflip]
//! api_url = "https://api.imgflip.com"
//! username = "someone"
//! # password is best left to IMGFLIP_PASSWORD
//!
//! [server]
//! name = "jester"
//!
//! [telemetry]
//! log_level = "info,jester=debug"
//! otlp_endpoint = "127.0.0.1:4317"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{ImgflipConfig, ServerConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete jester configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemeConfig {
    #[serde(default)]
    pub imgflip: ImgflipConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl MemeConfig {
    /// Load configuration with an optional explicit file, then apply env overrides.
    ///
    /// An explicit path replaces the local `./jester.toml` override. System and
    /// user configs still load first.
    pub fn load_from(config_path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from an optional path and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&std::path::Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = MemeConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Credential pair, if both halves are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.imgflip.username, &self.imgflip.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.as_str(), pass.as_str()))
            }
            _ => None,
        }
    }

    /// Render the effective configuration as TOML. The password is never printed.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# jester configuration\n\n");

        output.push_str("[imgflip]\n");
        output.push_str(&format!("api_url = \"{}\"\n", self.imgflip.api_url));
        match &self.imgflip.username {
            Some(user) => output.push_str(&format!("username = \"{}\"\n", user)),
            None => output.push_str("# username = (not set)\n"),
        }
        match &self.imgflip.password {
            Some(_) => output.push_str("password = \"********\"\n"),
            None => output.push_str("# password = (not set)\n"),
        }

        output.push_str("\n[server]\n");
        output.push_str(&format!("name = \"{}\"\n", self.server.name));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));
        match &self.telemetry.otlp_endpoint {
            Some(endpoint) => output.push_str(&format!("otlp_endpoint = \"{}\"\n", endpoint)),
            None => output.push_str("# otlp_endpoint = (disabled)\n"),
        }

        output
    }
}
