//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, MemeConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/jester/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("jester/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("jester.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and layer its values over `config`.
pub fn apply_file(config: &mut MemeConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Layer values from a TOML string over `config`. Keys absent from the
/// document leave the existing value alone.
fn apply_toml(config: &mut MemeConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(imgflip) = table.get("imgflip").and_then(|v| v.as_table()) {
        if let Some(v) = imgflip.get("api_url").and_then(|v| v.as_str()) {
            config.imgflip.api_url = v.to_string();
        }
        if let Some(v) = imgflip.get("username").and_then(|v| v.as_str()) {
            config.imgflip.username = verbatim(v);
        }
        if let Some(v) = imgflip.get("password").and_then(|v| v.as_str()) {
            config.imgflip.password = verbatim(v);
        }
    }

    if let Some(server) = table.get("server").and_then(|v| v.as_table()) {
        if let Some(v) = server.get("name").and_then(|v| v.as_str()) {
            config.server.name = v.to_string();
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level").and_then(|v| v.as_str()) {
            config.telemetry.log_level = v.to_string();
        }
        if let Some(v) = telemetry.get("otlp_endpoint").and_then(|v| v.as_str()) {
            config.telemetry.otlp_endpoint = non_empty(v);
        }
    }

    Ok(())
}

/// Apply environment variable overrides to config.
///
/// Empty variables are treated as unset so that `IMGFLIP_PASSWORD=` does not
/// masquerade as a credential. Credentials are otherwise passed through
/// byte for byte.
pub fn apply_env_overrides(config: &mut MemeConfig, sources: &mut ConfigSources) {
    if let Some(v) = env_verbatim("IMGFLIP_USERNAME") {
        config.imgflip.username = Some(v);
        sources.env_overrides.push("IMGFLIP_USERNAME".to_string());
    }
    if let Some(v) = env_verbatim("IMGFLIP_PASSWORD") {
        config.imgflip.password = Some(v);
        sources.env_overrides.push("IMGFLIP_PASSWORD".to_string());
    }
    if let Some(v) = env_non_empty("IMGFLIP_API_URL") {
        config.imgflip.api_url = v;
        sources.env_overrides.push("IMGFLIP_API_URL".to_string());
    }

    if let Some(v) = env_non_empty("JESTER_SERVER_NAME") {
        config.server.name = v;
        sources.env_overrides.push("JESTER_SERVER_NAME".to_string());
    }

    if let Some(v) = env_non_empty("JESTER_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("JESTER_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over the jester-specific knob
    if let Some(v) = env_non_empty("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    if let Some(v) = env_non_empty("JESTER_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = Some(v);
        sources.env_overrides.push("JESTER_OTLP_ENDPOINT".to_string());
    }
    if let Some(v) = env_non_empty("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = Some(v);
        sources.env_overrides.push("OTEL_EXPORTER_OTLP_ENDPOINT".to_string());
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| non_empty(&v))
}

fn env_verbatim(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| verbatim(&v))
}

/// Whitespace-only is absent; anything else is kept untrimmed.
fn verbatim(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
