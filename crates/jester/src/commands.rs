//! CLI command implementations

use anyhow::{bail, Context, Result};
use imgflip::{Credentials, ImgflipClient};
use memeconf::{ConfigSources, MemeConfig};
use serde_json::Value;

use crate::dispatch::Dispatcher;
use crate::handler::MemeHandler;
use crate::registry;

/// Build the dispatcher from resolved config. Credentials are read here once.
pub fn dispatcher_from_config(config: &MemeConfig) -> Dispatcher {
    let credentials = config
        .credentials()
        .and_then(|(user, pass)| Credentials::new(user, pass));
    Dispatcher::new(ImgflipClient::new(&config.imgflip.api_url, credentials))
}

pub fn handler_from_config(config: &MemeConfig) -> MemeHandler {
    MemeHandler::new(dispatcher_from_config(config), config.server.name.clone())
}

/// Print every tool with its input schema.
pub fn tools() -> Result<()> {
    for op in registry::operations() {
        println!("{}", op.name);
        println!("  {}", op.description);
        let schema = serde_json::to_string_pretty(&op.input_schema())?;
        for line in schema.lines() {
            println!("  {}", line);
        }
        println!();
    }
    Ok(())
}

/// Dispatch a single tool call and print its text output.
pub async fn call(config: &MemeConfig, tool: &str, json: Option<&str>) -> Result<()> {
    let args: Value = match json {
        Some(raw) => serde_json::from_str(raw).context("Failed to parse arguments as JSON")?,
        None => Value::Null,
    };

    let output = dispatcher_from_config(config).dispatch(tool, args).await;
    if output.is_error {
        bail!("{}", output.text);
    }
    println!("{}", output.text);
    Ok(())
}

/// Show the effective config and where it came from.
pub fn show_config(config: &MemeConfig, sources: &ConfigSources) {
    if sources.files.is_empty() {
        println!("# no config files loaded, using defaults");
    } else {
        for path in &sources.files {
            println!("# loaded: {}", path.display());
        }
    }
    for var in &sources.env_overrides {
        println!("# env override: {}", var);
    }
    println!();
    print!("{}", config.to_toml());
}
