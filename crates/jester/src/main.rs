//! jester - MCP meme server over the Imgflip API
//!
//! Subcommands:
//! - `jester mcp` - Serve MCP over stdio
//! - `jester tools` - List tools and their schemas
//! - `jester call <tool> [json]` - Run one tool call and print the result
//! - `jester config` - Show effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memeconf::MemeConfig;

use jester::{commands, stdio, telemetry};

#[derive(Parser)]
#[command(name = "jester")]
#[command(about = "MCP meme server for the Imgflip captioning API")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./jester.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout
    Mcp,

    /// List available tools with their input schemas
    Tools,

    /// Dispatch one tool call locally
    Call {
        /// Tool name (e.g., imgflip_search_memes)
        tool: String,

        /// JSON arguments object
        json: Option<String>,
    },

    /// Print the effective configuration and its sources
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = MemeConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    telemetry::init(
        &config.telemetry.log_level,
        config.telemetry.otlp_endpoint.as_deref(),
    )?;

    match cli.command {
        Commands::Mcp => {
            stdio::run(commands::handler_from_config(&config)).await?;
        }
        Commands::Tools => {
            commands::tools()?;
        }
        Commands::Call { tool, json } => {
            commands::call(&config, &tool, json.as_deref()).await?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}
