//! jester - MCP meme server library
//!
//! This library provides:
//! - `registry`: the five tool declarations and argument validation
//! - `dispatch`: tool name + JSON args → Imgflip calls → text output
//! - `prompts`: MCP prompt templates
//! - `handler`: rmcp ServerHandler implementation
//! - `stdio`: MCP stdio transport
//! - `commands`: CLI subcommands
//! - `telemetry`: stderr logging and optional OTLP export

pub mod commands;
pub mod dispatch;
pub mod handler;
pub mod prompts;
pub mod registry;
pub mod stdio;
pub mod telemetry;
