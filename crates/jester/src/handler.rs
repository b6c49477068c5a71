//! MCP handler - bridges rmcp's ServerHandler to the dispatcher
//!
//! Tool listings come straight from the registry and prompt listings from
//! the prompt registry; neither changes after startup. Tool failures are
//! returned as `is_error` results rather than protocol errors.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        Implementation, ListPromptsResult, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, ToolOutput};
use crate::prompts::{args_to_hashmap, PromptRegistry};
use crate::registry;

const INSTRUCTIONS: &str = "Jester MCP server - create memes with the Imgflip captioning API. \
     Search templates with imgflip_search_memes, check how many text boxes a template needs \
     with imgflip_get_template_info, then render with imgflip_create_meme. \
     Search, template info and meme creation need IMGFLIP_USERNAME and IMGFLIP_PASSWORD.";

/// MCP handler serving the meme tools.
#[derive(Debug, Clone)]
pub struct MemeHandler {
    dispatcher: Arc<Dispatcher>,
    server_name: String,
}

impl MemeHandler {
    pub fn new(dispatcher: Dispatcher, server_name: impl Into<String>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            server_name: server_name.into(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registry entries rendered as rmcp tools.
    pub fn tools() -> Vec<Tool> {
        registry::operations()
            .iter()
            .map(|op| {
                let schema = match op.input_schema() {
                    Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(op.name, op.description, Arc::new(schema))
            })
            .collect()
    }
}

impl From<ToolOutput> for CallToolResult {
    fn from(output: ToolOutput) -> Self {
        let content = vec![Content::text(output.text)];
        if output.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl ServerHandler for MemeHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        std::future::ready(Ok(ListToolsResult::with_all_items(Self::tools())))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.as_ref();
        let args = request
            .arguments
            .map(Value::Object)
            .unwrap_or(Value::Null);

        info!(tool = %name, "Tool call");
        let output = self.dispatcher.dispatch(name, args).await;
        Ok(output.into())
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult::with_all_items(PromptRegistry::list())))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        let args = args_to_hashmap(request.arguments.as_ref());
        std::future::ready(PromptRegistry::get(&request.name, &args))
    }
}
