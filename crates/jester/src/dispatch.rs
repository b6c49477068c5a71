//! Tool dispatch - JSON arguments in, agent-readable text out
//!
//! Every call goes through the same steps: look the tool up in the registry,
//! validate and default its arguments, deserialize into a typed argument
//! struct, then run the handler. Handlers never fail: remote errors are folded
//! into a [`ToolOutput`] marked as an error so the agent's session survives.

use imgflip::{CaptionBox, Font, ImgflipClient, MemeTemplate, NsfwFlag};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::prompts::search_terms_prompt;
use crate::registry;

/// Note attached when search falls back to the popular template list.
pub const FALLBACK_MESSAGE: &str = "Search failed, showing popular templates instead";

/// Box count assumed when a template doesn't report one.
const DEFAULT_BOX_COUNT: usize = 2;

/// Failures that happen before any handler runs.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

/// Text result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl From<DispatchError> for ToolOutput {
    fn from(err: DispatchError) -> Self {
        ToolOutput::error(err.to_string())
    }
}

// ============================================================================
// Argument structs
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchMemesArgs {
    query: String,
    include_nsfw: bool,
}

#[derive(Debug, Deserialize)]
struct TemplateInfoArgs {
    template_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateMemeArgs {
    template_id: String,
    text_boxes: Vec<String>,
    font: Font,
    max_font_size: String,
}

#[derive(Debug, Deserialize)]
struct SearchTermsArgs {
    description: String,
}

#[derive(Debug, Deserialize)]
struct CreateFromConceptArgs {
    concept: String,
    // Accepted for schema compatibility; concept handling never searches.
    #[allow(dead_code)]
    include_nsfw: bool,
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes tool calls to handlers. Holds no mutable state; clone freely.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: ImgflipClient,
}

impl Dispatcher {
    pub fn new(client: ImgflipClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ImgflipClient {
        &self.client
    }

    /// Run one tool call to completion.
    #[instrument(skip(self, args), fields(tool = %name))]
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolOutput {
        match self.route(name, args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Rejected tool call");
                e.into()
            }
        }
    }

    async fn route(&self, name: &str, args: Value) -> Result<ToolOutput, DispatchError> {
        let op = registry::find(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        let args = op
            .normalize(args)
            .map_err(|message| DispatchError::InvalidArguments {
                tool: name.to_string(),
                message,
            })?;

        debug!(?args, "Normalized arguments");

        let output = match op.name {
            registry::SEARCH_MEMES => self.search_memes(parse(name, args)?).await,
            registry::GET_TEMPLATE_INFO => self.template_info(parse(name, args)?).await,
            registry::CREATE_MEME => self.create_meme(parse(name, args)?).await,
            registry::GENERATE_SEARCH_TERMS => {
                let p: SearchTermsArgs = parse(name, args)?;
                ToolOutput::success(search_terms_prompt(&p.description))
            }
            registry::CREATE_FROM_CONCEPT => {
                let p: CreateFromConceptArgs = parse(name, args)?;
                ToolOutput::success(search_terms_prompt(&p.concept))
            }
            other => return Err(DispatchError::UnknownOperation(other.to_string())),
        };

        Ok(output)
    }

    async fn search_memes(&self, args: SearchMemesArgs) -> ToolOutput {
        let nsfw = NsfwFlag::from(args.include_nsfw);

        let search_err = match self.client.search_templates(&args.query, nsfw).await {
            Ok(memes) => return ToolOutput::success(memes_json(&memes, None)),
            Err(e) => e,
        };

        info!(error = %search_err, "Search failed, falling back to popular templates");
        match self.client.list_templates().await {
            Ok(memes) => ToolOutput::success(memes_json(&memes, Some(FALLBACK_MESSAGE))),
            Err(fallback_err) => {
                debug!(error = %fallback_err, "Fallback listing failed too");
                ToolOutput::error(format!("Error searching memes: {}", search_err))
            }
        }
    }

    async fn template_info(&self, args: TemplateInfoArgs) -> ToolOutput {
        match self.client.get_template(&args.template_id).await {
            Ok(template) => {
                // Includes remote fields the client does not model
                let pretty = serde_json::to_string_pretty(&template).unwrap_or_default();
                let count = template.box_count.unwrap_or(0);
                ToolOutput::success(format!(
                    "Template Information:\n{}\n\n{}",
                    pretty,
                    box_guidance(count)
                ))
            }
            Err(e) => ToolOutput::error(format!("Error getting template info: {}", e)),
        }
    }

    async fn create_meme(&self, args: CreateMemeArgs) -> ToolOutput {
        let template = self.client.get_template(&args.template_id).await;

        let texts = match &template {
            Ok(t) => {
                let required = t
                    .box_count
                    .map(|n| n as usize)
                    .unwrap_or(DEFAULT_BOX_COUNT);
                reconcile_boxes(args.text_boxes, required)
            }
            Err(e) => {
                debug!(error = %e, "Template lookup failed, submitting boxes as given");
                args.text_boxes
            }
        };

        let boxes: Vec<CaptionBox> = texts.iter().map(CaptionBox::text).collect();

        let image = match self
            .client
            .caption_image(&args.template_id, &boxes, args.font, &args.max_font_size)
            .await
        {
            Ok(image) => image,
            Err(e) => return ToolOutput::error(format!("Error creating meme: {}", e)),
        };

        info!(url = %image.url, "Meme created");

        let mut text = String::from("Meme created successfully!\n\n");
        if let Ok(t) = &template {
            text.push_str(&format!("Template: {}\n", t.name));
        }
        text.push_str("\nText boxes:\n");
        for (i, line) in texts.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, line));
        }
        text.push_str(&format!(
            "\nDirect image URL: {}\nPage URL: {}\n\n",
            image.url,
            image.page_url.as_deref().unwrap_or_default()
        ));
        text.push_str(
            "To view the meme, please open the URL in your browser or display it using HTML with an img tag.",
        );

        ToolOutput::success(text)
    }
}

fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, DispatchError> {
    serde_json::from_value(args).map_err(|e| DispatchError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Pad with empty strings or drop trailing entries so exactly `required` remain.
pub fn reconcile_boxes(mut texts: Vec<String>, required: usize) -> Vec<String> {
    let provided = texts.len();
    if provided < required {
        warn!(
            required,
            provided, "Template needs more text boxes than provided; padding with empty boxes"
        );
        texts.resize(required, String::new());
    } else if provided > required {
        warn!(
            required,
            provided, "Template supports fewer text boxes than provided; extra boxes ignored"
        );
        texts.truncate(required);
    }
    texts
}

/// Human guidance appended to template info.
pub fn box_guidance(count: u32) -> String {
    let mut guidance = format!("This template requires {} text boxes.", count);
    match count {
        2 => guidance.push_str(" This is a standard meme template with top and bottom text."),
        1 => guidance.push_str(" This template has only one text area."),
        n if n > 2 => guidance.push_str(&format!(
            " You'll need to provide {} different text strings for this template.",
            n
        )),
        _ => {}
    }
    guidance
}

fn memes_json(memes: &[MemeTemplate], message: Option<&str>) -> String {
    let mut body = json!({
        "success": true,
        "data": { "memes": memes },
    });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    serde_json::to_string_pretty(&body).unwrap_or_default()
}
