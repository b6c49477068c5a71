//! MCP Prompts - guided meme creation templates
//!
//! Prompts are pure string interpolation: the agent receives an instruction
//! and does the thinking. Nothing here calls the captioning API.

use rmcp::{
    model::{GetPromptResult, Prompt, PromptArgument, PromptMessage, PromptMessageRole},
    ErrorData as McpError,
};
use std::collections::HashMap;
use tracing::debug;

/// Registry of available MCP prompts.
pub struct PromptRegistry;

impl PromptRegistry {
    /// List all available prompts.
    pub fn list() -> Vec<Prompt> {
        vec![
            Prompt::new(
                "imgflip_create_meme",
                Some("Create a meme using Imgflip with a specified template and text"),
                Some(vec![
                    PromptArgument {
                        name: "template_name".into(),
                        title: Some("Template Name".into()),
                        description: Some("The name of the meme template to use".into()),
                        required: Some(true),
                    },
                    PromptArgument {
                        name: "text_boxes".into(),
                        title: Some("Text Boxes".into()),
                        description: Some(
                            "The text to display in each box (comma-separated)".into(),
                        ),
                        required: Some(true),
                    },
                ]),
            ),
            Prompt::new(
                "imgflip_create_from_description",
                Some("Create a meme from a description of the meme concept"),
                Some(vec![PromptArgument {
                    name: "description".into(),
                    title: Some("Description".into()),
                    description: Some("A description of the meme concept or idea".into()),
                    required: Some(true),
                }]),
            ),
        ]
    }

    /// Get a specific prompt by name with filled arguments.
    ///
    /// Missing arguments interpolate as empty strings.
    pub fn get(name: &str, args: &HashMap<String, String>) -> Result<GetPromptResult, McpError> {
        debug!(name = %name, ?args, "Getting prompt");

        match name {
            "imgflip_create_meme" => Ok(Self::prompt_create_meme(args)),
            "imgflip_create_from_description" => Ok(Self::prompt_create_from_description(args)),
            _ => Err(McpError::invalid_params(
                format!("Unknown prompt: {}", name),
                None,
            )),
        }
    }

    fn prompt_create_meme(args: &HashMap<String, String>) -> GetPromptResult {
        let template_name = arg(args, "template_name");
        let text_boxes = arg(args, "text_boxes");

        GetPromptResult {
            description: Some(format!("Create a meme with the {} template", template_name)),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                format!(
                    "Create a meme using the '{}' template with the following text boxes:\n{}",
                    template_name, text_boxes
                ),
            )],
        }
    }

    fn prompt_create_from_description(args: &HashMap<String, String>) -> GetPromptResult {
        let description = arg(args, "description");

        GetPromptResult {
            description: Some(format!("Create a meme based on the concept: {}", description)),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                format!(
                    "I want to create a meme that captures this idea or concept: {}\n\n\
                     Please analyze this concept and determine appropriate meme templates that \
                     would work well for it. Then select the best one and generate suitable captions.",
                    description
                ),
            )],
        }
    }
}

fn arg<'a>(args: &'a HashMap<String, String>, key: &str) -> &'a str {
    args.get(key).map(String::as_str).unwrap_or("")
}

/// Instruction asking the agent for template-name search terms.
///
/// Imgflip search is a substring match over template names, so the agent is
/// steered toward one-word names rather than descriptive phrases.
pub fn search_terms_prompt(concept: &str) -> String {
    format!(
        r#"
Concept: {concept}
I need to search for meme templates on Imgflip that would work well for this concept.
IMPORTANT: The Imgflip search API is very basic and only searches for exact matches in template names.
It does NOT understand complex queries, concepts, or smart search.
Please provide 1-3 extremely simple search terms that are likely to be part of actual meme template names.
These should be:
- Single words when possible (like "confused", "drake", "cat", "distracted")
- Common meme character names (like "doge", "batman", "pikachu")
- Well-known meme format names (like "drake", "change my mind", "distracted")
DO NOT provide:
- Phrases or complete sentences
- Complex descriptions
- Conceptual terms that wouldn't appear in a template name
Examples:
- For "when your code finally works but you don't know why" → "success", "confused", "math"
- For "me explaining something complex to my parents" → "explain", "pointing", "confused"
Respond with ONLY the search terms, separated by commas, no additional text or explanation.
"#,
        concept = concept
    )
}

/// Convert JsonObject arguments to HashMap<String, String>.
pub fn args_to_hashmap(
    args: Option<&serde_json::Map<String, serde_json::Value>>,
) -> HashMap<String, String> {
    args.map(|obj| {
        obj.iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect()
    })
    .unwrap_or_default()
}
