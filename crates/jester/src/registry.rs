//! Operation registry - the five tools jester exposes
//!
//! The table here is the only place tool names, descriptions and parameter
//! schemas are declared. MCP discovery renders it to JSON Schema and the
//! dispatcher validates incoming arguments against it before anything is
//! deserialized into typed argument structs.

use serde_json::{json, Map, Value};

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    StringArray,
}

/// Value filled in when an optional parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Bool(bool),
    Str(&'static str),
}

impl ParamDefault {
    fn to_value(self) -> Value {
        match self {
            ParamDefault::Bool(b) => Value::Bool(b),
            ParamDefault::Str(s) => Value::String(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<ParamDefault>,
    /// Allowed values for string params. Empty means unrestricted.
    pub allowed: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        required: true,
        default: None,
        allowed: &[],
    }
}

const fn optional(
    name: &'static str,
    kind: ParamKind,
    description: &'static str,
    default: ParamDefault,
) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        description,
        required: false,
        default: Some(default),
        allowed: &[],
    }
}

pub const SEARCH_MEMES: &str = "imgflip_search_memes";
pub const GET_TEMPLATE_INFO: &str = "imgflip_get_template_info";
pub const CREATE_MEME: &str = "imgflip_create_meme";
pub const GENERATE_SEARCH_TERMS: &str = "imgflip_generate_search_terms";
pub const CREATE_FROM_CONCEPT: &str = "imgflip_create_from_concept";

static OPERATIONS: [OperationSpec; 5] = [
    OperationSpec {
        name: SEARCH_MEMES,
        description: "Search for meme templates using keywords",
        params: &[
            required("query", ParamKind::String, "Search query for meme templates"),
            optional(
                "include_nsfw",
                ParamKind::Boolean,
                "Include NSFW memes in results",
                ParamDefault::Bool(false),
            ),
        ],
    },
    OperationSpec {
        name: GET_TEMPLATE_INFO,
        description:
            "Get information about a meme template including the number of text boxes required",
        params: &[required(
            "template_id",
            ParamKind::String,
            "ID of the meme template to get info for",
        )],
    },
    OperationSpec {
        name: CREATE_MEME,
        description:
            "Create a meme using the Imgflip API with custom text for any number of boxes",
        params: &[
            required(
                "template_id",
                ParamKind::String,
                "ID of the meme template from get_memes",
            ),
            required(
                "text_boxes",
                ParamKind::StringArray,
                "Array of text strings, one for each text box in the template",
            ),
            ParamSpec {
                allowed: &["impact", "arial"],
                ..optional(
                    "font",
                    ParamKind::String,
                    "Font family to use (defaults to impact)",
                    ParamDefault::Str("impact"),
                )
            },
            optional(
                "max_font_size",
                ParamKind::String,
                "Maximum font size in pixels (defaults to 50px)",
                ParamDefault::Str("50"),
            ),
        ],
    },
    OperationSpec {
        name: GENERATE_SEARCH_TERMS,
        description: "Generate optimal search terms for a meme concept",
        params: &[required(
            "description",
            ParamKind::String,
            "Description of the meme concept or idea",
        )],
    },
    OperationSpec {
        name: CREATE_FROM_CONCEPT,
        description:
            "Create a meme from a concept by searching templates and generating captions",
        params: &[
            required("concept", ParamKind::String, "The meme concept or idea"),
            optional(
                "include_nsfw",
                ParamKind::Boolean,
                "Include NSFW memes in results",
                ParamDefault::Bool(false),
            ),
        ],
    },
];

/// All operations, in presentation order.
pub fn operations() -> &'static [OperationSpec] {
    &OPERATIONS
}

/// Look up an operation by exact name.
pub fn find(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|op| op.name == name)
}

impl OperationSpec {
    /// JSON Schema object for MCP `tools/list`.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.params {
            let mut prop = match param.kind {
                ParamKind::String => json!({ "type": "string" }),
                ParamKind::Boolean => json!({ "type": "boolean" }),
                ParamKind::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            };
            prop["description"] = json!(param.description);
            if !param.allowed.is_empty() {
                prop["enum"] = json!(param.allowed);
            }
            if let Some(default) = param.default {
                prop["default"] = default.to_value();
            }
            properties.insert(param.name.to_string(), prop);

            if param.required {
                required.push(param.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate `args` against the declared params and fill in defaults.
    ///
    /// `null` is treated as an empty argument object. Undeclared keys pass
    /// through untouched so typed deserialization can ignore them.
    pub fn normalize(&self, args: Value) -> Result<Value, String> {
        let mut obj = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => return Err(format!("arguments must be an object, got {}", type_name(&other))),
        };

        for param in self.params {
            let present = obj.get(param.name).filter(|v| !v.is_null());

            let Some(value) = present else {
                if param.required {
                    return Err(format!("missing required argument '{}'", param.name));
                }
                if let Some(default) = param.default {
                    obj.insert(param.name.to_string(), default.to_value());
                }
                continue;
            };

            check_kind(param, value)?;

            if !param.allowed.is_empty() {
                let s = value.as_str().unwrap_or_default();
                if !param.allowed.contains(&s) {
                    return Err(format!(
                        "'{}' must be one of {}, got '{}'",
                        param.name,
                        param.allowed.join(", "),
                        s
                    ));
                }
            }
        }

        Ok(Value::Object(obj))
    }
}

fn check_kind(param: &ParamSpec, value: &Value) -> Result<(), String> {
    let ok = match param.kind {
        ParamKind::String => value.is_string(),
        ParamKind::Boolean => value.is_boolean(),
        ParamKind::StringArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    };
    if ok {
        return Ok(());
    }

    let expected = match param.kind {
        ParamKind::String => "string",
        ParamKind::Boolean => "boolean",
        ParamKind::StringArray => "array of strings",
    };
    Err(format!(
        "'{}' must be a {}, got {}",
        param.name,
        expected,
        type_name(value)
    ))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
