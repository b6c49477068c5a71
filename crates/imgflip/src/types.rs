//! Wire and domain types for the Imgflip API.

use serde::{Deserialize, Serialize};

/// Username/password pair for the premium endpoints.
///
/// Debug output never includes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Returns `None` when either half is empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A caption-able image template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemeTemplate {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Number of caption regions the template expects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_count: Option<u32>,

    /// Popularity counter reported by Imgflip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<u64>,

    /// Remote fields not modeled above, echoed back unchanged.
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One caption region's text plus optional placement.
///
/// Placement fields are pixel offsets within the template image. Boxes with
/// any placement set force the indexed `boxes[i][...]` submission form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionBox {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
}

impl CaptionBox {
    /// A box with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when any placement or styling metadata is present.
    pub fn has_positioning(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.color.is_some()
            || self.outline_color.is_some()
    }
}

/// Caption font. Imgflip accepts these two by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Impact,
    Arial,
}

impl Font {
    pub fn as_str(&self) -> &'static str {
        match self {
            Font::Impact => "impact",
            Font::Arial => "arial",
        }
    }
}

/// Whether search results may include NSFW templates.
///
/// The search endpoint expects `include_nsfw=1` or `include_nsfw=0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NsfwFlag {
    #[default]
    Exclude,
    Include,
}

impl NsfwFlag {
    pub fn as_form_value(&self) -> &'static str {
        match self {
            NsfwFlag::Exclude => "0",
            NsfwFlag::Include => "1",
        }
    }
}

impl From<bool> for NsfwFlag {
    fn from(include: bool) -> Self {
        if include {
            NsfwFlag::Include
        } else {
            NsfwFlag::Exclude
        }
    }
}

/// A rendered meme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionedImage {
    /// Direct image URL.
    pub url: String,
    /// Imgflip page hosting the image.
    pub page_url: Option<String>,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Common `{success, data, error_message}` shell every endpoint replies with.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemeList {
    #[serde(default)]
    pub memes: Vec<MemeTemplate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SingleMeme {
    pub meme: MemeTemplate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptionData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
}
