//! Failure kinds for remote calls.
//!
//! The Display text of each variant is the message shown to agents, so the
//! wording here is part of the tool output.

use thiserror::Error;

/// Result envelope returned by every remote call.
pub type ApiResult<T> = Result<T, ImgflipError>;

#[derive(Debug, Error)]
pub enum ImgflipError {
    /// A credentialed endpoint was called without a username/password pair.
    #[error("IMGFLIP_USERNAME and IMGFLIP_PASSWORD environment variables are required for premium features")]
    MissingCredentials,

    /// The request never produced a usable HTTP response.
    #[error("Connection error: {0}")]
    Transport(String),

    /// Non-200 status from an endpoint that is status-checked.
    #[error("HTTP error: {status} - {reason}")]
    Http { status: u16, reason: String },

    /// Body was not the JSON shape the endpoint promises.
    #[error("Invalid response from ImgFlip API")]
    Decode(#[source] serde_json::Error),

    /// Well-formed body with `success: false`.
    #[error("{0}")]
    Remote(String),

    /// `success: true` but a field the caller depends on is missing.
    #[error("API returned success but no meme URL was provided")]
    IncompleteResult,
}

impl ImgflipError {
    /// Short machine-friendly name, used as a tracing field.
    pub fn kind(&self) -> &'static str {
        match self {
            ImgflipError::MissingCredentials => "missing_credentials",
            ImgflipError::Transport(_) => "transport",
            ImgflipError::Http { .. } => "http_status",
            ImgflipError::Decode(_) => "decode",
            ImgflipError::Remote(_) => "remote_application",
            ImgflipError::IncompleteResult => "incomplete_result",
        }
    }
}

impl From<reqwest::Error> for ImgflipError {
    fn from(err: reqwest::Error) -> Self {
        ImgflipError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ImgflipError {
    fn from(err: serde_json::Error) -> Self {
        ImgflipError::Decode(err)
    }
}
