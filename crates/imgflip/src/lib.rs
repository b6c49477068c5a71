//! imgflip - client for the Imgflip captioning API
//!
//! One async method per remote capability. Every method returns
//! [`ApiResult`], so transport failures, undecodable bodies, and
//! `success: false` replies all arrive at the caller as the same `Err` shape
//! and nothing panics or escapes as a raw `reqwest` error.
//!
//! | Method | Endpoint | Credentials |
//! |--------|----------|-------------|
//! | [`ImgflipClient::list_templates`] | `GET /get_memes` | no |
//! | [`ImgflipClient::search_templates`] | `POST /search_memes` | yes |
//! | [`ImgflipClient::get_template`] | `POST /get_meme` | yes |
//! | [`ImgflipClient::caption_image`] | `POST /caption_image` | yes |
//!
//! ```rust,ignore
//! use imgflip::{CaptionBox, Credentials, Font, ImgflipClient};
//!
//! let client = ImgflipClient::new(
//!     "https://api.imgflip.com",
//!     Credentials::new("user", "pass"),
//! );
//! let image = client
//!     .caption_image("181913649", &[CaptionBox::text("top"), CaptionBox::text("bottom")], Font::Impact, "50")
//!     .await?;
//! println!("{}", image.url);
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::ImgflipClient;
pub use error::{ApiResult, ImgflipError};
pub use types::{CaptionBox, CaptionedImage, Credentials, Font, MemeTemplate, NsfwFlag};
