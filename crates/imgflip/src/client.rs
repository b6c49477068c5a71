//! HTTP client for the Imgflip API.
//!
//! Every call builds its own HTTP session with idle pooling disabled, so no
//! connection outlives the call that opened it. Only the base URL and
//! credentials are kept between calls, and one client can serve any number
//! of concurrent tool calls.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::error::{ApiResult, ImgflipError};
use crate::types::{
    ApiResponse, CaptionBox, CaptionData, CaptionedImage, Credentials, Font, MemeList,
    MemeTemplate, NsfwFlag, SingleMeme,
};

/// Client for the Imgflip captioning API.
#[derive(Debug, Clone)]
pub struct ImgflipClient {
    base_url: String,
    credentials: Option<Credentials>,
}

impl ImgflipClient {
    /// Create a client for `base_url` (e.g. `https://api.imgflip.com`).
    ///
    /// Without credentials only [`list_templates`](Self::list_templates) can succeed.
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Popular templates. Needs no credentials.
    #[instrument(skip(self), fields(endpoint = "get_memes"))]
    pub async fn list_templates(&self) -> ApiResult<Vec<MemeTemplate>> {
        let result = self.list_templates_inner().await;
        log_failure("get_memes", &result);
        result
    }

    async fn list_templates_inner(&self) -> ApiResult<Vec<MemeTemplate>> {
        let response = self.session()?.get(self.url("get_memes")).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let list: MemeList = unwrap_envelope(&body)?.unwrap_or(MemeList { memes: Vec::new() });
        debug!(count = list.memes.len(), "Fetched popular templates");
        Ok(list.memes)
    }

    /// Keyword search over template names.
    #[instrument(skip(self), fields(endpoint = "search_memes"))]
    pub async fn search_templates(
        &self,
        query: &str,
        include_nsfw: NsfwFlag,
    ) -> ApiResult<Vec<MemeTemplate>> {
        let result = self.search_templates_inner(query, include_nsfw).await;
        log_failure("search_memes", &result);
        result
    }

    async fn search_templates_inner(
        &self,
        query: &str,
        include_nsfw: NsfwFlag,
    ) -> ApiResult<Vec<MemeTemplate>> {
        let creds = self.require_credentials()?;

        let mut form = credential_fields(creds);
        form.push(("query".into(), query.to_string()));
        form.push(("include_nsfw".into(), include_nsfw.as_form_value().to_string()));

        // Status is not checked here: the body's success flag decides.
        let response = self.session()?.post(self.url("search_memes")).form(&form).send().await?;
        let body = response.text().await?;

        let list: MemeList = unwrap_envelope(&body)?.unwrap_or(MemeList { memes: Vec::new() });
        debug!(count = list.memes.len(), "Search returned templates");
        Ok(list.memes)
    }

    /// Metadata for one template, including its box count.
    #[instrument(skip(self), fields(endpoint = "get_meme"))]
    pub async fn get_template(&self, template_id: &str) -> ApiResult<MemeTemplate> {
        let result = self.get_template_inner(template_id).await;
        log_failure("get_meme", &result);
        result
    }

    async fn get_template_inner(&self, template_id: &str) -> ApiResult<MemeTemplate> {
        let creds = self.require_credentials()?;

        let mut form = credential_fields(creds);
        form.push(("template_id".into(), template_id.to_string()));

        let response = self.session()?.post(self.url("get_meme")).form(&form).send().await?;
        check_status(response.status())?;
        let body = response.text().await?;

        let single: Option<SingleMeme> = unwrap_envelope(&body)?;
        match single {
            Some(SingleMeme { meme }) => Ok(meme),
            None => Err(ImgflipError::Decode(serde::de::Error::missing_field("data"))),
        }
    }

    /// Render captions onto a template.
    ///
    /// `boxes` is submitted as given; matching it to the template's box count
    /// is the caller's job.
    #[instrument(skip(self, boxes), fields(endpoint = "caption_image", boxes = boxes.len()))]
    pub async fn caption_image(
        &self,
        template_id: &str,
        boxes: &[CaptionBox],
        font: Font,
        max_font_size: &str,
    ) -> ApiResult<CaptionedImage> {
        let result = self
            .caption_image_inner(template_id, boxes, font, max_font_size)
            .await;
        log_failure("caption_image", &result);
        result
    }

    async fn caption_image_inner(
        &self,
        template_id: &str,
        boxes: &[CaptionBox],
        font: Font,
        max_font_size: &str,
    ) -> ApiResult<CaptionedImage> {
        let creds = self.require_credentials()?;
        let form = caption_form(creds, template_id, boxes, font, max_font_size);

        let response = self.session()?.post(self.url("caption_image")).form(&form).send().await?;
        check_status(response.status())?;
        let body = response.text().await?;

        let data: Option<CaptionData> = unwrap_envelope(&body)?;
        match data {
            Some(CaptionData { url: Some(url), page_url }) if !url.is_empty() => {
                Ok(CaptionedImage { url, page_url })
            }
            _ => Err(ImgflipError::IncompleteResult),
        }
    }

    /// A fresh session for one call. Nothing is pooled for reuse.
    fn session(&self) -> ApiResult<reqwest::Client> {
        Ok(reqwest::Client::builder().pool_max_idle_per_host(0).build()?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn require_credentials(&self) -> ApiResult<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or(ImgflipError::MissingCredentials)
    }
}

fn credential_fields(creds: &Credentials) -> Vec<(String, String)> {
    vec![
        ("username".into(), creds.username().to_string()),
        ("password".into(), creds.password().to_string()),
    ]
}

/// Build the caption_image form body.
///
/// Exactly two text-only boxes use the simple `text0`/`text1` fields. Any
/// other count, or any box carrying placement, uses `boxes[i][field]`.
pub(crate) fn caption_form(
    creds: &Credentials,
    template_id: &str,
    boxes: &[CaptionBox],
    font: Font,
    max_font_size: &str,
) -> Vec<(String, String)> {
    let mut form = vec![("template_id".to_string(), template_id.to_string())];
    form.extend(credential_fields(creds));
    form.push(("font".into(), font.as_str().to_string()));
    form.push(("max_font_size".into(), max_font_size.to_string()));

    if boxes.len() == 2 && boxes.iter().all(|b| !b.has_positioning()) {
        form.push(("text0".into(), boxes[0].text.clone()));
        form.push(("text1".into(), boxes[1].text.clone()));
        return form;
    }

    for (i, b) in boxes.iter().enumerate() {
        form.push((format!("boxes[{}][text]", i), b.text.clone()));

        let numeric = [("x", b.x), ("y", b.y), ("width", b.width), ("height", b.height)];
        for (field, value) in numeric {
            if let Some(v) = value {
                form.push((format!("boxes[{}][{}]", i, field), v.to_string()));
            }
        }
        if let Some(ref color) = b.color {
            form.push((format!("boxes[{}][color]", i), color.clone()));
        }
        if let Some(ref outline) = b.outline_color {
            form.push((format!("boxes[{}][outline_color]", i), outline.clone()));
        }
    }

    form
}

fn check_status(status: StatusCode) -> ApiResult<()> {
    if status == StatusCode::OK {
        return Ok(());
    }
    Err(ImgflipError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

/// Decode `{success, data, error_message}` and turn `success: false` into an error.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<Option<T>> {
    let envelope: ApiResponse<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(ImgflipError::Remote(
            envelope
                .error_message
                .unwrap_or_else(|| "Unknown API error".to_string()),
        ));
    }
    Ok(envelope.data)
}

fn log_failure<T>(endpoint: &str, result: &ApiResult<T>) {
    if let Err(e) = result {
        error!(endpoint, kind = e.kind(), error = %e, "Imgflip request failed");
    }
}
