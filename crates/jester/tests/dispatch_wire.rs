//! End-to-end dispatch tests against a mock Imgflip API.
//!
//! Each test builds a Dispatcher pointed at a wiremock server and asserts on
//! both the text handed back to the agent and the requests that reached the
//! remote side.

use imgflip::{Credentials, ImgflipClient};
use jester::dispatch::{Dispatcher, FALLBACK_MESSAGE};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(server: &MockServer) -> Dispatcher {
    Dispatcher::new(ImgflipClient::new(
        &server.uri(),
        Credentials::new("tester", "s3cret"),
    ))
}

fn anonymous(server: &MockServer) -> Dispatcher {
    Dispatcher::new(ImgflipClient::new(&server.uri(), None))
}

fn template(id: &str, name: &str, box_count: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://i.imgflip.com/{}.jpg", id),
        "width": 600,
        "height": 600,
        "box_count": box_count
    })
}

async fn mount_template(server: &MockServer, id: &str, name: &str, box_count: u32) {
    Mock::given(method("POST"))
        .and(path("/get_meme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "meme": template(id, name, box_count) }
        })))
        .mount(server)
        .await;
}

async fn mount_caption_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/caption_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "url": "https://i.imgflip.com/made.jpg",
                "page_url": "https://imgflip.com/i/made"
            }
        })))
        .mount(server)
        .await;
}

async fn mount_popular(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/get_memes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "memes": [template("181913649", "Drake Hotline Bling", 2)] }
        })))
        .mount(server)
        .await;
}

async fn caption_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let caption = requests
        .iter()
        .find(|r| r.url.path() == "/caption_image")
        .expect("caption_image was called");
    String::from_utf8_lossy(&caption.body).to_string()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_memes"))
        .and(body_string_contains("query=cat"))
        .and(body_string_contains("include_nsfw=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "memes": [template("1", "Grumpy Cat", 2)] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch("imgflip_search_memes", json!({ "query": "cat" }))
        .await;

    assert!(!out.is_error, "{}", out.text);
    let parsed: Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["data"]["memes"][0]["name"], "Grumpy Cat");
    assert!(parsed.get("message").is_none());
}

#[tokio::test]
async fn test_search_nsfw_flag_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_memes"))
        .and(body_string_contains("include_nsfw=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "memes": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_search_memes",
            json!({ "query": "spicy", "include_nsfw": true }),
        )
        .await;
    assert!(!out.is_error, "{}", out.text);
}

#[tokio::test]
async fn test_search_no_matches_falls_back_to_popular() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_memes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error_message": "No memes found matching your search"
        })))
        .mount(&server)
        .await;
    mount_popular(&server).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_search_memes",
            json!({ "query": "totally-nonexistent-meme-xyz" }),
        )
        .await;

    assert!(!out.is_error);
    let parsed: Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(parsed["message"], FALLBACK_MESSAGE);
    assert_eq!(parsed["data"]["memes"][0]["id"], "181913649");
}

#[tokio::test]
async fn test_search_without_credentials_falls_back() {
    let server = MockServer::start().await;
    mount_popular(&server).await;

    let out = anonymous(&server)
        .dispatch("imgflip_search_memes", json!({ "query": "cat" }))
        .await;

    assert!(!out.is_error);
    assert!(out.text.contains(FALLBACK_MESSAGE));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/get_memes"));
}

#[tokio::test]
async fn test_search_both_fail_reports_search_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search_memes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error_message": "Invalid username/password"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_memes"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch("imgflip_search_memes", json!({ "query": "cat" }))
        .await;

    assert!(out.is_error);
    assert_eq!(out.text, "Error searching memes: Invalid username/password");
}

// ============================================================================
// Template info
// ============================================================================

#[tokio::test]
async fn test_template_info_two_boxes() {
    let server = MockServer::start().await;
    mount_template(&server, "181913649", "Drake Hotline Bling", 2).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_get_template_info",
            json!({ "template_id": "181913649" }),
        )
        .await;

    assert!(!out.is_error);
    assert!(out.text.starts_with("Template Information:\n{"));
    assert!(out.text.contains("\"name\": \"Drake Hotline Bling\""));
    assert!(out.text.ends_with(
        "\n\nThis template requires 2 text boxes. This is a standard meme template with top and bottom text."
    ));
}

#[tokio::test]
async fn test_template_info_many_boxes() {
    let server = MockServer::start().await;
    mount_template(&server, "87743020", "Two Buttons", 3).await;

    let out = dispatcher(&server)
        .dispatch("imgflip_get_template_info", json!({ "template_id": "87743020" }))
        .await;

    assert!(out.text.ends_with(
        "This template requires 3 text boxes. You'll need to provide 3 different text strings for this template."
    ));
}

#[tokio::test]
async fn test_template_info_echoes_remote_fields() {
    let server = MockServer::start().await;
    let mut meme = template("61579", "One Does Not Simply", 2);
    meme["slug"] = json!("one-does-not-simply");
    Mock::given(method("POST"))
        .and(path("/get_meme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "meme": meme }
        })))
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch("imgflip_get_template_info", json!({ "template_id": "61579" }))
        .await;

    assert!(!out.is_error);
    assert!(out.text.contains("\"slug\": \"one-does-not-simply\""), "{}", out.text);
    assert!(out.text.ends_with("top and bottom text."));
}

#[tokio::test]
async fn test_template_info_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_meme"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch("imgflip_get_template_info", json!({ "template_id": "0" }))
        .await;

    assert!(out.is_error);
    assert_eq!(out.text, "Error getting template info: HTTP error: 404 - Not Found");
}

// ============================================================================
// Create meme
// ============================================================================

#[tokio::test]
async fn test_create_meme_two_boxes_simple_form() {
    let server = MockServer::start().await;
    mount_template(&server, "181913649", "Drake Hotline Bling", 2).await;
    mount_caption_ok(&server).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "181913649", "text_boxes": ["writing tests", "shipping"] }),
        )
        .await;

    assert!(!out.is_error, "{}", out.text);
    assert_eq!(
        out.text,
        "Meme created successfully!\n\n\
         Template: Drake Hotline Bling\n\
         \nText boxes:\n\
         1. writing tests\n\
         2. shipping\n\
         \nDirect image URL: https://i.imgflip.com/made.jpg\n\
         Page URL: https://imgflip.com/i/made\n\n\
         To view the meme, please open the URL in your browser or display it using HTML with an img tag."
    );

    let body = caption_body(&server).await;
    assert!(body.contains("text0=writing+tests"), "{}", body);
    assert!(body.contains("text1=shipping"), "{}", body);
    assert!(body.contains("font=impact"), "{}", body);
    assert!(body.contains("max_font_size=50"), "{}", body);
}

#[tokio::test]
async fn test_create_meme_pads_short_box_list() {
    let server = MockServer::start().await;
    mount_template(&server, "87743020", "Two Buttons", 3).await;
    mount_caption_ok(&server).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "87743020", "text_boxes": ["top"] }),
        )
        .await;

    assert!(!out.is_error, "{}", out.text);
    assert!(out.text.contains("\nText boxes:\n1. top\n2. \n3. \n"));

    let body = caption_body(&server).await;
    assert!(body.contains("boxes%5B0%5D%5Btext%5D=top"), "{}", body);
    assert!(body.contains("boxes%5B1%5D%5Btext%5D=&"), "{}", body);
    assert!(body.ends_with("boxes%5B2%5D%5Btext%5D="), "{}", body);
    assert!(!body.contains("boxes%5B3%5D"), "{}", body);
}

#[tokio::test]
async fn test_create_meme_truncates_long_box_list() {
    let server = MockServer::start().await;
    mount_template(&server, "181913649", "Drake Hotline Bling", 2).await;
    mount_caption_ok(&server).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "181913649", "text_boxes": ["a", "b", "c", "d"], "font": "arial" }),
        )
        .await;

    assert!(!out.is_error, "{}", out.text);
    assert!(!out.text.contains("3. c"));

    // Truncated to two plain boxes, so the simple form applies
    let body = caption_body(&server).await;
    assert!(body.contains("text0=a"), "{}", body);
    assert!(body.contains("text1=b"), "{}", body);
    assert!(!body.contains("=c"), "{}", body);
    assert!(body.contains("font=arial"), "{}", body);
}

#[tokio::test]
async fn test_create_meme_lookup_failure_submits_boxes_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_meme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error_message": "Template not found"
        })))
        .mount(&server)
        .await;
    mount_caption_ok(&server).await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "999", "text_boxes": ["one", "two", "three"] }),
        )
        .await;

    assert!(!out.is_error, "{}", out.text);
    assert!(!out.text.contains("Template:"));
    assert!(out.text.contains("3. three"));

    let body = caption_body(&server).await;
    assert!(body.contains("boxes%5B2%5D%5Btext%5D=three"), "{}", body);
}

#[tokio::test]
async fn test_create_meme_missing_url_is_incomplete() {
    let server = MockServer::start().await;
    mount_template(&server, "181913649", "Drake Hotline Bling", 2).await;
    Mock::given(method("POST"))
        .and(path("/caption_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "page_url": "https://imgflip.com/i/made" }
        })))
        .mount(&server)
        .await;

    let out = dispatcher(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "181913649", "text_boxes": ["a", "b"] }),
        )
        .await;

    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Error creating meme: API returned success but no meme URL was provided"
    );
}

#[tokio::test]
async fn test_create_meme_without_credentials_makes_no_requests() {
    let server = MockServer::start().await;

    let out = anonymous(&server)
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "181913649", "text_boxes": ["a", "b"] }),
        )
        .await;

    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Error creating meme: IMGFLIP_USERNAME and IMGFLIP_PASSWORD environment variables are required for premium features"
    );
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_template_info_without_credentials_makes_no_requests() {
    let server = MockServer::start().await;

    let out = anonymous(&server)
        .dispatch("imgflip_get_template_info", json!({ "template_id": "1" }))
        .await;

    assert!(out.is_error);
    assert!(out.text.starts_with("Error getting template info: IMGFLIP_USERNAME"));
    assert_eq!(request_count(&server).await, 0);
}

// ============================================================================
// Prompt-only tools and rejected calls
// ============================================================================

#[tokio::test]
async fn test_concept_tools_are_offline() {
    let server = MockServer::start().await;
    let d = dispatcher(&server);

    let terms = d
        .dispatch(
            "imgflip_generate_search_terms",
            json!({ "description": "deploying on friday" }),
        )
        .await;
    let concept = d
        .dispatch(
            "imgflip_create_from_concept",
            json!({ "concept": "deploying on friday", "include_nsfw": true }),
        )
        .await;

    assert!(!terms.is_error);
    assert!(terms.text.contains("Concept: deploying on friday"));
    assert_eq!(terms.text, concept.text);
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_unknown_tool_makes_no_requests() {
    let server = MockServer::start().await;

    let out = dispatcher(&server)
        .dispatch("imgflip_delete_meme", json!({ "template_id": "1" }))
        .await;

    assert!(out.is_error);
    assert_eq!(out.text, "Unknown tool: imgflip_delete_meme");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_invalid_arguments_make_no_requests() {
    let server = MockServer::start().await;
    let d = dispatcher(&server);

    let missing = d
        .dispatch("imgflip_create_meme", json!({ "text_boxes": ["a"] }))
        .await;
    assert!(missing.is_error);
    assert!(
        missing
            .text
            .starts_with("Invalid arguments for imgflip_create_meme: missing required argument 'template_id'"),
        "{}",
        missing.text
    );

    let bad_font = d
        .dispatch(
            "imgflip_create_meme",
            json!({ "template_id": "1", "text_boxes": ["a"], "font": "comic sans" }),
        )
        .await;
    assert!(bad_font.is_error);
    assert!(bad_font.text.contains("font"), "{}", bad_font.text);

    assert_eq!(request_count(&server).await, 0);
}
