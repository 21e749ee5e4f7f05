mod support;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use product_studio::codec;
use product_studio::generation::STYLE_REFERENCE_INSTRUCTION;
use product_studio::{build_prompt, Error, ErrorKind, PromptInputs};

use support::{
    build_client, image_response, product_png, received, request_parts, style_jpeg,
    text_response, GENERATE_PATH,
};

#[tokio::test]
async fn test_generate_with_style_image_sends_four_parts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user"}],
            "generationConfig": {"responseModalities": ["IMAGE", "TEXT"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("image/png", "AAAA")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = build_client(&mock_server.uri()).generator();
    let prompt = PromptInputs::default().with_style_image(true).build();
    let data_uri = generator
        .generate(&prompt, &product_png(), Some(&style_jpeg()))
        .await
        .unwrap();
    assert_eq!(data_uri, "data:image/png;base64,AAAA");

    let requests = received(&mock_server).await;
    let parts = request_parts(&requests[0]);
    assert_eq!(parts.len(), 4);
    assert_eq!(
        parts[0]["inlineData"]["data"],
        codec::encode(&product_png()).unwrap().data
    );
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["text"], STYLE_REFERENCE_INSTRUCTION);
    assert_eq!(parts[2]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(
        parts[2]["inlineData"]["data"],
        codec::encode(&style_jpeg()).unwrap().data
    );
    assert_eq!(parts[3]["text"], prompt.as_str());
}

#[tokio::test]
async fn test_generate_without_style_image_sends_two_parts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("image/png", "AAAA")))
        .mount(&mock_server)
        .await;

    let generator = build_client(&mock_server.uri()).generator();
    let prompt = build_prompt("4:3", "natural sunlight", "high-angle shot", false);
    generator
        .generate_image(&prompt, &product_png(), None)
        .await
        .unwrap();

    let requests = received(&mock_server).await;
    let parts = request_parts(&requests[0]);
    assert_eq!(parts.len(), 2);
    assert!(parts[0].get("inlineData").is_some());
    assert_eq!(parts[1]["text"], prompt.as_str());
    assert!(!prompt.contains("style reference"));
}

#[tokio::test]
async fn test_generate_returns_first_inline_image_only() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is the shot."},
                    {"inlineData": {"mimeType": "image/webp", "data": "Zmlyc3Q="}},
                    {"inlineData": {"mimeType": "image/png", "data": "c2Vjb25k"}}
                ]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let image = build_client(&mock_server.uri())
        .generator()
        .generate_image("T", &product_png(), None)
        .await
        .unwrap();
    assert_eq!(image.mime_type(), "image/webp");
    assert_eq!(image.data_uri(), "data:image/webp;base64,Zmlyc3Q=");
    assert_eq!(image.decode().unwrap(), b"first");
}

#[tokio::test]
async fn test_text_only_response_is_surfaced() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_response("blocked: unsafe content")),
        )
        .mount(&mock_server)
        .await;

    let err = build_client(&mock_server.uri())
        .generator()
        .generate("T", &product_png(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamTextOnly);
    assert!(matches!(err, Error::UpstreamTextOnly { ref text } if text == "blocked: unsafe content"));
    assert_eq!(
        err.to_string(),
        "API returned text instead of an image: blocked: unsafe content"
    );
}

#[tokio::test]
async fn test_zero_candidates_is_empty_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&mock_server)
        .await;

    let err = build_client(&mock_server.uri())
        .generator()
        .generate("T", &product_png(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResponse);
    assert_eq!(err.to_string(), "No image data found in the API response.");
}

#[tokio::test]
async fn test_http_error_is_request_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&mock_server)
        .await;

    let err = build_client(&mock_server.uri())
        .generator()
        .generate("T", &product_png(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert!(
        matches!(err, Error::ApiError { status: 500, ref message } if message.contains("internal failure"))
    );
}

#[tokio::test]
async fn test_model_override_changes_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-custom-image:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_response("image/png", "AAAA")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = build_client(&mock_server.uri())
        .generator()
        .with_model("gemini-custom-image");
    assert_eq!(generator.model(), "gemini-custom-image");
    generator
        .generate_image("T", &product_png(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unrecognised_parts_before_image_are_skipped() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"thoughtSignature": "c2ln"},
                    {"executableCode": {"language": "PYTHON", "code": "print(1)"}},
                    {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                ]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let data_uri = build_client(&mock_server.uri())
        .generator()
        .generate("T", &product_png(), None)
        .await
        .unwrap();
    assert_eq!(data_uri, "data:image/png;base64,AAAA");
}
