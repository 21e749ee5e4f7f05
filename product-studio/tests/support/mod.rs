#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::{MockServer, Request};

use product_studio::{Client, UploadedImage};

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image-preview:generateContent";

pub fn build_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn product_png() -> UploadedImage {
    UploadedImage::new(b"\x89PNG\r\n\x1a\nproduct".to_vec(), "image/png")
        .unwrap()
        .with_name("product.png")
}

pub fn style_jpeg() -> UploadedImage {
    UploadedImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], "image/jpeg")
        .unwrap()
        .with_name("style.jpg")
}

pub fn image_response(mime_type: &str, data: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"inlineData": {"mimeType": mime_type, "data": data}}]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

pub fn request_parts(request: &Request) -> Vec<Value> {
    let body: Value = request.body_json().unwrap();
    body["contents"][0]["parts"].as_array().unwrap().clone()
}
