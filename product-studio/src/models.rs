//! Models API surface.

use std::sync::Arc;

use product_studio_types::config::{GenerateContentRequest, GenerationConfig};
use product_studio_types::content::Content;
use product_studio_types::response::GenerateContentResponse;

use crate::client::ClientInner;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct Models {
    pub(crate) inner: Arc<ClientInner>,
}

impl Models {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 生成内容（单次请求，不重试、不流式）。
    ///
    /// # Errors
    /// 网络失败或非成功状态码返回请求错误；响应体无法解析时返回 [`Error::Parse`]。
    pub async fn generate_content(
        &self,
        model: &str,
        contents: Vec<Content>,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents,
            generation_config,
        };
        let url = build_model_method_url(&self.inner, model, "generateContent");

        let request = self.inner.http.post(url).json(&request);
        let response = self.inner.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "generateContent failed");
            return Err(Error::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|err| Error::Parse {
                message: err.to_string(),
            })?;
        tracing::debug!(
            candidates = parsed.candidates.len(),
            model_version = parsed.model_version.as_deref().unwrap_or(""),
            "generateContent succeeded"
        );
        Ok(parsed)
    }
}

pub(crate) fn transform_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

pub(crate) fn build_model_method_url(inner: &ClientInner, model: &str, method: &str) -> String {
    let model = transform_model_name(model);
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    format!("{base}{version}/{model}:{method}")
}
