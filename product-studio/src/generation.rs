//! Product shot generation: request assembly and image extraction.

use std::fmt;

use product_studio_types::config::GenerationConfig;
use product_studio_types::content::{Blob, Content, Part, Role};
use product_studio_types::response::GenerateContentResponse;

use crate::codec::{self, UploadedImage};
use crate::error::{Error, Result};
use crate::models::Models;

/// 风格参考图前的固定说明。
pub const STYLE_REFERENCE_INSTRUCTION: &str = "Use this second image as a style reference for the output image's aesthetic, color palette, and mood:";

/// 模型返回的图像（base64 原文 + MIME 类型）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    blob: Blob,
}

impl GeneratedImage {
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.blob.mime_type
    }

    /// base64 原文。
    #[must_use]
    pub fn base64_data(&self) -> &str {
        &self.blob.data
    }

    /// `data:<mime>;base64,<data>`，可直接用于展示。
    #[must_use]
    pub fn data_uri(&self) -> String {
        self.blob.to_data_uri()
    }

    /// 解码为原始字节。
    ///
    /// # Errors
    /// base64 无效时返回 [`Error::Encoding`]。
    pub fn decode(&self) -> Result<Vec<u8>> {
        codec::decode(&self.blob)
    }
}

impl From<Blob> for GeneratedImage {
    fn from(blob: Blob) -> Self {
        Self { blob }
    }
}

impl fmt::Display for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data_uri())
    }
}

/// 产品图生成器。
#[derive(Clone)]
pub struct Generator {
    models: Models,
    model: String,
}

impl Generator {
    pub(crate) const fn new(models: Models, model: String) -> Self {
        Self { models, model }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// 替换生成所用的模型。
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// 生成图像并返回 data URI。
    ///
    /// # Errors
    /// 见 [`Generator::generate_image`]。
    pub async fn generate(
        &self,
        prompt: &str,
        product_image: &UploadedImage,
        style_image: Option<&UploadedImage>,
    ) -> Result<String> {
        self.generate_image(prompt, product_image, style_image)
            .await
            .map(|image| image.data_uri())
    }

    /// 发送一次多模态请求并取出第一张图像。
    ///
    /// # Errors
    /// 编码失败返回 [`Error::Encoding`]；传输失败返回请求错误；
    /// 模型只回复文字时返回 [`Error::UpstreamTextOnly`]；无内容时返回 [`Error::EmptyResponse`]。
    pub async fn generate_image(
        &self,
        prompt: &str,
        product_image: &UploadedImage,
        style_image: Option<&UploadedImage>,
    ) -> Result<GeneratedImage> {
        let parts = build_request_parts(prompt, product_image, style_image)?;
        tracing::info!(
            model = %self.model,
            parts = parts.len(),
            has_style_image = style_image.is_some(),
            "requesting product shot"
        );
        let response = self
            .models
            .generate_content(
                &self.model,
                vec![Content::from_parts(parts, Role::User)],
                Some(GenerationConfig::image_and_text()),
            )
            .await?;
        extract_image(&response)
    }
}

/// 按固定顺序组装请求 parts：产品图、（风格说明 + 风格图）、指令文本。
///
/// # Errors
/// 任一图像无法编码时返回 [`Error::Encoding`]。
pub fn build_request_parts(
    prompt: &str,
    product_image: &UploadedImage,
    style_image: Option<&UploadedImage>,
) -> Result<Vec<Part>> {
    let mut parts = Vec::with_capacity(4);
    parts.push(Part::from_blob(codec::encode(product_image)?));

    if let Some(style_image) = style_image {
        let style_blob = codec::encode(style_image)?;
        parts.push(Part::text(STYLE_REFERENCE_INSTRUCTION));
        parts.push(Part::from_blob(style_blob));
    }

    parts.push(Part::text(prompt));
    Ok(parts)
}

/// 从响应中取出第一张内联图像；没有图像时用文字说明报错。
///
/// # Errors
/// 只有文字时返回 [`Error::UpstreamTextOnly`]，否则返回 [`Error::EmptyResponse`]。
pub fn extract_image(response: &GenerateContentResponse) -> Result<GeneratedImage> {
    let Some(candidate) = response.candidates.first() else {
        if let Some(reason) = response.block_reason() {
            tracing::warn!(?reason, "prompt blocked without candidates");
        }
        return Err(Error::EmptyResponse);
    };
    let Some(content) = &candidate.content else {
        tracing::warn!(finish_reason = ?candidate.finish_reason, "candidate has no content");
        return Err(Error::EmptyResponse);
    };

    // Only the first inline image is surfaced, even if the model returns several.
    if let Some(blob) = content.first_inline_data() {
        tracing::debug!(mime_type = %blob.mime_type, "image found in response");
        return Ok(GeneratedImage::from(blob.clone()));
    }

    if let Some(text) = content.first_text() {
        return Err(Error::UpstreamTextOnly {
            text: text.to_string(),
        });
    }

    Err(Error::EmptyResponse)
}
