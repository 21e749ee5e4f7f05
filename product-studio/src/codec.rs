//! Image codec adapter: in-memory images to inline transport data.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use product_studio_types::content::Blob;

use crate::error::{Error, Result};

/// 可上传的图像 MIME 类型。
pub const SUPPORTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// 内存中的图像（原始字节 + 声明的 MIME 类型）。
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    data: Arc<[u8]>,
    mime_type: String,
    name: Option<String>,
}

impl UploadedImage {
    /// 由字节与 MIME 类型创建。
    ///
    /// # Errors
    /// MIME 类型不是 PNG/JPEG/WEBP 时返回 [`Error::Validation`]。
    pub fn new(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        if !is_supported_mime(&mime_type) {
            return Err(Error::validation(format!(
                "Unsupported image type: {mime_type} (expected PNG, JPEG or WEBP)"
            )));
        }
        let data: Vec<u8> = data.into();
        Ok(Self {
            data: data.into(),
            mime_type,
            name: None,
        })
    }

    /// 从文件读取，按扩展名推断 MIME，失败时回退到文件头嗅探。
    ///
    /// # Errors
    /// 文件不可读时返回 [`Error::Encoding`]，类型不受支持时返回 [`Error::Validation`]。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|err| Error::encoding(format!("cannot read {}: {err}", path.display())))?;
        if !metadata.is_file() {
            return Err(Error::encoding(format!(
                "{} is not a valid file path",
                path.display()
            )));
        }
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| Error::encoding(format!("cannot read {}: {err}", path.display())))?;

        let guessed = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let mime_type = if is_supported_mime(&guessed) {
            guessed
        } else {
            sniff_mime(&data).map_or(guessed, ToString::to_string)
        };

        let mut image = Self::new(data, mime_type)?;
        image.name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string);
        Ok(image)
    }

    /// 设置显示名称。
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("mime_type", &self.mime_type)
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// 将图像编码为内联数据（base64 原文，不含 data URI 前缀）。
///
/// # Errors
/// 图像内容为空（无法读取）时返回 [`Error::Encoding`]。
pub fn encode(image: &UploadedImage) -> Result<Blob> {
    encode_bytes(image.data(), image.mime_type())
}

/// 将原始字节编码为内联数据，MIME 类型原样透传。
///
/// # Errors
/// 字节为空时返回 [`Error::Encoding`]。
pub fn encode_bytes(data: &[u8], mime_type: &str) -> Result<Blob> {
    if data.is_empty() {
        return Err(Error::encoding(format!(
            "image source is empty or unreadable ({mime_type})"
        )));
    }
    let encoded = STANDARD.encode(data);
    tracing::trace!(mime_type, bytes = data.len(), encoded = encoded.len(), "encoded image");
    Ok(Blob::new(encoded, mime_type))
}

/// 解码内联数据。
///
/// # Errors
/// base64 无效时返回 [`Error::Encoding`]。
pub fn decode(blob: &Blob) -> Result<Vec<u8>> {
    STANDARD
        .decode(blob.data.as_bytes())
        .map_err(|err| Error::encoding(format!("invalid base64 payload: {err}")))
}

/// 格式化 `data:<mime>;base64,<data>`。
#[must_use]
pub fn data_uri(mime_type: &str, data: &str) -> String {
    format!("data:{mime_type};base64,{data}")
}

/// 根据文件头识别 PNG/JPEG/WEBP。
#[must_use]
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn is_supported_mime(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}
