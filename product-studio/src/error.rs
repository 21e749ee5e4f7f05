//! Error definitions for the studio.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("API returned text instead of an image: {text}")]
    UpstreamTextOnly { text: String },

    #[error("No image data found in the API response.")]
    EmptyResponse,

    #[error("Parse error: {message}")]
    Parse { message: String },
}

/// 面向用户的错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 凭据缺失或配置无效，需要用户修复环境。
    Configuration,
    /// 请求发出前即可发现的输入问题。
    Validation,
    /// 图像源无法读取或编码。
    Encoding,
    /// 网络或非成功状态码。
    RequestFailed,
    /// 模型只返回了文字说明。
    UpstreamTextOnly,
    /// 成功响应但没有可用内容（含格式错误）。
    EmptyResponse,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::HttpClient { .. } | Self::ApiError { .. } => ErrorKind::RequestFailed,
            Self::UpstreamTextOnly { .. } => ErrorKind::UpstreamTextOnly,
            Self::EmptyResponse | Self::Parse { .. } => ErrorKind::EmptyResponse,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
