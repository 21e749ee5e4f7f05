//! Client configuration and transport layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Proxy};

use crate::error::{Error, Result};

/// 默认的图像生成模型。
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// 依次查找的凭据环境变量。
pub const API_KEY_ENV_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_API_VERSION: &str = "v1beta";

/// Gemini 客户端。
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub http: HttpClient,
    pub config: ClientConfig,
    pub api_client: ApiClient,
}

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API 密钥。
    pub api_key: String,
    /// 图像生成模型。
    pub model: String,
    /// HTTP 配置。
    pub http_options: HttpOptions,
}

/// HTTP 配置。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub headers: HashMap<String, String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
}

impl Client {
    /// 使用 API Key 创建客户端。
    ///
    /// # Errors
    /// 当配置无效或构建客户端失败时返回错误。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// 从环境变量创建客户端。
    ///
    /// 凭据依次读取 `API_KEY`、`GEMINI_API_KEY`、`GOOGLE_API_KEY`，空白值视为缺失。
    ///
    /// # Errors
    /// 当凭据缺失或构建客户端失败时返回 [`Error::InvalidConfig`]。
    pub fn from_env() -> Result<Self> {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| non_empty_env(name))
            .ok_or_else(|| Error::InvalidConfig {
                message: "API_KEY environment variable not set".into(),
            })?;
        let mut builder = Self::builder().api_key(api_key);
        if let Some(base_url) =
            non_empty_env("GENAI_BASE_URL").or_else(|| non_empty_env("GEMINI_BASE_URL"))
        {
            builder = builder.base_url(base_url);
        }
        if let Some(api_version) = non_empty_env("GENAI_API_VERSION") {
            builder = builder.api_version(api_version);
        }
        if let Some(model) = non_empty_env("PRODUCT_STUDIO_MODEL") {
            builder = builder.model(model);
        }
        builder.build()
    }

    /// 创建 Builder。
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 访问 Models API。
    #[must_use]
    pub fn models(&self) -> crate::models::Models {
        crate::models::Models::new(self.inner.clone())
    }

    /// 产品图生成器（使用客户端配置的模型）。
    #[must_use]
    pub fn generator(&self) -> crate::generation::Generator {
        crate::generation::Generator::new(self.models(), self.inner.config.model.clone())
    }

    /// 当前配置的模型名称。
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.config.model
    }
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    model: Option<String>,
    http_options: HttpOptions,
}

impl ClientBuilder {
    /// 设置 API Key。
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// 设置生成模型。
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// 设置请求超时（秒）。
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.http_options.timeout = Some(secs);
        self
    }

    /// 设置代理。
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加默认 HTTP 头。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    /// 设置自定义基础 URL。
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http_options.base_url = Some(base_url.into());
        self
    }

    /// 设置 API 版本。
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.http_options.api_version = Some(api_version.into());
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当凭据缺失、参数无效或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let Self {
            api_key,
            model,
            http_options,
        } = self;

        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::InvalidConfig {
                message: "API_KEY environment variable not set".into(),
            })?;
        let headers = Self::build_headers(&http_options, &api_key)?;
        let http = Self::build_http_client(&http_options, headers)?;

        let config = ClientConfig {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            http_options,
        };
        let api_client = ApiClient::new(&config);

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                config,
                api_client,
            }),
        })
    }

    fn build_headers(http_options: &HttpOptions, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (key, value) in &http_options.headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
                    message: format!("Invalid header name: {key}"),
                })?;
            let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
                message: format!("Invalid header value for {key}"),
            })?;
            headers.insert(name, value);
        }

        let header_name = HeaderName::from_static("x-goog-api-key");
        if !headers.contains_key(&header_name) {
            let mut header_value =
                HeaderValue::from_str(api_key).map_err(|_| Error::InvalidConfig {
                    message: "Invalid API key value".into(),
                })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn build_http_client(http_options: &HttpOptions, headers: HeaderMap) -> Result<HttpClient> {
        let mut http_builder = HttpClient::builder();
        if let Some(timeout) = http_options.timeout {
            http_builder = http_builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(proxy_url) = &http_options.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
                message: format!("Invalid proxy: {e}"),
            })?;
            http_builder = http_builder.proxy(proxy);
        }

        Ok(http_builder.default_headers(headers).build()?)
    }
}

impl ClientInner {
    /// 发送请求。
    ///
    /// # Errors
    /// 当请求构建或网络请求失败时返回错误。
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = request.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        Ok(self.http.execute(request).await?)
    }
}

pub(crate) struct ApiClient {
    pub base_url: String,
    pub api_version: String,
}

impl ApiClient {
    /// 创建 API 客户端配置。
    pub fn new(config: &ClientConfig) -> Self {
        let base_url = config
            .http_options
            .base_url
            .as_deref()
            .map_or_else(|| DEFAULT_BASE_URL.to_string(), normalize_base_url);
        let api_version = config
            .http_options
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Self {
            base_url,
            api_version,
        }
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let mut value = base_url.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_env;

    const CLEAR_KEYS: [(&str, Option<&str>); 3] = [
        ("API_KEY", None),
        ("GEMINI_API_KEY", None),
        ("GOOGLE_API_KEY", None),
    ];

    #[test]
    fn test_client_from_api_key() {
        let client = Client::new("test-api-key").unwrap();
        assert_eq!(client.inner.config.api_key, "test-api-key");
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(
            client.inner.api_client.base_url,
            "https://generativelanguage.googleapis.com/"
        );
        assert_eq!(client.inner.api_client.api_version, "v1beta");
    }

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .api_key("test-key")
            .model("gemini-custom-image")
            .timeout(30)
            .build()
            .unwrap();
        assert_eq!(client.model(), "gemini-custom-image");
        assert_eq!(client.inner.config.http_options.timeout, Some(30));
    }

    #[test]
    fn test_base_url_normalization() {
        let client = Client::builder()
            .api_key("test-key")
            .base_url("https://example.com")
            .build()
            .unwrap();
        assert_eq!(client.inner.api_client.base_url, "https://example.com/");
    }

    #[test]
    fn test_missing_api_key_errors() {
        let err = Client::builder().build().err().unwrap();
        assert!(
            matches!(err, Error::InvalidConfig { ref message } if message == "API_KEY environment variable not set")
        );

        let err = Client::new("   ").err().unwrap();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_env_prefers_api_key() {
        with_env(
            &[
                ("API_KEY", Some("primary")),
                ("GEMINI_API_KEY", Some("secondary")),
                ("GOOGLE_API_KEY", None),
                ("PRODUCT_STUDIO_MODEL", None),
            ],
            || {
                let client = Client::from_env().unwrap();
                assert_eq!(client.inner.config.api_key, "primary");
            },
        );
    }

    #[test]
    fn test_from_env_fallbacks_and_overrides() {
        with_env(
            &[
                ("API_KEY", Some("  ")),
                ("GEMINI_API_KEY", None),
                ("GOOGLE_API_KEY", Some("google-key")),
                ("GENAI_BASE_URL", Some("https://env.example.com")),
                ("GEMINI_BASE_URL", None),
                ("GENAI_API_VERSION", Some("v99")),
                ("PRODUCT_STUDIO_MODEL", Some("env-model")),
            ],
            || {
                let client = Client::from_env().unwrap();
                assert_eq!(client.inner.config.api_key, "google-key");
                assert_eq!(client.inner.api_client.base_url, "https://env.example.com/");
                assert_eq!(client.inner.api_client.api_version, "v99");
                assert_eq!(client.model(), "env-model");
            },
        );
    }

    #[test]
    fn test_from_env_missing_key_errors() {
        with_env(&CLEAR_KEYS, || {
            let err = Client::from_env().err().unwrap();
            assert!(matches!(err, Error::InvalidConfig { .. }));
            assert_eq!(
                err.to_string(),
                "Invalid configuration: API_KEY environment variable not set"
            );
        });
    }

    #[test]
    fn test_valid_proxy_is_accepted() {
        let client = Client::builder()
            .api_key("test-key")
            .proxy("http://127.0.0.1:8888")
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let result = Client::builder()
            .api_key("test-key")
            .proxy("not a url")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let result = Client::builder()
            .api_key("test-key")
            .header("bad header", "value")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_api_key_value_is_rejected() {
        let err = Client::builder().api_key("bad\nkey").build().err().unwrap();
        assert!(
            matches!(err, Error::InvalidConfig { message } if message.contains("Invalid API key value"))
        );
    }
}
