use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::enums::Modality;

/// 生成配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerationConfig {
    /// 同时请求图像与文本输出。
    #[must_use]
    pub fn image_and_text() -> Self {
        Self {
            response_modalities: Some(vec![Modality::Image, Modality::Text]),
        }
    }
}

/// `generateContent` 请求体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Part, Role};
    use serde_json::json;

    #[test]
    fn request_serializes_modalities() {
        let request = GenerateContentRequest {
            contents: vec![Content::from_parts(vec![Part::text("hi")], Role::User)],
            generation_config: Some(GenerationConfig::image_and_text()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "generationConfig": {"responseModalities": ["IMAGE", "TEXT"]}
            })
        );
    }
}
