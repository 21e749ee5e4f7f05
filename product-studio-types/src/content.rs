use serde::{Deserialize, Serialize};

/// 对话内容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// 角色：user/model。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// 消息内容片段。
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// 创建用户文本消息。
    pub fn user(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)], Role::User)
    }

    /// 从 parts 构建内容。
    #[must_use]
    pub const fn from_parts(parts: Vec<Part>, role: Role) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// 提取第一段非空文本。
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .filter_map(Part::text_value)
            .find(|text| !text.is_empty())
    }

    /// 提取第一段内联数据。
    #[must_use]
    pub fn first_inline_data(&self) -> Option<&Blob> {
        self.parts.iter().find_map(Part::inline_data_ref)
    }
}

/// 内容角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 内容部分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// 具体内容变体。
    #[serde(flatten)]
    pub kind: PartKind,
    /// 是否为思考内容。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// 思考签名（保持服务端返回的 base64 原文）。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    /// 创建文本 Part。
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_kind(PartKind::Text { text: text.into() })
    }

    /// 创建内联数据 Part，`data` 必须已是 base64 文本。
    pub fn inline_data(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::from_kind(PartKind::InlineData {
            inline_data: Blob::new(data, mime_type),
        })
    }

    /// 用已有的 [`Blob`] 创建 Part。
    #[must_use]
    pub const fn from_blob(blob: Blob) -> Self {
        Self::from_kind(PartKind::InlineData { inline_data: blob })
    }

    const fn from_kind(kind: PartKind) -> Self {
        Self {
            kind,
            thought: None,
            thought_signature: None,
        }
    }

    /// 获取文本内容（仅当为 Text Part）。
    #[must_use]
    pub const fn text_value(&self) -> Option<&str> {
        match &self.kind {
            PartKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// 获取内联数据引用（仅当为 `InlineData` Part）。
    #[must_use]
    pub const fn inline_data_ref(&self) -> Option<&Blob> {
        match &self.kind {
            PartKind::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

/// 内容部分的具体变体。
///
/// 未收录的形状（`functionCall`、`executableCode`、只有 `thoughtSignature` 的 part 等）
/// 落入 [`PartKind::Other`]，不会让整个响应解析失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PartKind {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    /// 原样保留的其他字段，必须放在最后。
    Other(serde_json::Value),
}

/// 内联二进制数据（base64 文本 + MIME 类型）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl Blob {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// 格式化为 `data:<mime>;base64,<data>`。
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
