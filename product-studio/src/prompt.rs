//! Instruction text for the generation model.

use product_studio_types::options::{OptionCategory, StyleOption};

const PREAMBLE: &str = "Generate a high-quality, professional product photograph.";
const STYLE_REFERENCE_CLAUSE: &str =
    "Match the provided style reference image's aesthetic, color palette, and mood. ";
const CLOSING: &str =
    "The final output must be just the image, with no text or other annotations.";

/// 当前的三项选择以及是否存在风格参考图。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptInputs {
    pub aspect_ratio: &'static StyleOption,
    pub lighting: &'static StyleOption,
    pub camera_perspective: &'static StyleOption,
    pub has_style_image: bool,
}

impl Default for PromptInputs {
    fn default() -> Self {
        Self {
            aspect_ratio: OptionCategory::AspectRatio.default_option(),
            lighting: OptionCategory::Lighting.default_option(),
            camera_perspective: OptionCategory::CameraPerspective.default_option(),
            has_style_image: false,
        }
    }
}

impl PromptInputs {
    /// 当前某一类别的选择。
    #[must_use]
    pub const fn selected(&self, category: OptionCategory) -> &'static StyleOption {
        match category {
            OptionCategory::AspectRatio => self.aspect_ratio,
            OptionCategory::Lighting => self.lighting,
            OptionCategory::CameraPerspective => self.camera_perspective,
        }
    }

    /// 替换某一类别的选择。
    #[must_use]
    pub const fn with(mut self, category: OptionCategory, option: &'static StyleOption) -> Self {
        match category {
            OptionCategory::AspectRatio => self.aspect_ratio = option,
            OptionCategory::Lighting => self.lighting = option,
            OptionCategory::CameraPerspective => self.camera_perspective = option,
        }
        self
    }

    #[must_use]
    pub const fn with_style_image(mut self, has_style_image: bool) -> Self {
        self.has_style_image = has_style_image;
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        build_prompt(
            self.aspect_ratio.id,
            self.lighting.id,
            self.camera_perspective.id,
            self.has_style_image,
        )
    }
}

/// 拼装指令文本。纯函数，不做缓存。
#[must_use]
pub fn build_prompt(
    aspect_ratio: &str,
    lighting: &str,
    camera_perspective: &str,
    has_style_image: bool,
) -> String {
    let style = if has_style_image {
        STYLE_REFERENCE_CLAUSE
    } else {
        ""
    };
    let prompt = format!(
        "{PREAMBLE}\n\
         - The image should have a {aspect_ratio} aspect ratio.\n\
         - The lighting must be {lighting}.\n\
         - The camera perspective should be a {camera_perspective}.\n\
         - {style}{CLOSING}"
    );
    prompt.trim().to_string()
}
