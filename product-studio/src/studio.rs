//! Headless studio session: selections, image slots and the output pane.
//!
//! Every mutation ends with an explicit call to the prompt builder, so
//! [`Studio::prompt`] never reflects stale selections.

use std::future::Future;

use product_studio_types::options::{OptionCategory, StyleOption};

use crate::client::Client;
use crate::codec::UploadedImage;
use crate::error::{Error, ErrorKind, Result};
use crate::generation::{GeneratedImage, Generator};
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::prompt::PromptInputs;

const MISSING_PRODUCT_MESSAGE: &str = "Please upload a product photo first.";
const BUSY_MESSAGE: &str = "A generation is already in progress.";

/// 输出面板状态。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputPane {
    /// 空白占位。
    #[default]
    Empty,
    /// 请求进行中。
    Loading,
    /// 生成结果。
    Image(GeneratedImage),
    /// 面向用户的错误信息。
    Error { kind: ErrorKind, message: String },
}

/// 一次生成尝试所需的快照，与会话状态解耦。
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    pub prompt: String,
    pub product_image: UploadedImage,
    pub style_image: Option<UploadedImage>,
}

/// 工作室会话。
#[derive(Debug)]
pub struct Studio {
    registry: PreviewRegistry,
    product: Option<PreviewHandle>,
    style: Option<PreviewHandle>,
    inputs: PromptInputs,
    prompt: String,
    output: OutputPane,
    error_message: Option<String>,
    busy: bool,
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

impl Studio {
    /// 默认选择、空图像槽、空输出面板。
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(PreviewRegistry::new())
    }

    #[must_use]
    pub fn with_registry(registry: PreviewRegistry) -> Self {
        let inputs = PromptInputs::default();
        Self {
            registry,
            product: None,
            style: None,
            prompt: inputs.build(),
            inputs,
            output: OutputPane::Empty,
            error_message: None,
            busy: false,
        }
    }

    /// 选择或清除产品图；旧的预览句柄随之释放。
    pub fn set_product_image(&mut self, image: Option<UploadedImage>) {
        self.product = image.map(|image| self.registry.acquire(&image));
        self.refresh_prompt();
    }

    /// 选择或清除风格参考图；旧的预览句柄随之释放。
    pub fn set_style_image(&mut self, image: Option<UploadedImage>) {
        self.style = image.map(|image| self.registry.acquire(&image));
        self.refresh_prompt();
    }

    pub fn remove_product_image(&mut self) {
        self.set_product_image(None);
    }

    pub fn remove_style_image(&mut self) {
        self.set_style_image(None);
    }

    /// 按 id 选择某一类别的选项。
    ///
    /// # Errors
    /// id 不在该类别的目录中时返回 [`Error::Validation`]，原选择保持不变。
    pub fn select(&mut self, category: OptionCategory, id: &str) -> Result<&'static StyleOption> {
        let option = category.find(id).ok_or_else(|| {
            Error::validation(format!("Unknown {} option: {id}", category.label()))
        })?;
        self.inputs = self.inputs.with(category, option);
        self.refresh_prompt();
        Ok(option)
    }

    /// # Errors
    /// 见 [`Studio::select`]。
    pub fn set_aspect_ratio(&mut self, id: &str) -> Result<&'static StyleOption> {
        self.select(OptionCategory::AspectRatio, id)
    }

    /// # Errors
    /// 见 [`Studio::select`]。
    pub fn set_lighting_style(&mut self, id: &str) -> Result<&'static StyleOption> {
        self.select(OptionCategory::Lighting, id)
    }

    /// # Errors
    /// 见 [`Studio::select`]。
    pub fn set_camera_perspective(&mut self, id: &str) -> Result<&'static StyleOption> {
        self.select(OptionCategory::CameraPerspective, id)
    }

    #[must_use]
    pub const fn selection(&self, category: OptionCategory) -> &'static StyleOption {
        self.inputs.selected(category)
    }

    #[must_use]
    pub const fn inputs(&self) -> PromptInputs {
        self.inputs
    }

    /// 只读的指令文本。
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub const fn product_preview(&self) -> Option<&PreviewHandle> {
        self.product.as_ref()
    }

    #[must_use]
    pub const fn style_preview(&self) -> Option<&PreviewHandle> {
        self.style.as_ref()
    }

    #[must_use]
    pub const fn preview_registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn output(&self) -> &OutputPane {
        &self.output
    }

    /// 触发按钮下方的错误提示；新的尝试开始时清空。
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// 触发按钮是否可用。
    #[must_use]
    pub const fn can_generate(&self) -> bool {
        self.product.is_some() && !self.busy
    }

    /// 开始一次生成：校验输入，面板进入加载状态，返回请求快照。
    ///
    /// 没有产品图时只设置 [`Studio::error_message`]，输出面板保持不变。
    ///
    /// # Errors
    /// 没有产品图或已有请求在进行时返回 [`Error::Validation`]。
    pub fn begin_generation(&mut self) -> Result<PendingGeneration> {
        if self.busy {
            return Err(Error::validation(BUSY_MESSAGE));
        }
        let Some(product) = &self.product else {
            let err = Error::validation(MISSING_PRODUCT_MESSAGE);
            self.error_message = Some(err.to_string());
            return Err(err);
        };

        let pending = PendingGeneration {
            prompt: self.prompt.clone(),
            product_image: product.image().clone(),
            style_image: self.style.as_ref().map(|handle| handle.image().clone()),
        };
        self.busy = true;
        self.error_message = None;
        self.output = OutputPane::Loading;
        tracing::info!(
            has_style_image = pending.style_image.is_some(),
            "generation started"
        );
        Ok(pending)
    }

    /// 结束生成：展示图像或错误信息，并恢复到可操作状态。
    ///
    /// # Errors
    /// 原样返回传入的错误。
    pub fn finish_generation(
        &mut self,
        result: Result<GeneratedImage>,
    ) -> Result<GeneratedImage> {
        self.busy = false;
        match result {
            Ok(image) => {
                tracing::info!(mime_type = image.mime_type(), "generation finished");
                self.output = OutputPane::Image(image.clone());
                Ok(image)
            }
            Err(err) => {
                tracing::error!(kind = ?err.kind(), "generation failed: {err}");
                self.show_error(&err);
                Err(err)
            }
        }
    }

    /// 放弃进行中的尝试（调用方没有等到结果）：恢复可操作状态，加载中的面板回到空白。
    pub fn cancel_generation(&mut self) {
        if !self.busy {
            return;
        }
        self.busy = false;
        if self.output == OutputPane::Loading {
            self.output = OutputPane::Empty;
        }
        tracing::warn!("generation abandoned before completion");
    }

    /// 用给定的生成器完成一次完整尝试。
    ///
    /// # Errors
    /// 返回本次尝试的错误；错误同时写入输出面板（并发触发除外）。
    pub async fn generate(&mut self, generator: &Generator) -> Result<GeneratedImage> {
        self.generate_with(|pending| async move {
            generator
                .generate_image(
                    &pending.prompt,
                    &pending.product_image,
                    pending.style_image.as_ref(),
                )
                .await
        })
        .await
    }

    /// 在尝试时从环境读取凭据；凭据缺失在任何网络请求前失败。
    ///
    /// # Errors
    /// 见 [`Studio::generate`]。
    pub async fn generate_from_env(&mut self) -> Result<GeneratedImage> {
        self.generate_with(|pending| async move {
            let generator = Client::from_env()?.generator();
            generator
                .generate_image(
                    &pending.prompt,
                    &pending.product_image,
                    pending.style_image.as_ref(),
                )
                .await
        })
        .await
    }

    /// begin → call → finish。future 在完成前被丢弃时等同于 [`Studio::cancel_generation`]。
    ///
    /// # Errors
    /// 见 [`Studio::begin_generation`] 与 [`Studio::finish_generation`]。
    pub async fn generate_with<F, Fut>(&mut self, call: F) -> Result<GeneratedImage>
    where
        F: FnOnce(PendingGeneration) -> Fut,
        Fut: Future<Output = Result<GeneratedImage>>,
    {
        let pending = self.begin_generation()?;
        let attempt = AttemptGuard { studio: Some(self) };
        let result = call(pending).await;
        attempt.finish(result)
    }

    fn show_error(&mut self, err: &Error) {
        let message = err.to_string();
        self.output = OutputPane::Error {
            kind: err.kind(),
            message: message.clone(),
        };
        self.error_message = Some(message);
    }

    fn refresh_prompt(&mut self) {
        self.inputs = self.inputs.with_style_image(self.style.is_some());
        self.prompt = self.inputs.build();
    }
}

/// 进行中的尝试；未调用 `finish` 就被丢弃时取消该尝试。
struct AttemptGuard<'a> {
    studio: Option<&'a mut Studio>,
}

impl AttemptGuard<'_> {
    fn finish(mut self, result: Result<GeneratedImage>) -> Result<GeneratedImage> {
        match self.studio.take() {
            Some(studio) => studio.finish_generation(result),
            None => result,
        }
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if let Some(studio) = self.studio.take() {
            studio.cancel_generation();
        }
    }
}
