//! Scoped display handles for selected images.
//!
//! A [`PreviewHandle`] stands in for a temporary display reference (the
//! browser's object URL). It is acquired when an image is selected and
//! released when dropped, so replacing or removing an image, or discarding
//! the session, frees it deterministically.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::codec::{self, UploadedImage};
use crate::error::Result;

#[derive(Debug, Default)]
struct RegistryState {
    next_id: AtomicU64,
    live: AtomicUsize,
}

/// 预览句柄的分配器。
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<RegistryState>,
}

impl PreviewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 为图像分配一个预览句柄。
    #[must_use]
    pub fn acquire(&self, image: &UploadedImage) -> PreviewHandle {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let live = self.state.live.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(id, live, mime_type = image.mime_type(), "preview acquired");
        PreviewHandle {
            id,
            image: image.clone(),
            state: Arc::clone(&self.state),
        }
    }

    /// 当前尚未释放的句柄数。
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }
}

/// 一张已选图像的展示引用，`Drop` 时释放。
pub struct PreviewHandle {
    id: u64,
    image: UploadedImage,
    state: Arc<RegistryState>,
}

impl PreviewHandle {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// 稳定的句柄标识，形如 `preview:3`。
    #[must_use]
    pub fn uri(&self) -> String {
        format!("preview:{}", self.id)
    }

    #[must_use]
    pub const fn image(&self) -> &UploadedImage {
        &self.image
    }

    /// 可直接渲染的 data URI。
    ///
    /// # Errors
    /// 图像内容为空时返回 [`crate::Error::Encoding`]。
    pub fn data_uri(&self) -> Result<String> {
        codec::encode(&self.image).map(|blob| blob.to_data_uri())
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("image", &self.image)
            .finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let live = self.state.live.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::debug!(id = self.id, live, "preview released");
    }
}
