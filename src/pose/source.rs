use anyhow::Result;
use async_trait::async_trait;

use super::PoseSample;
use crate::video::VideoFrame;

/// Injected pose-estimation capability: one asynchronous call per frame,
/// returning candidates ordered best-first. A failed call is a transient
/// per-frame condition, not a session error.
#[async_trait]
pub trait PoseSource: Send + Sync {
    async fn estimate(&self, frame: VideoFrame) -> Result<Vec<PoseSample>>;
}
