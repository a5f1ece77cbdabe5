use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// One live video frame. Pixels are shared so the frame can be sampled
/// repeatedly without copying or consuming it.
#[derive(Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<RgbaImage>,
}

impl VideoFrame {
    pub fn new(pixels: RgbaImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// The sampler only requests estimates for frames with real dimensions;
    /// a camera that has not warmed up yet reports 0x0.
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Live video feed. Implementations must make `current_frame` cheap: it is
/// called at least once per sampler tick.
pub trait VideoSource: Send + Sync {
    fn current_frame(&self) -> VideoFrame;
}
