use anyhow::Result;
use async_trait::async_trait;
use image::RgbaImage;

/// Injected artwork-fetch capability. A failed load leaves the item
/// non-renderable and the overlay simply omits it; category judging does
/// not depend on artwork being present.
#[async_trait]
pub trait ArtworkLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<RgbaImage>;
}

/// Decode fetched bytes into the RGBA form the surface draws.
pub fn decode_artwork(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}
