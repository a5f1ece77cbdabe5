//! Core engine for a camera-driven waste sorting game: a pose-estimated
//! player "wears" the current item above their head and sorts it into bins
//! against a per-round countdown. Camera, pose model, artwork fetching,
//! and presentation are injected behind traits.

pub mod catalog;
pub mod config;
pub mod game;
pub mod pose;
pub mod render;
pub mod sampler;
pub mod session;
pub mod video;

pub use catalog::{default_categories, Catalog, Category, CategoryId, Item};
pub use config::{ConfigStore, GameConfig, OverlayConfig};
pub use game::{
    decode_artwork, AnswerOutcome, ArtworkLoader, GameController, GameSnapshot, ItemView,
    RoundState, RoundStatus,
};
pub use pose::{
    validate_edges, BodyPart, Keypoint, PoseSample, PoseSource, KEYPOINT_COUNT, SKELETON,
};
pub use render::{draw_overlay, ImageSurface, Surface};
pub use sampler::{SamplerController, SamplerDeps};
pub use session::{ReadinessFlags, Session, SessionPhase, SessionSnapshot};
pub use video::{VideoFrame, VideoSource};

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
