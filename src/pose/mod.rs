pub mod keypoint;
pub mod source;
pub mod topology;

pub use keypoint::{BodyPart, Keypoint, PoseSample, KEYPOINT_COUNT};
pub use source::PoseSource;
pub use topology::{validate_edges, SKELETON};
