use serde::{Deserialize, Serialize};

/// Number of landmarks in the single-pose model topology.
pub const KEYPOINT_COUNT: usize = 17;

/// Tracked body landmarks, in the model's fixed output order. Skeleton
/// edges index into this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const ALL: [BodyPart; KEYPOINT_COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "left_eye",
            BodyPart::RightEye => "right_eye",
            BodyPart::LeftEar => "left_ear",
            BodyPart::RightEar => "right_ear",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftElbow => "left_elbow",
            BodyPart::RightElbow => "right_elbow",
            BodyPart::LeftWrist => "left_wrist",
            BodyPart::RightWrist => "right_wrist",
            BodyPart::LeftHip => "left_hip",
            BodyPart::RightHip => "right_hip",
            BodyPart::LeftKnee => "left_knee",
            BodyPart::RightKnee => "right_knee",
            BodyPart::LeftAnkle => "left_ankle",
            BodyPart::RightAnkle => "right_ankle",
        }
    }
}

/// A named, scored 2D landmark in frame pixel coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: BodyPart,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f32, y: f32, score: f32) -> Self {
        Self { part, x, y, score }
    }

    pub fn is_confident(&self, threshold: f32) -> bool {
        self.score > threshold
    }
}

/// One immutable per-frame pose estimate: a keypoint per tracked body
/// part, in `BodyPart::ALL` order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseSample {
    pub keypoints: Vec<Keypoint>,
}

impl PoseSample {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    pub fn keypoint(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.part == part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_order_matches_indices() {
        for (index, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), index);
        }
    }

    #[test]
    fn confidence_is_a_strict_comparison() {
        let kp = Keypoint::new(BodyPart::Nose, 10.0, 20.0, 0.3);
        assert!(!kp.is_confident(0.3));
        assert!(kp.is_confident(0.29));
    }
}
