use anyhow::{bail, Result};

/// Adjacent keypoint pairs, drawn as skeleton lines when both endpoints are
/// confident. Indices refer to `BodyPart::ALL` order.
pub const SKELETON: [[usize; 2]; 16] = [
    [0, 1],   // nose to left eye
    [0, 2],   // nose to right eye
    [1, 3],   // left eye to left ear
    [2, 4],   // right eye to right ear
    [5, 6],   // left shoulder to right shoulder
    [5, 7],   // left shoulder to left elbow
    [7, 9],   // left elbow to left wrist
    [6, 8],   // right shoulder to right elbow
    [8, 10],  // right elbow to right wrist
    [5, 11],  // left shoulder to left hip
    [6, 12],  // right shoulder to right hip
    [11, 12], // left hip to right hip
    [11, 13], // left hip to left knee
    [13, 15], // left knee to left ankle
    [12, 14], // right hip to right knee
    [14, 16], // right knee to right ankle
];

/// Confirms every skeleton edge points inside a pose of `keypoint_count`
/// entries. Must be re-run if a pose model with a different topology is
/// swapped in.
pub fn validate_edges(keypoint_count: usize) -> Result<()> {
    for [a, b] in SKELETON {
        if a >= keypoint_count || b >= keypoint_count {
            bail!("skeleton edge [{a}, {b}] is out of range for {keypoint_count} keypoints");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::KEYPOINT_COUNT;

    #[test]
    fn edges_fit_the_current_topology() {
        validate_edges(KEYPOINT_COUNT).unwrap();
    }

    #[test]
    fn edges_are_rejected_for_a_smaller_model() {
        assert!(validate_edges(10).is_err());
    }
}
