use image::RgbaImage;

use super::Surface;
use crate::config::OverlayConfig;
use crate::pose::{BodyPart, Keypoint, SKELETON};
use crate::video::VideoFrame;

/// Composes one output frame: the live video, the item sprite floating
/// above the head, confident keypoint markers, and skeleton edges.
///
/// The sprite is skipped silently when no artwork is available or the nose
/// keypoint is not confident; an edge is omitted entirely when either
/// endpoint is below threshold. Identical inputs draw identical pixels.
pub fn draw_overlay(
    surface: &mut dyn Surface,
    frame: &VideoFrame,
    keypoints: &[Keypoint],
    anchor: Option<&RgbaImage>,
    config: &OverlayConfig,
) {
    surface.clear();
    surface.draw_frame(frame);

    if let Some(sprite) = anchor {
        let head = keypoints
            .iter()
            .find(|k| k.part == BodyPart::Nose && k.is_confident(config.confidence_threshold));
        if let Some(head) = head {
            let half = config.anchor_size_px as f32 / 2.0;
            surface.draw_sprite(
                sprite,
                head.x - half,
                head.y - half - config.anchor_y_offset_px,
                config.anchor_size_px,
            );
        }
    }

    for keypoint in keypoints {
        if keypoint.is_confident(config.confidence_threshold) {
            surface.fill_circle(
                keypoint.x,
                keypoint.y,
                config.marker_radius_px,
                config.marker_color,
            );
        }
    }

    for [a, b] in SKELETON {
        let (Some(start), Some(end)) = (keypoints.get(a), keypoints.get(b)) else {
            continue;
        };
        if start.is_confident(config.confidence_threshold)
            && end.is_confident(config.confidence_threshold)
        {
            surface.draw_line(
                (start.x, start.y),
                (end.x, end.y),
                config.line_thickness_px,
                config.line_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum DrawCall {
        Clear,
        Frame,
        Sprite { x: f32, y: f32, size: u32 },
        Circle { x: f32, y: f32 },
        Line { from: (f32, f32), to: (f32, f32) },
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<DrawCall>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn draw_frame(&mut self, _frame: &VideoFrame) {
            self.calls.push(DrawCall::Frame);
        }

        fn draw_sprite(&mut self, _sprite: &RgbaImage, x: f32, y: f32, size: u32) {
            self.calls.push(DrawCall::Sprite { x, y, size });
        }

        fn fill_circle(&mut self, cx: f32, cy: f32, _radius: i32, _color: [u8; 4]) {
            self.calls.push(DrawCall::Circle { x: cx, y: cy });
        }

        fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), _thickness: u32, _color: [u8; 4]) {
            self.calls.push(DrawCall::Line { from, to });
        }
    }

    impl RecordingSurface {
        fn sprites(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Sprite { .. }))
                .collect()
        }

        fn lines(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Line { .. }))
                .collect()
        }

        fn circles(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Circle { .. }))
                .collect()
        }
    }

    fn frame() -> VideoFrame {
        VideoFrame {
            width: 640,
            height: 480,
            pixels: Arc::new(RgbaImage::new(640, 480)),
        }
    }

    fn artwork() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]))
    }

    /// A full pose with every keypoint at the given score.
    fn pose_with_score(score: f32) -> Vec<Keypoint> {
        BodyPart::ALL
            .iter()
            .enumerate()
            .map(|(i, part)| Keypoint::new(*part, 10.0 * i as f32, 5.0 * i as f32, score))
            .collect()
    }

    #[test]
    fn anchor_is_skipped_when_nose_is_below_threshold() {
        let mut keypoints = pose_with_score(0.9);
        keypoints[0].score = 0.3; // at threshold, not above

        let mut surface = RecordingSurface::default();
        let art = artwork();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            Some(&art),
            &OverlayConfig::default(),
        );

        assert!(surface.sprites().is_empty());
    }

    #[test]
    fn anchor_is_skipped_without_artwork() {
        let keypoints = pose_with_score(0.9);
        let mut surface = RecordingSurface::default();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            None,
            &OverlayConfig::default(),
        );

        assert!(surface.sprites().is_empty());
        // everything else still draws
        assert_eq!(surface.circles().len(), 17);
        assert_eq!(surface.lines().len(), SKELETON.len());
    }

    #[test]
    fn anchor_floats_above_the_nose() {
        let mut keypoints = pose_with_score(0.9);
        keypoints[0].x = 320.0;
        keypoints[0].y = 200.0;

        let mut surface = RecordingSurface::default();
        let art = artwork();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            Some(&art),
            &OverlayConfig::default(),
        );

        assert_eq!(
            surface.sprites(),
            vec![&DrawCall::Sprite {
                x: 320.0 - 75.0,
                y: 200.0 - 75.0 - 150.0,
                size: 150,
            }]
        );
    }

    #[test]
    fn weak_endpoint_omits_the_whole_edge() {
        let mut keypoints = pose_with_score(0.9);
        // left shoulder participates in edges [5,6], [5,7], [5,11]
        keypoints[BodyPart::LeftShoulder.index()].score = 0.1;

        let mut surface = RecordingSurface::default();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            None,
            &OverlayConfig::default(),
        );

        assert_eq!(surface.lines().len(), SKELETON.len() - 3);
        let shoulder = &keypoints[BodyPart::LeftShoulder.index()];
        for call in surface.lines() {
            if let DrawCall::Line { from, to } = call {
                assert_ne!(*from, (shoulder.x, shoulder.y));
                assert_ne!(*to, (shoulder.x, shoulder.y));
            }
        }
    }

    #[test]
    fn weak_keypoints_draw_no_markers() {
        let keypoints = pose_with_score(0.2);
        let mut surface = RecordingSurface::default();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            None,
            &OverlayConfig::default(),
        );

        assert!(surface.circles().is_empty());
        assert!(surface.lines().is_empty());
        // the video frame itself is always drawn
        assert_eq!(surface.calls[0], DrawCall::Clear);
        assert_eq!(surface.calls[1], DrawCall::Frame);
    }

    #[test]
    fn short_pose_never_panics_on_edge_lookup() {
        // a pose with fewer keypoints than the topology expects
        let keypoints = pose_with_score(0.9)[..5].to_vec();
        let mut surface = RecordingSurface::default();
        draw_overlay(
            &mut surface,
            &frame(),
            &keypoints,
            None,
            &OverlayConfig::default(),
        );

        // only the face edges fit inside 5 keypoints
        assert_eq!(surface.lines().len(), 4);
    }
}
