use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::GameConfig;
use crate::game::GameController;
use crate::pose::{PoseSample, PoseSource};
use crate::render::{draw_overlay, Surface};
use crate::video::VideoSource;

/// Everything the sampler loop reads, injected once at start.
pub struct SamplerDeps {
    pub config: GameConfig,
    pub video: Arc<dyn VideoSource>,
    pub pose: Arc<dyn PoseSource>,
    pub surface: Arc<Mutex<Box<dyn Surface>>>,
    pub game: GameController,
}

/// Recurring sampling task. Each scheduling tick may issue one pose
/// estimate; at most one estimate is in flight at a time, and a late
/// result renders when it lands instead of queueing. Estimates that fail
/// skip that frame's render and nothing else.
pub async fn sampler_loop(deps: SamplerDeps, cancel_token: CancellationToken) {
    let mut ticker = interval(Duration::from_millis(deps.config.sample_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let decimation = u64::from(deps.config.decimation.max(1));
    let mut frames_seen: u64 = 0;
    let mut in_flight: Option<JoinHandle<Result<Vec<PoseSample>>>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if in_flight.is_none() {
                    let frame = deps.video.current_frame();
                    // a camera that has not warmed up reports 0x0
                    if frame.has_area() {
                        let pose = Arc::clone(&deps.pose);
                        in_flight = Some(tokio::spawn(async move {
                            pose.estimate(frame).await
                        }));
                    }
                }
            }
            result = async { in_flight.as_mut().expect("in-flight estimate").await },
                if in_flight.is_some() =>
            {
                in_flight = None;
                match result {
                    Ok(Ok(poses)) => {
                        if let Some(sample) = poses.first() {
                            // count frames that produced a pose, render every Kth
                            if frames_seen % decimation == 0 {
                                render_pass(&deps, sample).await;
                            }
                            frames_seen = frames_seen.wrapping_add(1);
                        }
                    }
                    Ok(Err(err)) => warn!("pose estimate failed, skipping frame: {err:#}"),
                    Err(err) => error!("pose estimate task aborted: {err}"),
                }
            }
            _ = cancel_token.cancelled() => {
                debug!("sampler loop shutting down");
                break;
            }
        }
    }
}

async fn render_pass(deps: &SamplerDeps, sample: &PoseSample) {
    let frame = deps.video.current_frame();
    if !frame.has_area() {
        return;
    }
    let artwork = deps.game.current_artwork().await;

    let mut surface = deps.surface.lock().await;
    draw_overlay(
        surface.as_mut(),
        &frame,
        &sample.keypoints,
        artwork.as_deref(),
        &deps.config.overlay,
    );
}
