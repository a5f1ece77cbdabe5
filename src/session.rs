use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::catalog::{Catalog, CategoryId};
use crate::config::GameConfig;
use crate::game::{AnswerOutcome, ArtworkLoader, GameController, GameSnapshot, ItemView, RoundState};
use crate::pose::PoseSource;
use crate::render::Surface;
use crate::sampler::{SamplerController, SamplerDeps};
use crate::video::VideoSource;

/// Where session startup currently stands, rendered as the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Booting,
    ModelLoaded,
    InitializingVideo,
    Sorting,
}

impl SessionPhase {
    pub fn status_line(&self) -> &'static str {
        match self {
            SessionPhase::Booting => "Loading...",
            SessionPhase::ModelLoaded => "Model loaded",
            SessionPhase::InitializingVideo => "Initializing video...",
            SessionPhase::Sorting => "Sort the waste!",
        }
    }
}

/// Which of the two startup preconditions have completed. Each flag is set
/// once per session and never reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadinessFlags {
    pub model_ready: bool,
    pub video_ready: bool,
}

impl ReadinessFlags {
    pub fn all_ready(&self) -> bool {
        self.model_ready && self.video_ready
    }

    fn phase(&self) -> SessionPhase {
        match (self.model_ready, self.video_ready) {
            (false, false) => SessionPhase::Booting,
            (true, false) => SessionPhase::ModelLoaded,
            (false, true) => SessionPhase::InitializingVideo,
            (true, true) => SessionPhase::Sorting,
        }
    }
}

/// Read-only view handed to the presentation layer, refreshed after every
/// state transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: String,
    pub score: u32,
    pub time_remaining: u32,
    pub item: Option<ItemView>,
    pub game_over: bool,
}

fn compose(phase: SessionPhase, game: &GameSnapshot) -> SessionSnapshot {
    SessionSnapshot {
        status: phase.status_line().to_string(),
        score: game.score,
        time_remaining: game.time_remaining,
        item: game.item.clone(),
        game_over: game.game_over,
    }
}

struct SessionShared {
    config: GameConfig,
    readiness: Mutex<ReadinessFlags>,
    sampler: Mutex<SamplerController>,
    video: Arc<dyn VideoSource>,
    pose: Arc<dyn PoseSource>,
    surface: Arc<Mutex<Box<dyn Surface>>>,
    game: GameController,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionShared {
    async fn publish(&self) {
        let phase = self.readiness.lock().await.phase();
        let game = self.game.snapshot().await;
        self.snapshot_tx.send_replace(compose(phase, &game));
    }

    /// Start the sampler once every precondition holds: model ready, video
    /// ready, and the current item renderable. Called on each transition,
    /// so the loop starts on whichever lands last.
    async fn maybe_start_sampler(&self) {
        if !self.readiness.lock().await.all_ready() {
            return;
        }
        if self.game.current_artwork().await.is_none() {
            return;
        }

        let mut sampler = self.sampler.lock().await;
        if sampler.is_active() {
            return;
        }

        let deps = SamplerDeps {
            config: self.config.clone(),
            video: Arc::clone(&self.video),
            pose: Arc::clone(&self.pose),
            surface: Arc::clone(&self.surface),
            game: self.game.clone(),
        };
        if let Err(err) = sampler.start(deps) {
            warn!("sampler failed to start: {err:#}");
        }
    }
}

/// One play session: the readiness lifecycle, the round state machine, and
/// the sampler loop, wired together. Constructed once per camera session
/// and torn down with `shutdown`.
pub struct Session {
    id: String,
    game: GameController,
    shared: Arc<SessionShared>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn new(
        config: GameConfig,
        catalog: Catalog,
        loader: Arc<dyn ArtworkLoader>,
        video: Arc<dyn VideoSource>,
        pose: Arc<dyn PoseSource>,
        surface: Arc<Mutex<Box<dyn Surface>>>,
    ) -> Self {
        let game = GameController::new(config.clone(), catalog, loader);
        Self::from_parts(game, config, video, pose, surface)
    }

    /// Deterministic item picks for tests.
    pub fn with_seed(
        seed: u64,
        config: GameConfig,
        catalog: Catalog,
        loader: Arc<dyn ArtworkLoader>,
        video: Arc<dyn VideoSource>,
        pose: Arc<dyn PoseSource>,
        surface: Arc<Mutex<Box<dyn Surface>>>,
    ) -> Self {
        let game = GameController::with_seed(seed, config.clone(), catalog, loader);
        Self::from_parts(game, config, video, pose, surface)
    }

    fn from_parts(
        game: GameController,
        config: GameConfig,
        video: Arc<dyn VideoSource>,
        pose: Arc<dyn PoseSource>,
        surface: Arc<Mutex<Box<dyn Surface>>>,
    ) -> Self {
        let initial = compose(SessionPhase::Booting, &RoundState::new().snapshot());
        let (snapshot_tx, _) = watch::channel(initial);

        let shared = Arc::new(SessionShared {
            config,
            readiness: Mutex::new(ReadinessFlags::default()),
            sampler: Mutex::new(SamplerController::new()),
            video,
            pose,
            surface,
            game: game.clone(),
            snapshot_tx,
        });

        // Observe game transitions: republish the session snapshot and,
        // once the item turns renderable, complete the sampler's last
        // startup precondition.
        let watcher = {
            let shared = Arc::clone(&shared);
            let mut game_rx = game.subscribe();
            tokio::spawn(async move {
                while game_rx.changed().await.is_ok() {
                    shared.publish().await;
                    let renderable = {
                        let snapshot = game_rx.borrow_and_update();
                        snapshot
                            .item
                            .as_ref()
                            .map(|item| item.renderable)
                            .unwrap_or(false)
                    };
                    if renderable {
                        shared.maybe_start_sampler().await;
                    }
                }
            })
        };

        Self {
            id: Uuid::new_v4().to_string(),
            game,
            shared,
            watcher: Mutex::new(Some(watcher)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let phase = self.shared.readiness.lock().await.phase();
        let game = self.game.snapshot().await;
        compose(phase, &game)
    }

    /// The pose model finished initializing. The first round begins here.
    pub async fn notify_model_ready(&self) {
        {
            let mut flags = self.shared.readiness.lock().await;
            if flags.model_ready {
                return;
            }
            flags.model_ready = true;
        }
        info!("session {}: pose model ready", self.id);
        self.game.begin().await;
        self.shared.publish().await;
        self.shared.maybe_start_sampler().await;
    }

    /// The video feed reported real dimensions.
    pub async fn notify_video_ready(&self) {
        {
            let mut flags = self.shared.readiness.lock().await;
            if flags.video_ready {
                return;
            }
            flags.video_ready = true;
        }
        info!("session {}: video ready", self.id);
        self.shared.publish().await;
        self.shared.maybe_start_sampler().await;
    }

    /// Player sorted the current item into `category`.
    pub async fn answer(&self, category: CategoryId) -> AnswerOutcome {
        self.game.answer(category).await
    }

    /// Player asked for a fresh game after game over.
    pub async fn restart(&self) {
        self.game.restart().await;
    }

    /// Tear down the sampler, the round ticker, and the snapshot watcher.
    /// Safe to call once the presentation surface is going away.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(handle) = self.watcher.lock().await.take() {
            handle.abort();
        }
        self.shared.sampler.lock().await.stop().await?;
        self.game.shutdown().await;
        info!("session {} shut down", self.id);
        Ok(())
    }
}
