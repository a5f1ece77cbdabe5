use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use image::RgbaImage;
use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};

use super::artwork::ArtworkLoader;
use super::state::{AnswerOutcome, GameSnapshot, RoundState, RoundStatus};
use crate::catalog::{Catalog, CategoryId, Item};
use crate::config::GameConfig;

/// Owns the round state machine. Arms the one-and-only countdown ticker,
/// picks items, resolves their artwork, and publishes a snapshot after
/// every transition.
#[derive(Clone)]
pub struct GameController {
    state: Arc<Mutex<RoundState>>,
    catalog: Arc<Catalog>,
    config: GameConfig,
    loader: Arc<dyn ArtworkLoader>,
    rng: Arc<StdMutex<StdRng>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    snapshot_tx: Arc<watch::Sender<GameSnapshot>>,
}

impl GameController {
    pub fn new(config: GameConfig, catalog: Catalog, loader: Arc<dyn ArtworkLoader>) -> Self {
        Self::with_rng(StdRng::from_entropy(), config, catalog, loader)
    }

    /// Deterministic item picks for tests.
    pub fn with_seed(
        seed: u64,
        config: GameConfig,
        catalog: Catalog,
        loader: Arc<dyn ArtworkLoader>,
    ) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), config, catalog, loader)
    }

    fn with_rng(
        rng: StdRng,
        config: GameConfig,
        catalog: Catalog,
        loader: Arc<dyn ArtworkLoader>,
    ) -> Self {
        let state = RoundState::new();
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            catalog: Arc::new(catalog),
            config,
            loader,
            rng: Arc::new(StdMutex::new(rng)),
            ticker: Arc::new(Mutex::new(None)),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Artwork of the current item, if it has resolved.
    pub async fn current_artwork(&self) -> Option<Arc<RgbaImage>> {
        self.state.lock().await.artwork()
    }

    /// Start the first round. Callable from idle or game over; a round
    /// that is already running is left alone.
    pub async fn begin(&self) {
        if self.state.lock().await.status == RoundStatus::Active {
            warn!("begin ignored: a round is already active");
            return;
        }
        self.begin_round().await;
    }

    /// Zero the score, then begin a fresh round.
    pub async fn restart(&self) {
        self.state.lock().await.reset_score();
        self.begin_round().await;
    }

    async fn begin_round(&self) {
        let item = self.pick_item();
        let url = item.artwork_url.clone();
        let seq = {
            let mut state = self.state.lock().await;
            state.begin_round(item, self.config.round_secs, Utc::now())
        };
        self.spawn_artwork_load(url, seq);
        self.spawn_ticker().await;
        self.publish().await;
    }

    /// Sort the current item into `category`. No-op after game over.
    pub async fn answer(&self, category: CategoryId) -> AnswerOutcome {
        let (outcome, followup) = {
            let mut state = self.state.lock().await;
            let outcome = state.answer(category);
            let followup = if outcome == AnswerOutcome::Correct {
                // the next item swaps in under this lock; ticks and renders
                // never see the score and item out of step
                let item = self.pick_item();
                let url = item.artwork_url.clone();
                let seq = state.replace_item(item);
                Some((url, seq))
            } else {
                None
            };
            (outcome, followup)
        };

        if let Some((url, seq)) = followup {
            self.spawn_artwork_load(url, seq);
        }
        if outcome != AnswerOutcome::Ignored {
            self.publish().await;
        }
        outcome
    }

    /// Cancel the pending ticker. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    fn pick_item(&self) -> Item {
        let mut rng = self.rng.lock().unwrap();
        self.catalog.pick(&mut rng)
    }

    /// Arm the countdown. Any previously armed ticker is aborted first so
    /// exactly one is ever pending; a second live ticker would run the
    /// clock at double speed.
    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let snapshot_tx = self.snapshot_tx.clone();
        let period = Duration::from_secs(1);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;

                let (snapshot, done) = {
                    let mut guard = state.lock().await;
                    if guard.status != RoundStatus::Active {
                        break;
                    }
                    guard.tick();
                    (guard.snapshot(), guard.is_game_over())
                };

                snapshot_tx.send_replace(snapshot);

                if done {
                    debug!("round clock expired");
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    fn spawn_artwork_load(&self, url: String, seq: u64) {
        let loader = self.loader.clone();
        let state = self.state.clone();
        let snapshot_tx = self.snapshot_tx.clone();

        tokio::spawn(async move {
            match loader.load(&url).await {
                Ok(img) => {
                    let snapshot = {
                        let mut guard = state.lock().await;
                        if guard.merge_artwork(seq, Arc::new(img)) {
                            Some(guard.snapshot())
                        } else {
                            None
                        }
                    };
                    match snapshot {
                        Some(snapshot) => {
                            snapshot_tx.send_replace(snapshot);
                        }
                        None => debug!("discarding stale artwork for {url}"),
                    }
                }
                Err(err) => warn!("artwork load failed for {url}: {err:#}"),
            }
        });
    }

    async fn publish(&self) {
        let snapshot = self.state.lock().await.snapshot();
        self.snapshot_tx.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use crate::catalog::Item;

    struct InstantLoader;

    #[async_trait]
    impl ArtworkLoader for InstantLoader {
        async fn load(&self, _url: &str) -> Result<RgbaImage> {
            Ok(RgbaImage::new(1, 1))
        }
    }

    fn controller(category: CategoryId) -> GameController {
        let catalog =
            Catalog::new(vec![Item::new("Only", category, "file:///only.png")]).unwrap();
        GameController::with_seed(42, GameConfig::default(), catalog, Arc::new(InstantLoader))
    }

    #[tokio::test(start_paused = true)]
    async fn clock_counts_down_once_per_second() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;

        time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(game.snapshot().await.time_remaining, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_penalizes_once_and_flags_game_over() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;
        game.answer(CategoryId::Recycle).await;
        game.answer(CategoryId::Recycle).await;

        time::sleep(Duration::from_secs(20)).await;
        let snapshot = game.snapshot().await;
        assert!(snapshot.game_over);
        assert_eq!(snapshot.time_remaining, 0);
        assert_eq!(snapshot.score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_never_double_ticks() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;
        time::sleep(Duration::from_millis(3100)).await;

        // restart mid-round replaces the armed ticker instead of stacking
        // a second one
        game.restart().await;
        time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(game.snapshot().await.time_remaining, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_score_and_clock() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;
        game.answer(CategoryId::Recycle).await;
        time::sleep(Duration::from_secs(20)).await;
        assert!(game.snapshot().await.game_over);

        game.restart().await;
        let snapshot = game.snapshot().await;
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.time_remaining, 15);
        assert!(!snapshot.game_over);

        // the fresh round has a live ticker again
        time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(game.snapshot().await.time_remaining, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn answers_after_expiry_are_dropped() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;
        time::sleep(Duration::from_secs(16)).await;
        assert!(game.snapshot().await.game_over);

        assert_eq!(game.answer(CategoryId::Recycle).await, AnswerOutcome::Ignored);
        assert_eq!(game.snapshot().await.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn artwork_resolves_into_the_current_item() {
        let game = controller(CategoryId::Recycle);
        game.begin().await;
        time::sleep(Duration::from_millis(10)).await;

        assert!(game.current_artwork().await.is_some());
        assert!(game.snapshot().await.item.unwrap().renderable);
    }
}
