use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{CategoryId, Item};

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RoundStatus {
    #[default]
    Idle,
    Active,
    GameOver,
}

/// What an answer did. On `Correct` the controller swaps the next item in
/// under the same lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// Selection arrived outside an active round and was dropped. The
    /// presentation layer withholds the action after game over; the state
    /// machine drops it regardless.
    Ignored,
}

/// The item currently being sorted. Artwork resolves asynchronously after
/// the pick; until then the item is not renderable and the overlay skips it.
#[derive(Debug, Clone)]
pub struct ActiveItem {
    pub item: Item,
    pub artwork: Option<Arc<RgbaImage>>,
}

impl ActiveItem {
    pub fn renderable(&self) -> bool {
        self.artwork.is_some()
    }
}

/// The round state machine. Exclusively owned by the `GameController`;
/// everything else sees read-only snapshots.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub status: RoundStatus,
    pub score: u32,
    pub time_remaining: u32,
    pub current: Option<ActiveItem>,
    pub started_at: Option<DateTime<Utc>>,
    pick_seq: u64,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a round with `item`. Returns the pick sequence the artwork
    /// load must present when it resolves.
    pub fn begin_round(&mut self, item: Item, round_secs: u32, now: DateTime<Utc>) -> u64 {
        self.status = RoundStatus::Active;
        self.time_remaining = round_secs;
        self.started_at = Some(now);
        self.install_item(item)
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Judge a selection against the current item's category. The round
    /// clock keeps running across correct answers; only begin/expiry touch
    /// it.
    pub fn answer(&mut self, category: CategoryId) -> AnswerOutcome {
        if self.status != RoundStatus::Active {
            return AnswerOutcome::Ignored;
        }
        let Some(current) = &self.current else {
            return AnswerOutcome::Ignored;
        };

        if current.item.category == category {
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            self.score = self.score.saturating_sub(1);
            AnswerOutcome::Wrong
        }
    }

    /// Swap in the next item after a correct answer. Must run under the
    /// same state lock as `answer` so concurrent ticks and renders never
    /// observe a half-swapped item.
    pub fn replace_item(&mut self, item: Item) -> u64 {
        self.install_item(item)
    }

    fn install_item(&mut self, item: Item) -> u64 {
        self.pick_seq += 1;
        self.current = Some(ActiveItem {
            item,
            artwork: None,
        });
        self.pick_seq
    }

    /// One second elapsed. Applies the expiry penalty exactly once; ticks
    /// after game over are no-ops.
    pub fn tick(&mut self) -> bool {
        if self.status != RoundStatus::Active {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.score = self.score.saturating_sub(1);
            self.status = RoundStatus::GameOver;
        }
        true
    }

    pub fn is_game_over(&self) -> bool {
        self.status == RoundStatus::GameOver
    }

    /// Attach resolved artwork if `seq` still names the current pick. A
    /// slow load racing a faster item swap resolves stale and is dropped.
    pub fn merge_artwork(&mut self, seq: u64, artwork: Arc<RgbaImage>) -> bool {
        if seq != self.pick_seq {
            return false;
        }
        match &mut self.current {
            Some(active) => {
                active.artwork = Some(artwork);
                true
            }
            None => false,
        }
    }

    pub fn artwork(&self) -> Option<Arc<RgbaImage>> {
        self.current.as_ref().and_then(|c| c.artwork.clone())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.score,
            time_remaining: self.time_remaining,
            item: self.current.as_ref().map(|active| ItemView {
                name: active.item.name.clone(),
                category: active.item.category,
                renderable: active.renderable(),
            }),
            game_over: self.is_game_over(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub name: String,
    pub category: CategoryId,
    pub renderable: bool,
}

/// Read-only view handed to the timer, sampler, and presentation layers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub status: RoundStatus,
    pub score: u32,
    pub time_remaining: u32,
    pub item: Option<ItemView>,
    pub game_over: bool,
}
