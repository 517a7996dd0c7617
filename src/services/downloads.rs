use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::models::Quality;
use crate::services::host::LinkOpener;
use crate::services::notifications::NoticeBoard;

/// Cosmetic progress of a card's download button
///
/// `idle → preparing → (opened | open_failed) → idle`. Opening a link gives
/// no completion signal, so the return to idle happens on a fixed timer
/// counted from the click, whatever the outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadPhase {
    #[default]
    Idle,
    Preparing,
    Opened,
    OpenFailed,
}

impl DownloadPhase {
    /// Button is disabled and shows the busy indicator
    pub fn is_busy(&self) -> bool {
        !matches!(self, DownloadPhase::Idle)
    }
}

/// Per-card UI state kept between renders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CardState {
    pub phase: DownloadPhase,
    /// Quality last used by one of the card's actions
    pub quality: Quality,
    #[serde(skip)]
    armed: u64,
}

impl CardState {
    pub fn new(phase: DownloadPhase, quality: Quality) -> Self {
        Self {
            phase,
            quality,
            armed: 0,
        }
    }
}

/// Drives the download button state machine for every card
#[derive(Clone)]
pub struct DownloadTracker {
    cards: Arc<RwLock<HashMap<String, CardState>>>,
    arm_counter: Arc<AtomicU64>,
    opener: Arc<dyn LinkOpener>,
    notices: NoticeBoard,
    open_delay: Duration,
    reset_after: Duration,
}

impl DownloadTracker {
    pub fn new(
        opener: Arc<dyn LinkOpener>,
        notices: NoticeBoard,
        open_delay: Duration,
        reset_after: Duration,
    ) -> Self {
        Self {
            cards: Arc::new(RwLock::new(HashMap::new())),
            arm_counter: Arc::new(AtomicU64::new(1)),
            opener,
            notices,
            open_delay,
            reset_after,
        }
    }

    pub async fn card_state(&self, video_id: &str) -> CardState {
        self.cards
            .read()
            .await
            .get(video_id)
            .copied()
            .unwrap_or_default()
    }

    /// States of every card that has been touched
    pub async fn snapshot(&self) -> HashMap<String, CardState> {
        self.cards.read().await.clone()
    }

    pub async fn remember_quality(&self, video_id: &str, quality: Quality) {
        let mut cards = self.cards.write().await;
        cards.entry(video_id.to_string()).or_default().quality = quality;
    }

    /// Forgets cards outside `current_ids`; cards mid-download are kept
    /// until their timer finishes
    pub async fn retain_cards<'a, I>(&self, current_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<&str> = current_ids.into_iter().collect();
        let mut cards = self.cards.write().await;
        let before = cards.len();
        cards.retain(|id, card| card.phase.is_busy() || keep.contains(id.as_str()));

        let pruned = before - cards.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped card states outside the current results");
        }
    }

    /// Handles a download click
    ///
    /// Returns `None` when the card is already busy; the click is ignored.
    /// Otherwise the card enters `preparing` and a background task opens
    /// `url` after the open delay and resets the card after the reset delay.
    pub async fn begin(
        &self,
        video_id: &str,
        quality: Quality,
        url: String,
    ) -> Option<JoinHandle<()>> {
        let token = {
            let mut cards = self.cards.write().await;
            let card = cards.entry(video_id.to_string()).or_default();
            if card.phase.is_busy() {
                tracing::debug!(video_id = %video_id, "Download already in progress, click ignored");
                return None;
            }

            let token = self.arm_counter.fetch_add(1, Ordering::SeqCst);
            card.phase = DownloadPhase::Preparing;
            card.quality = quality;
            card.armed = token;
            token
        };

        self.notices.info("Preparing download…").await;

        tracing::info!(
            video_id = %video_id,
            quality = %quality,
            "Download preparing"
        );

        let tracker = self.clone();
        let video_id = video_id.to_string();
        Some(tokio::spawn(async move {
            tracker.run(video_id, token, url).await;
        }))
    }

    async fn run(&self, video_id: String, token: u64, url: String) {
        tokio::time::sleep(self.open_delay).await;

        let phase = match self.opener.open(&url).await {
            Ok(()) => {
                self.notices.info("Download opened in new tab").await;
                tracing::info!(video_id = %video_id, "Download link opened");
                DownloadPhase::Opened
            }
            Err(e) => {
                self.notices.error(e.user_message()).await;
                tracing::warn!(video_id = %video_id, error = %e, "Failed to open download link");
                DownloadPhase::OpenFailed
            }
        };
        self.transition(&video_id, token, phase).await;

        tokio::time::sleep(self.reset_after.saturating_sub(self.open_delay)).await;
        self.transition(&video_id, token, DownloadPhase::Idle).await;
    }

    /// Applies `phase` only if the card is still armed with `token`
    async fn transition(&self, video_id: &str, token: u64, phase: DownloadPhase) {
        let mut cards = self.cards.write().await;
        if let Some(card) = cards.get_mut(video_id) {
            if card.armed == token {
                card.phase = phase;
            }
        }
    }
}
