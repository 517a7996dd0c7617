use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Oldest notices are dropped beyond this many
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient toast message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Time-limited toasts shown on the next page render
#[derive(Clone)]
pub struct NoticeBoard {
    notices: Arc<RwLock<Vec<Notice>>>,
    info_ttl: Duration,
    error_ttl: Duration,
}

impl NoticeBoard {
    pub fn new(info_ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            notices: Arc::new(RwLock::new(Vec::new())),
            info_ttl,
            error_ttl,
        }
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Info, message.into(), self.info_ttl).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.post(NoticeLevel::Error, message.into(), self.error_ttl).await;
    }

    async fn post(&self, level: NoticeLevel, message: String, ttl: Duration) {
        let posted_at = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());

        let mut notices = self.notices.write().await;
        notices.retain(|n| n.is_live(posted_at));
        notices.push(Notice {
            id: Uuid::new_v4(),
            level,
            message,
            posted_at,
            expires_at: posted_at + ttl,
        });

        let overflow = notices.len().saturating_sub(MAX_VISIBLE);
        notices.drain(..overflow);
    }

    /// Notices still live right now
    pub async fn active(&self) -> Vec<Notice> {
        self.active_at(Utc::now()).await
    }

    /// Notices still live at `now`; expired ones are pruned
    pub async fn active_at(&self, now: DateTime<Utc>) -> Vec<Notice> {
        let mut notices = self.notices.write().await;
        notices.retain(|n| n.is_live(now));
        notices.clone()
    }
}
