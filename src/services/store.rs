use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::SearchResultItem;

/// Identifies one search dispatch; later dispatches get larger tickets
pub type Ticket = u64;

/// The outcome of the most recent applied search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSession {
    pub last_query: String,
    pub last_results: Vec<SearchResultItem>,
    /// Total reported by the API; may exceed `last_results.len()`
    pub last_count: u64,
}

struct StoreInner {
    session: SearchSession,
    applied: Ticket,
}

/// In-memory holder for exactly one search generation
///
/// Writers must take a ticket before issuing their request. `replace` only
/// accepts a result whose ticket is newer than the one last applied, so a
/// slow response can never overwrite a faster, newer one.
#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<RwLock<StoreInner>>,
    next_ticket: Arc<AtomicU64>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                session: SearchSession::default(),
                applied: 0,
            })),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Reserves the next ticket for a dispatch about to start
    pub fn issue_ticket(&self) -> Ticket {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    /// Replaces the whole session if `ticket` is newer than the applied one
    ///
    /// Returns `false` when the result is stale and was dropped.
    pub async fn replace(&self, ticket: Ticket, session: SearchSession) -> bool {
        let mut inner = self.inner.write().await;
        if ticket <= inner.applied {
            return false;
        }
        inner.session = session;
        inner.applied = ticket;
        true
    }

    /// Copy of the current session for rendering
    pub async fn snapshot(&self) -> SearchSession {
        self.inner.read().await.session.clone()
    }

    /// Total count reported for the current result set
    pub async fn last_count(&self) -> u64 {
        self.inner.read().await.session.last_count
    }

    pub async fn last_query(&self) -> String {
        self.inner.read().await.session.last_query.clone()
    }
}
