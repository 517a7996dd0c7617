use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::MAX_RESULTS_CAP,
    services::{
        providers::SearchProvider,
        store::{ResultStore, SearchSession},
    },
};

/// What a completed dispatch did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub query: String,
    /// `maxResults` sent to the search API
    pub requested: u32,
    pub received: usize,
    pub count: u64,
    /// `false` when a newer search was applied first and this result was dropped
    pub applied: bool,
}

/// Turns form input into search API calls and updates the result store
#[derive(Clone)]
pub struct QueryDispatcher {
    provider: Arc<dyn SearchProvider>,
    store: ResultStore,
    default_max: u32,
}

impl QueryDispatcher {
    pub fn new(provider: Arc<dyn SearchProvider>, store: ResultStore, default_max: u32) -> Self {
        Self {
            provider,
            store,
            default_max: default_max.clamp(1, MAX_RESULTS_CAP),
        }
    }

    /// Runs one search
    ///
    /// A load-more asks for the whole enlarged window (`last_count + max`),
    /// since the API only serves "the first N" results. The store is left
    /// untouched on any error.
    pub async fn execute_search(
        &self,
        query_text: &str,
        max_input: Option<&str>,
        is_load_more: bool,
    ) -> AppResult<DispatchOutcome> {
        let query = query_text.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Please enter search text".to_string()));
        }

        let max = parse_max_results(max_input, self.default_max);
        let last_count = if is_load_more {
            self.store.last_count().await
        } else {
            0
        };
        let requested = request_size(max, last_count, is_load_more);

        let ticket = self.store.issue_ticket();
        tracing::info!(
            query = %query,
            requested,
            is_load_more,
            ticket,
            provider = self.provider.name(),
            "Dispatching search"
        );

        let page = self.provider.search(query, requested).await.map_err(|e| {
            tracing::warn!(query = %query, ticket, error = %e, "Search dispatch failed");
            e
        })?;

        let count = page.reported_count();
        let received = page.items.len();
        let applied = self
            .store
            .replace(
                ticket,
                SearchSession {
                    last_query: query.to_string(),
                    last_results: page.items,
                    last_count: count,
                },
            )
            .await;

        if !applied {
            tracing::info!(query = %query, ticket, "Dropped stale search response");
        }

        Ok(DispatchOutcome {
            query: query.to_string(),
            requested,
            received,
            count,
            applied,
        })
    }
}

/// Reads the "max results" field like a leading-integer parse
///
/// Missing, unparsable or zero input falls back to `default`; the result is
/// clamped to `[1, 50]`.
pub fn parse_max_results(input: Option<&str>, default: u32) -> u32 {
    let parsed = input.and_then(leading_integer).filter(|n| *n != 0);
    match parsed {
        Some(n) => n.clamp(1, MAX_RESULTS_CAP as i64) as u32,
        None => default.clamp(1, MAX_RESULTS_CAP),
    }
}

fn leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Size of the window to request from the search API
pub fn request_size(max: u32, last_count: u64, is_load_more: bool) -> u32 {
    let wanted = if is_load_more {
        last_count.saturating_add(max as u64)
    } else {
        max as u64
    };
    wanted.clamp(1, MAX_RESULTS_CAP as u64) as u32
}

/// Load-more is offered while fewer items are shown than the API reported
/// and the hard cap has not been reached
pub fn load_more_visible(rendered: usize, count: u64) -> bool {
    (rendered as u64) < count && rendered < MAX_RESULTS_CAP as usize
}
