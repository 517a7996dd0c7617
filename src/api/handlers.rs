use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Quality, SortMode};
use crate::render::{build_cards, render_page, CardView};
use crate::services::dispatcher::{load_more_visible, DispatchOutcome};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
}

/// Form posted by a card's download and copy-link buttons
#[derive(Debug, Deserialize)]
pub struct CardAction {
    pub id: String,
    #[serde(default)]
    pub quality: Quality,
}

#[derive(Debug, Deserialize)]
pub struct ApiSearchParams {
    pub q: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<String>,
    #[serde(default, rename = "loadMore")]
    pub load_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct DownloadUrlParams {
    pub id: String,
    #[serde(default)]
    pub quality: Quality,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub query: String,
    pub count: u64,
    pub sort: SortMode,
    pub load_more: bool,
    pub cards: Vec<CardView>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Search page with whatever is currently stored
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(render_page(&state.page_view().await)?))
}

/// Fresh search from the page form
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Html<String>> {
    run_search(state, request_id, params, false).await
}

/// Re-requests the enlarged window for the current query
pub async fn load_more(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Html<String>> {
    run_search(state, request_id, params, true).await
}

async fn run_search(
    state: AppState,
    request_id: RequestId,
    params: SearchParams,
    is_load_more: bool,
) -> AppResult<Html<String>> {
    let query_text = match params.q {
        Some(q) => q,
        None if is_load_more => state.store.last_query().await,
        None => String::new(),
    };

    let max_input = {
        let mut view = state.view.write().await;
        view.error = None;
        view.query_input = query_text.clone();
        if let Some(max) = params.max_results {
            view.max_input = max;
        }
        if let Some(sort) = params.sort.as_deref() {
            view.sort = SortMode::parse(sort);
        }
        view.max_input.clone()
    };

    match state
        .dispatcher
        .execute_search(&query_text, Some(&max_input), is_load_more)
        .await
    {
        Ok(outcome) => {
            if outcome.applied {
                state.prune_card_states().await;
            }
            tracing::info!(
                request_id = %request_id,
                query = %outcome.query,
                received = outcome.received,
                count = outcome.count,
                applied = outcome.applied,
                "Search request handled"
            );
        }
        Err(e) => {
            let message = e.user_message();
            tracing::warn!(request_id = %request_id, error = %e, "Search request failed");
            state.view.write().await.error = Some(message.clone());
            state.notices.error(message).await;
        }
    }

    Ok(Html(render_page(&state.page_view().await)?))
}

/// Changes the sort order and re-renders the stored results without fetching
pub async fn sort(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> AppResult<Html<String>> {
    let mode = SortMode::parse(params.sort.as_deref().unwrap_or_default());
    state.view.write().await.sort = mode;
    tracing::debug!(sort = %mode, "Sort mode changed");

    Ok(Html(render_page(&state.page_view().await)?))
}

/// Download button: opens the downloader link in a new tab
pub async fn download(State(state): State<AppState>, Form(action): Form<CardAction>) -> Redirect {
    let id = action.id.trim();
    if id.is_empty() {
        state.notices.error("Missing video id").await;
        return Redirect::to("/");
    }

    let url = state.links.url(id, action.quality);
    if state.downloads.begin(id, action.quality, url).await.is_none() {
        tracing::debug!(video_id = %id, "Ignored download click on busy card");
    }

    Redirect::to("/")
}

/// Copy-link button: writes the downloader link to the clipboard
pub async fn copy_link(State(state): State<AppState>, Form(action): Form<CardAction>) -> Redirect {
    let id = action.id.trim();
    if id.is_empty() {
        state.notices.error("Missing video id").await;
        return Redirect::to("/");
    }

    let url = state.links.url(id, action.quality);
    state.downloads.remember_quality(id, action.quality).await;

    match state.clipboard.copy_text(&url).await {
        Ok(()) => {
            tracing::info!(video_id = %id, quality = %action.quality, "Download link copied");
            state.notices.info("Download link copied").await;
        }
        Err(e) => {
            tracing::warn!(video_id = %id, error = %e, "Clipboard write failed");
            state.notices.error(e.user_message()).await;
        }
    }

    Redirect::to("/")
}

/// JSON search: same dispatch as the page, outcome as JSON
pub async fn api_search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ApiSearchParams>,
) -> AppResult<Json<DispatchOutcome>> {
    tracing::info!(
        request_id = %request_id,
        load_more = params.load_more,
        "Processing API search request"
    );

    let outcome = state
        .dispatcher
        .execute_search(
            params.q.as_deref().unwrap_or_default(),
            params.max_results.as_deref(),
            params.load_more,
        )
        .await?;

    if outcome.applied {
        state.prune_card_states().await;
    }

    Ok(Json(outcome))
}

/// Sorted snapshot of the stored results
pub async fn api_results(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Json<ResultsResponse> {
    let sort = match params.sort.as_deref() {
        Some(sort) => SortMode::parse(sort),
        None => state.view.read().await.sort,
    };

    let session = state.store.snapshot().await;
    let states = state.downloads.snapshot().await;
    let cards = build_cards(&session.last_results, sort, &states, &state.links);

    Json(ResultsResponse {
        load_more: !session.last_query.is_empty()
            && load_more_visible(cards.len(), session.last_count),
        query: session.last_query,
        count: session.last_count,
        sort,
        cards,
    })
}

/// Downloader URL for one video and quality
pub async fn api_download_url(
    State(state): State<AppState>,
    Query(params): Query<DownloadUrlParams>,
) -> AppResult<Json<Value>> {
    let id = params.id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("Missing video id".to_string()));
    }

    Ok(Json(json!({
        "id": id,
        "quality": params.quality,
        "url": state.links.url(id, params.quality),
    })))
}
