use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::SortMode;
use crate::render::{build_cards, PageView};
use crate::services::{
    dispatcher::QueryDispatcher,
    downloads::DownloadTracker,
    host::{ClipboardPort, LinkOpener, SystemBrowserOpener, SystemClipboard},
    links::DownloadLinks,
    notifications::NoticeBoard,
    providers::{RemoteSearchProvider, SearchProvider},
    store::ResultStore,
};

/// Form values and banner state echoed back into the page
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query_input: String,
    pub max_input: String,
    pub sort: SortMode,
    pub error: Option<String>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: QueryDispatcher,
    pub store: ResultStore,
    pub downloads: DownloadTracker,
    pub links: DownloadLinks,
    pub notices: NoticeBoard,
    pub clipboard: Arc<dyn ClipboardPort>,
    pub view: Arc<RwLock<ViewState>>,
}

impl AppState {
    /// Wires the state from explicit collaborators
    pub fn new(
        config: &Config,
        provider: Arc<dyn SearchProvider>,
        opener: Arc<dyn LinkOpener>,
        clipboard: Arc<dyn ClipboardPort>,
    ) -> Self {
        let store = ResultStore::new();
        let notices = NoticeBoard::new(config.notice_ttl(), config.error_notice_ttl());
        let dispatcher = QueryDispatcher::new(provider, store.clone(), config.default_max_results);
        let downloads = DownloadTracker::new(
            opener,
            notices.clone(),
            config.download_open_delay(),
            config.download_reset(),
        );

        Self {
            dispatcher,
            store,
            downloads,
            links: DownloadLinks::new(&config.downloader_base_url),
            notices,
            clipboard,
            view: Arc::new(RwLock::new(ViewState {
                max_input: config.default_max_results.to_string(),
                ..Default::default()
            })),
        }
    }

    /// Production wiring: remote search API, system browser and clipboard
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider =
            RemoteSearchProvider::new(config.search_api_url.clone(), config.search_timeout())?;

        Ok(Self::new(
            config,
            Arc::new(provider),
            Arc::new(SystemBrowserOpener),
            Arc::new(SystemClipboard),
        ))
    }

    /// Drops per-card state for videos no longer in the stored results
    pub async fn prune_card_states(&self) {
        let session = self.store.snapshot().await;
        self.downloads
            .retain_cards(session.last_results.iter().map(|item| item.id.as_str()))
            .await;
    }

    /// Snapshot of everything the page renders
    pub async fn page_view(&self) -> PageView {
        let view = self.view.read().await.clone();
        let session = self.store.snapshot().await;
        let states = self.downloads.snapshot().await;
        let cards = build_cards(&session.last_results, view.sort, &states, &self.links);

        PageView {
            query_input: view.query_input,
            max_input: view.max_input,
            sort: view.sort,
            last_query: session.last_query,
            last_count: session.last_count,
            cards,
            notices: self.notices.active().await,
            error: view.error,
        }
    }
}
