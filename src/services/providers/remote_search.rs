/// Remote search API provider
///
/// Issues `GET <url>?q=<query>&maxResults=<n>` and validates the
/// `{ ok, items, count? }` envelope. No retries and no caching: every call
/// hits the API.
use crate::{
    error::{AppError, AppResult},
    models::SearchPage,
    services::providers::SearchProvider,
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct RemoteSearchProvider {
    http_client: HttpClient,
    api_url: String,
}

impl RemoteSearchProvider {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    fn transport_error(err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Search("request timed out".to_string())
        } else if err.is_connect() {
            AppError::Search("could not reach search API".to_string())
        } else {
            AppError::Search(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for RemoteSearchProvider {
    async fn search(&self, query: &str, max_results: u32) -> AppResult<SearchPage> {
        let max_results = max_results.to_string();

        let response = self
            .http_client
            .get(&self.api_url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .query(&[("q", query), ("maxResults", max_results.as_str())])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                query = %query,
                status = status.as_u16(),
                provider = self.name(),
                "Search API returned error status"
            );
            return Err(AppError::search_status(status));
        }

        let payload: Value = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, provider = self.name(), "Search API returned non-JSON body");
            AppError::Format("API returned unexpected format".to_string())
        })?;

        let page = SearchPage::try_from(payload)?;

        tracing::info!(
            query = %query,
            max_results = %max_results,
            results = page.items.len(),
            count = page.reported_count(),
            provider = self.name(),
            "Search completed"
        );

        Ok(page)
    }

    fn name(&self) -> &'static str {
        "remote_search"
    }
}
