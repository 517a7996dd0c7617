/// Search collaborator abstraction
///
/// The dispatcher only knows how to ask for "the first N results for a query".
/// The production provider talks to the remote search API over HTTP; tests
/// substitute mocks or in-process fakes.
use crate::{error::AppResult, models::SearchPage};

pub mod remote_search;

pub use remote_search::RemoteSearchProvider;

/// Trait for video search backends
///
/// There is no cursor or offset: asking for more results means asking for a
/// larger `max_results` window starting from the top.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch up to `max_results` results for `query`
    ///
    /// Fails with `Search` for transport problems or non-2xx statuses and
    /// with `Format` when the payload does not match the expected shape.
    async fn search(&self, query: &str, max_results: u32) -> AppResult<SearchPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
