/// Host capabilities used by card actions
///
/// Opening a link in a new browser tab and writing the clipboard happen on
/// the machine running the app. Both are behind traits so handlers and the
/// download tracker can be tested without a desktop session.
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LinkOpener: Send + Sync {
    /// Open `url` in a new browsing context
    async fn open(&self, url: &str) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ClipboardPort: Send + Sync {
    async fn copy_text(&self, text: &str) -> AppResult<()>;
}

/// Opens links with the desktop's default browser
pub struct SystemBrowserOpener;

#[async_trait::async_trait]
impl LinkOpener for SystemBrowserOpener {
    async fn open(&self, url: &str) -> AppResult<()> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || open::that_detached(&url))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::LinkOpen(e.to_string()))
    }
}

/// Writes to the system clipboard through `arboard`
pub struct SystemClipboard;

#[async_trait::async_trait]
impl ClipboardPort for SystemClipboard {
    async fn copy_text(&self, text: &str) -> AppResult<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| AppError::Clipboard(format!("Failed to initialize clipboard: {}", e)))?;

            clipboard
                .set_text(text)
                .map_err(|e| AppError::Clipboard(format!("Failed to copy text to clipboard: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
