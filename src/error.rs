use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("{0}")]
    Format(String),

    #[error("Copy failed: {0}")]
    Clipboard(String),

    #[error("Unable to open download link. Try copy link. ({0})")]
    LinkOpen(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Search failure carrying the collaborator's HTTP status
    pub fn search_status(status: reqwest::StatusCode) -> Self {
        AppError::Search(format!("Search API error: {}", status.as_u16()))
    }

    /// The message shown to the user in the banner or a toast
    pub fn user_message(&self) -> String {
        match self {
            AppError::Clipboard(_) => "Copy failed".to_string(),
            AppError::LinkOpen(_) => "Unable to open download link. Try copy link.".to_string(),
            AppError::HttpClient(e) => format!("Search failed: {}", e),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Search(_) | AppError::Format(_) | AppError::HttpClient(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Clipboard(_)
            | AppError::LinkOpen(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.user_message()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_status_message_includes_code() {
        let err = AppError::search_status(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.user_message(), "Search failed: Search API error: 503");
    }

    #[test]
    fn test_status_mapping() {
        let validation = AppError::Validation("Please enter search text".to_string());
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let format = AppError::Format("API returned unexpected format".to_string());
        assert_eq!(format.into_response().status(), StatusCode::BAD_GATEWAY);

        let clipboard = AppError::Clipboard("no display".to_string());
        assert_eq!(
            clipboard.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_host_errors_hide_details_from_user() {
        assert_eq!(
            AppError::Clipboard("X11 unavailable".to_string()).user_message(),
            "Copy failed"
        );
        assert_eq!(
            AppError::LinkOpen("no browser".to_string()).user_message(),
            "Unable to open download link. Try copy link."
        );
    }
}
