//! HTTP error response conversion
//!
//! Only backend enumeration failures ever surface to a client; everything
//! else in this application degrades to a redirect or an omitted gallery
//! entry. The wrapper exists because of orphan rules: `IntoResponse` cannot
//! be implemented for `StorageError` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use photowall_storage::StorageError;

#[derive(Debug)]
pub struct HttpAppError(pub StorageError);

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage backend unavailable",
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_500() {
        let response =
            HttpAppError(StorageError::ListFailed("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
