//! Photo upload: dual write to both backends, always redirect back.

use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use photowall_storage::{keys, StorageError};
use std::sync::Arc;

/// Per-file result of the dual write. Both backends are always attempted;
/// the outcome feeds structured logs and never the HTTP response.
struct UploadOutcome {
    filename: String,
    size: usize,
    blob: Result<(), StorageError>,
    share: Result<(), StorageError>,
}

impl UploadOutcome {
    fn log(&self) {
        match (&self.blob, &self.share) {
            (Ok(()), Ok(())) => tracing::info!(
                filename = %self.filename,
                size_bytes = self.size,
                "photo stored in both backends"
            ),
            (blob, share) => tracing::warn!(
                filename = %self.filename,
                size_bytes = self.size,
                blob_error = ?blob.as_ref().err(),
                share_error = ?share.as_ref().err(),
                "photo store incomplete"
            ),
        }
    }
}

/// `POST /upload-photos`
///
/// Files arrive as multipart parts named `photos` and are processed strictly
/// sequentially: both writes for file N finish before file N+1 starts. Parts
/// with an empty filename are skipped, as are filenames the storage layer
/// would refuse. The blob and share writes are independent failure domains;
/// one failing does not stop the other, and nothing is rolled back.
///
/// The response is a redirect to `/` no matter what happened; per-file
/// outcomes are visible only in the logs.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photos"))]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "malformed multipart body, stopping");
                break;
            }
        };

        if field.name() != Some("photos") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            continue;
        }
        if let Err(error) = keys::validate_key(&filename) {
            tracing::warn!(filename = %filename, %error, "skipping upload: unsafe filename");
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(filename = %filename, %error, "failed to read upload body");
                continue;
            }
        };

        let size = data.len();
        let blob = state.blob.put(&filename, &content_type, data.clone()).await;
        let share = state.share.put(&filename, &content_type, data).await;

        UploadOutcome {
            filename,
            size,
            blob,
            share,
        }
        .log();
    }

    redirect_to_gallery()
}

/// 302 back to the gallery, success or not.
fn redirect_to_gallery() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_shape() {
        let response = redirect_to_gallery();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
}
