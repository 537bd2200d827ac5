//! Gallery page: enumerate both backends, sign every object, render HTML.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use photowall_core::constants::SIGNED_URL_TTL;
use std::sync::Arc;

/// `GET /`
///
/// Lists every object in the blob container and every file at the share
/// root, mints a read-only signed URL valid for 24 hours per object, and
/// embeds them all in the gallery page. A signing failure drops that one
/// object; a failure to enumerate a backend fails the request.
///
/// No caching: every call re-enumerates and re-signs.
#[tracing::instrument(skip(state), fields(operation = "view_photos"))]
pub async fn view_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, HttpAppError> {
    let mut urls = Vec::new();

    for store in [&state.blob, &state.share] {
        let objects = store.list().await?;
        for object in objects {
            match store.signed_get_url(&object.name, SIGNED_URL_TTL).await {
                Ok(url) => urls.push(url),
                Err(error) => tracing::warn!(
                    backend = %store.backend_kind(),
                    object = %object.name,
                    error = %error,
                    "omitting object from gallery: signing failed"
                ),
            }
        }
    }

    Ok(Html(render_page(&urls)))
}

fn render_page(urls: &[String]) -> String {
    let mut gallery = String::from("<div style='display: flex; flex-wrap: wrap; gap: 1em;'>");
    for url in urls {
        gallery.push_str(&format!(
            "<div><img src=\"{}\" width=\"270\" height=\"180\" \
             style=\"border-radius: 10px; border: 1px solid #ddd; margin: 5px;\"></div>",
            escape_attr(url)
        ));
    }
    gallery.push_str("</div>");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/css/bootstrap.min.css" rel="stylesheet">
    <title>Photowall</title>
</head>
<body>
    <nav class="navbar navbar-dark bg-primary mb-4">
        <div class="container">
            <a class="navbar-brand" href="/">Photowall</a>
        </div>
    </nav>
    <div class="container">
        <h3>Upload new File</h3>
        <form method="post" action="/upload-photos" enctype="multipart/form-data">
            <input type="file" name="photos" multiple accept=".png,.jpg,.jpeg">
            <button type="submit" class="btn btn-primary mt-2">Submit</button>
        </form>
        <hr>
        <h3>Uploaded Images</h3>
        {gallery}
    </div>
</body>
</html>"#
    )
}

/// Minimal HTML attribute escaping; SAS tokens contain `&` between
/// parameters.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
