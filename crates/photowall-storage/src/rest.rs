//! Signed HTTP plumbing for the management calls `object_store` does not
//! cover: container/share creation and the Azure Files data plane.

use bytes::Bytes;
use chrono::Utc;

use crate::signing::{format_rfc1123, string_to_sign_lite, SharedKeyCredential, SERVICE_VERSION};
use crate::traits::{StorageError, StorageResult};

/// One SharedKeyLite-signed request.
pub(crate) struct SignedRequest<'a> {
    pub verb: &'a str,
    pub url: String,
    /// Path portion of the canonicalized resource, e.g. `/{account}/{share}/{file}`.
    pub canonical_path: String,
    /// `comp` query parameter; the only one SharedKeyLite folds into the
    /// canonicalized resource.
    pub comp: Option<&'a str>,
    pub content_type: Option<&'a str>,
    /// Additional `x-ms-*` headers beyond date and version.
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Bytes>,
}

impl<'a> SignedRequest<'a> {
    pub fn new(verb: &'a str, url: String, canonical_path: String) -> Self {
        SignedRequest {
            verb,
            url,
            canonical_path,
            comp: None,
            content_type: None,
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Sign and send one request. Transport errors become `BackendError`;
/// status handling is left to the caller.
pub(crate) async fn send(
    http: &reqwest::Client,
    credential: &SharedKeyCredential,
    request: SignedRequest<'_>,
) -> StorageResult<reqwest::Response> {
    let mut x_ms: Vec<(String, String)> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    x_ms.push(("x-ms-date".to_string(), format_rfc1123(Utc::now())));
    x_ms.push(("x-ms-version".to_string(), SERVICE_VERSION.to_string()));

    let canonical_resource = match request.comp {
        Some(comp) => format!("{}?comp={}", request.canonical_path, comp),
        None => request.canonical_path.clone(),
    };
    let string_to_sign = string_to_sign_lite(
        request.verb,
        request.content_type.unwrap_or(""),
        &canonical_resource,
        &x_ms,
    );
    let authorization = credential.authorization(&string_to_sign);

    let mut builder = match request.verb {
        "GET" => http.get(&request.url),
        "PUT" => http.put(&request.url),
        other => {
            return Err(StorageError::BackendError(format!(
                "unsupported verb: {other}"
            )))
        }
    };
    for (name, value) in &x_ms {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(content_type) = request.content_type {
        builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
    }
    builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    builder
        .send()
        .await
        .map_err(|e| StorageError::BackendError(e.to_string()))
}

/// Drain a failed response into a short diagnostic string for error messages.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect();
    if body.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {body}")
    }
}
