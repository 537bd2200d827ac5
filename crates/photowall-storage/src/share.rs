use crate::keys::validate_key;
use crate::rest::{self, SignedRequest};
use crate::signing::{file_read_sas, SharedKeyCredential};
use crate::traits::{PhotoStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use photowall_core::BackendKind;
use serde::Deserialize;
use std::time::Duration;

/// Azure Files share implementation
///
/// `object_store` has no file-share backend, so this talks to the documented
/// REST surface directly: SharedKeyLite-signed requests for share creation,
/// file writes, and listing, and a self-minted file-service SAS for the
/// read-only gallery URLs.
#[derive(Clone)]
pub struct FileShareStorage {
    http: reqwest::Client,
    credential: SharedKeyCredential,
    share: String,
    endpoint_suffix: String,
}

impl FileShareStorage {
    /// Create a new FileShareStorage instance
    ///
    /// # Arguments
    /// * `account` - Storage account name
    /// * `account_key` - Base64-encoded account key
    /// * `share` - File share name
    /// * `endpoint_suffix` - Service DNS suffix (usually `core.windows.net`)
    pub fn new(
        account: String,
        account_key: String,
        share: String,
        endpoint_suffix: String,
    ) -> StorageResult<Self> {
        let credential = SharedKeyCredential::new(account, &account_key)?;
        Ok(FileShareStorage {
            http: reqwest::Client::new(),
            credential,
            share,
            endpoint_suffix,
        })
    }

    fn share_url(&self) -> String {
        format!(
            "https://{}.file.{}/{}",
            self.credential.account, self.endpoint_suffix, self.share
        )
    }

    fn file_url(&self, filename: &str) -> String {
        format!("{}/{}", self.share_url(), urlencoding::encode(filename))
    }

    fn canonical_share(&self) -> String {
        format!("/{}/{}", self.credential.account, self.share)
    }

    fn canonical_file(&self, filename: &str) -> String {
        format!("{}/{}", self.canonical_share(), filename)
    }

    /// Allocate the file at its final size. Contents follow in a range write.
    async fn create_file(
        &self,
        filename: &str,
        content_type: &str,
        size: usize,
    ) -> StorageResult<()> {
        let mut request =
            SignedRequest::new("PUT", self.file_url(filename), self.canonical_file(filename));
        request.headers = vec![
            ("x-ms-content-length", size.to_string()),
            ("x-ms-content-type", content_type.to_string()),
            ("x-ms-file-attributes", "None".to_string()),
            ("x-ms-file-creation-time", "now".to_string()),
            ("x-ms-file-last-write-time", "now".to_string()),
            ("x-ms-file-permission", "inherit".to_string()),
            ("x-ms-type", "file".to_string()),
        ];

        let response = rest::send(&self.http, &self.credential, request).await?;
        if response.status().as_u16() != 201 {
            return Err(StorageError::UploadFailed(format!(
                "file create failed: {}",
                rest::error_body(response).await
            )));
        }
        Ok(())
    }

    async fn put_range(&self, filename: &str, data: Bytes) -> StorageResult<()> {
        let url = format!("{}?comp=range", self.file_url(filename));
        let mut request = SignedRequest::new("PUT", url, self.canonical_file(filename));
        request.comp = Some("range");
        request.headers = vec![
            ("x-ms-range", format!("bytes=0-{}", data.len() - 1)),
            ("x-ms-write", "update".to_string()),
        ];
        request.body = Some(data);

        let response = rest::send(&self.http, &self.credential, request).await?;
        if response.status().as_u16() != 201 {
            return Err(StorageError::UploadFailed(format!(
                "range write failed: {}",
                rest::error_body(response).await
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PhotoStore for FileShareStorage {
    async fn ensure_ready(&self) -> StorageResult<()> {
        let url = format!("{}?restype=share", self.share_url());

        let probe = rest::send(
            &self.http,
            &self.credential,
            SignedRequest::new("GET", url.clone(), self.canonical_share()),
        )
        .await?;

        match probe.status().as_u16() {
            200 => {
                tracing::debug!(share = %self.share, "File share exists");
                Ok(())
            }
            404 => {
                tracing::info!(share = %self.share, "File share missing, creating");
                let create = rest::send(
                    &self.http,
                    &self.credential,
                    SignedRequest::new("PUT", url, self.canonical_share()),
                )
                .await?;
                match create.status().as_u16() {
                    201 => {
                        tracing::info!(share = %self.share, "File share created");
                        Ok(())
                    }
                    // Lost a race with a concurrent create; the share is there.
                    409 => Ok(()),
                    _ => Err(StorageError::BackendError(format!(
                        "share create failed: {}",
                        rest::error_body(create).await
                    ))),
                }
            }
            _ => Err(StorageError::BackendError(format!(
                "share probe failed: {}",
                rest::error_body(probe).await
            ))),
        }
    }

    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        validate_key(filename)?;

        let size = data.len();
        let start = std::time::Instant::now();

        // Create-at-size then write one range; a zero-byte file is complete
        // after the create call alone.
        self.create_file(filename, content_type, size).await?;
        if !data.is_empty() {
            self.put_range(filename, data).await?;
        }

        tracing::info!(
            share = %self.share,
            key = %filename,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File share upload successful"
        );

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<StoredObject>> {
        let start = std::time::Instant::now();
        let url = format!("{}?restype=directory&comp=list", self.share_url());
        let mut request = SignedRequest::new("GET", url, self.canonical_share());
        request.comp = Some("list");

        let response = rest::send(&self.http, &self.credential, request).await?;
        if response.status().as_u16() != 200 {
            return Err(StorageError::ListFailed(format!(
                "share listing failed: {}",
                rest::error_body(response).await
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;
        let objects = parse_listing(&body)?;

        tracing::debug!(
            share = %self.share,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File share listing successful"
        );

        Ok(objects)
    }

    async fn signed_get_url(
        &self,
        filename: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(filename)?;

        let expires_in = chrono::Duration::from_std(expires_in)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        let expiry = Utc::now() + expires_in;

        let token = file_read_sas(&self.credential, &self.share, filename, expiry);
        Ok(format!("{}?{}", self.file_url(filename), token))
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::FileShare
    }
}

// `List Directories and Files` response payload. Only the entry names are
// of interest; everything else is ignored.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EnumerationResults {
    #[serde(default)]
    entries: Entries,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Entries {
    #[serde(default)]
    file: Vec<FileEntry>,
    #[serde(default)]
    directory: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(dead_code)] // Parsed to be skipped; only files reach the listing
struct DirectoryEntry {
    name: String,
}

/// Parse the XML listing, keeping files and dropping directories (the
/// gallery only looks at the share root).
fn parse_listing(xml: &str) -> StorageResult<Vec<StoredObject>> {
    let results: EnumerationResults = quick_xml::de::from_str(xml)
        .map_err(|e| StorageError::ListFailed(format!("malformed listing response: {e}")))?;

    Ok(results
        .entries
        .file
        .into_iter()
        .map(|entry| StoredObject { name: entry.name })
        .collect())
}
