//! Test helpers: in-memory storage mock and request builders.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use photowall_api::setup::routes::setup_routes;
use photowall_api::state::AppState;
use photowall_core::{BackendKind, Config};
use photowall_storage::{PhotoStore, StorageError, StorageResult, StoredObject};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory PhotoStore with failure injection.
pub struct MockStore {
    kind: BackendKind,
    host: &'static str,
    container: &'static str,
    files: Mutex<BTreeMap<String, (String, Vec<u8>)>>,
    fail_puts: AtomicBool,
    fail_signing: AtomicBool,
}

impl MockStore {
    pub fn blob() -> Self {
        Self::new(BackendKind::Blob, "testacct.blob.core.windows.net", "photos")
    }

    pub fn file_share() -> Self {
        Self::new(
            BackendKind::FileShare,
            "testacct.file.core.windows.net",
            "photowall-share",
        )
    }

    fn new(kind: BackendKind, host: &'static str, container: &'static str) -> Self {
        MockStore {
            kind,
            host,
            container,
            files: Mutex::new(BTreeMap::new()),
            fail_puts: AtomicBool::new(false),
            fail_signing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent put fail.
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent signing attempt fail.
    pub fn fail_signing(&self) {
        self.fail_signing.store(true, Ordering::SeqCst);
    }

    /// Seed a file directly, bypassing put.
    pub fn set_file(&self, name: &str, content_type: &str, data: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), (content_type.to_string(), data.to_vec()));
    }

    pub fn file(&self, name: &str) -> Option<(String, Vec<u8>)> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl PhotoStore for MockStore {
    async fn ensure_ready(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("injected failure".to_string()));
        }
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), (content_type.to_string(), data.to_vec()));
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<StoredObject>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .map(|name| StoredObject { name: name.clone() })
            .collect())
    }

    async fn signed_get_url(
        &self,
        filename: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("injected failure".to_string()));
        }
        let expiry = Utc::now() + chrono::Duration::from_std(expires_in).unwrap();
        Ok(format!(
            "https://{}/{}/{}?sv=2022-11-02&sp=r&se={}&sig=TESTSIG",
            self.host,
            self.container,
            filename,
            expiry.format("%Y-%m-%dT%H:%M:%SZ"),
        ))
    }

    fn backend_kind(&self) -> BackendKind {
        self.kind
    }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        account_name: "testacct".to_string(),
        account_key: "dGhpcyBpcyB0aGUgYWNjb3VudCBrZXkh".to_string(),
        file_share_name: "photowall-share".to_string(),
        endpoint_suffix: "core.windows.net".to_string(),
    }
}

/// Router wired to fresh mocks; the mocks are returned for assertions.
pub fn test_app() -> (axum::Router, Arc<MockStore>, Arc<MockStore>) {
    let blob = Arc::new(MockStore::blob());
    let share = Arc::new(MockStore::file_share());
    let state = Arc::new(AppState {
        config: test_config(),
        blob: blob.clone(),
        share: share.clone(),
    });
    (setup_routes(state), blob, share)
}

pub const BOUNDARY: &str = "photowall-test-boundary";

/// Build a multipart body from (field, filename, content_type, data) parts.
pub fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
