use crate::keys::validate_key;
use crate::rest::{self, SignedRequest};
use crate::signing::SharedKeyCredential;
use crate::traits::{PhotoStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
    Result as ObjectResult,
};
use photowall_core::constants::DEFAULT_ENDPOINT_SUFFIX;
use photowall_core::BackendKind;
use std::sync::Arc;
use std::time::Duration;

/// Azure Blob Storage implementation
///
/// Data-plane operations (put, list) and SAS minting go through
/// `object_store`; container creation is one signed REST call because the
/// store exposes no such operation.
#[derive(Clone)]
pub struct BlobStorage {
    store: Arc<MicrosoftAzure>,
    http: reqwest::Client,
    credential: SharedKeyCredential,
    container: String,
    endpoint_suffix: String,
}

impl BlobStorage {
    /// Create a new BlobStorage instance
    ///
    /// # Arguments
    /// * `account` - Storage account name
    /// * `account_key` - Base64-encoded account key
    /// * `container` - Blob container name
    /// * `endpoint_suffix` - Service DNS suffix (usually `core.windows.net`)
    pub fn new(
        account: String,
        account_key: String,
        container: String,
        endpoint_suffix: String,
    ) -> StorageResult<Self> {
        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(account.clone())
            .with_access_key(account_key.clone())
            .with_container_name(container.clone());

        if endpoint_suffix != DEFAULT_ENDPOINT_SUFFIX {
            builder =
                builder.with_endpoint(format!("https://{}.blob.{}", account, endpoint_suffix));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let credential = SharedKeyCredential::new(account, &account_key)?;

        Ok(BlobStorage {
            store: Arc::new(store),
            http: reqwest::Client::new(),
            credential,
            container,
            endpoint_suffix,
        })
    }

    fn container_url(&self) -> String {
        format!(
            "https://{}.blob.{}/{}",
            self.credential.account, self.endpoint_suffix, self.container
        )
    }

    fn canonical_container(&self) -> String {
        format!("/{}/{}", self.credential.account, self.container)
    }
}

#[async_trait]
impl PhotoStore for BlobStorage {
    async fn ensure_ready(&self) -> StorageResult<()> {
        let url = format!("{}?restype=container", self.container_url());

        let probe = rest::send(
            &self.http,
            &self.credential,
            SignedRequest::new("GET", url.clone(), self.canonical_container()),
        )
        .await?;

        match probe.status().as_u16() {
            200 => {
                tracing::debug!(container = %self.container, "Blob container exists");
                Ok(())
            }
            404 => {
                tracing::info!(container = %self.container, "Blob container missing, creating");
                let create = rest::send(
                    &self.http,
                    &self.credential,
                    SignedRequest::new("PUT", url, self.canonical_container()),
                )
                .await?;
                match create.status().as_u16() {
                    201 => {
                        tracing::info!(container = %self.container, "Blob container created");
                        Ok(())
                    }
                    // Lost a race with a concurrent create; the container is there.
                    409 => Ok(()),
                    _ => Err(StorageError::BackendError(format!(
                        "container create failed: {}",
                        rest::error_body(create).await
                    ))),
                }
            }
            _ => Err(StorageError::BackendError(format!(
                "container probe failed: {}",
                rest::error_body(probe).await
            ))),
        }
    }

    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        validate_key(filename)?;

        let size = data.len() as u64;
        let location = Path::from(filename);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                key = %filename,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Blob upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            container = %self.container,
            key = %filename,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob upload successful"
        );

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<StoredObject>> {
        let start = std::time::Instant::now();
        let mut objects = Vec::new();

        let mut stream = self.store.list(None);
        while let Some(meta) = stream.next().await {
            let meta = meta.map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %self.container,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob listing failed"
                );
                StorageError::ListFailed(e.to_string())
            })?;
            objects.push(StoredObject {
                name: meta.location.to_string(),
            });
        }

        tracing::debug!(
            container = %self.container,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob listing successful"
        );

        Ok(objects)
    }

    async fn signed_get_url(
        &self,
        filename: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(filename)?;

        let location = Path::from(filename);
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::Blob
    }
}
