//! Request authorization and SAS token construction.
//!
//! Two signing schemes live here, both HMAC-SHA256 over a documented
//! string-to-sign with the base64-decoded account key:
//!
//! - SharedKeyLite request authorization, used for the management calls the
//!   SDK does not cover (container/share creation, file writes, share
//!   listing).
//! - The file-service service SAS, used to mint the read-only gallery URLs
//!   for the file share. Blob SAS tokens come from `object_store`'s signer
//!   instead.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::traits::{StorageError, StorageResult};

/// `x-ms-version` / `sv` sent on every request and token.
pub(crate) const SERVICE_VERSION: &str = "2022-11-02";

/// Storage account identity plus decoded key material.
#[derive(Clone)]
pub(crate) struct SharedKeyCredential {
    pub account: String,
    key: Vec<u8>,
}

impl SharedKeyCredential {
    pub fn new(account: String, base64_key: &str) -> StorageResult<Self> {
        let key = BASE64.decode(base64_key).map_err(|e| {
            StorageError::ConfigError(format!("account key is not valid base64: {e}"))
        })?;
        Ok(SharedKeyCredential { account, key })
    }

    /// HMAC-SHA256 of `string_to_sign`, base64-encoded.
    pub fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(string_to_sign.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// `Authorization` header value for a SharedKeyLite-signed request.
    pub fn authorization(&self, string_to_sign: &str) -> String {
        format!("SharedKeyLite {}:{}", self.account, self.sign(string_to_sign))
    }
}

/// SharedKeyLite string-to-sign:
///
/// ```text
/// VERB \n Content-MD5 \n Content-Type \n Date \n CanonicalizedHeaders CanonicalizedResource
/// ```
///
/// Date stays empty because `x-ms-date` is always sent; the canonicalized
/// resource is `/{account}/{path}` with only the `comp` query parameter
/// appended when present.
pub(crate) fn string_to_sign_lite(
    verb: &str,
    content_type: &str,
    canonical_resource: &str,
    x_ms_headers: &[(String, String)],
) -> String {
    let mut headers: Vec<(&str, &str)> = x_ms_headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    headers.sort();

    let canonicalized_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name.trim(), value.trim()))
        .collect();

    format!("{verb}\n\n{content_type}\n\n{canonicalized_headers}{canonical_resource}")
}

/// Read-only service SAS for one file on the share, as a query string
/// (without the leading `?`).
///
/// String-to-sign is the 13-field file-service layout: sp, st, se,
/// canonicalized resource, si, sip, spr, sv, rscc, rscd, rsce, rscl, rsct.
pub(crate) fn file_read_sas(
    credential: &SharedKeyCredential,
    share: &str,
    path: &str,
    expiry: DateTime<Utc>,
) -> String {
    let se = format_sas_time(expiry);
    let canonical_resource = format!("/file/{}/{}/{}", credential.account, share, path);
    let string_to_sign =
        format!("r\n\n{se}\n{canonical_resource}\n\n\n\n{SERVICE_VERSION}\n\n\n\n\n");
    let signature = credential.sign(&string_to_sign);

    format!(
        "sv={SERVICE_VERSION}&sr=f&sp=r&se={}&sig={}",
        urlencoding::encode(&se),
        urlencoding::encode(&signature),
    )
}

/// RFC 1123 timestamp for the `x-ms-date` header.
pub(crate) fn format_rfc1123(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// ISO-8601 timestamp (second precision, `Z` suffix) for SAS fields.
pub(crate) fn format_sas_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_credential() -> SharedKeyCredential {
        // "this is the account key!" in base64
        SharedKeyCredential::new(
            "photoacct".to_string(),
            "dGhpcyBpcyB0aGUgYWNjb3VudCBrZXkh",
        )
        .unwrap()
    }

    #[test]
    fn test_credential_rejects_non_base64_key() {
        let result = SharedKeyCredential::new("photoacct".to_string(), "!!not base64!!");
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn test_string_to_sign_lite_layout() {
        let headers = vec![
            ("x-ms-version".to_string(), SERVICE_VERSION.to_string()),
            (
                "x-ms-date".to_string(),
                "Fri, 07 Aug 2026 12:00:00 GMT".to_string(),
            ),
        ];
        let string_to_sign =
            string_to_sign_lite("PUT", "image/png", "/photoacct/photos", &headers);

        // Headers sorted, each terminated by \n, resource last without one.
        assert_eq!(
            string_to_sign,
            "PUT\n\nimage/png\n\n\
             x-ms-date:Fri, 07 Aug 2026 12:00:00 GMT\n\
             x-ms-version:2022-11-02\n\
             /photoacct/photos"
        );
    }

    #[test]
    fn test_string_to_sign_lite_empty_content_type() {
        let string_to_sign = string_to_sign_lite("GET", "", "/photoacct/share?comp=list", &[]);
        assert_eq!(string_to_sign, "GET\n\n\n\n/photoacct/share?comp=list");
    }

    #[test]
    fn test_file_sas_query_shape() {
        let expiry = Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap();
        let token = file_read_sas(&test_credential(), "photowall-share", "cat.png", expiry);

        assert!(token.starts_with("sv=2022-11-02&sr=f&sp=r&se=2026-08-08T12%3A00%3A00Z&sig="));
        let signature = token.rsplit("sig=").next().unwrap();
        assert!(!signature.is_empty());
        // Token must be read-only and expiring; never any write permission.
        assert!(!token.contains("sp=w"));
        assert!(!token.contains("sp=rw"));
    }

    #[test]
    fn test_file_sas_is_deterministic_for_fixed_inputs() {
        let expiry = Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap();
        let a = file_read_sas(&test_credential(), "s", "cat.png", expiry);
        let b = file_read_sas(&test_credential(), "s", "cat.png", expiry);
        assert_eq!(a, b);

        let other = file_read_sas(&test_credential(), "s", "dog.png", expiry);
        assert_ne!(a, other);
    }

    #[test]
    fn test_timestamp_formats() {
        let t = Utc.with_ymd_and_hms(2026, 8, 7, 9, 5, 3).unwrap();
        assert_eq!(format_rfc1123(t), "Fri, 07 Aug 2026 09:05:03 GMT");
        assert_eq!(format_sas_time(t), "2026-08-07T09:05:03Z");
    }
}
