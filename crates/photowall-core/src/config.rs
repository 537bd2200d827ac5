//! Configuration module
//!
//! Configuration is read once at process start from environment variables.
//! Every storage variable is required; a missing one aborts startup before
//! any request is served.

use std::env;

use crate::constants::DEFAULT_ENDPOINT_SUFFIX;

const DEFAULT_SERVER_PORT: u16 = 8080;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Storage account name, e.g. `mystorageaccount`.
    pub account_name: String,
    /// Base64-encoded storage account key.
    pub account_key: String,
    /// Name of the Azure Files share photos are mirrored to.
    pub file_share_name: String,
    /// DNS suffix for service endpoints, from the connection string.
    pub endpoint_suffix: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `AZURE_STORAGE_CONNECTION_STRING`, `AZURE_STORAGE_ACCOUNT_NAME`,
    /// `AZURE_STORAGE_ACCOUNT_KEY`, `AZURE_FILE_SHARE_NAME`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let connection_string = required_env("AZURE_STORAGE_CONNECTION_STRING")?;
        let account_name = required_env("AZURE_STORAGE_ACCOUNT_NAME")?;
        let account_key = required_env("AZURE_STORAGE_ACCOUNT_KEY")?;
        let file_share_name = required_env("AZURE_FILE_SHARE_NAME")?;

        let parsed = ConnectionString::parse(&connection_string)?;

        // The connection string and the explicit account variables can drift
        // apart; the SAS signatures are computed from the explicit pair, so a
        // mismatch means the minted URLs will not open.
        if let Some(ref cs_account) = parsed.account_name {
            if *cs_account != account_name {
                tracing::warn!(
                    connection_string_account = %cs_account,
                    account = %account_name,
                    "AZURE_STORAGE_CONNECTION_STRING names a different account \
                     than AZURE_STORAGE_ACCOUNT_NAME"
                );
            }
        }
        if let Some(ref cs_key) = parsed.account_key {
            if *cs_key != account_key {
                tracing::warn!(
                    "AZURE_STORAGE_CONNECTION_STRING carries a different key \
                     than AZURE_STORAGE_ACCOUNT_KEY"
                );
            }
        }

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT is not a valid port: {raw}"))?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        Ok(Config {
            server_port,
            account_name,
            account_key,
            file_share_name,
            endpoint_suffix: parsed
                .endpoint_suffix
                .unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_string()),
        })
    }
}

fn required_env(name: &str) -> Result<String, anyhow::Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!("{name} is missing from the environment")),
    }
}

/// Parsed Azure storage connection string.
///
/// Format: semicolon-separated `Key=Value` pairs, e.g.
/// `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`.
/// Keys are matched case-sensitively, as the SDKs emit them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub default_endpoints_protocol: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, anyhow::Error> {
        let mut parsed = ConnectionString::default();

        for pair in raw.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            // AccountKey values are base64 and may contain '='; split on the
            // first one only.
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("malformed connection string segment: {pair}"))?;
            match key {
                "AccountName" => parsed.account_name = Some(value.to_string()),
                "AccountKey" => parsed.account_key = Some(value.to_string()),
                "EndpointSuffix" => parsed.endpoint_suffix = Some(value.to_string()),
                "DefaultEndpointsProtocol" => {
                    parsed.default_endpoints_protocol = Some(value.to_string())
                }
                // Connection strings may carry per-service endpoint overrides
                // and SAS segments we have no use for.
                _ => {}
            }
        }

        if parsed.account_name.is_none() && parsed.account_key.is_none() {
            return Err(anyhow::anyhow!(
                "connection string contains neither AccountName nor AccountKey"
            ));
        }

        Ok(parsed)
    }
}
