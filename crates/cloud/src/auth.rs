//! GCP access tokens.
//!
//! On Cloud Functions / Cloud Run the attached service account hands out
//! tokens through the metadata server. Locally a token can be supplied
//! directly (e.g. from `gcloud auth print-access-token`).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fastlane_core::error::ProviderError;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::http::parse_response;

/// Path of the default service account token on the metadata server.
const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on one token request; the cache lock is held for its duration.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a bearer token valid for at least the next request.
    async fn access_token(&self) -> Result<String, ProviderError>;
}

/// A fixed token supplied through configuration.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, ProviderError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Tokens of the default service account, fetched from the metadata server
/// and cached until shortly before they expire.
pub struct MetadataServerToken {
    client: reqwest::Client,
    metadata_url: String,
    fetch_timeout: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataServerToken {
    /// * `metadata_url` - Base URL, e.g. `http://metadata.google.internal`.
    pub fn new(client: reqwest::Client, metadata_url: String) -> Self {
        Self {
            client,
            metadata_url,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cached: Mutex::new(None),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    async fn fetch(&self) -> Result<TokenResponse, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}{TOKEN_PATH}",
                self.metadata_url.trim_end_matches('/')
            ))
            .header("Metadata-Flavor", "Google")
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(ProviderError::request)?;

        parse_response(response).await
    }
}

#[async_trait]
impl AccessTokenProvider for MetadataServerToken {
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch().await?;
        tracing::debug!(expires_in = fresh.expires_in, "Fetched GCP access token");

        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: fresh.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(fresh.access_token)
    }
}
