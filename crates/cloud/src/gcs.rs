//! Google Cloud Storage object source (JSON API media download).

use std::sync::Arc;

use async_trait::async_trait;
use fastlane_core::error::ProviderError;
use fastlane_core::object_source::ObjectSource;
use reqwest::{StatusCode, Url};

use crate::auth::AccessTokenProvider;
use crate::http::ensure_success;

/// Default public endpoint of the storage JSON API.
pub const DEFAULT_API_URL: &str = "https://storage.googleapis.com";

/// Downloads objects through `GET /storage/v1/b/{bucket}/o/{object}?alt=media`.
pub struct GcsObjectSource {
    client: reqwest::Client,
    api_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GcsObjectSource {
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            client,
            api_url,
            tokens,
        }
    }

    /// Media URL of an object. The object name is percent-encoded as a
    /// single path segment, so `/` inside names is preserved.
    fn media_url(&self, bucket: &str, name: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.api_url).map_err(ProviderError::request)?;
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::Request(format!("Invalid storage API URL '{}'", self.api_url).into())
            })?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o", name]);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }
}

#[async_trait]
impl ObjectSource for GcsObjectSource {
    async fn read_object(&self, bucket: &str, name: &str) -> Result<Vec<u8>, ProviderError> {
        let url = self.media_url(bucket, name)?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ProviderError::request)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound {
                resource: format!("gs://{bucket}/{name}"),
            });
        }

        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(ProviderError::request)?;

        tracing::debug!(bucket, name, size = bytes.len(), "Downloaded object");
        Ok(bytes.to_vec())
    }
}
