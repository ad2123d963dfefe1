//! Amazon S3 object source.

use async_trait::async_trait;
use fastlane_core::error::ProviderError;
use fastlane_core::object_source::ObjectSource;

/// Reads objects with `GetObject`.
pub struct S3ObjectSource {
    client: aws_sdk_s3::Client,
}

impl S3ObjectSource {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl ObjectSource for S3ObjectSource {
    async fn read_object(&self, bucket: &str, name: &str) -> Result<Vec<u8>, ProviderError> {
        let output = match self.client.get_object().bucket(bucket).key(name).send().await {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    return Err(ProviderError::NotFound {
                        resource: format!("s3://{bucket}/{name}"),
                    });
                }
                return Err(ProviderError::request(err));
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(ProviderError::request)?
            .into_bytes();

        tracing::debug!(bucket, name, size = bytes.len(), "Downloaded object");
        Ok(bytes.to_vec())
    }
}
