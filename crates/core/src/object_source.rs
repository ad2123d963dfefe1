use async_trait::async_trait;

use crate::error::ProviderError;

/// Read access to uploaded images.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Read the whole object `name` in container `bucket` into memory.
    async fn read_object(&self, bucket: &str, name: &str) -> Result<Vec<u8>, ProviderError>;
}
