use async_trait::async_trait;
use fastlane_core::analytics::AnalyticsStore;
use fastlane_core::error::ProviderError;
use fastlane_core::observation::{LineObservation, WaitingCustomerMeta};

use crate::repositories::{LineObservationRepo, WaitingCustomerMetaRepo};
use crate::DbPool;

/// [`AnalyticsStore`] backed by the Postgres observation tables.
#[derive(Clone)]
pub struct PgAnalyticsStore {
    pool: DbPool,
}

impl PgAnalyticsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn insert_observation(
        &self,
        observation: &LineObservation,
    ) -> Result<(), ProviderError> {
        LineObservationRepo::insert(&self.pool, observation)
            .await
            .map_err(ProviderError::request)
    }

    async fn insert_customer_metas(
        &self,
        metas: &[WaitingCustomerMeta],
    ) -> Result<(), ProviderError> {
        let written = WaitingCustomerMetaRepo::insert_batch(&self.pool, metas)
            .await
            .map_err(ProviderError::request)?;
        tracing::debug!(rows = written, "Inserted waiting customer metas");
        Ok(())
    }
}
