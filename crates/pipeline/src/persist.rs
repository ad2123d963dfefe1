//! Two-step write of an observation and its face records.

use fastlane_core::analytics::{AnalyticsStore, LINE_OBSERVATION_TABLE, WAITING_CUSTOMER_META_TABLE};
use fastlane_core::observation::{LineObservation, WaitingCustomerMeta};

use crate::error::StoreError;

/// Outcome of a successful [`StoreWriter::persist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistAck {
    pub customer_metas_written: usize,
}

pub struct StoreWriter {
    store: Box<dyn AnalyticsStore>,
}

impl StoreWriter {
    pub fn new(store: Box<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Write the observation, then its face records.
    ///
    /// The writes are sequential. If the observation write fails the meta
    /// write is never attempted. An empty meta list skips the second call.
    /// A meta failure after a successful observation write leaves the
    /// observation row in place.
    pub async fn persist(
        &self,
        observation: &LineObservation,
        metas: &[WaitingCustomerMeta],
    ) -> Result<PersistAck, StoreError> {
        self.store
            .insert_observation(observation)
            .await
            .map_err(|source| StoreError {
                table: LINE_OBSERVATION_TABLE,
                source,
            })?;

        if !metas.is_empty() {
            self.store
                .insert_customer_metas(metas)
                .await
                .map_err(|source| StoreError {
                    table: WAITING_CUSTOMER_META_TABLE,
                    source,
                })?;
        }

        Ok(PersistAck {
            customer_metas_written: metas.len(),
        })
    }
}
