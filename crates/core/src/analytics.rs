//! Append-only analytics store.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::observation::{LineObservation, WaitingCustomerMeta};

/// Table holding one row per analyzed image.
pub const LINE_OBSERVATION_TABLE: &str = "line_observation";

/// Table holding one row per detected face, keyed by `line_observation_id`.
pub const WAITING_CUSTOMER_META_TABLE: &str = "waiting_customer_meta";

/// Insert-only access to the two observation tables.
///
/// Implementations never update or delete rows.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn insert_observation(&self, observation: &LineObservation)
        -> Result<(), ProviderError>;

    async fn insert_customer_metas(
        &self,
        metas: &[WaitingCustomerMeta],
    ) -> Result<(), ProviderError>;
}
