//! Sequencing of one ingestion invocation.

use std::sync::Arc;

use chrono::Utc;
use fastlane_core::event::ObjectReference;
use fastlane_core::id::IdProvider;
use fastlane_core::object_name;
use fastlane_core::observation::assemble;
use fastlane_core::types::ObservationId;
use serde::Serialize;

use crate::clients::ClientFactory;
use crate::detect::DetectionAdapter;
use crate::error::{PipelineError, Stage, StageError};
use crate::persist::StoreWriter;

/// Summary of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub observation_id: ObservationId,
    pub shop_id: String,
    pub waiting_people_num: u32,
    pub customer_meta_count: usize,
}

/// Runs the fetch, detect and persist steps for uploaded line images.
pub struct Pipeline {
    clients: Arc<dyn ClientFactory>,
    ids: Arc<dyn IdProvider>,
}

impl Pipeline {
    pub fn new(clients: Arc<dyn ClientFactory>, ids: Arc<dyn IdProvider>) -> Self {
        Self { clients, ids }
    }

    /// Process one object-finalize event.
    ///
    /// Steps run in order and each failure is tagged with its [`Stage`]:
    /// acquire clients, validate and parse the object name, fetch the bytes,
    /// detect, then persist. Nothing is written unless every earlier step
    /// succeeded.
    #[tracing::instrument(
        name = "ingest",
        skip_all,
        fields(bucket = %event.bucket, object = %event.name)
    )]
    pub async fn run(&self, event: &ObjectReference) -> Result<IngestionReport, PipelineError> {
        let result = self.run_stages(event).await;
        match &result {
            Ok(report) => tracing::info!(
                observation_id = %report.observation_id,
                shop_id = %report.shop_id,
                waiting_people_num = report.waiting_people_num,
                customer_meta_count = report.customer_meta_count,
                "Observation recorded"
            ),
            Err(e) => tracing::error!(
                stage = %e.stage,
                error = %e,
                "Ingestion failed"
            ),
        }
        result
    }

    async fn run_stages(&self, event: &ObjectReference) -> Result<IngestionReport, PipelineError> {
        let created_at = Utc::now();

        let (source, detector, store) = tokio::try_join!(
            self.clients.object_source(),
            self.clients.detector(),
            self.clients.analytics_store(),
        )
        .map_err(|e| PipelineError::new(Stage::AcquireClients, e))?;

        if !event.is_image() {
            return Err(PipelineError::new(
                Stage::ParseMetadata,
                StageError::UnsupportedContentType(
                    event.content_type.clone().unwrap_or_default(),
                ),
            ));
        }
        let meta = object_name::parse(&event.name)
            .map_err(|e| PipelineError::new(Stage::ParseMetadata, e))?;

        let image = source
            .read_object(&event.bucket, &event.name)
            .await
            .map_err(|e| PipelineError::new(Stage::FetchObject, e))?;
        tracing::debug!(bytes = image.len(), "Object fetched");

        let id = self.ids.next_id();

        let detection = DetectionAdapter::new(detector)
            .detect(&image)
            .await
            .map_err(|e| PipelineError::new(Stage::Detect, e))?;

        let (observation, metas) = assemble(
            id,
            meta,
            created_at,
            detection.waiting_people_num,
            detection.faces,
        );

        let ack = StoreWriter::new(store)
            .persist(&observation, &metas)
            .await
            .map_err(|e| PipelineError::new(Stage::Persist, e))?;

        Ok(IngestionReport {
            observation_id: observation.id,
            shop_id: observation.shop_id,
            waiting_people_num: observation.waiting_people_num,
            customer_meta_count: ack.customer_metas_written,
        })
    }
}
