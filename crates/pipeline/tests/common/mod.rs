//! In-memory collaborators for driving [`Pipeline`] without cloud access.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastlane_core::analytics::AnalyticsStore;
use fastlane_core::detection::{BoundingBox, DetectionCapability, FaceAttributes, Label};
use fastlane_core::error::ProviderError;
use fastlane_core::event::ObjectReference;
use fastlane_core::id::IdProvider;
use fastlane_core::object_source::ObjectSource;
use fastlane_core::observation::{LineObservation, WaitingCustomerMeta};
use fastlane_core::types::ObservationId;
use fastlane_pipeline::clients::ClientFactory;
use fastlane_pipeline::Pipeline;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// What the fakes observed during a run.
#[derive(Default)]
pub struct Recorded {
    pub reads: AtomicUsize,
    /// Bytes handed to each label detection call.
    pub label_images: Mutex<Vec<Vec<u8>>>,
    /// Bytes handed to each face detection call.
    pub face_images: Mutex<Vec<Vec<u8>>>,
    pub observations: Mutex<Vec<LineObservation>>,
    pub meta_batches: Mutex<Vec<Vec<WaitingCustomerMeta>>>,
}

impl Recorded {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn detection_calls(&self) -> usize {
        self.label_images().len() + self.face_images().len()
    }

    pub fn label_images(&self) -> Vec<Vec<u8>> {
        self.label_images.lock().unwrap().clone()
    }

    pub fn face_images(&self) -> Vec<Vec<u8>> {
        self.face_images.lock().unwrap().clone()
    }

    pub fn observations(&self) -> Vec<LineObservation> {
        self.observations.lock().unwrap().clone()
    }

    pub fn meta_batches(&self) -> Vec<Vec<WaitingCustomerMeta>> {
        self.meta_batches.lock().unwrap().clone()
    }
}

/// Scripted behavior for every collaborator.
#[derive(Clone)]
pub struct Script {
    pub image: Result<Vec<u8>, FakeFailure>,
    pub labels: Result<Vec<Label>, FakeFailure>,
    pub faces: Result<Vec<FaceAttributes>, FakeFailure>,
    pub observation_write: Result<(), FakeFailure>,
    pub meta_write: Result<(), FakeFailure>,
    pub acquire_fails: bool,
}

/// Cloneable stand-in for the provider failures a fake should report.
#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    NotFound,
    Api(u16),
}

impl FakeFailure {
    fn into_error(self, what: &str) -> ProviderError {
        match self {
            Self::NotFound => ProviderError::NotFound {
                resource: what.to_string(),
            },
            Self::Api(status) => ProviderError::Api {
                status,
                body: what.to_string(),
            },
        }
    }
}

/// Bytes every fake object read returns unless a test overrides them.
pub const IMAGE_BYTES: &[u8] = b"\xff\xd8\xff\xe0jpeg";

impl Default for Script {
    fn default() -> Self {
        Self {
            image: Ok(IMAGE_BYTES.to_vec()),
            labels: Ok(Vec::new()),
            faces: Ok(Vec::new()),
            observation_write: Ok(()),
            meta_write: Ok(()),
            acquire_fails: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeSource {
    script: Script,
    recorded: Arc<Recorded>,
}

#[async_trait]
impl ObjectSource for FakeSource {
    async fn read_object(&self, bucket: &str, name: &str) -> Result<Vec<u8>, ProviderError> {
        self.recorded.reads.fetch_add(1, Ordering::SeqCst);
        self.script
            .image
            .clone()
            .map_err(|e| e.into_error(&format!("gs://{bucket}/{name}")))
    }
}

struct FakeDetector {
    script: Script,
    recorded: Arc<Recorded>,
}

#[async_trait]
impl DetectionCapability for FakeDetector {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<Label>, ProviderError> {
        self.recorded.label_images.lock().unwrap().push(image.to_vec());
        self.script.labels.clone().map_err(|e| e.into_error("labels"))
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceAttributes>, ProviderError> {
        self.recorded.face_images.lock().unwrap().push(image.to_vec());
        self.script.faces.clone().map_err(|e| e.into_error("faces"))
    }
}

struct FakeStore {
    script: Script,
    recorded: Arc<Recorded>,
}

#[async_trait]
impl AnalyticsStore for FakeStore {
    async fn insert_observation(&self, observation: &LineObservation) -> Result<(), ProviderError> {
        self.script
            .observation_write
            .map_err(|e| e.into_error("line_observation"))?;
        self.recorded
            .observations
            .lock()
            .unwrap()
            .push(observation.clone());
        Ok(())
    }

    async fn insert_customer_metas(
        &self,
        metas: &[WaitingCustomerMeta],
    ) -> Result<(), ProviderError> {
        self.recorded.meta_batches.lock().unwrap().push(metas.to_vec());
        self.script
            .meta_write
            .map_err(|e| e.into_error("waiting_customer_meta"))
    }
}

pub struct FakeClients {
    script: Script,
    recorded: Arc<Recorded>,
}

#[async_trait]
impl ClientFactory for FakeClients {
    async fn object_source(&self) -> Result<Box<dyn ObjectSource>, ProviderError> {
        if self.script.acquire_fails {
            return Err(ProviderError::Api {
                status: 401,
                body: "credentials".to_string(),
            });
        }
        Ok(Box::new(FakeSource {
            script: self.script.clone(),
            recorded: self.recorded.clone(),
        }))
    }

    async fn detector(&self) -> Result<Box<dyn DetectionCapability>, ProviderError> {
        Ok(Box::new(FakeDetector {
            script: self.script.clone(),
            recorded: self.recorded.clone(),
        }))
    }

    async fn analytics_store(&self) -> Result<Box<dyn AnalyticsStore>, ProviderError> {
        Ok(Box::new(FakeStore {
            script: self.script.clone(),
            recorded: self.recorded.clone(),
        }))
    }
}

/// Hands out `obs-1`, `obs-2`, ...
#[derive(Default)]
pub struct SequenceIds(AtomicUsize);

impl IdProvider for SequenceIds {
    fn next_id(&self) -> ObservationId {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        ObservationId::new(format!("obs-{n}"))
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn pipeline(script: Script) -> (Pipeline, Arc<Recorded>) {
    let recorded = Arc::new(Recorded::default());
    let clients = FakeClients {
        script,
        recorded: recorded.clone(),
    };
    (
        Pipeline::new(Arc::new(clients), Arc::new(SequenceIds::default())),
        recorded,
    )
}

pub fn event(name: &str) -> ObjectReference {
    ObjectReference {
        bucket: "line-images".to_string(),
        name: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
    }
}

pub fn person(confidence: f32, lefts: &[f32]) -> Label {
    Label {
        name: "Person".to_string(),
        confidence,
        instances: lefts
            .iter()
            .map(|&left| BoundingBox {
                left,
                top: 0.1,
                width: 0.08,
                height: 0.5,
            })
            .collect(),
    }
}

pub fn face(gender: &str, lowest_age: i32, highest_age: i32) -> FaceAttributes {
    FaceAttributes {
        gender: gender.to_string(),
        gender_confidence: 96.5,
        lowest_age,
        highest_age,
        confidence: 99.8,
    }
}
