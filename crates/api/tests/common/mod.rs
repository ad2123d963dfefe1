#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use fastlane_core::analytics::AnalyticsStore;
use fastlane_core::detection::{BoundingBox, DetectionCapability, FaceAttributes, Label};
use fastlane_core::error::ProviderError;
use fastlane_core::id::IdProvider;
use fastlane_core::object_source::ObjectSource;
use fastlane_core::observation::{LineObservation, WaitingCustomerMeta};
use fastlane_core::types::ObservationId;
use fastlane_pipeline::clients::ClientFactory;
use fastlane_pipeline::Pipeline;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fastlane_api::config::ServerConfig;
use fastlane_api::state::AppState;

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

/// Canned detection results plus switches for failing collaborators.
#[derive(Clone, Default)]
pub struct Scenario {
    pub people: usize,
    pub faces: usize,
    pub missing_object: bool,
    pub store_down: bool,
}

#[derive(Default)]
pub struct Writes {
    pub observations: Mutex<Vec<LineObservation>>,
    pub metas: Mutex<Vec<WaitingCustomerMeta>>,
}

struct Fakes {
    scenario: Scenario,
    writes: Arc<Writes>,
}

struct Source(bool);

#[async_trait]
impl ObjectSource for Source {
    async fn read_object(&self, bucket: &str, name: &str) -> Result<Vec<u8>, ProviderError> {
        if self.0 {
            return Err(ProviderError::NotFound {
                resource: format!("gs://{bucket}/{name}"),
            });
        }
        Ok(b"jpeg".to_vec())
    }
}

struct Detector(Scenario);

#[async_trait]
impl DetectionCapability for Detector {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<Label>, ProviderError> {
        let instances = (0..self.0.people)
            .map(|i| BoundingBox {
                left: i as f32 * 0.1,
                top: 0.1,
                width: 0.05,
                height: 0.4,
            })
            .collect();
        Ok(vec![Label {
            name: "Person".to_string(),
            confidence: 0.95,
            instances,
        }])
    }

    async fn detect_faces(&self, _image: &[u8]) -> Result<Vec<FaceAttributes>, ProviderError> {
        Ok((0..self.0.faces)
            .map(|_| FaceAttributes {
                gender: "Female".to_string(),
                gender_confidence: 92.0,
                lowest_age: 22,
                highest_age: 30,
                confidence: 99.5,
            })
            .collect())
    }
}

struct Store {
    down: bool,
    writes: Arc<Writes>,
}

#[async_trait]
impl AnalyticsStore for Store {
    async fn insert_observation(&self, observation: &LineObservation) -> Result<(), ProviderError> {
        if self.down {
            return Err(ProviderError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.writes
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
        self.writes.metas.lock().unwrap().extend_from_slice(metas);
        Ok(())
    }
}

#[async_trait]
impl ClientFactory for Fakes {
    async fn object_source(&self) -> Result<Box<dyn ObjectSource>, ProviderError> {
        Ok(Box::new(Source(self.scenario.missing_object)))
    }

    async fn detector(&self) -> Result<Box<dyn DetectionCapability>, ProviderError> {
        Ok(Box::new(Detector(self.scenario.clone())))
    }

    async fn analytics_store(&self) -> Result<Box<dyn AnalyticsStore>, ProviderError> {
        Ok(Box::new(Store {
            down: self.scenario.store_down,
            writes: self.writes.clone(),
        }))
    }
}

#[derive(Default)]
struct Ids(AtomicUsize);

impl IdProvider for Ids {
    fn next_id(&self) -> ObservationId {
        ObservationId::new(format!("obs-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    }
}

/// Build the production router over fake collaborators.
pub fn build_test_app(scenario: Scenario) -> (Router, Arc<Writes>) {
    let writes = Arc::new(Writes::default());
    let clients = Fakes {
        scenario,
        writes: writes.clone(),
    };
    let state = AppState {
        pipeline: Arc::new(Pipeline::new(Arc::new(clients), Arc::new(Ids::default()))),
        config: Arc::new(test_config()),
    };

    (fastlane_api::app(state), writes)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
