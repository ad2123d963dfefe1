//! Amazon Rekognition detection capability.
//!
//! Rekognition reports label confidence as a percentage; it is normalised
//! to a fraction here so the pipeline's threshold reads as `0.5`. Face
//! confidences stay on the provider's 0-100 scale, which is what the
//! analytics tables store.

use async_trait::async_trait;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{self as rk, Attribute, Image};
use fastlane_core::detection::{BoundingBox, DetectionCapability, FaceAttributes, Label};
use fastlane_core::error::ProviderError;

/// Gender recorded when a face comes back without a gender estimate.
pub const UNKNOWN_GENDER: &str = "Unknown";

pub struct RekognitionDetector {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionDetector {
    /// `sdk_config` must carry the region the detection calls go to.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_rekognition::Client::new(sdk_config),
        }
    }
}

fn image(bytes: &[u8]) -> Image {
    Image::builder().bytes(Blob::new(bytes.to_vec())).build()
}

#[async_trait]
impl DetectionCapability for RekognitionDetector {
    async fn detect_labels(&self, bytes: &[u8]) -> Result<Vec<Label>, ProviderError> {
        let output = self
            .client
            .detect_labels()
            .image(image(bytes))
            .send()
            .await
            .map_err(ProviderError::request)?;

        Ok(output.labels().iter().map(to_label).collect())
    }

    async fn detect_faces(&self, bytes: &[u8]) -> Result<Vec<FaceAttributes>, ProviderError> {
        let output = self
            .client
            .detect_faces()
            .attributes(Attribute::All)
            .image(image(bytes))
            .send()
            .await
            .map_err(ProviderError::request)?;

        Ok(output.face_details().iter().map(to_face).collect())
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// Instances without a bounding box are not counted as localised instances.
fn to_label(label: &rk::Label) -> Label {
    Label {
        name: label.name().unwrap_or_default().to_string(),
        confidence: label.confidence().unwrap_or(0.0) / 100.0,
        instances: label
            .instances()
            .iter()
            .filter_map(|instance| instance.bounding_box())
            .map(|bb| BoundingBox {
                left: bb.left().unwrap_or(0.0),
                top: bb.top().unwrap_or(0.0),
                width: bb.width().unwrap_or(0.0),
                height: bb.height().unwrap_or(0.0),
            })
            .collect(),
    }
}

fn to_face(face: &rk::FaceDetail) -> FaceAttributes {
    let gender = face.gender();
    let age = face.age_range();

    if gender.is_none() || age.is_none() {
        tracing::warn!("Face detail without gender or age range, recording defaults");
    }

    FaceAttributes {
        gender: gender
            .and_then(|g| g.value())
            .map(|v| v.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_GENDER.to_string()),
        gender_confidence: gender.and_then(|g| g.confidence()).unwrap_or(0.0).into(),
        lowest_age: age.and_then(|a| a.low()).unwrap_or(0),
        highest_age: age.and_then(|a| a.high()).unwrap_or(0),
        confidence: face.confidence().unwrap_or(0.0).into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
