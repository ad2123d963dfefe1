//! Vision detection capability.
//!
//! The pipeline only needs two operations from a vision backend: general
//! label detection (with per-label instance boxes) and face attribute
//! detection. Backends normalise their own response shapes into the types
//! below.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Axis-aligned box, expressed as ratios of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One detected label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    /// Confidence as a fraction in `[0, 1]`.
    pub confidence: f32,
    /// Boxes of the individual instances the backend localised.
    pub instances: Vec<BoundingBox>,
}

/// Demographic estimate for one detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAttributes {
    pub gender: String,
    /// Gender confidence on a `[0, 100]` scale.
    pub gender_confidence: f64,
    pub lowest_age: i32,
    pub highest_age: i32,
    /// Face detection confidence on a `[0, 100]` scale.
    pub confidence: f64,
}

#[async_trait]
pub trait DetectionCapability: Send + Sync {
    /// Detect general object labels in the image.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<Label>, ProviderError>;

    /// Detect every face in the image with its full attribute set.
    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceAttributes>, ProviderError>;
}
