//! People counting and face attributes from the vision backend.

use fastlane_core::detection::{DetectionCapability, FaceAttributes, Label};

use crate::error::{DetectionCall, DetectionError};

/// Label name counted as a waiting person.
pub const PERSON_LABEL: &str = "Person";

/// Minimum label confidence (fraction) for person instances to be counted.
pub const PERSON_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Combined result of both detection calls for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub waiting_people_num: u32,
    pub faces: Vec<FaceAttributes>,
}

pub struct DetectionAdapter {
    capability: Box<dyn DetectionCapability>,
}

impl DetectionAdapter {
    pub fn new(capability: Box<dyn DetectionCapability>) -> Self {
        Self { capability }
    }

    /// Run label and face detection over the same bytes.
    ///
    /// Both calls are issued concurrently. The first one to fail aborts the
    /// other and the error names which call it was.
    pub async fn detect(&self, image: &[u8]) -> Result<Detection, DetectionError> {
        let labels = async {
            self.capability
                .detect_labels(image)
                .await
                .map_err(|source| DetectionError {
                    call: DetectionCall::Labels,
                    source,
                })
        };
        let faces = async {
            self.capability
                .detect_faces(image)
                .await
                .map_err(|source| DetectionError {
                    call: DetectionCall::Faces,
                    source,
                })
        };

        let (labels, faces) = tokio::try_join!(labels, faces)?;
        let waiting_people_num = count_waiting_people(&labels);

        tracing::debug!(
            labels = labels.len(),
            faces = faces.len(),
            waiting_people_num,
            "Detection finished"
        );

        Ok(Detection {
            waiting_people_num,
            faces,
        })
    }
}

/// Number of instances on the "Person" label, if that label is confident
/// enough. Any other label is ignored.
pub fn count_waiting_people(labels: &[Label]) -> u32 {
    labels
        .iter()
        .find(|label| label.name == PERSON_LABEL)
        .filter(|label| label.confidence >= PERSON_CONFIDENCE_THRESHOLD)
        .map_or(0, |label| {
            u32::try_from(label.instances.len()).unwrap_or(u32::MAX)
        })
}
