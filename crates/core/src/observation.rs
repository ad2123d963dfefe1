//! Observation records and the assembler that builds them.
//!
//! One [`LineObservation`] is produced per analyzed image, plus one
//! [`WaitingCustomerMeta`] per detected face. Both are write-once facts.

use serde::Serialize;

use crate::detection::FaceAttributes;
use crate::object_name::ParsedMeta;
use crate::types::{LocalTimestamp, ObservationId, Timestamp};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Crowd count for one image of a shop's line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineObservation {
    pub id: ObservationId,
    pub shop_id: String,
    /// Person instances detected above threshold. Faces undercount people
    /// turned away from the camera, so this is the authoritative count.
    pub waiting_people_num: u32,
    pub observed_at: LocalTimestamp,
    pub created_at: Timestamp,
}

/// Demographic estimate for one face seen in an observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitingCustomerMeta {
    pub line_observation_id: ObservationId,
    pub gender: String,
    pub gender_confidence: f64,
    pub lowest_age: i32,
    pub highest_age: i32,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Build the observation and its face records.
///
/// Every face maps to exactly one meta record carrying `id` as its foreign
/// key. An empty face list yields an empty meta list.
pub fn assemble(
    id: ObservationId,
    meta: ParsedMeta,
    created_at: Timestamp,
    waiting_people_num: u32,
    faces: Vec<FaceAttributes>,
) -> (LineObservation, Vec<WaitingCustomerMeta>) {
    let metas = faces
        .into_iter()
        .map(|face| WaitingCustomerMeta {
            line_observation_id: id.clone(),
            gender: face.gender,
            gender_confidence: face.gender_confidence,
            lowest_age: face.lowest_age,
            highest_age: face.highest_age,
            confidence: face.confidence,
        })
        .collect();

    let observation = LineObservation {
        id,
        shop_id: meta.shop_id,
        waiting_people_num,
        observed_at: meta.observed_at,
        created_at,
    };

    (observation, metas)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone, Utc};

    use super::*;

    fn meta() -> ParsedMeta {
        ParsedMeta {
            shop_id: "shop42".to_string(),
            observed_at: Local.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn face(gender: &str, low: i32, high: i32) -> FaceAttributes {
        FaceAttributes {
            gender: gender.to_string(),
            gender_confidence: 98.2,
            lowest_age: low,
            highest_age: high,
            confidence: 99.1,
        }
    }

    #[test]
    fn every_face_references_the_observation() {
        let id = ObservationId::new("obs-1");
        let faces = vec![face("Female", 20, 30), face("Male", 35, 45), face("Male", 8, 12)];

        let (observation, metas) = assemble(id.clone(), meta(), Utc::now(), 5, faces);

        assert_eq!(observation.id, id);
        assert_eq!(metas.len(), 3);
        assert!(metas.iter().all(|m| m.line_observation_id == id));
        assert_eq!(metas[1].gender, "Male");
        assert_eq!(metas[1].lowest_age, 35);
        assert_eq!(metas[2].highest_age, 12);
    }

    #[test]
    fn no_faces_yields_no_metas() {
        let (observation, metas) =
            assemble(ObservationId::new("obs-2"), meta(), Utc::now(), 4, Vec::new());

        assert!(metas.is_empty());
        assert_eq!(observation.waiting_people_num, 4);
    }

    #[test]
    fn observation_carries_parsed_metadata() {
        let created_at = Utc.timestamp_opt(1_700_000_123, 0).unwrap();
        let (observation, _) =
            assemble(ObservationId::new("obs-3"), meta(), created_at, 2, Vec::new());

        assert_eq!(observation.shop_id, "shop42");
        assert_eq!(observation.observed_at.timestamp(), 1_700_000_000);
        assert_eq!(observation.created_at, created_at);
    }

    #[test]
    fn face_attributes_are_copied_unchanged() {
        let (_, metas) = assemble(
            ObservationId::new("obs-4"),
            meta(),
            Utc::now(),
            1,
            vec![face("Female", 20, 30)],
        );

        let m = &metas[0];
        assert_eq!(m.gender, "Female");
        assert_eq!(m.gender_confidence, 98.2);
        assert_eq!(m.lowest_age, 20);
        assert_eq!(m.highest_age, 30);
        assert_eq!(m.confidence, 99.1);
    }
}
