use std::fmt;

use serde::{Deserialize, Serialize};

/// Creation timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Observation timestamps are expressed in the process-local time zone.
pub type LocalTimestamp = chrono::DateTime<chrono::Local>;

/// Opaque identifier scoping one analyzed image.
///
/// Every face record produced from the same image carries the same id as
/// its foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationId(String);

impl ObservationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
