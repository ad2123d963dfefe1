//! Object reference parser.
//!
//! Uploaded images are named `<shopID>_<unixEpochSeconds>.<extension>`,
//! optionally below a directory prefix. The base name carries the only
//! metadata the pipeline gets about an observation.

use chrono::{Local, TimeZone};

use crate::types::LocalTimestamp;

/// Delimiter between the shop id and the epoch segment.
const SEGMENT_DELIMITER: char = '_';

/// Metadata derived from an object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMeta {
    pub shop_id: String,
    pub observed_at: LocalTimestamp,
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectNameError {
    #[error("Object name '{name}' has no file extension")]
    MissingExtension { name: String },

    #[error("Object name '{name}' has an empty shop id segment")]
    EmptyShopId { name: String },

    #[error("Object name '{name}' has no timestamp segment")]
    MissingTimestamp { name: String },

    #[error("Invalid timestamp segment '{segment}' in object name '{name}': {source}")]
    InvalidTimestamp {
        name: String,
        segment: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Timestamp segment '{segment}' in object name '{name}' is out of range")]
    TimestampOutOfRange { name: String, segment: String },

    #[error("Unexpected segment '{segment}' in object name '{name}'")]
    UnexpectedSegment { name: String, segment: String },
}

/// Parse `<shopID>_<unixSeconds>.<ext>` into a [`ParsedMeta`].
///
/// Any directory prefix is ignored. The shop id is taken verbatim; the
/// epoch seconds are converted to local time.
pub fn parse(object_name: &str) -> Result<ParsedMeta, ObjectNameError> {
    let base = object_name.rsplit('/').next().unwrap_or(object_name);

    let stem = match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => {
            return Err(ObjectNameError::MissingExtension {
                name: object_name.to_string(),
            })
        }
    };

    let mut segments = stem.split(SEGMENT_DELIMITER);

    let shop_id = segments.next().unwrap_or_default();
    if shop_id.is_empty() {
        return Err(ObjectNameError::EmptyShopId {
            name: object_name.to_string(),
        });
    }

    let epoch_segment = segments
        .next()
        .ok_or_else(|| ObjectNameError::MissingTimestamp {
            name: object_name.to_string(),
        })?;

    if let Some(extra) = segments.next() {
        return Err(ObjectNameError::UnexpectedSegment {
            name: object_name.to_string(),
            segment: extra.to_string(),
        });
    }

    let secs: i64 = epoch_segment
        .parse()
        .map_err(|source| ObjectNameError::InvalidTimestamp {
            name: object_name.to_string(),
            segment: epoch_segment.to_string(),
            source,
        })?;

    let observed_at = Local.timestamp_opt(secs, 0).single().ok_or_else(|| {
        ObjectNameError::TimestampOutOfRange {
            name: object_name.to_string(),
            segment: epoch_segment.to_string(),
        }
    })?;

    Ok(ParsedMeta {
        shop_id: shop_id.to_string(),
        observed_at,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
