//! Inbound storage-object event.

use serde::Deserialize;

/// Identifies the uploaded image that triggered an invocation.
///
/// Matches the object-finalize payload of the storage notification; any
/// other fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectReference {
    pub bucket: String,
    pub name: String,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

impl ObjectReference {
    /// Whether the declared content type (if any) allows image analysis.
    ///
    /// An undeclared content type is accepted; the detection backend has the
    /// final word on whether the bytes are a decodable image.
    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref() {
            None | Some("") => true,
            Some(ct) => ct.trim().to_ascii_lowercase().starts_with("image/"),
        }
    }
}
