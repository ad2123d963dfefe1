//! Stage-labelled pipeline errors.

use std::fmt;

use fastlane_core::error::ProviderError;
use fastlane_core::object_name::ObjectNameError;

/// Step of an invocation, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AcquireClients,
    ParseMetadata,
    FetchObject,
    Detect,
    Persist,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::AcquireClients => "acquire clients",
            Self::ParseMetadata => "parse metadata",
            Self::FetchObject => "fetch object",
            Self::Detect => "detect",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse failure class reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The event itself is unusable; redelivering it cannot succeed.
    Input,
    /// An external collaborator failed.
    Dependency,
}

/// One of the two detection calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionCall {
    Labels,
    Faces,
}

impl fmt::Display for DetectionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Labels => "detect labels",
            Self::Faces => "detect faces",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{call} failed: {source}")]
pub struct DetectionError {
    pub call: DetectionCall,
    #[source]
    pub source: ProviderError,
}

#[derive(Debug, thiserror::Error)]
#[error("write to {table} failed: {source}")]
pub struct StoreError {
    pub table: &'static str,
    #[source]
    pub source: ProviderError,
}

/// Cause of a failed stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    ObjectName(#[from] ObjectNameError),

    #[error("Unsupported content type '{0}'")]
    UnsupportedContentType(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.source {
            StageError::ObjectName(_) | StageError::UnsupportedContentType(_) => ErrorKind::Input,
            StageError::Provider(_) | StageError::Detection(_) | StageError::Store(_) => {
                ErrorKind::Dependency
            }
        }
    }
}
