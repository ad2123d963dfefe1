//! Observation ingestion pipeline.
//!
//! One invocation takes an uploaded line image from object storage through
//! vision detection into the two analytics tables:
//!
//! - [`detect::DetectionAdapter`]: people count and face attributes.
//! - [`persist::StoreWriter`]: the two-step table write.
//! - [`orchestrator::Pipeline`]: sequencing and stage-labelled errors.
//! - [`clients`]: per-invocation collaborator handles.
//! - [`config`]: typed environment configuration.

pub mod clients;
pub mod config;
pub mod detect;
pub mod error;
pub mod orchestrator;
pub mod persist;

pub use orchestrator::{IngestionReport, Pipeline};
