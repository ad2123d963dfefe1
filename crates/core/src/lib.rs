//! Fastlane domain core.
//!
//! Pure building blocks for the line-observation ingestion pipeline:
//!
//! - [`object_name`]: shop id / observation time from an uploaded object name.
//! - [`observation`]: the two persisted record shapes and the assembler.
//! - [`detection`], [`object_source`], [`analytics`]: the collaborator
//!   traits the pipeline is written against.
//! - [`id`]: observation identifier generation.

pub mod analytics;
pub mod detection;
pub mod error;
pub mod event;
pub mod id;
pub mod object_name;
pub mod object_source;
pub mod observation;
pub mod types;
