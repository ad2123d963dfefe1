//! Production collaborators for the ingestion pipeline.
//!
//! - [`gcs`] / [`s3`]: object sources for uploaded line images.
//! - [`rekognition`]: the vision detection capability.
//! - [`bigquery`]: the streaming analytics store.
//! - [`auth`]: GCP access tokens shared by the Google clients.

pub mod auth;
pub mod bigquery;
pub mod gcs;
pub mod rekognition;
pub mod s3;

mod http;
