//! Pipeline configuration loaded from environment variables.
//!
//! Loading is an explicit startup step: missing or malformed settings come
//! back as a [`ConfigError`] and the caller decides whether to abort.
//!
//! | Env Var             | Required                    | Default                             |
//! |---------------------|-----------------------------|-------------------------------------|
//! | `ANALYTICS_BACKEND` | no                          | `bigquery` (`bigquery`, `postgres`) |
//! | `GCP_PROJECT_ID`    | when backend is `bigquery`  |                                     |
//! | `BIGQUERY_DATASET`  | no                          | `fast_lane`                         |
//! | `BIGQUERY_API_URL`  | no                          | `https://bigquery.googleapis.com`   |
//! | `DATABASE_URL`      | when backend is `postgres`  |                                     |
//! | `DETECTION_REGION`  | yes                         |                                     |
//! | `OBJECT_SOURCE`     | no                          | `gcs` (`gcs`, `s3`)                 |
//! | `GCS_API_URL`       | no                          | `https://storage.googleapis.com`    |
//! | `GCP_ACCESS_TOKEN`  | no                          | metadata server token               |
//! | `GCP_METADATA_URL`  | no                          | `http://metadata.google.internal`   |

use fastlane_cloud::{bigquery, gcs};

/// Default base URL of the GCE metadata server.
pub const DEFAULT_METADATA_URL: &str = "http://metadata.google.internal";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {key} is not set")]
    Missing { key: &'static str },

    #[error("Environment variable {key}='{value}' is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where observation rows are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsBackend {
    BigQuery {
        project_id: String,
        dataset: String,
        api_url: String,
    },
    Postgres {
        database_url: String,
    },
}

/// Where uploaded images are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectSourceKind {
    Gcs { api_url: String },
    S3,
}

/// Credentials for the Google APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpAuth {
    /// Fixed bearer token; when unset tokens come from the metadata server.
    pub access_token: Option<String>,
    pub metadata_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub analytics: AnalyticsBackend,
    pub object_source: ObjectSourceKind,
    /// AWS region the detection calls are sent to.
    pub detection_region: String,
    pub gcp_auth: GcpAuth,
}

impl PipelineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing { key });

        let analytics = match get("ANALYTICS_BACKEND").as_deref() {
            None | Some("bigquery") => AnalyticsBackend::BigQuery {
                project_id: require("GCP_PROJECT_ID")?,
                dataset: get("BIGQUERY_DATASET")
                    .unwrap_or_else(|| bigquery::DEFAULT_DATASET.to_string()),
                api_url: get("BIGQUERY_API_URL")
                    .unwrap_or_else(|| bigquery::DEFAULT_API_URL.to_string()),
            },
            Some("postgres") => AnalyticsBackend::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "ANALYTICS_BACKEND",
                    value: other.to_string(),
                    reason: "expected 'bigquery' or 'postgres'".to_string(),
                })
            }
        };

        let object_source = match get("OBJECT_SOURCE").as_deref() {
            None | Some("gcs") => ObjectSourceKind::Gcs {
                api_url: get("GCS_API_URL").unwrap_or_else(|| gcs::DEFAULT_API_URL.to_string()),
            },
            Some("s3") => ObjectSourceKind::S3,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "OBJECT_SOURCE",
                    value: other.to_string(),
                    reason: "expected 'gcs' or 's3'".to_string(),
                })
            }
        };

        let detection_region = require("DETECTION_REGION")?;

        let gcp_auth = GcpAuth {
            access_token: get("GCP_ACCESS_TOKEN"),
            metadata_url: get("GCP_METADATA_URL")
                .unwrap_or_else(|| DEFAULT_METADATA_URL.to_string()),
        };

        Ok(Self {
            analytics,
            object_source,
            detection_region,
            gcp_auth,
        })
    }

    /// Whether any configured collaborator talks to a Google API.
    pub fn uses_gcp(&self) -> bool {
        matches!(self.analytics, AnalyticsBackend::BigQuery { .. })
            || matches!(self.object_source, ObjectSourceKind::Gcs { .. })
    }
}
