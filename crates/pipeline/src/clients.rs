//! Collaborator handles for one invocation.
//!
//! Long-lived resources (HTTP client, AWS config, database pool, token
//! cache) are built once at startup by [`CloudClientFactory::connect`].
//! Each invocation then asks the factory for fresh trait-object handles,
//! which are dropped when the invocation ends.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use fastlane_cloud::auth::{AccessTokenProvider, MetadataServerToken, StaticToken};
use fastlane_cloud::bigquery::BigQueryStore;
use fastlane_cloud::gcs::GcsObjectSource;
use fastlane_cloud::rekognition::RekognitionDetector;
use fastlane_cloud::s3::S3ObjectSource;
use fastlane_core::analytics::AnalyticsStore;
use fastlane_core::detection::DetectionCapability;
use fastlane_core::error::{BoxError, ProviderError};
use fastlane_core::object_source::ObjectSource;
use fastlane_db::{DbPool, PgAnalyticsStore};

use crate::config::{AnalyticsBackend, ObjectSourceKind, PipelineConfig};

/// Supplies the three collaborators an invocation needs.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn object_source(&self) -> Result<Box<dyn ObjectSource>, ProviderError>;

    async fn detector(&self) -> Result<Box<dyn DetectionCapability>, ProviderError>;

    async fn analytics_store(&self) -> Result<Box<dyn AnalyticsStore>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database unavailable: {0}")]
    Database(#[source] BoxError),
}

enum PreparedSource {
    Gcs { api_url: String },
    S3(SdkConfig),
}

enum PreparedStore {
    BigQuery {
        project_id: String,
        dataset: String,
        api_url: String,
    },
    Postgres(DbPool),
}

/// Builds the production collaborators from [`PipelineConfig`].
pub struct CloudClientFactory {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
    detection: SdkConfig,
    source: PreparedSource,
    store: PreparedStore,
}

impl CloudClientFactory {
    /// Prepare the shared resources.
    ///
    /// With the Postgres backend this connects, checks the connection and
    /// applies pending migrations.
    pub async fn connect(config: &PipelineConfig) -> Result<Self, StartupError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fastlane/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let tokens: Arc<dyn AccessTokenProvider> = match &config.gcp_auth.access_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(MetadataServerToken::new(
                http.clone(),
                config.gcp_auth.metadata_url.clone(),
            )),
        };

        let detection = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.detection_region.clone()))
            .load()
            .await;

        let source = match &config.object_source {
            ObjectSourceKind::Gcs { api_url } => PreparedSource::Gcs {
                api_url: api_url.clone(),
            },
            ObjectSourceKind::S3 => {
                PreparedSource::S3(aws_config::load_defaults(BehaviorVersion::latest()).await)
            }
        };

        let store = match &config.analytics {
            AnalyticsBackend::BigQuery {
                project_id,
                dataset,
                api_url,
            } => PreparedStore::BigQuery {
                project_id: project_id.clone(),
                dataset: dataset.clone(),
                api_url: api_url.clone(),
            },
            AnalyticsBackend::Postgres { database_url } => {
                let pool = fastlane_db::create_pool(database_url)
                    .await
                    .map_err(|e| StartupError::Database(Box::new(e)))?;
                fastlane_db::health_check(&pool)
                    .await
                    .map_err(|e| StartupError::Database(Box::new(e)))?;
                fastlane_db::run_migrations(&pool)
                    .await
                    .map_err(|e| StartupError::Database(Box::new(e)))?;
                tracing::info!("Database connected and migrations applied");
                PreparedStore::Postgres(pool)
            }
        };

        tracing::info!(
            region = %config.detection_region,
            uses_gcp = config.uses_gcp(),
            "Collaborator clients prepared"
        );

        Ok(Self {
            http,
            tokens,
            detection,
            source,
            store,
        })
    }
}

#[async_trait]
impl ClientFactory for CloudClientFactory {
    async fn object_source(&self) -> Result<Box<dyn ObjectSource>, ProviderError> {
        Ok(match &self.source {
            PreparedSource::Gcs { api_url } => Box::new(GcsObjectSource::new(
                self.http.clone(),
                api_url.clone(),
                self.tokens.clone(),
            )),
            PreparedSource::S3(sdk_config) => Box::new(S3ObjectSource::new(sdk_config)),
        })
    }

    async fn detector(&self) -> Result<Box<dyn DetectionCapability>, ProviderError> {
        Ok(Box::new(RekognitionDetector::new(&self.detection)))
    }

    async fn analytics_store(&self) -> Result<Box<dyn AnalyticsStore>, ProviderError> {
        Ok(match &self.store {
            PreparedStore::BigQuery {
                project_id,
                dataset,
                api_url,
            } => Box::new(BigQueryStore::new(
                self.http.clone(),
                api_url.clone(),
                project_id.clone(),
                dataset.clone(),
                self.tokens.clone(),
            )),
            PreparedStore::Postgres(pool) => Box::new(PgAnalyticsStore::new(pool.clone())),
        })
    }
}
