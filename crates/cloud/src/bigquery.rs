//! BigQuery streaming analytics store (`tabledata.insertAll`).

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use fastlane_core::analytics::{AnalyticsStore, LINE_OBSERVATION_TABLE, WAITING_CUSTOMER_META_TABLE};
use fastlane_core::error::ProviderError;
use fastlane_core::observation::{LineObservation, WaitingCustomerMeta};
use serde::{Deserialize, Serialize};

use crate::auth::AccessTokenProvider;
use crate::http::parse_response;

/// Default public endpoint of the BigQuery REST API.
pub const DEFAULT_API_URL: &str = "https://bigquery.googleapis.com";

/// Default dataset holding the observation tables.
pub const DEFAULT_DATASET: &str = "fast_lane";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllRequest<T: Serialize> {
    kind: &'static str,
    skip_invalid_rows: bool,
    ignore_unknown_values: bool,
    rows: Vec<InsertRow<T>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertRow<T: Serialize> {
    insert_id: String,
    json: T,
}

#[derive(Debug, Serialize)]
struct ObservationRow<'a> {
    id: &'a str,
    shop_id: &'a str,
    waiting_people_num: u32,
    observed_at: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CustomerMetaRow<'a> {
    line_observation_id: &'a str,
    gender: &'a str,
    gender_confidence: f64,
    lowest_age: i32,
    highest_age: i32,
    confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<RowErrors>,
}

#[derive(Debug, Deserialize)]
struct RowErrors {
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

/// Canonical BigQuery timestamp literal, keeping the source offset.
fn timestamp_literal<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
}

fn observation_row(observation: &LineObservation) -> InsertRow<ObservationRow<'_>> {
    InsertRow {
        insert_id: observation.id.to_string(),
        json: ObservationRow {
            id: observation.id.as_str(),
            shop_id: &observation.shop_id,
            waiting_people_num: observation.waiting_people_num,
            observed_at: timestamp_literal(&observation.observed_at),
            created_at: timestamp_literal(&observation.created_at),
        },
    }
}

fn customer_meta_rows(metas: &[WaitingCustomerMeta]) -> Vec<InsertRow<CustomerMetaRow<'_>>> {
    metas
        .iter()
        .enumerate()
        .map(|(index, meta)| InsertRow {
            insert_id: format!("{}:{index}", meta.line_observation_id),
            json: CustomerMetaRow {
                line_observation_id: meta.line_observation_id.as_str(),
                gender: &meta.gender,
                gender_confidence: meta.gender_confidence,
                lowest_age: meta.lowest_age,
                highest_age: meta.highest_age,
                confidence: meta.confidence,
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct BigQueryStore {
    client: reqwest::Client,
    api_url: String,
    project_id: String,
    dataset: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl BigQueryStore {
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        project_id: String,
        dataset: String,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            client,
            api_url,
            project_id,
            dataset,
            tokens,
        }
    }

    fn insert_all_url(&self, table: &str) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{table}/insertAll",
            self.api_url.trim_end_matches('/'),
            self.project_id,
            self.dataset,
        )
    }

    async fn insert_all<T: Serialize>(
        &self,
        table: &str,
        rows: Vec<InsertRow<T>>,
    ) -> Result<(), ProviderError> {
        let row_count = rows.len();
        let body = InsertAllRequest {
            kind: "bigquery#tableDataInsertAllRequest",
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows,
        };

        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(self.insert_all_url(table))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::request)?;

        let result: InsertAllResponse = parse_response(response).await?;

        if let Some(first) = result.insert_errors.first() {
            let message = first
                .errors
                .first()
                .map(|e| format!("{}: {}", e.reason, e.message))
                .unwrap_or_else(|| "unspecified error".to_string());
            return Err(ProviderError::Rejected {
                table: table.to_string(),
                rows: result.insert_errors.len(),
                message,
            });
        }

        tracing::debug!(table, rows = row_count, "Streamed rows into BigQuery");
        Ok(())
    }
}

#[async_trait]
impl AnalyticsStore for BigQueryStore {
    async fn insert_observation(
        &self,
        observation: &LineObservation,
    ) -> Result<(), ProviderError> {
        self.insert_all(LINE_OBSERVATION_TABLE, vec![observation_row(observation)])
            .await
    }

    async fn insert_customer_metas(
        &self,
        metas: &[WaitingCustomerMeta],
    ) -> Result<(), ProviderError> {
        if metas.is_empty() {
            return Ok(());
        }
        self.insert_all(WAITING_CUSTOMER_META_TABLE, customer_meta_rows(metas))
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
