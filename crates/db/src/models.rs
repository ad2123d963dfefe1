//! Row shapes of the observation tables as stored.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Surrogate key of face rows.
pub type DbId = i64;

#[derive(Debug, Clone, FromRow)]
pub struct LineObservationRow {
    pub id: String,
    pub shop_id: String,
    pub waiting_people_num: i64,
    pub observed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct WaitingCustomerMetaRow {
    pub id: DbId,
    pub line_observation_id: String,
    pub gender: String,
    pub gender_confidence: f64,
    pub lowest_age: i32,
    pub highest_age: i32,
    pub confidence: f64,
}
