//! Repository for the `waiting_customer_meta` table.

use fastlane_core::observation::WaitingCustomerMeta;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::WaitingCustomerMetaRow;

/// Column list for `waiting_customer_meta` SELECT queries.
const COLUMNS: &str = "id, line_observation_id, gender, gender_confidence, \
    lowest_age, highest_age, confidence";

pub struct WaitingCustomerMetaRepo;

impl WaitingCustomerMetaRepo {
    /// Append all face rows in a single multi-row INSERT.
    ///
    /// Returns the number of rows written; an empty slice issues no query.
    pub async fn insert_batch(
        pool: &PgPool,
        metas: &[WaitingCustomerMeta],
    ) -> Result<u64, sqlx::Error> {
        if metas.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO waiting_customer_meta \
                (line_observation_id, gender, gender_confidence, \
                 lowest_age, highest_age, confidence) ",
        );
        builder.push_values(metas, |mut row, meta| {
            row.push_bind(meta.line_observation_id.as_str())
                .push_bind(meta.gender.as_str())
                .push_bind(meta.gender_confidence)
                .push_bind(meta.lowest_age)
                .push_bind(meta.highest_age)
                .push_bind(meta.confidence);
        });

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// All face rows of one observation, in insertion order.
    pub async fn list_by_observation(
        pool: &PgPool,
        line_observation_id: &str,
    ) -> Result<Vec<WaitingCustomerMetaRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waiting_customer_meta \
             WHERE line_observation_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, WaitingCustomerMetaRow>(&query)
            .bind(line_observation_id)
            .fetch_all(pool)
            .await
    }
}
