//! Repository for the `line_observation` table.

use fastlane_core::observation::LineObservation;
use sqlx::PgPool;

use crate::models::LineObservationRow;

/// Column list for `line_observation` SELECT queries.
const COLUMNS: &str = "id, shop_id, waiting_people_num, observed_at, created_at";

pub struct LineObservationRepo;

impl LineObservationRepo {
    /// Append one observation.
    pub async fn insert(pool: &PgPool, observation: &LineObservation) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO line_observation \
                (id, shop_id, waiting_people_num, observed_at, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(observation.id.as_str())
        .bind(&observation.shop_id)
        .bind(i64::from(observation.waiting_people_num))
        .bind(observation.observed_at)
        .bind(observation.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<LineObservationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM line_observation WHERE id = $1");
        sqlx::query_as::<_, LineObservationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
