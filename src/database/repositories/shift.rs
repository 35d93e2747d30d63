use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::{
    models::{Shift, ShiftInput, ShiftListQuery},
    store::ShiftCatalog,
    utils::sql,
};

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftCatalog for ShiftRepository {
    async fn get(&self, id: i64) -> Result<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&sql(r#"
            SELECT
                id,
                date,
                start_time,
                end_time,
                role_assignment,
                location,
                is_available,
                created_at,
                updated_at
            FROM
                shifts
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Shift>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let shifts = sqlx::query_as::<_, Shift>(&sql(r#"
            SELECT
                id,
                date,
                start_time,
                end_time,
                role_assignment,
                location,
                is_available,
                created_at,
                updated_at
            FROM
                shifts
            WHERE
                id = ANY(?)
            ORDER BY
                date,
                start_time,
                id
        "#))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    async fn create(&self, input: ShiftInput) -> Result<Shift> {
        let now = Utc::now();

        let shift = sqlx::query_as::<_, Shift>(&sql(r#"
            INSERT INTO
                shifts (
                    date,
                    start_time,
                    end_time,
                    role_assignment,
                    location,
                    is_available,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                date,
                start_time,
                end_time,
                role_assignment,
                location,
                is_available,
                created_at,
                updated_at
        "#))
        .bind(input.date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.role_assignment)
        .bind(input.location)
        .bind(input.is_available)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(shift)
    }

    async fn update(&self, shift: &Shift) -> Result<Option<Shift>> {
        let now = Utc::now();

        let updated = sqlx::query_as::<_, Shift>(&sql(r#"
            UPDATE
                shifts
            SET
                date = ?,
                start_time = ?,
                end_time = ?,
                role_assignment = ?,
                location = ?,
                is_available = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                date,
                start_time,
                end_time,
                role_assignment,
                location,
                is_available,
                created_at,
                updated_at
        "#))
        .bind(shift.date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(&shift.role_assignment)
        .bind(&shift.location)
        .bind(shift.is_available)
        .bind(now)
        .bind(shift.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(&sql("DELETE FROM shifts WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ShiftListQuery) -> Result<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(&sql(r#"
            SELECT
                id,
                date,
                start_time,
                end_time,
                role_assignment,
                location,
                is_available,
                created_at,
                updated_at
            FROM
                shifts
            WHERE
                (?::VARCHAR IS NULL OR role_assignment = ?)
                AND (?::VARCHAR IS NULL OR location = ?)
                AND (?::DATE IS NULL OR date = ?)
                AND (?::BOOLEAN IS NULL OR is_available = ?)
            ORDER BY
                date,
                start_time,
                id
            LIMIT ?::BIGINT
            OFFSET ?::BIGINT
        "#))
        .bind(&filter.role_assignment)
        .bind(&filter.role_assignment)
        .bind(&filter.location)
        .bind(&filter.location)
        .bind(filter.date)
        .bind(filter.date)
        .bind(filter.is_available)
        .bind(filter.is_available)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }
}
