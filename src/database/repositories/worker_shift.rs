use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::database::{
    models::{
        ClaimDecision, ShiftQuota, WeekWindow, WorkerShift, WorkerShiftDetail,
        WorkerShiftDetailQuery, WorkerShiftInput, WorkerShiftStatus,
    },
    store::{ActiveClaimExists, RequestStore},
    transaction::DatabaseTransaction,
    utils::sql,
};

#[derive(Clone)]
pub struct WorkerShiftRepository {
    pool: PgPool,
}

impl WorkerShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for WorkerShiftRepository {
    async fn create(&self, input: WorkerShiftInput) -> Result<WorkerShift> {
        let now = Utc::now();

        let result = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            INSERT INTO
                worker_shifts (
                    shift_id,
                    worker_id,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
        "#))
        .bind(input.shift_id)
        .bind(input.worker_id)
        .bind(input.status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(claim) => Ok(claim),
            // uq_worker_shifts_active
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ActiveClaimExists {
                    shift_id: input.shift_id,
                    worker_id: input.worker_id,
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: i64) -> Result<Option<WorkerShift>> {
        let claim = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            SELECT
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
            FROM
                worker_shifts
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claim)
    }

    async fn list_by_filter(
        &self,
        worker_id: Option<i64>,
        status: Option<WorkerShiftStatus>,
    ) -> Result<Vec<WorkerShift>> {
        let claims = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            SELECT
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
            FROM
                worker_shifts
            WHERE
                (?::BIGINT IS NULL OR worker_id = ?)
                AND (?::VARCHAR IS NULL OR status = ?)
            ORDER BY
                updated_at DESC,
                id DESC
        "#))
        .bind(worker_id)
        .bind(worker_id)
        .bind(status)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(claims)
    }

    async fn update_status(
        &self,
        id: i64,
        status: WorkerShiftStatus,
        approved_by: Option<i64>,
    ) -> Result<Option<WorkerShift>> {
        let now = Utc::now();

        let claim = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            UPDATE
                worker_shifts
            SET
                status = ?,
                approved_by = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
        "#))
        .bind(status)
        .bind(approved_by)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claim)
    }

    async fn apply_decisions(&self, decisions: Vec<ClaimDecision>) -> Result<Vec<WorkerShift>> {
        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let now = Utc::now();
                let mut updated = Vec::with_capacity(decisions.len());

                for decision in decisions {
                    let claim = sqlx::query_as::<_, WorkerShift>(&sql(r#"
                        UPDATE
                            worker_shifts
                        SET
                            status = ?,
                            approved_by = ?,
                            updated_at = ?
                        WHERE
                            id = ?
                        RETURNING
                            id,
                            shift_id,
                            worker_id,
                            approved_by,
                            status,
                            created_at,
                            updated_at
                    "#))
                    .bind(decision.status)
                    .bind(decision.approved_by)
                    .bind(now)
                    .bind(decision.claim_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("worker shift {} disappeared mid-update", decision.claim_id)
                    })?;

                    updated.push(claim);
                }

                Ok(updated)
            })
        })
        .await
    }

    async fn list_by_worker(&self, worker_id: i64) -> Result<Vec<WorkerShift>> {
        let claims = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            SELECT
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
            FROM
                worker_shifts
            WHERE
                worker_id = ?
            ORDER BY
                id
        "#))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(claims)
    }

    async fn list_by_shift(&self, shift_id: i64) -> Result<Vec<WorkerShift>> {
        let claims = sqlx::query_as::<_, WorkerShift>(&sql(r#"
            SELECT
                id,
                shift_id,
                worker_id,
                approved_by,
                status,
                created_at,
                updated_at
            FROM
                worker_shifts
            WHERE
                shift_id = ?
            ORDER BY
                id
        "#))
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(claims)
    }

    async fn quotas(&self, worker_id: i64, date: NaiveDate) -> Result<ShiftQuota> {
        let week = WeekWindow::containing(date)
            .ok_or_else(|| anyhow::anyhow!("no complete week around {}", date))?;

        let (shifts_on_day, shifts_in_week): (i64, i64) = sqlx::query_as(&sql(r#"
            SELECT
                COUNT(*) FILTER (WHERE s.date = ?) AS shifts_on_day,
                COUNT(*) AS shifts_in_week
            FROM
                worker_shifts ws
                INNER JOIN shifts s ON ws.shift_id = s.id
            WHERE
                ws.worker_id = ?
                AND ws.status = 'APPROVED'
                AND s.date BETWEEN ? AND ?
        "#))
        .bind(date)
        .bind(worker_id)
        .bind(week.monday)
        .bind(week.sunday)
        .fetch_one(&self.pool)
        .await?;

        Ok(ShiftQuota {
            has_shift_on_day: shifts_on_day > 0,
            approved_this_week: shifts_in_week,
        })
    }

    async fn list_joined_detail(
        &self,
        filter: &WorkerShiftDetailQuery,
    ) -> Result<Vec<WorkerShiftDetail>> {
        let details = sqlx::query_as::<_, WorkerShiftDetail>(&sql(r#"
            SELECT
                ws.id,
                ws.shift_id,
                ws.worker_id,
                ws.approved_by,
                ws.status,
                s.date,
                s.start_time,
                s.end_time,
                s.role_assignment,
                s.location,
                s.is_available
            FROM
                worker_shifts ws
                INNER JOIN shifts s ON ws.shift_id = s.id
            WHERE
                (?::BIGINT IS NULL OR ws.worker_id = ?)
                AND (?::VARCHAR IS NULL OR ws.status = ?)
                AND (?::VARCHAR IS NULL OR s.role_assignment = ?)
                AND (?::VARCHAR IS NULL OR s.location = ?)
            ORDER BY
                ws.updated_at DESC,
                ws.id DESC
            LIMIT ?::BIGINT
            OFFSET ?::BIGINT
        "#))
        .bind(filter.worker_id)
        .bind(filter.worker_id)
        .bind(filter.status)
        .bind(filter.status)
        .bind(&filter.role)
        .bind(&filter.role)
        .bind(&filter.location)
        .bind(&filter.location)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }
}
