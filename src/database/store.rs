//! Storage boundary of the shift engine.
//!
//! The engine only talks to these two traits. `repositories` provides a
//! Postgres implementation of each and an in-memory implementation of both.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::database::models::{
    ClaimDecision, Shift, ShiftInput, ShiftListQuery, ShiftQuota, WorkerShift,
    WorkerShiftDetail, WorkerShiftDetailQuery, WorkerShiftInput, WorkerShiftStatus,
};

/// Returned by `RequestStore::create` when the worker already holds a pending
/// or approved claim on the shift.
#[derive(Debug, Error)]
#[error("worker {worker_id} already has an active claim on shift {shift_id}")]
pub struct ActiveClaimExists {
    pub shift_id: i64,
    pub worker_id: i64,
}

#[async_trait]
pub trait ShiftCatalog: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Shift>>;

    /// Shifts for the given ids, ordered by date then start time. Unknown ids are skipped.
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Shift>>;

    async fn create(&self, input: ShiftInput) -> Result<Shift>;

    /// Overwrites every mutable field. `None` when the shift does not exist.
    async fn update(&self, shift: &Shift) -> Result<Option<Shift>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn list(&self, filter: &ShiftListQuery) -> Result<Vec<Shift>>;
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create(&self, input: WorkerShiftInput) -> Result<WorkerShift>;

    async fn get(&self, id: i64) -> Result<Option<WorkerShift>>;

    /// Most recently updated first.
    async fn list_by_filter(
        &self,
        worker_id: Option<i64>,
        status: Option<WorkerShiftStatus>,
    ) -> Result<Vec<WorkerShift>>;

    async fn update_status(
        &self,
        id: i64,
        status: WorkerShiftStatus,
        approved_by: Option<i64>,
    ) -> Result<Option<WorkerShift>>;

    /// Applies every decision or none of them.
    async fn apply_decisions(&self, decisions: Vec<ClaimDecision>) -> Result<Vec<WorkerShift>>;

    /// Creation order.
    async fn list_by_worker(&self, worker_id: i64) -> Result<Vec<WorkerShift>>;

    /// Creation order.
    async fn list_by_shift(&self, shift_id: i64) -> Result<Vec<WorkerShift>>;

    async fn quotas(&self, worker_id: i64, date: NaiveDate) -> Result<ShiftQuota>;

    /// Most recently updated first, then paginated.
    async fn list_joined_detail(
        &self,
        filter: &WorkerShiftDetailQuery,
    ) -> Result<Vec<WorkerShiftDetail>>;
}
