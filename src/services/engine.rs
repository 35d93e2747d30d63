use std::sync::Arc;

use crate::database::{
    models::{
        MAXIMUM_WORKER_SHIFTS_PER_WEEK, Shift, ShiftInput, ShiftListQuery, ShiftQuota,
        WorkerShiftDetail, WorkerShiftDetailQuery,
    },
    store::{RequestStore, ShiftCatalog},
};
use crate::services::{error::ShiftError, limits::LimitChecker};

/// Entry point for every shift operation. Holds no state of its own beyond the
/// two store handles, so it is cheap to clone and share across workers.
#[derive(Clone)]
pub struct ShiftEngine {
    pub(crate) shifts: Arc<dyn ShiftCatalog>,
    pub(crate) requests: Arc<dyn RequestStore>,
    pub(crate) limits: LimitChecker,
    pub(crate) weekly_limit: i64,
}

impl ShiftEngine {
    pub fn new(shifts: Arc<dyn ShiftCatalog>, requests: Arc<dyn RequestStore>) -> Self {
        let limits = LimitChecker::new(requests.clone());
        Self {
            shifts,
            requests,
            limits,
            weekly_limit: MAXIMUM_WORKER_SHIFTS_PER_WEEK,
        }
    }

    pub fn with_weekly_limit(mut self, weekly_limit: i64) -> Self {
        self.weekly_limit = weekly_limit;
        self
    }

    pub fn weekly_limit(&self) -> i64 {
        self.weekly_limit
    }

    pub async fn check_limits(&self, worker_id: i64, date: &str) -> Result<ShiftQuota, ShiftError> {
        self.limits.check_limits(worker_id, date).await
    }

    pub(crate) async fn load_shift(
        &self,
        operation: &'static str,
        shift_id: i64,
    ) -> Result<Shift, ShiftError> {
        self.shifts
            .get(shift_id)
            .await
            .map_err(|e| ShiftError::store(operation, e))?
            .ok_or_else(|| ShiftError::shift_not_found(shift_id))
    }

    // Administration

    pub async fn create_shift(&self, input: ShiftInput) -> Result<Shift, ShiftError> {
        let shift = self
            .shifts
            .create(input)
            .await
            .map_err(|e| ShiftError::store("CreateShift", e))?;

        log::info!("Created shift {} on {}", shift.id, shift.date);
        Ok(shift)
    }

    pub async fn get_shift(&self, shift_id: i64) -> Result<Shift, ShiftError> {
        self.load_shift("GetShift", shift_id).await
    }

    pub async fn update_shift(&self, shift_id: i64, input: ShiftInput) -> Result<Shift, ShiftError> {
        let mut shift = self.load_shift("UpdateShift", shift_id).await?;
        shift.apply(input);

        self.shifts
            .update(&shift)
            .await
            .map_err(|e| ShiftError::store("UpdateShift", e))?
            .ok_or_else(|| ShiftError::shift_not_found(shift_id))
    }

    pub async fn delete_shift(&self, shift_id: i64) -> Result<(), ShiftError> {
        let deleted = self
            .shifts
            .delete(shift_id)
            .await
            .map_err(|e| ShiftError::store("DeleteShift", e))?;

        if !deleted {
            return Err(ShiftError::shift_not_found(shift_id));
        }

        log::info!("Deleted shift {}", shift_id);
        Ok(())
    }

    pub async fn list_shifts(&self, filter: &ShiftListQuery) -> Result<Vec<Shift>, ShiftError> {
        self.shifts
            .list(filter)
            .await
            .map_err(|e| ShiftError::store("ListShifts", e))
    }

    pub async fn get_all_shift_requests(
        &self,
        filter: &WorkerShiftDetailQuery,
    ) -> Result<Vec<WorkerShiftDetail>, ShiftError> {
        self.requests
            .list_joined_detail(filter)
            .await
            .map_err(|e| ShiftError::store("GetAllShiftRequests", e))
    }
}
