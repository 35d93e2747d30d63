use crate::database::{
    models::{WorkerShift, WorkerShiftInput, WorkerShiftStatus},
    store::ActiveClaimExists,
};
use crate::services::{engine::ShiftEngine, error::ShiftError};

impl ShiftEngine {
    /// Submit a worker's claim on a shift.
    ///
    /// The checks run in a fixed order and stop at the first failure:
    /// availability, duplicate active claim, same-day approved shift, then the
    /// day and week quotas. Only when all pass is a `PENDING` claim written.
    pub async fn request_shift(
        &self,
        shift_id: i64,
        worker_id: i64,
    ) -> Result<WorkerShift, ShiftError> {
        let result = self.try_request_shift(shift_id, worker_id).await;

        match &result {
            Ok(claim) => log::info!(
                "Worker {} requested shift {} - claim ID: {}",
                worker_id,
                shift_id,
                claim.id
            ),
            Err(e) if e.is_rejection() => log::info!(
                "Worker {} request for shift {} refused: {}",
                worker_id,
                shift_id,
                e
            ),
            Err(_) => {}
        }

        result
    }

    async fn try_request_shift(
        &self,
        shift_id: i64,
        worker_id: i64,
    ) -> Result<WorkerShift, ShiftError> {
        let shift = self.load_shift("RequestShift", shift_id).await?;
        if !shift.is_available {
            return Err(ShiftError::ShiftUnavailable);
        }

        for status in [WorkerShiftStatus::Pending, WorkerShiftStatus::Approved] {
            let claims = self
                .requests
                .list_by_filter(Some(worker_id), Some(status))
                .await
                .map_err(|e| ShiftError::store("RequestShift", e))?;
            if claims.iter().any(|c| c.shift_id == shift_id) {
                return Err(ShiftError::DuplicateClaim);
            }
        }

        let approved = self
            .requests
            .list_by_filter(Some(worker_id), Some(WorkerShiftStatus::Approved))
            .await
            .map_err(|e| ShiftError::store("RequestShift", e))?;
        for claim in approved {
            // A deleted shift cannot clash with anything.
            let Some(other) = self
                .shifts
                .get(claim.shift_id)
                .await
                .map_err(|e| ShiftError::store("RequestShift", e))?
            else {
                continue;
            };

            // Same date is disqualifying on its own; the overlap only picks the reason.
            if other.date == shift.date {
                return Err(if shift.overlaps(&other) {
                    ShiftError::OverlappingShift
                } else {
                    ShiftError::SameDayShift
                });
            }
        }

        let quota = self.limits.limits_on(worker_id, shift.date).await?;
        if quota.has_shift_on_day {
            return Err(ShiftError::SameDayShift);
        }
        if quota.approved_this_week >= self.weekly_limit {
            return Err(ShiftError::WeeklyLimitExceeded(quota.approved_this_week));
        }

        self.requests
            .create(WorkerShiftInput::pending(shift_id, worker_id))
            .await
            .map_err(|e| {
                if e.is::<ActiveClaimExists>() {
                    ShiftError::DuplicateClaim
                } else {
                    ShiftError::store("RequestShift", e)
                }
            })
    }
}
