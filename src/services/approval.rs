use serde::Serialize;

use crate::database::models::{ClaimDecision, Shift, WorkerShift, WorkerShiftStatus};
use crate::services::{engine::ShiftEngine, error::ShiftError};

/// Result of approving a worker for a shift.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    pub shift: Shift,
    /// `None` when the worker had no claim on the shift.
    pub approved: Option<WorkerShift>,
    pub rejected: Vec<WorkerShift>,
}

impl ShiftEngine {
    /// Give the shift to `worker_id`: close it, approve the worker's latest
    /// claim and reject every other claim on it.
    ///
    /// The claim updates are applied as one batch. Closing the shift happens
    /// first and is not undone if the batch fails.
    pub async fn approve_shift_request(
        &self,
        shift_id: i64,
        worker_id: i64,
        approved_by: Option<i64>,
    ) -> Result<ApprovalOutcome, ShiftError> {
        let mut shift = self.load_shift("ApproveShiftRequest", shift_id).await?;
        shift.is_available = false;
        let shift = self
            .shifts
            .update(&shift)
            .await
            .map_err(|e| ShiftError::store("ApproveShiftRequest", e))?
            .ok_or_else(|| ShiftError::shift_not_found(shift_id))?;

        let claims = self
            .requests
            .list_by_shift(shift_id)
            .await
            .map_err(|e| ShiftError::store("ApproveShiftRequest", e))?;

        let winner = claims
            .iter()
            .filter(|c| c.worker_id == worker_id)
            .map(|c| c.id)
            .max();
        if winner.is_none() {
            log::warn!(
                "Approving shift {} for worker {} who has no claim on it",
                shift_id,
                worker_id
            );
        }

        let decisions = claims
            .iter()
            .map(|c| ClaimDecision {
                claim_id: c.id,
                status: if Some(c.id) == winner {
                    WorkerShiftStatus::Approved
                } else {
                    WorkerShiftStatus::Rejected
                },
                approved_by,
            })
            .collect();

        let updated = self
            .requests
            .apply_decisions(decisions)
            .await
            .map_err(|e| ShiftError::store("ApproveShiftRequest", e))?;

        let (approved, rejected): (Vec<WorkerShift>, Vec<WorkerShift>) = updated
            .into_iter()
            .partition(|c| c.status == WorkerShiftStatus::Approved);

        log::info!(
            "Shift {} approved for worker {} ({} other claims rejected)",
            shift_id,
            worker_id,
            rejected.len()
        );

        Ok(ApprovalOutcome {
            shift,
            approved: approved.into_iter().next(),
            rejected,
        })
    }

    /// Reject the worker's claim on the shift. The shift and other workers'
    /// claims are left alone. Doing nothing is not an error.
    ///
    /// Acts on the worker's oldest claim, even if that one is already rejected.
    pub async fn reject_shift_request(
        &self,
        shift_id: i64,
        worker_id: i64,
        approved_by: Option<i64>,
    ) -> Result<Option<WorkerShift>, ShiftError> {
        let claims = self
            .requests
            .list_by_shift(shift_id)
            .await
            .map_err(|e| ShiftError::store("RejectShiftRequest", e))?;

        let Some(claim) = claims.into_iter().find(|c| c.worker_id == worker_id) else {
            log::warn!(
                "No claim by worker {} on shift {} to reject",
                worker_id,
                shift_id
            );
            return Ok(None);
        };

        let rejected = self
            .requests
            .update_status(claim.id, WorkerShiftStatus::Rejected, approved_by)
            .await
            .map_err(|e| ShiftError::store("RejectShiftRequest", e))?;

        log::info!("Rejected claim {} by worker {} on shift {}", claim.id, worker_id, shift_id);
        Ok(rejected)
    }
}
