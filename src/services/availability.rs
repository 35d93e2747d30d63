use std::collections::HashMap;

use chrono::NaiveDate;

use crate::database::models::{ShiftListQuery, ShiftView, WorkerShiftStatus};
use crate::services::{engine::ShiftEngine, error::ShiftError};

impl ShiftEngine {
    /// Every open shift, tagged with the worker's claim status on it.
    ///
    /// Statuses are layered pending, then approved, then rejected, so a
    /// rejected claim shows through even when the worker re-applied.
    pub async fn get_available_shifts(&self, worker_id: i64) -> Result<Vec<ShiftView>, ShiftError> {
        let shifts = self
            .shifts
            .list(&ShiftListQuery::available())
            .await
            .map_err(|e| ShiftError::data_unavailable("GetAvailableShifts", e))?;

        let mut statuses: HashMap<i64, WorkerShiftStatus> = HashMap::new();
        for status in [
            WorkerShiftStatus::Pending,
            WorkerShiftStatus::Approved,
            WorkerShiftStatus::Rejected,
        ] {
            let claims = self
                .requests
                .list_by_filter(Some(worker_id), Some(status))
                .await
                .map_err(|e| ShiftError::data_unavailable("GetAvailableShifts", e))?;
            for claim in claims {
                statuses.insert(claim.shift_id, status);
            }
        }

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let status = statuses.get(&shift.id).copied();
                ShiftView::new(shift, status)
            })
            .collect())
    }

    /// Shifts the worker holds an approved claim on.
    pub async fn get_assigned_shifts(&self, worker_id: i64) -> Result<Vec<ShiftView>, ShiftError> {
        let approved = self
            .requests
            .list_by_filter(Some(worker_id), Some(WorkerShiftStatus::Approved))
            .await
            .map_err(|e| ShiftError::data_unavailable("GetAssignedShifts", e))?;
        if approved.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = approved.iter().map(|c| c.shift_id).collect();
        let shifts = self
            .shifts
            .get_many(&ids)
            .await
            .map_err(|e| ShiftError::data_unavailable("GetAssignedShifts", e))?;

        Ok(shifts
            .into_iter()
            .map(|shift| ShiftView::new(shift, Some(WorkerShiftStatus::Approved)))
            .collect())
    }

    /// Every shift the worker has ever claimed, whatever the claim's status.
    /// When there are several claims on one shift, the most recently updated wins.
    pub async fn get_all_requested_shifts(
        &self,
        worker_id: i64,
    ) -> Result<Vec<ShiftView>, ShiftError> {
        let claims = self
            .requests
            .list_by_filter(Some(worker_id), None)
            .await
            .map_err(|e| ShiftError::data_unavailable("GetAllRequestedShifts", e))?;
        if claims.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<i64> = Vec::new();
        let mut statuses: HashMap<i64, WorkerShiftStatus> = HashMap::new();
        for claim in &claims {
            if !statuses.contains_key(&claim.shift_id) {
                statuses.insert(claim.shift_id, claim.status);
                ids.push(claim.shift_id);
            }
        }

        let shifts = self
            .shifts
            .get_many(&ids)
            .await
            .map_err(|e| ShiftError::data_unavailable("GetAllRequestedShifts", e))?;

        Ok(shifts
            .into_iter()
            .map(|shift| {
                let status = statuses.get(&shift.id).copied();
                ShiftView::new(shift, status)
            })
            .collect())
    }

    /// All shifts on `date` (`YYYY-MM-DD`), marked `APPROVED` when anyone holds them.
    pub async fn get_shifts_by_day(&self, date: &str) -> Result<Vec<ShiftView>, ShiftError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ShiftError::data_unavailable("GetShiftsByDay", e))?;

        let shifts = self
            .shifts
            .list(&ShiftListQuery::on_date(date))
            .await
            .map_err(|e| ShiftError::data_unavailable("GetShiftsByDay", e))?;

        let mut views = Vec::with_capacity(shifts.len());
        for shift in shifts {
            let claims = self
                .requests
                .list_by_shift(shift.id)
                .await
                .map_err(|e| ShiftError::data_unavailable("GetShiftsByDay", e))?;
            let status = claims
                .iter()
                .any(|c| c.status == WorkerShiftStatus::Approved)
                .then_some(WorkerShiftStatus::Approved);
            views.push(ShiftView::new(shift, status));
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{approve, engine_with_failing_store, engine_with_memory, shift_input};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_available_shifts_exclude_closed_ones() {
        let (engine, _) = engine_with_memory();
        let open = engine
            .create_shift(shift_input("2024-06-03", "09:00", "17:00"))
            .await
            .unwrap();
        let mut closed = shift_input("2024-06-04", "09:00", "17:00");
        closed.is_available = false;
        engine.create_shift(closed).await.unwrap();

        let views = engine.get_available_shifts(1).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, open.id);
        assert_eq!(views[0].status_worker, None);
    }

    #[tokio::test]
    async fn test_rejected_status_shadows_newer_pending_claim() {
        let (engine, _) = engine_with_memory();
        let shift = engine
            .create_shift(shift_input("2024-06-03", "09:00", "17:00"))
            .await
            .unwrap();
        engine.request_shift(shift.id, 1).await.unwrap();
        engine.reject_shift_request(shift.id, 1, None).await.unwrap();
        engine.request_shift(shift.id, 1).await.unwrap();

        let available = engine.get_available_shifts(1).await.unwrap();
        assert_eq!(available[0].status_worker, Some(WorkerShiftStatus::Rejected));

        // Recent-first pick sees the new pending claim instead
        let requested = engine.get_all_requested_shifts(1).await.unwrap();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].status_worker, Some(WorkerShiftStatus::Pending));
    }

    #[tokio::test]
    async fn test_assigned_shifts_in_schedule_order() {
        let (engine, _) = engine_with_memory();
        let later = engine
            .create_shift(shift_input("2024-06-05", "09:00", "17:00"))
            .await
            .unwrap();
        let earlier = engine
            .create_shift(shift_input("2024-06-03", "09:00", "17:00"))
            .await
            .unwrap();
        approve(&engine, later.id, 1).await;
        approve(&engine, earlier.id, 1).await;

        let assigned = engine.get_assigned_shifts(1).await.unwrap();

        let ids: Vec<i64> = assigned.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![earlier.id, later.id]);
        assert!(
            assigned
                .iter()
                .all(|v| v.status_worker == Some(WorkerShiftStatus::Approved) && !v.is_available)
        );
        assert!(engine.get_assigned_shifts(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shifts_by_day_marks_taken_shifts() {
        let (engine, _) = engine_with_memory();
        let taken = engine
            .create_shift(shift_input("2024-06-03", "06:00", "10:00"))
            .await
            .unwrap();
        let open = engine
            .create_shift(shift_input("2024-06-03", "12:00", "16:00"))
            .await
            .unwrap();
        engine
            .create_shift(shift_input("2024-06-04", "06:00", "10:00"))
            .await
            .unwrap();
        approve(&engine, taken.id, 1).await;
        engine.request_shift(open.id, 2).await.unwrap();

        let views = engine.get_shifts_by_day("2024-06-03").await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, taken.id);
        assert_eq!(views[0].status_worker, Some(WorkerShiftStatus::Approved));
        assert_eq!(views[1].id, open.id);
        assert_eq!(views[1].status_worker, None);
    }

    #[tokio::test]
    async fn test_shifts_by_day_rejects_bad_dates() {
        let (engine, _) = engine_with_memory();
        let err = engine.get_shifts_by_day("June 3rd").await.unwrap_err();
        assert!(matches!(
            err,
            ShiftError::DataUnavailable {
                operation: "GetShiftsByDay",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_store_failures_are_data_unavailable() {
        let (engine, store) = engine_with_failing_store();
        let shift = engine
            .create_shift(shift_input("2024-06-03", "09:00", "17:00"))
            .await
            .unwrap();
        approve(&engine, shift.id, 1).await;
        store.fail_on("list_shifts");
        store.fail_on("get_many");

        let err = engine.get_available_shifts(1).await.unwrap_err();
        assert!(matches!(
            err,
            ShiftError::DataUnavailable {
                operation: "GetAvailableShifts",
                ..
            }
        ));

        let err = engine.get_assigned_shifts(1).await.unwrap_err();
        assert!(matches!(
            err,
            ShiftError::DataUnavailable {
                operation: "GetAssignedShifts",
                ..
            }
        ));

        let err = engine.get_shifts_by_day("2024-06-03").await.unwrap_err();
        assert!(matches!(
            err,
            ShiftError::DataUnavailable {
                operation: "GetShiftsByDay",
                ..
            }
        ));
    }
}
