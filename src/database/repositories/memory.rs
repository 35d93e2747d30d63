use std::{collections::BTreeMap, sync::Arc};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::database::{
    models::{
        ClaimDecision, Shift, ShiftInput, ShiftListQuery, ShiftQuota, WeekWindow, WorkerShift,
        WorkerShiftDetail, WorkerShiftDetailQuery, WorkerShiftInput, WorkerShiftStatus,
    },
    store::{ActiveClaimExists, RequestStore, ShiftCatalog},
};

#[derive(Debug, Default)]
struct MemoryState {
    next_shift_id: i64,
    next_claim_id: i64,
    shifts: BTreeMap<i64, Shift>,
    claims: BTreeMap<i64, WorkerShift>,
    last_write: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Wall-clock time, nudged forward so consecutive writes never share a timestamp.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = match self.last_write {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_write = Some(now);
        now
    }
}

/// Process-local storage backing both the shift catalog and the request store.
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(items: Vec<T>, limit: Option<i64>, offset: Option<i64>) -> Vec<T> {
    let offset = offset.unwrap_or(0).max(0) as usize;
    let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
    items.into_iter().skip(offset).take(limit).collect()
}

fn sort_by_schedule(shifts: &mut [Shift]) {
    shifts.sort_by(|a, b| (a.date, a.start_time, a.id).cmp(&(b.date, b.start_time, b.id)));
}

fn sort_recent_first(claims: &mut [WorkerShift]) {
    claims.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
}

#[async_trait]
impl ShiftCatalog for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Shift>> {
        let state = self.state.read().await;
        Ok(state.shifts.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        sort_by_schedule(&mut shifts);
        Ok(shifts)
    }

    async fn create(&self, input: ShiftInput) -> Result<Shift> {
        let mut state = self.state.write().await;
        state.next_shift_id += 1;
        let now = state.tick();
        let shift = Shift {
            id: state.next_shift_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            role_assignment: input.role_assignment,
            location: input.location,
            is_available: input.is_available,
            created_at: now,
            updated_at: now,
        };
        state.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn update(&self, shift: &Shift) -> Result<Option<Shift>> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let Some(stored) = state.shifts.get_mut(&shift.id) else {
            return Ok(None);
        };
        stored.date = shift.date;
        stored.start_time = shift.start_time;
        stored.end_time = shift.end_time;
        stored.role_assignment = shift.role_assignment.clone();
        stored.location = shift.location.clone();
        stored.is_available = shift.is_available;
        stored.updated_at = now;
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let removed = state.shifts.remove(&id).is_some();
        if removed {
            // Mirrors ON DELETE CASCADE
            state.claims.retain(|_, claim| claim.shift_id != id);
        }
        Ok(removed)
    }

    async fn list(&self, filter: &ShiftListQuery) -> Result<Vec<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| {
                filter
                    .role_assignment
                    .as_ref()
                    .is_none_or(|role| &s.role_assignment == role)
                    && filter.location.as_ref().is_none_or(|loc| &s.location == loc)
                    && filter.date.is_none_or(|date| s.date == date)
                    && filter.is_available.is_none_or(|flag| s.is_available == flag)
            })
            .cloned()
            .collect();
        sort_by_schedule(&mut shifts);
        Ok(paginate(shifts, filter.limit, filter.offset))
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn create(&self, input: WorkerShiftInput) -> Result<WorkerShift> {
        let mut state = self.state.write().await;

        if !state.shifts.contains_key(&input.shift_id) {
            return Err(anyhow!("shift {} does not exist", input.shift_id));
        }
        if input.status.is_active()
            && state.claims.values().any(|c| {
                c.shift_id == input.shift_id && c.worker_id == input.worker_id && c.status.is_active()
            })
        {
            return Err(ActiveClaimExists {
                shift_id: input.shift_id,
                worker_id: input.worker_id,
            }
            .into());
        }

        state.next_claim_id += 1;
        let now = state.tick();
        let claim = WorkerShift {
            id: state.next_claim_id,
            shift_id: input.shift_id,
            worker_id: input.worker_id,
            approved_by: None,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        state.claims.insert(claim.id, claim.clone());
        Ok(claim)
    }

    async fn get(&self, id: i64) -> Result<Option<WorkerShift>> {
        let state = self.state.read().await;
        Ok(state.claims.get(&id).cloned())
    }

    async fn list_by_filter(
        &self,
        worker_id: Option<i64>,
        status: Option<WorkerShiftStatus>,
    ) -> Result<Vec<WorkerShift>> {
        let state = self.state.read().await;
        let mut claims: Vec<WorkerShift> = state
            .claims
            .values()
            .filter(|c| worker_id.is_none_or(|w| c.worker_id == w))
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        sort_recent_first(&mut claims);
        Ok(claims)
    }

    async fn update_status(
        &self,
        id: i64,
        status: WorkerShiftStatus,
        approved_by: Option<i64>,
    ) -> Result<Option<WorkerShift>> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let Some(claim) = state.claims.get_mut(&id) else {
            return Ok(None);
        };
        claim.status = status;
        claim.approved_by = approved_by;
        claim.updated_at = now;
        Ok(Some(claim.clone()))
    }

    async fn apply_decisions(&self, decisions: Vec<ClaimDecision>) -> Result<Vec<WorkerShift>> {
        let mut state = self.state.write().await;

        // Check everything before touching anything so a bad id leaves no partial update.
        if let Some(missing) = decisions
            .iter()
            .find(|d| !state.claims.contains_key(&d.claim_id))
        {
            return Err(anyhow!("worker shift {} disappeared mid-update", missing.claim_id));
        }

        let now = state.tick();
        let mut updated = Vec::with_capacity(decisions.len());
        for decision in decisions {
            if let Some(claim) = state.claims.get_mut(&decision.claim_id) {
                claim.status = decision.status;
                claim.approved_by = decision.approved_by;
                claim.updated_at = now;
                updated.push(claim.clone());
            }
        }
        Ok(updated)
    }

    async fn list_by_worker(&self, worker_id: i64) -> Result<Vec<WorkerShift>> {
        let state = self.state.read().await;
        Ok(state
            .claims
            .values()
            .filter(|c| c.worker_id == worker_id)
            .cloned()
            .collect())
    }

    async fn list_by_shift(&self, shift_id: i64) -> Result<Vec<WorkerShift>> {
        let state = self.state.read().await;
        Ok(state
            .claims
            .values()
            .filter(|c| c.shift_id == shift_id)
            .cloned()
            .collect())
    }

    async fn quotas(&self, worker_id: i64, date: NaiveDate) -> Result<ShiftQuota> {
        let state = self.state.read().await;
        let week = WeekWindow::containing(date)
            .ok_or_else(|| anyhow!("no complete week around {}", date))?;

        let approved_dates: Vec<NaiveDate> = state
            .claims
            .values()
            .filter(|c| c.worker_id == worker_id && c.status == WorkerShiftStatus::Approved)
            .filter_map(|c| state.shifts.get(&c.shift_id))
            .map(|s| s.date)
            .filter(|d| week.contains(*d))
            .collect();

        Ok(ShiftQuota {
            has_shift_on_day: approved_dates.contains(&date),
            approved_this_week: approved_dates.len() as i64,
        })
    }

    async fn list_joined_detail(
        &self,
        filter: &WorkerShiftDetailQuery,
    ) -> Result<Vec<WorkerShiftDetail>> {
        let state = self.state.read().await;
        let mut claims: Vec<WorkerShift> = state
            .claims
            .values()
            .filter(|c| filter.worker_id.is_none_or(|w| c.worker_id == w))
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        sort_recent_first(&mut claims);

        let details = claims
            .into_iter()
            .filter_map(|c| {
                let shift = state.shifts.get(&c.shift_id)?;
                let role_matches = filter
                    .role
                    .as_ref()
                    .is_none_or(|role| &shift.role_assignment == role);
                let location_matches = filter
                    .location
                    .as_ref()
                    .is_none_or(|loc| &shift.location == loc);
                (role_matches && location_matches).then(|| WorkerShiftDetail {
                    id: c.id,
                    shift_id: c.shift_id,
                    worker_id: c.worker_id,
                    approved_by: c.approved_by,
                    status: c.status,
                    date: shift.date,
                    start_time: shift.start_time,
                    end_time: shift.end_time,
                    role_assignment: shift.role_assignment.clone(),
                    location: shift.location.clone(),
                    is_available: shift.is_available,
                })
            })
            .collect();

        Ok(paginate(details, filter.limit, filter.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn input(date: &str, role: &str) -> ShiftInput {
        ShiftInput {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            role_assignment: role.to_string(),
            location: "Depot".to_string(),
            is_available: true,
        }
    }

    #[tokio::test]
    async fn test_refuses_second_active_claim() {
        let store = MemoryStore::new();
        let shift = ShiftCatalog::create(&store, input("2024-06-03", "picker")).await.unwrap();

        RequestStore::create(&store, WorkerShiftInput::pending(shift.id, 1))
            .await
            .unwrap();
        let err = RequestStore::create(&store, WorkerShiftInput::pending(shift.id, 1))
            .await
            .unwrap_err();

        assert!(err.is::<ActiveClaimExists>());
    }

    #[tokio::test]
    async fn test_apply_decisions_is_all_or_nothing() {
        let store = MemoryStore::new();
        let shift = ShiftCatalog::create(&store, input("2024-06-03", "picker")).await.unwrap();
        let claim = RequestStore::create(&store, WorkerShiftInput::pending(shift.id, 1))
            .await
            .unwrap();

        let result = store
            .apply_decisions(vec![
                ClaimDecision {
                    claim_id: claim.id,
                    status: WorkerShiftStatus::Approved,
                    approved_by: None,
                },
                ClaimDecision {
                    claim_id: 404,
                    status: WorkerShiftStatus::Rejected,
                    approved_by: None,
                },
            ])
            .await;

        assert!(result.is_err());
        let stored = RequestStore::get(&store, claim.id).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkerShiftStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let store = MemoryStore::new();
        for date in ["2024-06-05", "2024-06-03", "2024-06-04"] {
            ShiftCatalog::create(&store, input(date, "picker")).await.unwrap();
        }
        ShiftCatalog::create(&store, input("2024-06-03", "driver")).await.unwrap();

        let pickers = store
            .list(&ShiftListQuery {
                role_assignment: Some("picker".to_string()),
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        let dates: Vec<String> = pickers.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-04", "2024-06-05"]);
    }

    #[tokio::test]
    async fn test_deleting_a_shift_drops_its_claims() {
        let store = MemoryStore::new();
        let shift = ShiftCatalog::create(&store, input("2024-06-03", "picker")).await.unwrap();
        RequestStore::create(&store, WorkerShiftInput::pending(shift.id, 1))
            .await
            .unwrap();

        assert!(store.delete(shift.id).await.unwrap());
        assert!(store.list_by_shift(shift.id).await.unwrap().is_empty());
        assert!(!store.delete(shift.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_quotas_outside_the_calendar_are_an_error() {
        let store = MemoryStore::new();
        assert!(store.quotas(1, NaiveDate::MAX).await.is_err());
        assert!(store.quotas(1, NaiveDate::MIN).await.is_err());
    }
}
