use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use fake::Fake;
use fake::faker::address::en::CityName;

use crate::database::models::{
    ClaimDecision, Shift, ShiftInput, ShiftListQuery, ShiftQuota, WorkerShift, WorkerShiftDetail,
    WorkerShiftDetailQuery, WorkerShiftInput, WorkerShiftStatus,
};
use crate::database::repositories::MemoryStore;
use crate::database::store::{RequestStore, ShiftCatalog};
use crate::services::ShiftEngine;

/// Engine over a fresh in-memory store. The store handle is returned so tests
/// can inspect claims directly.
pub fn engine_with_memory() -> (ShiftEngine, MemoryStore) {
    let store = MemoryStore::new();
    let engine = ShiftEngine::new(Arc::new(store.clone()), Arc::new(store.clone()));
    (engine, store)
}

/// Open shift on `date` between `start` and `end` (`HH:MM`).
pub fn shift_input(date: &str, start: &str, end: &str) -> ShiftInput {
    ShiftInput {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
        end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        role_assignment: "picker".to_string(),
        location: CityName().fake(),
        is_available: true,
    }
}

/// Request the shift for the worker and approve it straight away.
pub async fn approve(engine: &ShiftEngine, shift_id: i64, worker_id: i64) {
    engine.request_shift(shift_id, worker_id).await.unwrap();
    engine
        .approve_shift_request(shift_id, worker_id, None)
        .await
        .unwrap();
}

/// Delegates to a `MemoryStore`, failing any method named through `fail_on`.
#[derive(Clone, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    failing: Arc<Mutex<HashSet<&'static str>>>,
}

impl FailingStore {
    pub fn fail_on(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    fn check(&self, method: &'static str) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(method) {
            bail!("{} unreachable", method);
        }
        Ok(())
    }
}

#[async_trait]
impl ShiftCatalog for FailingStore {
    async fn get(&self, id: i64) -> anyhow::Result<Option<Shift>> {
        self.check("get_shift")?;
        ShiftCatalog::get(&self.inner, id).await
    }

    async fn get_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Shift>> {
        self.check("get_many")?;
        self.inner.get_many(ids).await
    }

    async fn create(&self, input: ShiftInput) -> anyhow::Result<Shift> {
        self.check("create_shift")?;
        ShiftCatalog::create(&self.inner, input).await
    }

    async fn update(&self, shift: &Shift) -> anyhow::Result<Option<Shift>> {
        self.check("update_shift")?;
        self.inner.update(shift).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.check("delete_shift")?;
        self.inner.delete(id).await
    }

    async fn list(&self, filter: &ShiftListQuery) -> anyhow::Result<Vec<Shift>> {
        self.check("list_shifts")?;
        self.inner.list(filter).await
    }
}

#[async_trait]
impl RequestStore for FailingStore {
    async fn create(&self, input: WorkerShiftInput) -> anyhow::Result<WorkerShift> {
        self.check("create_claim")?;
        RequestStore::create(&self.inner, input).await
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<WorkerShift>> {
        self.check("get_claim")?;
        RequestStore::get(&self.inner, id).await
    }

    async fn list_by_filter(
        &self,
        worker_id: Option<i64>,
        status: Option<WorkerShiftStatus>,
    ) -> anyhow::Result<Vec<WorkerShift>> {
        self.check("list_by_filter")?;
        self.inner.list_by_filter(worker_id, status).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: WorkerShiftStatus,
        approved_by: Option<i64>,
    ) -> anyhow::Result<Option<WorkerShift>> {
        self.check("update_status")?;
        self.inner.update_status(id, status, approved_by).await
    }

    async fn apply_decisions(
        &self,
        decisions: Vec<ClaimDecision>,
    ) -> anyhow::Result<Vec<WorkerShift>> {
        self.check("apply_decisions")?;
        self.inner.apply_decisions(decisions).await
    }

    async fn list_by_worker(&self, worker_id: i64) -> anyhow::Result<Vec<WorkerShift>> {
        self.check("list_by_worker")?;
        self.inner.list_by_worker(worker_id).await
    }

    async fn list_by_shift(&self, shift_id: i64) -> anyhow::Result<Vec<WorkerShift>> {
        self.check("list_by_shift")?;
        self.inner.list_by_shift(shift_id).await
    }

    async fn quotas(&self, worker_id: i64, date: NaiveDate) -> anyhow::Result<ShiftQuota> {
        self.check("quotas")?;
        self.inner.quotas(worker_id, date).await
    }

    async fn list_joined_detail(
        &self,
        filter: &WorkerShiftDetailQuery,
    ) -> anyhow::Result<Vec<WorkerShiftDetail>> {
        self.check("list_joined_detail")?;
        self.inner.list_joined_detail(filter).await
    }
}

/// Engine whose stores can be told to fail. Nothing fails until `fail_on` is called.
pub fn engine_with_failing_store() -> (ShiftEngine, FailingStore) {
    let store = FailingStore::default();
    let engine = ShiftEngine::new(Arc::new(store.clone()), Arc::new(store.clone()));
    (engine, store)
}
