use std::sync::Arc;

use chrono::NaiveDate;

use crate::database::{
    models::{ShiftQuota, WeekWindow},
    store::RequestStore,
};
use crate::services::error::ShiftError;

/// Answers the day and week quota questions for a worker from the request store.
#[derive(Clone)]
pub struct LimitChecker {
    requests: Arc<dyn RequestStore>,
}

impl LimitChecker {
    pub fn new(requests: Arc<dyn RequestStore>) -> Self {
        Self { requests }
    }

    /// `date` must be `YYYY-MM-DD`.
    pub async fn check_limits(&self, worker_id: i64, date: &str) -> Result<ShiftQuota, ShiftError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ShiftError::data_unavailable("CheckLimits", e))?;
        self.limits_on(worker_id, date).await
    }

    pub async fn limits_on(&self, worker_id: i64, date: NaiveDate) -> Result<ShiftQuota, ShiftError> {
        if WeekWindow::containing(date).is_none() {
            return Err(ShiftError::data_unavailable(
                "CheckLimits",
                anyhow::anyhow!("no complete week around {}", date),
            ));
        }

        self.requests
            .quotas(worker_id, date)
            .await
            .map_err(|e| ShiftError::data_unavailable("CheckLimits", e))
    }
}
