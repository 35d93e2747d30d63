use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::shift::clock_time;

/// Upper bound on approved claims per worker per Monday–Sunday week.
pub const MAXIMUM_WORKER_SHIFTS_PER_WEEK: i64 = 5;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum WorkerShiftStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        // Reserved: nothing in the engine moves a claim into these.
        Done => "DONE",
        Expired => "EXPIRED",
    }
}

impl WorkerShiftStatus {
    /// Pending and approved claims block a new claim on the same shift.
    pub fn is_active(&self) -> bool {
        matches!(self, WorkerShiftStatus::Pending | WorkerShiftStatus::Approved)
    }
}

/// One claim attempt by a worker on a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerShift {
    pub id: i64,
    pub shift_id: i64,
    pub worker_id: i64,
    pub approved_by: Option<i64>,
    pub status: WorkerShiftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerShiftInput {
    pub shift_id: i64,
    pub worker_id: i64,
    pub status: WorkerShiftStatus,
}

impl WorkerShiftInput {
    pub fn pending(shift_id: i64, worker_id: i64) -> Self {
        Self {
            shift_id,
            worker_id,
            status: WorkerShiftStatus::Pending,
        }
    }
}

/// A status change for one claim, applied as part of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDecision {
    pub claim_id: i64,
    pub status: WorkerShiftStatus,
    pub approved_by: Option<i64>,
}

/// Claim joined with the fields of its shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerShiftDetail {
    pub id: i64,
    pub shift_id: i64,
    pub worker_id: i64,
    pub approved_by: Option<i64>,
    pub status: WorkerShiftStatus,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub role_assignment: String,
    pub location: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerShiftDetailQuery {
    pub worker_id: Option<i64>,
    pub status: Option<WorkerShiftStatus>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Approved-claim counts used by the weekly limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftQuota {
    pub has_shift_on_day: bool,
    pub approved_this_week: i64,
}

/// The Monday–Sunday week containing a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl WeekWindow {
    /// `None` when the week runs past the representable date range.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        use chrono::{Datelike, Days};

        // Monday = 1 .. Sunday = 7
        let weekday = u64::from(date.weekday().number_from_monday());
        let monday = date.checked_sub_days(Days::new(weekday - 1))?;
        let sunday = monday.checked_add_days(Days::new(6))?;
        Some(Self { monday, sunday })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.sunday
    }
}

/// Serializes a missing status as `""` and reads `""` back as `None`.
pub mod status_or_empty {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::WorkerShiftStatus;

    pub fn serialize<S: Serializer>(
        status: &Option<WorkerShiftStatus>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(status.map_or("", |s| s.as_str()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<WorkerShiftStatus>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("pending".parse::<WorkerShiftStatus>(), Ok(WorkerShiftStatus::Pending));
        assert_eq!("APPROVED".parse::<WorkerShiftStatus>(), Ok(WorkerShiftStatus::Approved));
        assert!("cancelled".parse::<WorkerShiftStatus>().is_err());
        assert_eq!(WorkerShiftStatus::Rejected.to_string(), "REJECTED");
    }

    #[test]
    fn only_pending_and_approved_are_active() {
        assert!(WorkerShiftStatus::Pending.is_active());
        assert!(WorkerShiftStatus::Approved.is_active());
        assert!(!WorkerShiftStatus::Rejected.is_active());
        assert!(!WorkerShiftStatus::Done.is_active());
        assert!(!WorkerShiftStatus::Expired.is_active());
    }

    #[test]
    fn week_window_runs_monday_to_sunday() {
        // 2024-06-03 is a Monday
        let week = WeekWindow::containing(date("2024-06-05")).unwrap();
        assert_eq!(week.monday, date("2024-06-03"));
        assert_eq!(week.sunday, date("2024-06-09"));

        let from_monday = WeekWindow::containing(date("2024-06-03")).unwrap();
        assert_eq!(from_monday, week);
    }

    #[test]
    fn sunday_belongs_to_the_preceding_monday() {
        let week = WeekWindow::containing(date("2024-06-09")).unwrap();
        assert_eq!(week.monday, date("2024-06-03"));
        assert!(week.contains(date("2024-06-09")));
        assert!(!week.contains(date("2024-06-10")));
        assert!(!week.contains(date("2024-06-02")));
    }

    #[test]
    fn week_window_crosses_month_and_year_boundaries() {
        let week = WeekWindow::containing(date("2025-01-01")).unwrap();
        assert_eq!(week.monday, date("2024-12-30"));
        assert_eq!(week.sunday, date("2025-01-05"));
    }

    #[test]
    fn week_window_at_calendar_limits_is_none() {
        // Last representable day is a Monday, first is a Thursday
        assert_eq!(WeekWindow::containing(NaiveDate::MAX), None);
        assert_eq!(WeekWindow::containing(NaiveDate::MIN), None);
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&WorkerShiftStatus::Pending).unwrap(), "\"PENDING\"");
        let parsed: WorkerShiftStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(parsed, WorkerShiftStatus::Rejected);
    }
}
