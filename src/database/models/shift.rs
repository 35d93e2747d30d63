use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::worker_shift::{WorkerShiftStatus, status_or_empty};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub role_assignment: String,
    pub location: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Time windows intersect (`start1 < end2 && end1 > start2`). Dates are not compared.
    pub fn overlaps(&self, other: &Shift) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }

    pub fn apply(&mut self, input: ShiftInput) {
        self.date = input.date;
        self.start_time = input.start_time;
        self.end_time = input.end_time;
        self.role_assignment = input.role_assignment;
        self.location = input.location;
        self.is_available = input.is_available;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftInput {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub role_assignment: String,
    pub location: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Filter for shift listings. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftListQuery {
    pub role_assignment: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_available: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ShiftListQuery {
    pub fn available() -> Self {
        Self {
            is_available: Some(true),
            ..Default::default()
        }
    }

    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }
}

/// A shift as seen by one worker: the shift fields plus that worker's claim
/// status on it. Serialized with an empty `status_worker` when there is no claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftView {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub role_assignment: String,
    pub location: String,
    pub is_available: bool,
    #[serde(with = "status_or_empty")]
    pub status_worker: Option<WorkerShiftStatus>,
}

impl ShiftView {
    pub fn new(shift: Shift, status_worker: Option<WorkerShiftStatus>) -> Self {
        Self {
            id: shift.id,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            role_assignment: shift.role_assignment,
            location: shift.location,
            is_available: shift.is_available,
            status_worker,
        }
    }
}

/// `HH:MM` on the wire; `HH:MM:SS` is accepted and emitted when seconds are set.
pub mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        serializer.collect_str(&time.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(|e| D::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}
