use thiserror::Error;

/// Failure of a shift engine operation.
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("shift is not available")]
    ShiftUnavailable,

    #[error("already requested or assigned to this shift")]
    DuplicateClaim,

    #[error("overlapping shift on this day")]
    OverlappingShift,

    #[error("already has a shift on this day")]
    SameDayShift,

    #[error("already has {0} shifts this week")]
    WeeklyLimitExceeded(i64),

    #[error("data unavailable in {operation}: {cause:#}")]
    DataUnavailable {
        operation: &'static str,
        cause: anyhow::Error,
    },

    #[error("store error in {operation}: {cause:#}")]
    StoreError {
        operation: &'static str,
        cause: anyhow::Error,
    },
}

impl ShiftError {
    pub fn store(operation: &'static str, cause: anyhow::Error) -> Self {
        log::error!("{} failed: {:#}", operation, cause);
        ShiftError::StoreError { operation, cause }
    }

    pub fn data_unavailable(operation: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        let cause = cause.into();
        log::error!("{} failed: {:#}", operation, cause);
        ShiftError::DataUnavailable { operation, cause }
    }

    pub fn shift_not_found(shift_id: i64) -> Self {
        ShiftError::NotFound(format!("shift {}", shift_id))
    }

    /// True for the checks that turn a claim attempt down, as opposed to lookup or storage failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ShiftError::ShiftUnavailable
                | ShiftError::DuplicateClaim
                | ShiftError::OverlappingShift
                | ShiftError::SameDayShift
                | ShiftError::WeeklyLimitExceeded(_)
        )
    }
}
