pub mod approval;
pub mod availability;
pub mod engine;
pub mod error;
pub mod limits;
pub mod request;

pub use approval::ApprovalOutcome;
pub use engine::ShiftEngine;
pub use error::ShiftError;
pub use limits::LimitChecker;
