mod macros;
pub mod shift;
pub mod worker_shift;

pub use shift::*;
pub use worker_shift::*;
