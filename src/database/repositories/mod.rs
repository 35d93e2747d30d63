pub mod memory;
pub mod shift;
pub mod worker_shift;

pub use memory::MemoryStore;
pub use shift::ShiftRepository;
pub use worker_shift::WorkerShiftRepository;
