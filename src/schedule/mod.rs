pub mod store;
pub mod types;

pub use store::ScheduleStore;
pub use types::{Appointment, UNASSIGNED};
