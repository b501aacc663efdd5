use chrono::NaiveDateTime;

/// Label persisted and displayed for an appointment without assigned staff.
pub const UNASSIGNED: &str = "Not Assigned";

/// A booked appointment. `id` is unique for the lifetime of the desk and is
/// never reused, even after cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: u32,
    pub customer_name: String,
    pub services: Vec<String>,
    pub scheduled_at: NaiveDateTime,
    /// Assigned staff member name, `None` while unassigned.
    pub staff: Option<String>,
}

impl Appointment {
    pub fn date_string(&self) -> String {
        self.scheduled_at.format("%Y-%m-%d").to_string()
    }

    pub fn time_string(&self) -> String {
        self.scheduled_at.format("%H:%M").to_string()
    }

    pub fn staff_label(&self) -> &str {
        self.staff.as_deref().unwrap_or(UNASSIGNED)
    }
}
