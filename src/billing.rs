use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::ServiceCatalog;
use crate::error::DeskError;
use crate::schedule::Appointment;

/// One persisted bill row, keyed by the appointment it settles. Field names
/// mirror the `bills.csv` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    #[serde(rename = "ID")]
    pub appointment_id: u32,
    #[serde(rename = "Name")]
    pub customer_name: String,
    #[serde(rename = "Staff")]
    pub staff: String,
    /// Service names joined with `;`, as stored on disk.
    #[serde(rename = "Services")]
    pub services: String,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Final")]
    pub final_amount: f64,
    /// Billing date, `%Y-%m-%d`.
    #[serde(rename = "Date")]
    pub date: String,
}

/// Computes the bill for an appointment: catalog total, discount amount and
/// final payable. The discount percentage must be within 0..=100.
pub fn compute_bill(
    appointment: &Appointment,
    catalog: &ServiceCatalog,
    discount_pct: f64,
    billed_on: NaiveDate,
) -> Result<BillRecord, DeskError> {
    if !(0.0..=100.0).contains(&discount_pct) {
        return Err(DeskError::validation("discount must be between 0 and 100"));
    }
    let total = f64::from(catalog.total_price(&appointment.services));
    let discount = total * discount_pct / 100.0;
    Ok(BillRecord {
        appointment_id: appointment.id,
        customer_name: appointment.customer_name.clone(),
        staff: appointment.staff_label().to_string(),
        services: appointment.services.join(";"),
        total,
        discount,
        final_amount: total - discount,
        date: billed_on.format("%Y-%m-%d").to_string(),
    })
}

/// Duplicate-billing guard over an already-loaded bill list.
pub fn is_billed(bills: &[BillRecord], appointment_id: u32) -> bool {
    bills.iter().any(|b| b.appointment_id == appointment_id)
}
