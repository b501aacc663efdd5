use chrono::NaiveDate;
use serde::Serialize;

use crate::billing::BillRecord;

/// Aggregates over one day's bills, plus the row detail for display.
#[derive(Debug, Serialize)]
pub struct DailyReport {
    /// Report date, `%Y-%m-%d`.
    pub date: String,
    pub income: f64,
    pub customers: usize,
    pub top_service: Option<String>,
    pub top_staff: Option<String>,
    pub rows: Vec<BillRecord>,
}

/// Occurrence counting that remembers first-seen order, so tied winners
/// resolve deterministically to the earliest entry.
fn bump(counts: &mut Vec<(String, u32)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

fn winner(counts: &[(String, u32)]) -> Option<String> {
    counts
        .iter()
        .max_by_key(|(_, n)| *n)
        .map(|(k, _)| k.clone())
}

/// Builds the daily report for `date` from the full bill history.
pub fn daily_report(bills: &[BillRecord], date: NaiveDate) -> DailyReport {
    let date_str = date.format("%Y-%m-%d").to_string();
    let mut rows = Vec::new();
    let mut income = 0.0;
    let mut service_counts: Vec<(String, u32)> = Vec::new();
    let mut staff_counts: Vec<(String, u32)> = Vec::new();

    for bill in bills.iter().filter(|b| b.date == date_str) {
        income += bill.final_amount;
        for service in bill.services.split(';').filter(|s| !s.is_empty()) {
            bump(&mut service_counts, service.trim());
        }
        bump(&mut staff_counts, &bill.staff);
        rows.push(bill.clone());
    }

    DailyReport {
        date: date_str,
        income,
        customers: rows.len(),
        top_service: winner(&service_counts),
        top_staff: winner(&staff_counts),
        rows,
    }
}

/// Total collected revenue across the whole bill history.
pub fn total_income(bills: &[BillRecord]) -> f64 {
    bills.iter().map(|b| b.final_amount).sum()
}

/// How often each service has been billed, in first-seen order.
pub fn service_popularity(bills: &[BillRecord]) -> Vec<(String, u32)> {
    let mut counts = Vec::new();
    for bill in bills {
        for service in bill.services.split(';').filter(|s| !s.is_empty()) {
            bump(&mut counts, service.trim());
        }
    }
    counts
}

/// Revenue summed per `YYYY-MM` month, in first-seen order.
pub fn monthly_revenue(bills: &[BillRecord]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for bill in bills {
        if bill.date.len() < 7 {
            continue;
        }
        let month = &bill.date[..7];
        match totals.iter_mut().find(|(m, _)| m == month) {
            Some((_, sum)) => *sum += bill.final_amount,
            None => totals.push((month.to_string(), bill.final_amount)),
        }
    }
    totals
}
