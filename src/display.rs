use crate::report::DailyReport;
use crate::roster::StaffMember;
use crate::schedule::Appointment;

/// Prints the appointment book as a readable table.
pub fn print_appointments(appointments: &[Appointment]) {
    println!("\n=== Appointments ===");
    if appointments.is_empty() {
        println!("  (none booked)");
        return;
    }
    for appointment in appointments {
        println!(
            "  #{:<4} {} {}  {:<20} {:<14} {}",
            appointment.id,
            appointment.date_string(),
            appointment.time_string(),
            appointment.customer_name,
            appointment.staff_label(),
            appointment.services.join(", "),
        );
    }
}

/// Prints the staff roster with specializations and salary.
pub fn print_roster(members: &[StaffMember]) {
    println!("\n=== Staff ===");
    if members.is_empty() {
        println!("  (no staff enrolled)");
        return;
    }
    for member in members {
        println!(
            "  {:<14} Rs {:<8} {}",
            member.name,
            member.salary,
            member.specializations.join(", "),
        );
    }
}

/// Prints a daily report summary followed by the billed rows.
pub fn print_daily_report(report: &DailyReport) {
    println!("\n=== Daily Report - {} ===", report.date);
    println!("  Total income:     Rs {:.2}", report.income);
    println!("  Customers served: {}", report.customers);
    println!(
        "  Top service:      {}",
        report.top_service.as_deref().unwrap_or("-")
    );
    println!(
        "  Top staff:        {}",
        report.top_staff.as_deref().unwrap_or("-")
    );
    if !report.rows.is_empty() {
        println!("  Details:");
        for row in &report.rows {
            println!(
                "    #{} | {} | {} | Final: Rs {:.2}",
                row.appointment_id, row.customer_name, row.services, row.final_amount
            );
        }
    }
}
