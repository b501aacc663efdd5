use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use csv::{Reader, Writer, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};

use crate::billing::BillRecord;
use crate::roster::StaffMember;
use crate::schedule::{Appointment, UNASSIGNED};

pub const STAFF_FILE: &str = "staff.csv";
pub const APPT_FILE: &str = "appointments.csv";
pub const BILL_FILE: &str = "bills.csv";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// On-disk shape of one appointment row: date and time are separate columns
/// and services are `;`-joined.
#[derive(Serialize, Deserialize)]
struct AppointmentRow {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Services")]
    services: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Staff")]
    staff: String,
}

#[derive(Serialize, Deserialize)]
struct StaffRow {
    #[serde(rename = "Name")]
    name: String,
    /// Comma-joined service names.
    #[serde(rename = "Specialization")]
    specialization: String,
    #[serde(rename = "Salary")]
    salary: String,
}

fn appointments_path(data_dir: &Path) -> PathBuf {
    data_dir.join(APPT_FILE)
}

fn staff_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STAFF_FILE)
}

fn bills_path(data_dir: &Path) -> PathBuf {
    data_dir.join(BILL_FILE)
}

/// Loads the appointment book. A missing file is an empty book; rows whose
/// date/time columns do not parse are skipped.
pub fn load_appointments(data_dir: &Path) -> Result<Vec<Appointment>, Box<dyn Error>> {
    let path = appointments_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = Reader::from_path(&path)?;
    let mut appointments = Vec::new();
    for result in reader.deserialize::<AppointmentRow>() {
        let row = result?;
        let stamp = format!("{} {}", row.date.trim(), row.time.trim());
        let Ok(scheduled_at) = NaiveDateTime::parse_from_str(&stamp, DATETIME_FORMAT) else {
            continue;
        };
        let services: Vec<String> = row
            .services
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        let staff = match row.staff.trim() {
            "" | UNASSIGNED => None,
            name => Some(name.to_string()),
        };
        appointments.push(Appointment {
            id: row.id,
            customer_name: row.name,
            services,
            scheduled_at,
            staff,
        });
    }
    info!("loaded {} appointments from {}", appointments.len(), path.display());
    Ok(appointments)
}

/// Full-snapshot write of the appointment book.
pub fn save_appointments(data_dir: &Path, appointments: &[Appointment]) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(appointments_path(data_dir))?;
    for appointment in appointments {
        writer.serialize(AppointmentRow {
            id: appointment.id,
            name: appointment.customer_name.clone(),
            services: appointment.services.join(";"),
            date: appointment.date_string(),
            time: appointment.time_string(),
            staff: appointment.staff_label().to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn default_staff() -> Vec<StaffMember> {
    vec![
        StaffMember {
            name: "Asha".to_string(),
            specializations: vec!["Haircut".to_string(), "Shaving".to_string()],
            salary: 15000,
        },
        StaffMember {
            name: "Rohit".to_string(),
            specializations: vec![
                "Haircut".to_string(),
                "Hair Coloring".to_string(),
                "Facial".to_string(),
            ],
            salary: 18000,
        },
    ]
}

/// Loads the staff roster. When the file is missing the sample roster is
/// seeded and written back, so a fresh data directory starts usable.
pub fn load_staff(data_dir: &Path) -> Result<Vec<StaffMember>, Box<dyn Error>> {
    let path = staff_path(data_dir);
    if !path.exists() {
        let members = default_staff();
        save_staff(data_dir, &members)?;
        info!("seeded default staff roster at {}", path.display());
        return Ok(members);
    }
    let mut reader = Reader::from_path(&path)?;
    let mut members = Vec::new();
    for result in reader.deserialize::<StaffRow>() {
        let row = result?;
        members.push(StaffMember {
            name: row.name,
            specializations: row
                .specialization
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            salary: row.salary.trim().parse().unwrap_or(0),
        });
    }
    Ok(members)
}

/// Full-snapshot write of the staff roster.
pub fn save_staff(data_dir: &Path, members: &[StaffMember]) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(staff_path(data_dir))?;
    for member in members {
        writer.serialize(StaffRow {
            name: member.name.clone(),
            specialization: member.specializations.join(","),
            salary: member.salary.to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads the full bill history; a missing file is an empty history.
pub fn load_bills(data_dir: &Path) -> Result<Vec<BillRecord>, Box<dyn Error>> {
    let path = bills_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = Reader::from_path(&path)?;
    let mut bills = Vec::new();
    for result in reader.deserialize::<BillRecord>() {
        bills.push(result?);
    }
    Ok(bills)
}

/// Appends one bill row, writing the header only when the file is new or
/// empty.
pub fn append_bill(data_dir: &Path, bill: &BillRecord) -> Result<(), Box<dyn Error>> {
    let path = bills_path(data_dir);
    let needs_header = !path.exists() || path.metadata().map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);
    writer.serialize(bill)?;
    writer.flush()?;
    Ok(())
}

/// Whether a bill for this appointment id already exists on disk.
pub fn bill_exists(data_dir: &Path, appointment_id: u32) -> Result<bool, Box<dyn Error>> {
    Ok(crate::billing::is_billed(&load_bills(data_dir)?, appointment_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap()
    }

    fn sample_appointments() -> Vec<Appointment> {
        vec![
            Appointment {
                id: 1,
                customer_name: "Priya".to_string(),
                services: vec!["Haircut".to_string(), "Facial".to_string()],
                scheduled_at: dt("2024-01-01 10:00"),
                staff: Some("Asha".to_string()),
            },
            Appointment {
                id: 2,
                customer_name: "Noor".to_string(),
                services: vec!["Massage".to_string()],
                scheduled_at: dt("2024-01-01 11:00"),
                staff: None,
            },
        ]
    }

    #[test]
    fn appointments_round_trip_including_unassigned_staff() {
        let dir = TempDir::new().unwrap();
        let original = sample_appointments();
        save_appointments(dir.path(), &original).unwrap();
        let loaded = load_appointments(dir.path()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_appointment_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_appointments(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_staff_file_seeds_the_sample_roster() {
        let dir = TempDir::new().unwrap();
        let members = load_staff(dir.path()).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Asha");
        // The seed is written back, so a reload reads the file.
        assert!(dir.path().join(STAFF_FILE).exists());
        assert_eq!(load_staff(dir.path()).unwrap(), members);
    }

    #[test]
    fn staff_round_trip_preserves_specializations() {
        let dir = TempDir::new().unwrap();
        let members = vec![StaffMember {
            name: "Mira".to_string(),
            specializations: vec!["Manicure".to_string(), "Pedicure".to_string()],
            salary: 12000,
        }];
        save_staff(dir.path(), &members).unwrap();
        assert_eq!(load_staff(dir.path()).unwrap(), members);
    }

    #[test]
    fn bills_append_and_report_duplicates() {
        let dir = TempDir::new().unwrap();
        let bill = BillRecord {
            appointment_id: 7,
            customer_name: "Priya".to_string(),
            staff: "Asha".to_string(),
            services: "Haircut;Facial".to_string(),
            total: 280.0,
            discount: 28.0,
            final_amount: 252.0,
            date: "2024-01-01".to_string(),
        };
        assert!(!bill_exists(dir.path(), 7).unwrap());
        append_bill(dir.path(), &bill).unwrap();
        let mut second = bill.clone();
        second.appointment_id = 8;
        append_bill(dir.path(), &second).unwrap();

        let bills = load_bills(dir.path()).unwrap();
        assert_eq!(bills, vec![bill, second]);
        assert!(bill_exists(dir.path(), 7).unwrap());
        assert!(!bill_exists(dir.path(), 9).unwrap());
    }
}
