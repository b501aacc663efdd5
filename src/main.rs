mod billing;
mod booking;
mod catalog;
mod display;
mod error;
mod report;
mod roster;
mod schedule;
mod storage;
mod web;

use std::path::PathBuf;

use chrono::Local;

use catalog::ServiceCatalog;
use roster::StaffRoster;
use schedule::ScheduleStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data_dir = PathBuf::from(
        std::env::var("BELLADESK_DATA_DIR").unwrap_or_else(|_| ".".to_string()),
    );
    let catalog = ServiceCatalog::standard();
    let roster = StaffRoster::from_records(storage::load_staff(&data_dir)?);
    let store = ScheduleStore::from_records(storage::load_appointments(&data_dir)?);

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting BellaDesk API on port {}...", port);
        println!("Data directory: {}", data_dir.display());

        web::start_server(port, data_dir, store, roster, catalog).await?;
        return Ok(());
    }

    // CLI mode: print the current state of the desk
    println!(
        "Loaded {} appointments and {} staff members",
        store.len(),
        roster.len()
    );

    display::print_appointments(store.appointments());
    display::print_roster(roster.members());

    let bills = storage::load_bills(&data_dir)?;
    let today = Local::now().date_naive();
    println!("\n=== Desk Summary ===");
    println!("  Revenue collected: Rs {:.2}", report::total_income(&bills));
    println!("  Today's bookings:  {}", store.booked_on(today));

    display::print_daily_report(&report::daily_report(&bills, today));

    Ok(())
}
