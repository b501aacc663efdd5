use chrono::{Local, NaiveDateTime};

use crate::catalog::ServiceCatalog;
use crate::error::DeskError;
use crate::roster::StaffRoster;
use crate::schedule::{Appointment, ScheduleStore};

/// Inputs for one booking. `slot` and `staff` are the optional manual
/// overrides; when absent the store suggests the slot and the roster picks
/// the staff.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer_name: String,
    pub services: Vec<String>,
    pub slot: Option<NaiveDateTime>,
    pub staff: Option<String>,
}

/// Books an appointment: validates the request, resolves slot and staff,
/// allocates the next id and inserts the record in sorted position. Returns
/// the appointment as stored.
pub fn book(
    store: &mut ScheduleStore,
    roster: &StaffRoster,
    catalog: &ServiceCatalog,
    request: BookingRequest,
) -> Result<Appointment, DeskError> {
    book_at(store, roster, catalog, request, Local::now().naive_local())
}

/// [`book`] with an explicit `now`, used when no manual slot is supplied.
pub fn book_at(
    store: &mut ScheduleStore,
    roster: &StaffRoster,
    catalog: &ServiceCatalog,
    request: BookingRequest,
    now: NaiveDateTime,
) -> Result<Appointment, DeskError> {
    let customer_name = request.customer_name.trim().to_string();
    // Letters and spaces only; spaces are stripped before the check so
    // multi-word names pass.
    let stripped: String = customer_name.chars().filter(|c| *c != ' ').collect();
    if stripped.is_empty() || !stripped.chars().all(char::is_alphabetic) {
        return Err(DeskError::validation(
            "customer name must contain only letters and spaces",
        ));
    }
    if request.services.is_empty() {
        return Err(DeskError::validation("select at least one service"));
    }

    let scheduled_at = match request.slot {
        Some(slot) => slot,
        None => store.next_slot_at(&request.services, catalog, now),
    };
    // First qualified member wins; no load balancing across staff.
    let staff = match request.staff {
        Some(choice) => Some(choice),
        None => roster.qualified(&request.services).into_iter().next(),
    };

    let appointment = Appointment {
        id: store.allocate_id(),
        customer_name,
        services: request.services,
        scheduled_at,
        staff,
    };
    store.insert(appointment.clone());
    Ok(appointment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_roster() -> StaffRoster {
        let mut roster = StaffRoster::new();
        roster.enroll("Asha".to_string(), names(&["Haircut", "Shaving"]), 15000);
        roster.enroll(
            "Rohit".to_string(),
            names(&["Haircut", "Hair Coloring", "Facial"]),
            18000,
        );
        roster
    }

    fn request(name: &str, services: &[&str]) -> BookingRequest {
        BookingRequest {
            customer_name: name.to_string(),
            services: names(services),
            slot: None,
            staff: None,
        }
    }

    #[test]
    fn rejects_names_with_anything_but_letters_and_spaces() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        for bad in ["", "   ", "R2D2", "Priya!"] {
            let result = book_at(
                &mut store,
                &roster,
                &catalog,
                request(bad, &["Haircut"]),
                dt("2024-01-01 10:00"),
            );
            assert!(matches!(result, Err(DeskError::Validation(_))), "{bad:?}");
        }
        assert!(store.is_empty());
    }

    #[test]
    fn accepts_multi_word_names() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let appointment = book_at(
            &mut store,
            &roster,
            &catalog,
            request("Mary Ann", &["Haircut"]),
            dt("2024-01-01 10:00"),
        )
        .unwrap();
        assert_eq!(appointment.customer_name, "Mary Ann");
    }

    #[test]
    fn rejects_an_empty_service_selection() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let result = book_at(
            &mut store,
            &roster,
            &catalog,
            request("Priya", &[]),
            dt("2024-01-01 10:00"),
        );
        assert!(matches!(result, Err(DeskError::Validation(_))));
    }

    #[test]
    fn auto_slot_and_auto_staff_resolution() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let now = dt("2024-01-01 10:00");

        let first = book_at(&mut store, &roster, &catalog, request("Priya", &["Haircut"]), now)
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.scheduled_at, now);
        // First qualified member wins.
        assert_eq!(first.staff.as_deref(), Some("Asha"));

        // The next booking starts when the tail haircut finishes.
        let second = book_at(&mut store, &roster, &catalog, request("Noor", &["Facial"]), now)
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.scheduled_at, dt("2024-01-01 10:30"));
        assert_eq!(second.staff.as_deref(), Some("Rohit"));
    }

    #[test]
    fn unqualifiable_selections_stay_unassigned() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let appointment = book_at(
            &mut store,
            &roster,
            &catalog,
            request("Priya", &["Haircut", "Massage"]),
            dt("2024-01-01 10:00"),
        )
        .unwrap();
        assert_eq!(appointment.staff, None);
        assert_eq!(appointment.staff_label(), "Not Assigned");
    }

    #[test]
    fn explicit_slot_and_staff_are_used_verbatim() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let mut req = request("Priya", &["Haircut"]);
        req.slot = Some(dt("2024-06-01 15:30"));
        req.staff = Some("Rohit".to_string());
        let appointment =
            book_at(&mut store, &roster, &catalog, req, dt("2024-01-01 10:00")).unwrap();
        assert_eq!(appointment.scheduled_at, dt("2024-06-01 15:30"));
        assert_eq!(appointment.staff.as_deref(), Some("Rohit"));
    }

    #[test]
    fn bookings_land_in_sorted_position() {
        let mut store = ScheduleStore::new();
        let roster = sample_roster();
        let catalog = ServiceCatalog::standard();
        let now = dt("2024-01-01 08:00");

        let mut late = request("Priya", &["Haircut"]);
        late.slot = Some(dt("2024-01-02 10:00"));
        book_at(&mut store, &roster, &catalog, late, now).unwrap();

        let mut early = request("Noor", &["Facial"]);
        early.slot = Some(dt("2024-01-01 09:00"));
        book_at(&mut store, &roster, &catalog, early, now).unwrap();

        let ids: Vec<_> = store.appointments().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
