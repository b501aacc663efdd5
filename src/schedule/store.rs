use chrono::{Local, NaiveDate, NaiveDateTime};

use super::types::Appointment;
use crate::catalog::ServiceCatalog;
use crate::error::DeskError;

/// Owns the appointment sequence, kept sorted ascending by start time, plus
/// the id counter. All mutation goes through the methods here.
#[derive(Debug)]
pub struct ScheduleStore {
    appointments: Vec<Appointment>,
    next_id: u32,
}

impl ScheduleStore {
    pub fn new() -> Self {
        ScheduleStore {
            appointments: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds the store from persisted records. The id counter resumes at
    /// one past the highest id seen so that cancelled ids are never handed
    /// out again.
    pub fn from_records(records: Vec<Appointment>) -> Self {
        let next_id = records.iter().map(|a| a.id).max().map_or(1, |max| max + 1);
        let mut store = ScheduleStore {
            appointments: Vec::new(),
            next_id,
        };
        for appointment in records {
            store.insert(appointment);
        }
        store
    }

    /// Hands out the next sequential id. The counter only ever moves
    /// forward.
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Inserts keeping the sequence sorted. The new entry goes immediately
    /// before the first existing entry with a strictly later start, so an
    /// entry tied on start time lands after the ties already present.
    pub fn insert(&mut self, appointment: Appointment) {
        let position = self
            .appointments
            .iter()
            .position(|existing| appointment.scheduled_at < existing.scheduled_at)
            .unwrap_or(self.appointments.len());
        self.appointments.insert(position, appointment);
    }

    /// Suggested start for a new booking, measured against `now`: the finish
    /// time of the chronologically last appointment on the books, clamped to
    /// never lie in the past. An empty book suggests `now` itself.
    ///
    /// The requested services do not shift the suggestion; only the tail
    /// booking's duration does. Gaps earlier in the schedule and per-staff
    /// availability are deliberately not considered.
    pub fn next_slot_at(
        &self,
        _services: &[String],
        catalog: &ServiceCatalog,
        now: NaiveDateTime,
    ) -> NaiveDateTime {
        // Sorted ascending, so the tail entry is the chronologically last.
        match self.appointments.last() {
            Some(last) => {
                let finish = last.scheduled_at + catalog.total_duration(&last.services);
                finish.max(now)
            }
            None => now,
        }
    }

    /// [`next_slot_at`](Self::next_slot_at) against the local wall clock.
    pub fn next_slot(&self, services: &[String], catalog: &ServiceCatalog) -> NaiveDateTime {
        self.next_slot_at(services, catalog, Local::now().naive_local())
    }

    /// Moves an appointment to a new start and re-sorts it into place.
    /// Rejects an exact start-time match with any other appointment; the
    /// collision check runs before the entry is pulled out, so a failed
    /// reschedule leaves the sequence untouched.
    pub fn reschedule(&mut self, id: u32, new_start: NaiveDateTime) -> Result<(), DeskError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| DeskError::not_found(format!("appointment {id}")))?;
        let collides = self
            .appointments
            .iter()
            .any(|other| other.id != id && other.scheduled_at == new_start);
        if collides {
            return Err(DeskError::Collision(new_start));
        }
        let mut appointment = self.appointments.remove(index);
        appointment.scheduled_at = new_start;
        self.insert(appointment);
        Ok(())
    }

    /// Removes the appointment with the given id, returning it.
    pub fn cancel(&mut self, id: u32) -> Result<Appointment, DeskError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| DeskError::not_found(format!("appointment {id}")))?;
        Ok(self.appointments.remove(index))
    }

    pub fn get(&self, id: u32) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == id)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// How many appointments start on the given calendar day.
    pub fn booked_on(&self, date: NaiveDate) -> usize {
        self.appointments
            .iter()
            .filter(|a| a.scheduled_at.date() == date)
            .count()
    }
}
