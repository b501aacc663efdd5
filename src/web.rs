use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::billing;
use crate::booking::{self, BookingRequest};
use crate::catalog::ServiceCatalog;
use crate::error::DeskError;
use crate::report;
use crate::roster::StaffRoster;
use crate::schedule::{Appointment, ScheduleStore};
use crate::storage;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Staff value a client sends to request auto-assignment explicitly.
pub const AUTO_STAFF: &str = "-- Auto --";

/// Shared desk state. The mutexes satisfy actix's threading model; the desk
/// itself is operated by a single logical actor.
pub struct AppState {
    pub store: Mutex<ScheduleStore>,
    pub roster: Mutex<StaffRoster>,
    pub catalog: ServiceCatalog,
    pub data_dir: PathBuf,
}

#[derive(Serialize)]
struct AppointmentView {
    id: u32,
    name: String,
    services: Vec<String>,
    date: String,
    time: String,
    staff: String,
}

impl From<&Appointment> for AppointmentView {
    fn from(appointment: &Appointment) -> Self {
        AppointmentView {
            id: appointment.id,
            name: appointment.customer_name.clone(),
            services: appointment.services.clone(),
            date: appointment.date_string(),
            time: appointment.time_string(),
            staff: appointment.staff_label().to_string(),
        }
    }
}

fn desk_error(err: &DeskError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        DeskError::Validation(_) => HttpResponse::BadRequest().json(body),
        DeskError::NotFound(_) => HttpResponse::NotFound().json(body),
        DeskError::Collision(_) => HttpResponse::Conflict().json(body),
    }
}

fn storage_error(err: Box<dyn std::error::Error>) -> actix_web::Error {
    actix_web::error::ErrorInternalServerError(format!("storage failure: {err}"))
}

// Appointment endpoints

async fn list_appointments(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store.lock().unwrap();
    let views: Vec<AppointmentView> = store.appointments().iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(views))
}

#[derive(Deserialize)]
struct SuggestSlotRequest {
    services: Vec<String>,
}

async fn suggest_slot(
    req: web::Json<SuggestSlotRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.services.is_empty() {
        return Ok(desk_error(&DeskError::validation(
            "select services before requesting a slot",
        )));
    }
    let store = state.store.lock().unwrap();
    let slot = store.next_slot(&req.services, &state.catalog);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "date": slot.format(DATE_FORMAT).to_string(),
        "time": slot.format(TIME_FORMAT).to_string(),
    })))
}

#[derive(Deserialize)]
struct BookRequest {
    name: String,
    services: Vec<String>,
    /// Manual slot as `YYYY-MM-DD HH:MM`; an unparseable value falls back to
    /// the suggested slot.
    slot: Option<String>,
    /// Absent, empty or the auto sentinel means auto-assign.
    staff: Option<String>,
}

async fn book(req: web::Json<BookRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let slot = req
        .slot
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT).ok());
    let staff = req
        .staff
        .filter(|choice| !choice.trim().is_empty() && choice != AUTO_STAFF);

    let mut store = state.store.lock().unwrap();
    let roster = state.roster.lock().unwrap();
    let request = BookingRequest {
        customer_name: req.name,
        services: req.services,
        slot,
        staff,
    };
    match booking::book(&mut store, &roster, &state.catalog, request) {
        Ok(appointment) => {
            storage::save_appointments(&state.data_dir, store.appointments())
                .map_err(storage_error)?;
            log::info!(
                "booked appointment {} for {}",
                appointment.id,
                appointment.customer_name
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "appointment": AppointmentView::from(&appointment),
            })))
        }
        Err(err) => Ok(desk_error(&err)),
    }
}

#[derive(Deserialize)]
struct RescheduleRequest {
    date: String,
    time: String,
}

async fn reschedule(
    path: web::Path<u32>,
    req: web::Json<RescheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let date = NaiveDate::parse_from_str(req.date.trim(), DATE_FORMAT);
    let time = NaiveTime::parse_from_str(req.time.trim(), TIME_FORMAT);
    let (Ok(date), Ok(time)) = (date, time) else {
        return Ok(desk_error(&DeskError::validation(
            "date must be YYYY-MM-DD and time HH:MM",
        )));
    };

    let mut store = state.store.lock().unwrap();
    match store.reschedule(id, date.and_time(time)) {
        Ok(()) => {
            storage::save_appointments(&state.data_dir, store.appointments())
                .map_err(storage_error)?;
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        Err(err) => Ok(desk_error(&err)),
    }
}

async fn cancel(path: web::Path<u32>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let mut store = state.store.lock().unwrap();
    match store.cancel(id) {
        Ok(removed) => {
            storage::save_appointments(&state.data_dir, store.appointments())
                .map_err(storage_error)?;
            log::info!("cancelled appointment {}", removed.id);
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        Err(err) => Ok(desk_error(&err)),
    }
}

// Staff endpoints

async fn list_staff(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.roster.lock().unwrap();
    Ok(HttpResponse::Ok().json(roster.members().to_vec()))
}

#[derive(Deserialize)]
struct EnrollRequest {
    name: String,
    specializations: Vec<String>,
    salary: u32,
}

async fn enroll(req: web::Json<EnrollRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Ok(desk_error(&DeskError::validation("staff name is required")));
    }
    let mut roster = state.roster.lock().unwrap();
    roster.enroll(name, req.specializations, req.salary);
    storage::save_staff(&state.data_dir, roster.members()).map_err(storage_error)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn terminate(path: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let name = path.into_inner();
    let mut roster = state.roster.lock().unwrap();
    match roster.terminate(&name) {
        Ok(removed) => {
            storage::save_staff(&state.data_dir, roster.members()).map_err(storage_error)?;
            log::info!("terminated staff member {}", removed.name);
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        Err(err) => Ok(desk_error(&err)),
    }
}

#[derive(Deserialize)]
struct QualifiedRequest {
    services: Vec<String>,
}

async fn qualified_staff(
    req: web::Json<QualifiedRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let roster = state.roster.lock().unwrap();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "staff": roster.qualified(&req.services),
    })))
}

// Catalog, billing and reporting endpoints

async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.services()))
}

async fn list_bills(state: web::Data<AppState>) -> Result<HttpResponse> {
    let bills = storage::load_bills(&state.data_dir).map_err(storage_error)?;
    Ok(HttpResponse::Ok().json(bills))
}

#[derive(Deserialize)]
struct CreateBillRequest {
    appointment_id: u32,
    discount_pct: f64,
}

async fn create_bill(
    req: web::Json<CreateBillRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let store = state.store.lock().unwrap();
    let Some(appointment) = store.get(req.appointment_id) else {
        return Ok(desk_error(&DeskError::not_found(format!(
            "appointment {}",
            req.appointment_id
        ))));
    };
    if storage::bill_exists(&state.data_dir, req.appointment_id).map_err(storage_error)? {
        return Ok(desk_error(&DeskError::validation(format!(
            "appointment {} is already billed",
            req.appointment_id
        ))));
    }
    let billed_on = Local::now().date_naive();
    match billing::compute_bill(appointment, &state.catalog, req.discount_pct, billed_on) {
        Ok(bill) => {
            storage::append_bill(&state.data_dir, &bill).map_err(storage_error)?;
            log::info!("billed appointment {}", bill.appointment_id);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "bill": bill,
            })))
        }
        Err(err) => Ok(desk_error(&err)),
    }
}

async fn daily_report(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Ok(date) = NaiveDate::parse_from_str(path.trim(), DATE_FORMAT) else {
        return Ok(desk_error(&DeskError::validation(
            "report date must be YYYY-MM-DD",
        )));
    };
    let bills = storage::load_bills(&state.data_dir).map_err(storage_error)?;
    Ok(HttpResponse::Ok().json(report::daily_report(&bills, date)))
}

#[derive(Serialize)]
struct ServiceCount {
    service: String,
    bookings: u32,
}

#[derive(Serialize)]
struct MonthRevenue {
    month: String,
    revenue: f64,
}

#[derive(Serialize)]
struct DashboardResponse {
    total_appointments: usize,
    total_staff: usize,
    revenue_collected: f64,
    todays_bookings: usize,
    service_popularity: Vec<ServiceCount>,
    monthly_revenue: Vec<MonthRevenue>,
}

async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store.lock().unwrap();
    let roster = state.roster.lock().unwrap();
    let bills = storage::load_bills(&state.data_dir).map_err(storage_error)?;
    let today = Local::now().date_naive();
    Ok(HttpResponse::Ok().json(DashboardResponse {
        total_appointments: store.len(),
        total_staff: roster.len(),
        revenue_collected: report::total_income(&bills),
        todays_bookings: store.booked_on(today),
        service_popularity: report::service_popularity(&bills)
            .into_iter()
            .map(|(service, bookings)| ServiceCount { service, bookings })
            .collect(),
        monthly_revenue: report::monthly_revenue(&bills)
            .into_iter()
            .map(|(month, revenue)| MonthRevenue { month, revenue })
            .collect(),
    }))
}

pub async fn start_server(
    port: u16,
    data_dir: PathBuf,
    store: ScheduleStore,
    roster: StaffRoster,
    catalog: ServiceCatalog,
) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        store: Mutex::new(store),
        roster: Mutex::new(roster),
        catalog,
        data_dir,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .route("/api/appointments", web::get().to(list_appointments))
            .route("/api/appointments", web::post().to(book))
            .route("/api/appointments/suggest", web::post().to(suggest_slot))
            .route("/api/appointments/{id}/reschedule", web::post().to(reschedule))
            .route("/api/appointments/{id}", web::delete().to(cancel))
            .route("/api/staff", web::get().to(list_staff))
            .route("/api/staff", web::post().to(enroll))
            .route("/api/staff/qualified", web::post().to(qualified_staff))
            .route("/api/staff/{name}", web::delete().to(terminate))
            .route("/api/services", web::get().to(list_services))
            .route("/api/bills", web::get().to(list_bills))
            .route("/api/bills", web::post().to(create_bill))
            .route("/api/reports/daily/{date}", web::get().to(daily_report))
            .route("/api/dashboard", web::get().to(dashboard))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
